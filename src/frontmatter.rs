//! Frontmatter metadata header for exported note files.
//!
//! Every note file starts with a YAML frontmatter block carrying the note's
//! Keep metadata, followed by the rendered markdown body. The header layout
//! is a compatibility surface: files written by earlier versions of the
//! exporter (which stored timestamps as floats) must still parse.
//!
//! Parsing is deliberately tolerant. A file without a frontmatter block is
//! not an error, it is simply foreign to the exporter and is never touched.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{KeepError, KeepResult};
use crate::models::{year_after_epoch, RemoteNote};

/// The metadata header written at the top of every exported note file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteMetadata {
    pub google_keep_id: String,
    pub title: String,
    pub pinned: bool,
    pub trashed: bool,
    pub deleted: bool,
    pub color: String,
    #[serde(rename = "type")]
    pub note_type: String,
    pub parent_id: String,
    pub sort: String,
    pub url: String,
    pub tags: Vec<String>,
    pub timestamps: MetadataTimestamps,
}

/// Timestamps in the header, stored as Unix epoch seconds.
///
/// `trashed` and `deleted` are written only when the source timestamp's
/// year exceeds 1970; Keep reports epoch-0 placeholders for notes that were
/// never trashed or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataTimestamps {
    pub created: i64,
    pub edited: i64,
    pub updated: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub trashed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deleted: Option<i64>,
}

impl NoteMetadata {
    /// Build the header for a remote note.
    pub fn from_note(note: &RemoteNote) -> Self {
        let ts = &note.timestamps;
        Self {
            google_keep_id: note.id.clone(),
            title: note.title.clone(),
            pinned: note.pinned,
            trashed: note.trashed,
            deleted: note.deleted,
            color: note.color.clone(),
            note_type: note.note_type.clone(),
            parent_id: note.parent_id.clone(),
            sort: note.sort.clone(),
            url: note.url.clone(),
            tags: note.tags.clone(),
            timestamps: MetadataTimestamps {
                created: ts.created.timestamp(),
                edited: ts.edited.timestamp(),
                updated: ts.updated.timestamp(),
                trashed: ts.trashed.filter(|t| year_after_epoch(*t)).map(|t| t.timestamp()),
                deleted: ts.deleted.filter(|t| year_after_epoch(*t)).map(|t| t.timestamp()),
            },
        }
    }
}

/// The fields the local indexer needs back out of a stored header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedHeader {
    /// The stored Keep id, if the header carries one
    pub google_keep_id: Option<String>,
    /// The stored `timestamps.updated` value, if present and well-formed
    pub updated: Option<DateTime<Utc>>,
}

/// Render a full note document: frontmatter header plus body.
///
/// When `header` is false the body is written alone (body-only file).
pub fn render_document(note: &RemoteNote, body: &str, header: bool) -> KeepResult<String> {
    if !header {
        return Ok(body.to_string());
    }
    let metadata = NoteMetadata::from_note(note);
    let yaml = serde_yaml::to_string(&metadata)?;
    Ok(format!("---\n{}---\n\n{}", yaml, body))
}

/// Extract the frontmatter fields the indexer cares about.
///
/// Returns `Ok(None)` when the file has no frontmatter block at all (a
/// foreign markdown file), and `Err` when a block is present but malformed.
pub fn parse_header(content: &str) -> KeepResult<Option<ParsedHeader>> {
    let Some(rest) = content.strip_prefix("---\n") else {
        return Ok(None);
    };
    let Some(split_at) = rest.find("\n---\n").map(|i| i + 1).or_else(|| {
        // header with no body, closing delimiter at end of file
        rest.strip_suffix("\n---").map(|s| s.len() + 1)
    }) else {
        return Err(KeepError::Other(
            "frontmatter block has no closing delimiter".to_string(),
        ));
    };
    let yaml = &rest[..split_at - 1];
    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;

    // ids are strings, but YAML reads an unquoted numeric id as an integer
    let google_keep_id = value.get("google_keep_id").and_then(|v| {
        v.as_str()
            .map(String::from)
            .or_else(|| v.as_i64().map(|n| n.to_string()))
    });
    // older exporter versions wrote timestamps as floats
    let updated = value
        .get("timestamps")
        .and_then(|ts| ts.get("updated"))
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single());

    Ok(Some(ParsedHeader {
        google_keep_id,
        updated,
    }))
}
