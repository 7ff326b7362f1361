//! Data models for keepcore.
//!
//! This module defines the core entities on both sides of a sync run: the
//! remote snapshot (RemoteNote and its media references) and the local
//! mirror state (LocalNote, LocalMedia) recovered from the output directory.
//! All IDs are opaque stable strings assigned by Google Keep.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note as fetched from the remote source for the current run.
///
/// Snapshots are immutable: the engine never mutates a RemoteNote, it only
/// compares it against local state and re-renders from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteNote {
    /// Unique identifier assigned by Keep (stable across runs)
    pub id: String,
    /// Note title (may be empty)
    pub title: String,
    /// Note body text
    pub text: String,
    /// Creation/edit/update/trash/delete times
    pub timestamps: NoteTimestamps,
    /// Whether the note is pinned
    pub pinned: bool,
    /// Whether the note is in the trash
    pub trashed: bool,
    /// Whether the note is marked deleted
    pub deleted: bool,
    /// Color name as reported by Keep (e.g. "White")
    pub color: String,
    /// Note type name as reported by Keep (e.g. "Note", "List")
    pub note_type: String,
    /// Parent node id ("root" for top-level notes)
    pub parent_id: String,
    /// Sort key as reported by Keep
    pub sort: String,
    /// Web URL of the note
    pub url: String,
    /// Label names attached to the note, in Keep order
    pub tags: Vec<String>,
    /// Annotation links attached to the note, in Keep order
    pub links: Vec<NoteLink>,
    /// Media blobs attached to the note, in Keep order
    pub media: Vec<MediaRef>,
}

impl RemoteNote {
    /// When the note was last updated remotely
    pub fn updated(&self) -> DateTime<Utc> {
        self.timestamps.updated
    }
}

/// Timestamps attached to a remote note.
///
/// `trashed` and `deleted` are `None` when the note was never trashed or
/// deleted; Keep also reports epoch-0 placeholders for these, which callers
/// filter with [`year_after_epoch`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteTimestamps {
    pub created: DateTime<Utc>,
    pub edited: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub trashed: Option<DateTime<Utc>>,
    pub deleted: Option<DateTime<Utc>>,
}

impl NoteTimestamps {
    /// Create timestamps with all three required fields set to the same instant
    pub fn all(at: DateTime<Utc>) -> Self {
        Self {
            created: at,
            edited: at,
            updated: at,
            trashed: None,
            deleted: None,
        }
    }
}

/// True when a timestamp is meaningful rather than an epoch-0 placeholder.
pub fn year_after_epoch(ts: DateTime<Utc>) -> bool {
    use chrono::Datelike;
    ts.year() > 1970
}

/// A link annotation on a remote note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteLink {
    pub url: String,
    pub title: Option<String>,
}

/// The kind of a media blob attached to a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Drawing,
    Audio,
}

/// A reference to a media blob attached to a remote note.
///
/// The blob content itself is fetched through the `NoteSource` boundary;
/// this carries only the identity and the hints needed for the
/// skip-unchanged heuristic and extension selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Stable blob identifier assigned by Keep
    pub media_id: String,
    pub kind: MediaKind,
    /// Declared byte size; absent for kinds that report none (drawings)
    pub size: Option<u64>,
    /// Declared mimetype (e.g. "image/jpeg")
    pub mimetype: Option<String>,
}

/// A note as known from the local mirror directory.
///
/// `path` is `None` when the note is known only through orphaned media
/// files (a `media/<note_id>/` directory with no matching note file).
#[derive(Debug, Clone, Default)]
pub struct LocalNote {
    /// Remote note id this file claims (from its frontmatter)
    pub id: String,
    /// Path of the note file, if one was indexed
    pub path: Option<PathBuf>,
    /// The `timestamps.updated` value stored in the file's frontmatter
    pub timestamp_updated: Option<DateTime<Utc>>,
    /// Media files on disk belonging to this note, keyed by media id
    pub media: HashMap<String, LocalMedia>,
}

impl LocalNote {
    /// Create an empty entry for the given remote id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// True when only media files were found for this id
    pub fn is_media_only(&self) -> bool {
        self.path.is_none()
    }
}

/// A media file recovered from the on-disk layout.
///
/// Keyed by (`note_id`, `media_id`); both are derived from the directory
/// and file names, never from embedded metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMedia {
    pub path: PathBuf,
    pub note_id: String,
    pub media_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_note() -> RemoteNote {
        RemoteNote {
            id: "note-1".to_string(),
            title: "Groceries".to_string(),
            text: "milk".to_string(),
            timestamps: NoteTimestamps::all(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            pinned: false,
            trashed: false,
            deleted: false,
            color: "White".to_string(),
            note_type: "Note".to_string(),
            parent_id: "root".to_string(),
            sort: "0".to_string(),
            url: "https://keep.google.com/#NOTE/note-1".to_string(),
            tags: Vec::new(),
            links: Vec::new(),
            media: Vec::new(),
        }
    }

    #[test]
    fn test_updated_accessor() {
        let note = sample_note();
        assert_eq!(note.updated(), note.timestamps.updated);
    }

    #[test]
    fn test_year_after_epoch() {
        assert!(!year_after_epoch(Utc.timestamp_opt(0, 0).unwrap()));
        assert!(!year_after_epoch(
            Utc.with_ymd_and_hms(1970, 12, 31, 23, 59, 59).unwrap()
        ));
        assert!(year_after_epoch(
            Utc.with_ymd_and_hms(1971, 1, 1, 0, 0, 0).unwrap()
        ));
    }

    #[test]
    fn test_local_note_media_only() {
        let mut note = LocalNote::new("note-1");
        assert!(note.is_media_only());
        note.path = Some(PathBuf::from("/tmp/x.md"));
        assert!(!note.is_media_only());
    }

    #[test]
    fn test_media_kind_serialization() {
        let json = serde_json::to_string(&MediaKind::Drawing).unwrap();
        assert_eq!(json, "\"drawing\"");
        let parsed: MediaKind = serde_json::from_str("\"audio\"").unwrap();
        assert_eq!(parsed, MediaKind::Audio);
    }
}
