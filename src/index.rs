//! Local file indexing.
//!
//! Before any reconciliation decision is made, the output directory is
//! scanned once and turned into an in-memory index keyed by remote note id.
//! The index is rebuilt from scratch every run and discarded at run end;
//! the files themselves are the only cross-run state.
//!
//! The scan is strictly read-only and must fully complete before any
//! create/update/delete begins.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::frontmatter;
use crate::models::{LocalMedia, LocalNote};

/// Counters reported by a single indexing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    /// Note files successfully indexed by Keep id
    pub notes: u64,
    /// Files that are not the exporter's (markdown without a Keep id,
    /// stray non-media files)
    pub foreign: u64,
    /// Media files registered under an owning note
    pub media: u64,
    /// Note files that could not be read or whose header failed to parse
    pub read_errors: u64,
}

/// The result of scanning the output directory.
#[derive(Debug, Default)]
pub struct LocalIndex {
    notes: HashMap<String, LocalNote>,
    pub stats: IndexStats,
}

impl LocalIndex {
    pub fn get(&self, id: &str) -> Option<&LocalNote> {
        self.notes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut LocalNote> {
        self.notes.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notes.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.notes.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LocalNote)> {
        self.notes.iter()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Register a note file for `id`, overwriting any earlier entry's path.
    ///
    /// When two files claim the same id the later-scanned file wins; the
    /// earlier file stays on disk but becomes invisible to this run.
    fn register_note_file(&mut self, id: &str, path: PathBuf, updated: Option<chrono::DateTime<chrono::Utc>>) {
        let entry = self
            .notes
            .entry(id.to_string())
            .or_insert_with(|| LocalNote::new(id));
        if let Some(existing) = &entry.path {
            if existing != &path {
                tracing::warn!(
                    id = %id,
                    earlier = %existing.display(),
                    later = %path.display(),
                    "two local files claim the same note id, keeping the later one"
                );
            }
        }
        entry.path = Some(path);
        entry.timestamp_updated = updated;
    }

    /// Register a media file under its owning note, creating a placeholder
    /// entry (no note path) if the note was not indexed yet.
    fn register_media_file(&mut self, note_id: &str, media_id: &str, path: PathBuf) {
        let entry = self
            .notes
            .entry(note_id.to_string())
            .or_insert_with(|| LocalNote::new(note_id));
        entry.media.insert(
            media_id.to_string(),
            LocalMedia {
                path,
                note_id: note_id.to_string(),
                media_id: media_id.to_string(),
            },
        );
    }
}

/// Name of the media subdirectory under the notes directory.
pub const MEDIA_DIR: &str = "media";

/// Scan the output directory and build the local index.
///
/// Classification:
/// - `.md` files are note files: the frontmatter header is parsed for the
///   Keep id and stored updated timestamp. Unreadable or malformed files
///   are counted and skipped, never fatal.
/// - files under `media/<note_id>/` are media files: the owning note id is
///   the parent directory name and the media id is recovered from the
///   filename prefix.
/// - everything else is foreign and left alone.
pub fn index_existing_files(notes_dir: &Path) -> LocalIndex {
    let mut index = LocalIndex::default();
    let media_root = notes_dir.join(MEDIA_DIR);

    // sorted traversal keeps the "later file wins" collision policy
    // deterministic across runs
    for entry in WalkDir::new(notes_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();

        if path.extension().and_then(|e| e.to_str()) == Some("md") {
            index_note_file(&mut index, path);
        } else {
            index_media_file(&mut index, &media_root, path);
        }
    }

    tracing::info!(
        notes = index.stats.notes,
        media = index.stats.media,
        foreign = index.stats.foreign,
        read_errors = index.stats.read_errors,
        "indexed local files"
    );
    index
}

fn index_note_file(index: &mut LocalIndex, path: &Path) {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read note file");
            index.stats.read_errors += 1;
            return;
        }
    };

    let header = match frontmatter::parse_header(&content) {
        Ok(Some(header)) => header,
        Ok(None) => {
            // markdown file with no frontmatter, not ours
            index.stats.foreign += 1;
            return;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not parse note header");
            index.stats.read_errors += 1;
            return;
        }
    };

    match header.google_keep_id {
        Some(id) => {
            index.register_note_file(&id, path.to_path_buf(), header.updated);
            index.stats.notes += 1;
        }
        None => {
            index.stats.foreign += 1;
        }
    }
}

fn index_media_file(index: &mut LocalIndex, media_root: &Path, path: &Path) {
    // only files one level under media/ belong to a note; a stray file at
    // the output root or directly inside media/ must not mint a bogus id
    let owner = path.parent().and_then(|parent| {
        if parent.parent() == Some(media_root) {
            parent.file_name().and_then(|n| n.to_str())
        } else {
            None
        }
    });

    let Some(note_id) = owner else {
        index.stats.foreign += 1;
        return;
    };

    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
        index.stats.foreign += 1;
        return;
    };

    let media_id = media_id_from_file_name(file_name);
    index.register_media_file(note_id, &media_id, path.to_path_buf());
    index.stats.media += 1;
}

/// Recover a media id from an on-disk file name.
///
/// Media files are written as `<media_id>.<ext>` where Keep blob ids
/// themselves contain a single '.', so the id is the first two
/// '.'-delimited segments. Names with fewer segments fall back to the stem.
pub fn media_id_from_file_name(file_name: &str) -> String {
    let parts: Vec<&str> = file_name.split('.').collect();
    if parts.len() >= 3 {
        parts[..2].join(".")
    } else {
        parts[0].to_string()
    }
}
