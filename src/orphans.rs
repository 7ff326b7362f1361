//! Orphan detection and removal.
//!
//! An orphan is a locally-present note or media file whose remote
//! counterpart is absent from the current snapshot. Deletion is gated by an
//! explicit authorization flag; without it, orphans are only counted and
//! reported. Note orphans and media orphans are evaluated independently: a
//! note survives while a media blob it no longer references is reaped, and
//! vice versa.

use std::collections::HashSet;
use std::fs;

use crate::index::LocalIndex;
use crate::media::media_index_key;
use crate::models::RemoteNote;

/// Counts of orphaned notes and media files.
///
/// When deletion was authorized these are removal counts; otherwise they
/// count what would have been removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrphanCounts {
    pub notes: u64,
    pub media: u64,
}

/// Remove (or just report) local files absent from the remote snapshot.
///
/// Individual delete failures are logged and skipped; reaping is never
/// fatal to the run.
pub fn delete_local_only_files(
    index: &LocalIndex,
    remote_notes: &[RemoteNote],
    authorized: bool,
) -> OrphanCounts {
    let remote_ids: HashSet<&str> = remote_notes.iter().map(|n| n.id.as_str()).collect();
    let remote_media: HashSet<(&str, String)> = remote_notes
        .iter()
        .flat_map(|note| {
            note.media
                .iter()
                .map(move |media| (note.id.as_str(), media_index_key(media)))
        })
        .collect();

    let mut counts = OrphanCounts::default();

    for (id, local) in index.iter() {
        let note_is_orphan = !remote_ids.contains(id.as_str());

        if note_is_orphan {
            if let Some(path) = &local.path {
                if authorized {
                    match fs::remove_file(path) {
                        Ok(()) => {
                            tracing::info!(id = %id, path = %path.display(), "deleted orphaned note file");
                            counts.notes += 1;
                        }
                        Err(e) => {
                            tracing::warn!(id = %id, path = %path.display(), error = %e, "could not delete orphaned note file");
                        }
                    }
                } else {
                    tracing::debug!(id = %id, path = %path.display(), "local-only note (deletion not authorized)");
                    counts.notes += 1;
                }
            }
        }

        for (media_id, media) in &local.media {
            if remote_media.contains(&(id.as_str(), media_id.clone())) {
                continue;
            }
            if authorized {
                match fs::remove_file(&media.path) {
                    Ok(()) => {
                        tracing::info!(
                            note_id = %id,
                            media_id = %media_id,
                            "deleted orphaned media file"
                        );
                        counts.media += 1;
                    }
                    Err(e) => {
                        tracing::warn!(
                            note_id = %id,
                            media_id = %media_id,
                            error = %e,
                            "could not delete orphaned media file"
                        );
                    }
                }
            } else {
                counts.media += 1;
            }
        }
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{index_existing_files, MEDIA_DIR};
    use crate::models::{MediaKind, MediaRef, NoteTimestamps};
    use chrono::{TimeZone, Utc};
    use std::path::Path;
    use tempfile::TempDir;

    fn remote(id: &str, media_ids: &[&str]) -> RemoteNote {
        RemoteNote {
            id: id.to_string(),
            title: "t".to_string(),
            text: String::new(),
            timestamps: NoteTimestamps::all(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            pinned: false,
            trashed: false,
            deleted: false,
            color: "White".to_string(),
            note_type: "Note".to_string(),
            parent_id: "root".to_string(),
            sort: "0".to_string(),
            url: String::new(),
            tags: Vec::new(),
            links: Vec::new(),
            media: media_ids
                .iter()
                .map(|m| MediaRef {
                    media_id: m.to_string(),
                    kind: MediaKind::Image,
                    size: Some(1),
                    mimetype: Some("image/jpeg".to_string()),
                })
                .collect(),
        }
    }

    fn write_note_file(dir: &Path, name: &str, id: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(
            &path,
            format!(
                "---\ngoogle_keep_id: {}\ntimestamps:\n  updated: 1\n---\n\nbody\n",
                id
            ),
        )
        .unwrap();
        path
    }

    fn write_media_file(root: &Path, note_id: &str, file_name: &str) -> std::path::PathBuf {
        let dir = root.join(MEDIA_DIR).join(note_id);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file_name);
        std::fs::write(&path, b"x").unwrap();
        path
    }

    #[test]
    fn test_unauthorized_reports_without_deleting() {
        let tmp = TempDir::new().unwrap();
        let note_path = write_note_file(tmp.path(), "gone.md", "gone");
        let media_path = write_media_file(tmp.path(), "gone", "blob.1.jpeg");
        let index = index_existing_files(tmp.path());

        let counts = delete_local_only_files(&index, &[], false);
        assert_eq!(counts, OrphanCounts { notes: 1, media: 1 });
        assert!(note_path.exists());
        assert!(media_path.exists());
    }

    #[test]
    fn test_orphan_symmetry() {
        let tmp = TempDir::new().unwrap();
        let kept_path = write_note_file(tmp.path(), "kept.md", "kept");
        let kept_media = write_media_file(tmp.path(), "kept", "blob.1.jpeg");
        let gone_path = write_note_file(tmp.path(), "gone.md", "gone");
        let gone_media = write_media_file(tmp.path(), "gone", "blob.2.jpeg");
        let index = index_existing_files(tmp.path());

        let snapshot = vec![remote("kept", &["blob.1"])];
        let counts = delete_local_only_files(&index, &snapshot, true);

        assert_eq!(counts, OrphanCounts { notes: 1, media: 1 });
        assert!(kept_path.exists());
        assert!(kept_media.exists());
        assert!(!gone_path.exists());
        assert!(!gone_media.exists());
    }

    #[test]
    fn test_media_reaped_while_note_kept() {
        let tmp = TempDir::new().unwrap();
        let note_path = write_note_file(tmp.path(), "n.md", "n1");
        let stale = write_media_file(tmp.path(), "n1", "blob.old.jpeg");
        let current = write_media_file(tmp.path(), "n1", "blob.new.jpeg");
        let index = index_existing_files(tmp.path());

        // remote note still exists but only references blob.new
        let snapshot = vec![remote("n1", &["blob.new"])];
        let counts = delete_local_only_files(&index, &snapshot, true);

        assert_eq!(counts, OrphanCounts { notes: 0, media: 1 });
        assert!(note_path.exists());
        assert!(current.exists());
        assert!(!stale.exists());
    }

    #[test]
    fn test_media_only_placeholder_is_media_orphan_not_note_orphan() {
        let tmp = TempDir::new().unwrap();
        let media_path = write_media_file(tmp.path(), "ghost", "blob.1.jpeg");
        let index = index_existing_files(tmp.path());

        let counts = delete_local_only_files(&index, &[], true);
        assert_eq!(counts, OrphanCounts { notes: 0, media: 1 });
        assert!(!media_path.exists());
    }

    #[test]
    fn test_nothing_orphaned() {
        let tmp = TempDir::new().unwrap();
        write_note_file(tmp.path(), "n.md", "n1");
        write_media_file(tmp.path(), "n1", "blob.1.jpeg");
        let index = index_existing_files(tmp.path());

        let snapshot = vec![remote("n1", &["blob.1"])];
        let counts = delete_local_only_files(&index, &snapshot, true);
        assert_eq!(counts, OrphanCounts::default());
    }
}
