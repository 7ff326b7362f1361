//! Media file handling.
//!
//! Media blobs live under `<notes_dir>/media/<note_id>/<media_id>.<ext>`,
//! with the extension taken from the blob's declared mimetype. Fetching is
//! delegated to the `NoteSource`; a size-equality heuristic skips blobs
//! that appear unchanged locally. The heuristic is best-effort: drawings
//! report no size and are always re-fetched when their note is processed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::KeepResult;
use crate::index::MEDIA_DIR;
use crate::models::{MediaKind, MediaRef, RemoteNote};
use crate::paths::sanitize_file_name;
use crate::source::NoteSource;

/// The media root under the notes directory.
pub fn media_root(notes_dir: &Path) -> PathBuf {
    notes_dir.join(MEDIA_DIR)
}

/// Pick a file extension for a media blob.
///
/// The mimetype subtype wins when declared; otherwise images and drawings
/// fall back to jpg and audio to its 3gp container.
pub fn extension_for(media: &MediaRef) -> String {
    if let Some(mimetype) = &media.mimetype {
        if let Some(subtype) = mimetype.split('/').nth(1) {
            if !subtype.is_empty() {
                return subtype.to_string();
            }
        }
    }
    match media.kind {
        MediaKind::Image | MediaKind::Drawing => "jpg".to_string(),
        MediaKind::Audio => "3gp".to_string(),
    }
}

/// The on-disk file name for a media blob.
pub fn media_file_name(media: &MediaRef) -> String {
    let id = sanitize_file_name(&media.media_id, usize::MAX);
    format!("{}.{}", id, extension_for(media))
}

/// The id the local indexer would recover for this blob's file.
///
/// Keeps orphan matching symmetric with filename-based id recovery: the
/// key is what `media_id_from_file_name` yields for the name we write.
pub fn media_index_key(media: &MediaRef) -> String {
    crate::index::media_id_from_file_name(&media_file_name(media))
}

/// Fetch (or skip) every media blob attached to a note.
///
/// Returns the file names written or kept, in the note's media order, plus
/// the number of blobs actually downloaded. With `skip_existing` set, a
/// blob whose declared size equals the on-disk size is left untouched.
pub fn sync_note_media<S: NoteSource + ?Sized>(
    source: &mut S,
    note: &RemoteNote,
    media_root: &Path,
    skip_existing: bool,
) -> KeepResult<(Vec<String>, u64)> {
    let mut files = Vec::with_capacity(note.media.len());
    let mut downloaded = 0u64;

    if note.media.is_empty() {
        return Ok((files, downloaded));
    }

    let note_dir = media_root.join(&note.id);
    fs::create_dir_all(&note_dir)?;

    for media in &note.media {
        let file_name = media_file_name(media);
        let path = note_dir.join(&file_name);

        if skip_existing && appears_unchanged(&path, media) {
            tracing::debug!(
                note_id = %note.id,
                media_id = %media.media_id,
                "media unchanged by size, skipping download"
            );
            files.push(file_name);
            continue;
        }

        let blob = source.fetch_media(&note.id, media)?;
        fs::write(&path, &blob.bytes)?;
        tracing::info!(
            note_id = %note.id,
            media_id = %media.media_id,
            bytes = blob.bytes.len(),
            "downloaded media file"
        );
        downloaded += 1;
        files.push(file_name);
    }

    Ok((files, downloaded))
}

/// True when the local file's size matches the declared blob size.
///
/// No declared size means the heuristic can never match.
fn appears_unchanged(path: &Path, media: &MediaRef) -> bool {
    let Some(declared) = media.size else {
        return false;
    };
    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.len() == declared,
        Err(_) => false,
    }
}
