//! Note path resolution and renaming.
//!
//! Every remote note maps to exactly one canonical path under the output
//! directory: `<date-formatted created> - <sanitized title>.md`, with a
//! deterministic `.{id}.{n}` suffix when the plain name is taken by an
//! unrelated file. Resolution is a pure function over the index plus
//! filesystem existence checks; it never writes.
//!
//! Renaming is a separate, best-effort step so callers can opt out of it
//! entirely while still matching notes by id.

use std::fs;
use std::path::{Path, PathBuf};

use crate::index::LocalIndex;
use crate::models::{LocalNote, RemoteNote};

/// File extension for exported note files.
pub const NOTE_EXT: &str = "md";

/// Maximum length of a note file's base name, in characters.
const MAX_BASE_LEN: usize = 135;

/// Replace filesystem-unsafe characters and cap the length.
///
/// Path separators and characters that are invalid on common filesystems
/// become '-'; invisible characters (NBSP, BOM) and control characters are
/// dropped outright.
pub fn sanitize_file_name(raw: &str, max_len: usize) -> String {
    let sanitized: String = raw
        .chars()
        .filter(|c| *c != '\u{00A0}' && *c != '\u{FEFF}' && !c.is_control())
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            _ => c,
        })
        .collect();

    sanitized.trim().chars().take(max_len).collect()
}

/// Compute the sanitized base name (no extension) for a note.
///
/// `<created formatted by date_format> - <trimmed title>`, with the literal
/// "untitled" standing in for an empty title.
pub fn note_base_name(note: &RemoteNote, date_format: &str) -> String {
    let title = note.title.trim();
    let title = if title.is_empty() { "untitled" } else { title };
    let raw = format!("{} - {}", note.timestamps.created.format(date_format), title);
    sanitize_file_name(&raw, MAX_BASE_LEN)
}

/// Resolve the single target path a note's content should occupy this run.
///
/// For a note with a known local file, the existing path is kept whenever
/// the canonical candidate is already occupied by some other file; two notes
/// must never race to rename into each other's slot and oscillate between
/// names across runs. For a new note, the candidate is disambiguated with a
/// `.{id}.{n}` suffix until a free path is found.
pub fn build_note_unique_path(
    root: &Path,
    note: &RemoteNote,
    date_format: &str,
    index: &LocalIndex,
) -> PathBuf {
    let base = note_base_name(note, date_format);
    let candidate = root.join(format!("{}.{}", base, NOTE_EXT));

    if let Some(current) = index.get(&note.id).and_then(|local| local.path.clone()) {
        if current == candidate {
            return current;
        }
        if candidate.exists() {
            // the slot is taken by another file, keep the current name
            return current;
        }
        return candidate;
    }

    if !candidate.exists() {
        return candidate;
    }
    let mut n: u32 = 1;
    loop {
        let deduped = root.join(format!("{}.{}.{}.{}", base, note.id, n, NOTE_EXT));
        if !deduped.exists() {
            return deduped;
        }
        n += 1;
    }
}

/// Attempt to rename a local note file to a newly resolved target path.
///
/// Returns the path that is authoritative after the attempt: the target on
/// success, the original on any failure. Renaming is best-effort and never
/// aborts the run. A note with no known path has nothing to rename and the
/// target is returned directly.
pub fn try_rename_note(local: &LocalNote, target: PathBuf) -> PathBuf {
    let Some(current) = &local.path else {
        return target;
    };
    if *current == target {
        return target;
    }
    match fs::rename(current, &target) {
        Ok(()) => {
            tracing::info!(
                id = %local.id,
                from = %current.display(),
                to = %target.display(),
                "renamed note file"
            );
            target
        }
        Err(e) => {
            tracing::warn!(
                id = %local.id,
                from = %current.display(),
                to = %target.display(),
                error = %e,
                "rename failed, keeping previous path"
            );
            current.clone()
        }
    }
}
