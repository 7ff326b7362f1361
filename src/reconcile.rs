//! The reconciliation driver.
//!
//! One run is a single sequential pass that keeps the local mirror
//! convergent with the remote snapshot: fetch the snapshot, index what is
//! already on disk, reap orphans, then walk every remote note and decide
//! SKIP, CREATE or UPDATE. The pass is idempotent: an unchanged snapshot
//! produces zero writes on the next run. Nothing local is ever deleted
//! unless `delete_local` authorizes it.
//!
//! Indexing fully completes before any write begins; the index is the
//! point-in-time picture all decisions are made against.

use std::fs;
use std::path::PathBuf;

use crate::error::KeepResult;
use crate::frontmatter;
use crate::index::{self, LocalIndex};
use crate::markdown::Renderer;
use crate::media;
use crate::orphans;
use crate::paths;
use crate::source::NoteSource;

/// Options for one reconciliation run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Output directory for note files (media goes under `media/`)
    pub notes_dir: PathBuf,
    /// strftime format for the created-date filename prefix
    pub date_format: String,
    /// Write the frontmatter header (body-only files when false)
    pub header: bool,
    /// Rename local files whose canonical name changed
    pub rename_local: bool,
    /// Delete local notes/media absent from the remote snapshot
    pub delete_local: bool,
    /// Skip media downloads that appear unchanged by size
    pub skip_existing_media: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            notes_dir: PathBuf::from("./gkeep-export"),
            date_format: "%Y-%m-%d".to_string(),
            header: true,
            rename_local: false,
            delete_local: false,
            skip_existing_media: true,
        }
    }
}

/// Aggregate counts for one run, reported to the invoking surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Notes already up to date (no re-render, no media fetch)
    pub skipped: u64,
    /// Notes whose local file was rewritten
    pub updated: u64,
    /// Notes written for the first time
    pub created: u64,
    /// Orphaned note files removed (or reported, if not authorized)
    pub deleted_notes: u64,
    /// Media blobs downloaded
    pub downloaded_media: u64,
    /// Orphaned media files removed (or reported, if not authorized)
    pub deleted_media: u64,
}

/// Run one full reconciliation pass.
///
/// The remote snapshot is fetched before any local mutation, so a source
/// or authentication failure aborts the run with the mirror untouched.
pub fn run_sync<S, R>(source: &mut S, renderer: &R, options: &SyncOptions) -> KeepResult<SyncReport>
where
    S: NoteSource + ?Sized,
    R: Renderer + ?Sized,
{
    let notes = source.fetch_notes()?;
    tracing::info!(count = notes.len(), "fetched remote snapshot");

    let notes_dir = &options.notes_dir;
    let media_root = media::media_root(notes_dir);
    fs::create_dir_all(notes_dir)?;
    fs::create_dir_all(&media_root)?;

    let mut local_index = index::index_existing_files(notes_dir);

    let orphan_counts =
        orphans::delete_local_only_files(&local_index, &notes, options.delete_local);

    let mut report = SyncReport {
        deleted_notes: orphan_counts.notes,
        deleted_media: orphan_counts.media,
        ..Default::default()
    };

    for note in &notes {
        process_note(source, renderer, options, &mut local_index, note, &mut report)?;
    }

    tracing::info!(
        skipped = report.skipped,
        updated = report.updated,
        created = report.created,
        deleted_notes = report.deleted_notes,
        downloaded_media = report.downloaded_media,
        deleted_media = report.deleted_media,
        "finished syncing"
    );
    Ok(report)
}

fn process_note<S, R>(
    source: &mut S,
    renderer: &R,
    options: &SyncOptions,
    local_index: &mut LocalIndex,
    note: &crate::models::RemoteNote,
    report: &mut SyncReport,
) -> KeepResult<()>
where
    S: NoteSource + ?Sized,
    R: Renderer + ?Sized,
{
    let mut target =
        paths::build_note_unique_path(&options.notes_dir, note, &options.date_format, local_index);

    if let Some(local) = local_index.get(&note.id) {
        if let Some(current) = local.path.clone() {
            if options.rename_local && current != target {
                target = paths::try_rename_note(local, target);
                if let Some(entry) = local_index.get_mut(&note.id) {
                    entry.path = Some(target.clone());
                }
            } else {
                // renaming is opt-in: keep the existing path even when the
                // canonical name changed
                target = current;
            }
        }
    }

    // the skip decision comes after the rename so a pure naming change
    // still lands on disk for otherwise-unchanged notes
    if let Some(local) = local_index.get(&note.id) {
        if local.timestamp_updated.map(|t| t.timestamp()) == Some(note.updated().timestamp()) {
            report.skipped += 1;
            return Ok(());
        }
    }

    if local_index.contains(&note.id) {
        tracing::info!(id = %note.id, "updating existing file for note");
        report.updated += 1;
    } else {
        tracing::info!(id = %note.id, "downloading new note");
        report.created += 1;
    }

    let media_root = media::media_root(&options.notes_dir);
    let (media_files, downloaded) =
        media::sync_note_media(source, note, &media_root, options.skip_existing_media)?;
    report.downloaded_media += downloaded;

    let body = renderer.render(note, &media_files);
    let document = frontmatter::render_document(note, &body, options.header)?;
    fs::write(&target, document)?;

    Ok(())
}
