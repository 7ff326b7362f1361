//! The note source boundary.
//!
//! Everything that talks to Google Keep lives behind this trait: session
//! establishment, the notes API, and media blob transport. The
//! reconciliation engine only ever sees a full snapshot of notes per run
//! plus a blob-fetch capability, which keeps the engine testable with a
//! fake source.
//!
//! A source failure is fatal: the driver aborts before any local mutation
//! rather than reconcile against a partial snapshot.

use crate::error::KeepResult;
use crate::models::{MediaRef, RemoteNote};

/// Raw media content fetched from the source.
#[derive(Debug, Clone)]
pub struct MediaBlob {
    pub bytes: Vec<u8>,
    /// Size the source claims for the blob, when it reports one
    pub size: Option<u64>,
}

impl MediaBlob {
    pub fn new(bytes: Vec<u8>) -> Self {
        let size = Some(bytes.len() as u64);
        Self { bytes, size }
    }
}

/// A remote provider of notes and their media blobs.
///
/// `fetch_notes` yields the full current snapshot for one run; the engine
/// treats it as read-only. `fetch_media` downloads one blob by reference.
pub trait NoteSource {
    /// Fetch the complete set of remote notes for this run.
    fn fetch_notes(&mut self) -> KeepResult<Vec<RemoteNote>>;

    /// Fetch the raw bytes of one media blob belonging to `note_id`.
    fn fetch_media(&mut self, note_id: &str, media: &MediaRef) -> KeepResult<MediaBlob>;
}
