//! keepcore - Google Keep to markdown mirror, reconciliation core.
//!
//! This library keeps a local directory of markdown files convergent with a
//! remote set of Google Keep notes across repeated runs:
//! - Data models (RemoteNote, LocalNote, LocalMedia)
//! - Local file indexing (frontmatter-keyed, rebuilt every run)
//! - Canonical path resolution with collision-free de-duplication
//! - Best-effort renames and authorization-gated orphan removal
//! - The reconciliation driver (skip / create / update per note)
//!
//! This is a pure Rust library designed to sit under an outer surface that
//! handles flag parsing and the actual Keep session; those collaborators
//! reach the engine only through the [`source::NoteSource`] and
//! [`markdown::Renderer`] traits.
//!
//! Runs are non-destructive by default: local-only files are reported, and
//! deleted only when explicitly authorized.

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod index;
pub mod markdown;
pub mod media;
pub mod models;
pub mod orphans;
pub mod paths;
pub mod reconcile;
pub mod source;

// Re-export commonly used types
pub use config::{Config, ConfigData};
pub use error::{KeepError, KeepResult};
pub use index::{index_existing_files, IndexStats, LocalIndex};
pub use markdown::{MarkdownRenderer, Renderer};
pub use models::{LocalMedia, LocalNote, MediaKind, MediaRef, NoteLink, RemoteNote};
pub use reconcile::{run_sync, SyncOptions, SyncReport};
pub use source::{MediaBlob, NoteSource};
