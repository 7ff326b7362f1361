//! Markdown body rendering.
//!
//! The engine delegates body construction to a [`Renderer`] so tests can
//! substitute a trivial one; [`MarkdownRenderer`] is the default and
//! produces the document layout the exporter has always written: a title
//! heading, the note text with Keep's checkbox glyphs turned into markdown
//! task-list syntax, then optional "Links" and "Attached Media" sections.

use crate::index::MEDIA_DIR;
use crate::models::{MediaKind, RemoteNote};

/// Renders a note body given the note and its local media file names.
pub trait Renderer {
    /// Produce the body text for `note`.
    ///
    /// `media_files` are the file names (not paths) of the note's media
    /// under `media/<note_id>/`, in the note's media order.
    fn render(&self, note: &RemoteNote, media_files: &[String]) -> String;
}

/// The default markdown renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, note: &RemoteNote, media_files: &[String]) -> String {
        let mut out = String::new();

        let title = note.title.trim();
        let title = if title.is_empty() { "untitled" } else { title };
        out.push_str(&format!("# {}\n\n", title));

        out.push_str(&substitute_checkboxes(&note.text));
        if !out.ends_with('\n') {
            out.push('\n');
        }

        if !note.links.is_empty() {
            out.push_str("\n## Links\n\n");
            for link in &note.links {
                let label = link.title.as_deref().unwrap_or(&link.url);
                out.push_str(&format!("- [{}]({})\n", label, link.url));
            }
        }

        if !media_files.is_empty() {
            out.push_str("\n## Attached Media\n\n");
            for (media, file) in note.media.iter().zip(media_files) {
                let rel = format!("{}/{}/{}", MEDIA_DIR, note.id, file);
                match media.kind {
                    MediaKind::Audio => out.push_str(&format!("- [{}]({})\n", file, rel)),
                    MediaKind::Image | MediaKind::Drawing => {
                        out.push_str(&format!("- ![{}]({})\n", file, rel))
                    }
                }
            }
        }

        out
    }
}

/// Replace Keep's checkbox glyphs with markdown task-list markers.
fn substitute_checkboxes(text: &str) -> String {
    text.replace('\u{2611}', "- [x]").replace('\u{2610}', "- [ ]")
}
