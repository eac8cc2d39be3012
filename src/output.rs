//! CLI output formatting.
//!
//! Every entity is shown by its positional index first, with file paths as
//! indented context lines:
//!
//! ## Build
//!
//! ```text
//! Generating 3 thumbnails (4 at a time)
//! 001 photos/pier.jpg
//!     Thumbnail: album/001-pier-thumb.jpg
//!     Caption: The pier
//! 002 photos/tower.jpg
//!     Thumbnail: album/002-tower-thumb.jpg
//!     Caption: Tower (rotate right)
//! ...
//! 001 done → album/001-pier-medium.jpg
//! 002 done → album/002-tower-medium.jpg (rotated right)
//!
//! Wrote 3 images → album/index.html
//!     Manifest: album/manifest.json
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 photos/pier.jpg
//!     → 001-pier-thumb.jpg, 001-pier-medium.jpg
//! 1 image
//! ```
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O; the
//! `print_*` wrappers write to stdout.

use crate::album::Album;
use crate::naming::{OutputNames, format_index};
use crate::pipeline::PipelineEvent;
use std::path::{Path, PathBuf};

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format a single pipeline event as display lines.
pub fn format_event(event: &PipelineEvent) -> Vec<String> {
    match event {
        PipelineEvent::ThumbnailsQueued {
            count,
            max_processes,
        } => vec![format!(
            "Generating {} ({} at a time)",
            plural(*count, "thumbnail"),
            max_processes
        )],
        PipelineEvent::ThumbnailReady {
            index,
            source,
            thumbnail,
        } => vec![
            format!("{} {}", format_index(*index), source.display()),
            format!("    Thumbnail: {}", thumbnail.display()),
        ],
        PipelineEvent::Captioned {
            caption, rotation, ..
        } => match rotation {
            Some(r) => vec![format!("    Caption: {} (rotate {})", caption, r)],
            None => vec![format!("    Caption: {}", caption)],
        },
        PipelineEvent::ItemFinished {
            index,
            medium,
            rotation,
        } => {
            let suffix = rotation
                .map(|r| format!(" (rotated {r})"))
                .unwrap_or_default();
            vec![format!(
                "{} done \u{2192} {}{}",
                format_index(*index),
                medium.display(),
                suffix
            )]
        }
        PipelineEvent::AlbumWritten {
            index_html,
            manifest,
            items,
        } => vec![
            String::new(),
            format!(
                "Wrote {} \u{2192} {}",
                plural(*items, "image"),
                index_html.display()
            ),
            format!("    Manifest: {}", manifest.display()),
        ],
    }
}

/// Print a pipeline event to stdout.
pub fn print_event(event: &PipelineEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the images a build would process, with their planned outputs.
pub fn format_check_output(inputs: &[(PathBuf, OutputNames)]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (source, names)) in inputs.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), source.display()));
        lines.push(format!(
            "    \u{2192} {}, {}",
            file_name(&names.thumbnail),
            file_name(&names.medium)
        ));
    }
    lines.push(plural(inputs.len(), "image"));
    lines
}

pub fn print_check_output(inputs: &[(PathBuf, OutputNames)]) {
    for line in format_check_output(inputs) {
        println!("{}", line);
    }
}

// ============================================================================
// Html
// ============================================================================

/// Format the album re-rendered by the `html` command.
pub fn format_album(album: &Album, index_html: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    for item in &album.items {
        lines.push(format!("{} {}", format_index(item.index), item.caption));
        lines.push(format!("    {} \u{2192} {}", item.thumbnail, item.medium));
    }
    let rotated = album.rotated_count();
    let detail = if rotated > 0 {
        format!(" ({} rotated)", rotated)
    } else {
        String::new()
    };
    lines.push(format!(
        "Wrote {}{} \u{2192} {}",
        plural(album.len(), "image"),
        detail,
        index_html.display()
    ));
    lines
}

pub fn print_album(album: &Album, index_html: &Path) {
    for line in format_album(album, index_html) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::album::AlbumItem;
    use crate::tools::Rotation;

    #[test]
    fn queued_line_shows_limit() {
        let lines = format_event(&PipelineEvent::ThumbnailsQueued {
            count: 3,
            max_processes: 4,
        });
        assert_eq!(lines, vec!["Generating 3 thumbnails (4 at a time)"]);
    }

    #[test]
    fn single_thumbnail_is_singular() {
        let lines = format_event(&PipelineEvent::ThumbnailsQueued {
            count: 1,
            max_processes: 1,
        });
        assert_eq!(lines, vec!["Generating 1 thumbnail (1 at a time)"]);
    }

    #[test]
    fn thumbnail_ready_is_index_first() {
        let lines = format_event(&PipelineEvent::ThumbnailReady {
            index: 2,
            source: "photos/tower.jpg".into(),
            thumbnail: "album/002-tower-thumb.jpg".into(),
        });
        assert_eq!(
            lines,
            vec![
                "002 photos/tower.jpg",
                "    Thumbnail: album/002-tower-thumb.jpg"
            ]
        );
    }

    #[test]
    fn caption_mentions_rotation() {
        let lines = format_event(&PipelineEvent::Captioned {
            index: 2,
            caption: "Tower".to_string(),
            rotation: Some(Rotation::Right),
        });
        assert_eq!(lines, vec!["    Caption: Tower (rotate right)"]);
    }

    #[test]
    fn finished_line() {
        let lines = format_event(&PipelineEvent::ItemFinished {
            index: 1,
            medium: "album/001-pier-medium.jpg".into(),
            rotation: None,
        });
        assert_eq!(lines, vec!["001 done \u{2192} album/001-pier-medium.jpg"]);
    }

    #[test]
    fn check_output_lists_planned_files() {
        let names = crate::naming::output_names(Path::new("album"), 1, Path::new("p/pier.jpg"));
        let lines = format_check_output(&[(PathBuf::from("p/pier.jpg"), names)]);
        assert_eq!(
            lines,
            vec![
                "001 p/pier.jpg",
                "    \u{2192} 001-pier-thumb.jpg, 001-pier-medium.jpg",
                "1 image"
            ]
        );
    }

    #[test]
    fn album_summary_counts_rotations() {
        let album = Album {
            items: vec![AlbumItem {
                index: 1,
                source: "p/tower.jpg".into(),
                thumbnail: "001-tower-thumb.jpg".to_string(),
                medium: "001-tower-medium.jpg".to_string(),
                caption: "Tower".to_string(),
                rotation: Some(Rotation::Left),
            }],
        };
        let lines = format_album(&album, Path::new("album/index.html"));
        assert_eq!(lines[0], "001 Tower");
        assert_eq!(
            lines.last().unwrap(),
            "Wrote 1 image (1 rotated) \u{2192} album/index.html"
        );
    }
}
