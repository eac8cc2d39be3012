//! File naming for generated images and default captions.
//!
//! Every input image gets two derived files in the output directory, named
//! after its 1-based position in the album and its source stem:
//!
//! ```text
//! photos/beach.jpg      →  001-beach-thumb.jpg, 001-beach-medium.jpg
//! other/beach.jpg       →  002-beach-thumb.jpg, 002-beach-medium.jpg
//! scans/IMG_0042.PNG    →  003-IMG_0042-thumb.PNG, ...
//! ```
//!
//! The position prefix keeps equal stems from different directories apart.
//! The extension is preserved so `convert` writes the same format it read.

use std::path::{Path, PathBuf};

/// Paths of the two files generated for one input image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub thumbnail: PathBuf,
    pub medium: PathBuf,
}

/// Format a 1-based positional index as 3-digit zero-padded.
pub fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn stem_and_extension(source: &Path) -> (String, String) {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| "jpg".to_string());
    (stem, ext)
}

/// Plan the thumbnail and medium file names for the image at `index`
/// (1-based), inside `output_dir`.
pub fn output_names(output_dir: &Path, index: usize, source: &Path) -> OutputNames {
    let (stem, ext) = stem_and_extension(source);
    let prefix = format_index(index);
    OutputNames {
        thumbnail: output_dir.join(format!("{prefix}-{stem}-thumb.{ext}")),
        medium: output_dir.join(format!("{prefix}-{stem}-medium.{ext}")),
    }
}

/// Caption used when prompts are disabled or the user enters nothing.
///
/// Strips an optional numeric `NNN-` prefix from the stem and turns dashes
/// and underscores into spaces: `001-sunset-over_bay.jpg` → `sunset over bay`.
pub fn default_caption(source: &Path) -> String {
    let (stem, _) = stem_and_extension(source);
    let name = match stem.split_once('-') {
        Some((prefix, rest))
            if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) && !rest.is_empty() =>
        {
            rest
        }
        _ => stem.as_str(),
    };
    name.replace(['-', '_'], " ")
}

/// Path of `target` relative to `base`, for links inside `index.html`.
///
/// Falls back to the file name when `target` is not under `base`.
pub fn relative_to(target: &Path, base: &Path) -> String {
    target
        .strip_prefix(base)
        .ok()
        .or_else(|| target.file_name().map(Path::new))
        .unwrap_or(target)
        .to_string_lossy()
        .replace('\\', "/")
}
