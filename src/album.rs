//! The finished album and its JSON manifest.
//!
//! After every finisher has been harvested, the album is written twice into
//! the output directory: `manifest.json` (this module) and `index.html`
//! ([`html`](crate::html)). The manifest is human-readable and lets the
//! `html` command re-render the page without launching a single child.
//!
//! Image paths in the manifest are relative to the output directory, exactly
//! as they appear in the page links.

use crate::tools::Rotation;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum AlbumError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no album manifest in {0}")]
    MissingManifest(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub items: Vec<AlbumItem>,
}

/// One captioned image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumItem {
    /// 1-based position in the album.
    pub index: usize,
    /// Source image as given on the command line.
    pub source: PathBuf,
    /// Thumbnail file, relative to the output directory.
    pub thumbnail: String,
    /// Medium-size file, relative to the output directory.
    pub medium: String,
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
}

impl Album {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn rotated_count(&self) -> usize {
        self.items.iter().filter(|i| i.rotation.is_some()).count()
    }

    /// Write `manifest.json` into `output_dir` and return its path.
    pub fn save(&self, output_dir: &Path) -> Result<PathBuf, AlbumError> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Read `manifest.json` from `output_dir`.
    pub fn load(output_dir: &Path) -> Result<Self, AlbumError> {
        let path = output_dir.join(MANIFEST_FILE);
        if !path.exists() {
            return Err(AlbumError::MissingManifest(output_dir.to_path_buf()));
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Album {
        Album {
            items: vec![
                AlbumItem {
                    index: 1,
                    source: "photos/pier.jpg".into(),
                    thumbnail: "001-pier-thumb.jpg".to_string(),
                    medium: "001-pier-medium.jpg".to_string(),
                    caption: "The pier".to_string(),
                    rotation: None,
                },
                AlbumItem {
                    index: 2,
                    source: "photos/tower.jpg".into(),
                    thumbnail: "002-tower-thumb.jpg".to_string(),
                    medium: "002-tower-medium.jpg".to_string(),
                    caption: "Tower".to_string(),
                    rotation: Some(Rotation::Right),
                },
            ],
        }
    }

    #[test]
    fn save_then_load() {
        let tmp = TempDir::new().unwrap();
        let album = sample();
        let path = album.save(tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("manifest.json"));
        assert_eq!(Album::load(tmp.path()).unwrap(), album);
    }

    #[test]
    fn rotation_omitted_when_absent() {
        let json = serde_json::to_string(&sample().items[0]).unwrap();
        assert!(!json.contains("rotation"));
        let json = serde_json::to_string(&sample().items[1]).unwrap();
        assert!(json.contains(r#""rotation":"right""#));
    }

    #[test]
    fn load_missing_manifest() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            Album::load(tmp.path()),
            Err(AlbumError::MissingManifest(_))
        ));
    }

    #[test]
    fn counts() {
        let album = sample();
        assert_eq!(album.len(), 2);
        assert!(!album.is_empty());
        assert_eq!(album.rotated_count(), 1);
    }
}
