//! ImageMagick-backed [`ImageTool`].
//!
//! | Operation | Command line |
//! |---|---|
//! | **Resize** | `convert -resize 10% <source> <output>` |
//! | **Rotate** | `convert -rotate 90 <source> <output>` |
//! | **Display** | `display <path>` |
//!
//! Program names are configurable so ImageMagick 7 installs (`magick`) or
//! wrappers can be used in place of the classic binaries.

use super::backend::{ImageTool, Invocation};
use super::params::{ResizeParams, RotateParams};
use crate::config::ToolsConfig;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct MagickTool {
    convert: String,
    display: String,
}

impl MagickTool {
    pub fn new(convert: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            convert: convert.into(),
            display: display.into(),
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(&config.convert, &config.display)
    }
}

impl Default for MagickTool {
    fn default() -> Self {
        Self::new("convert", "display")
    }
}

impl ImageTool for MagickTool {
    fn resize(&self, params: &ResizeParams) -> Invocation {
        Invocation::new(&self.convert)
            .arg("-resize")
            .arg(params.scale.to_string())
            .arg(&params.source)
            .arg(&params.output)
    }

    fn rotate(&self, params: &RotateParams) -> Invocation {
        Invocation::new(&self.convert)
            .arg("-rotate")
            .arg(params.rotation.degrees())
            .arg(&params.source)
            .arg(&params.output)
    }

    fn display(&self, path: &Path) -> Invocation {
        Invocation::new(&self.display).arg(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{Rotation, Scale};
    use std::ffi::OsString;

    fn args(inv: &Invocation) -> Vec<OsString> {
        inv.args.clone()
    }

    #[test]
    fn resize_matches_convert_argument_order() {
        let inv = MagickTool::default().resize(&ResizeParams {
            source: "photos/beach.jpg".into(),
            output: "album/001-beach-thumb.jpg".into(),
            scale: Scale::new(10).unwrap(),
        });
        assert_eq!(inv.program, "convert");
        assert_eq!(
            args(&inv),
            ["-resize", "10%", "photos/beach.jpg", "album/001-beach-thumb.jpg"]
                .map(OsString::from)
        );
    }

    #[test]
    fn rotate_left_uses_negative_degrees() {
        let inv = MagickTool::default().rotate(&RotateParams {
            source: "m.jpg".into(),
            output: "m.jpg".into(),
            rotation: Rotation::Left,
        });
        assert_eq!(args(&inv), ["-rotate", "-90", "m.jpg", "m.jpg"].map(OsString::from));
    }

    #[test]
    fn display_uses_configured_program() {
        let tool = MagickTool::from_config(&ToolsConfig {
            convert: "magick".to_string(),
            display: "feh".to_string(),
        });
        let inv = tool.display(Path::new("t.jpg"));
        assert_eq!(inv.program, "feh");
        assert_eq!(inv.to_string(), "feh t.jpg");
    }

    #[test]
    #[ignore] // Requires ImageMagick
    fn convert_resizes_real_image() {
        let tmp = tempfile::TempDir::new().unwrap();
        let src = tmp.path().join("src.png");
        let out = tmp.path().join("out.png");
        Invocation::new("convert")
            .arg("-size")
            .arg("200x100")
            .arg("xc:gray")
            .arg(&src)
            .run("make fixture")
            .unwrap();

        MagickTool::default()
            .resize(&ResizeParams {
                source: src,
                output: out.clone(),
                scale: Scale::new(10).unwrap(),
            })
            .run("resize")
            .unwrap();
        assert!(out.exists());
    }
}
