//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the pipeline (which decides what files to create) and
//! the [`ImageTool`](super::ImageTool) (which decides what child process does
//! the pixel work).
//!
//! ## Types
//!
//! - [`Scale`]: Resize percentage (1–100). Rendered as ImageMagick geometry (`"10%"`).
//! - [`Rotation`]: Quarter turn left or right.
//! - [`ResizeParams`]: Source, output path, scale.
//! - [`RotateParams`]: Source, output path, rotation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Resize percentage applied to both edges (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Scale(u32);

impl Scale {
    /// Build a scale, rejecting values outside 1-100.
    pub fn new(percent: u32) -> Option<Self> {
        (1..=100).contains(&percent).then_some(Self(percent))
    }

    pub fn percent(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for Scale {
    type Err = String;

    /// Accepts `"10%"` or a bare `"10"`: digits and at most one `%`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('%').unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("'{s}' is not a percentage"));
        }
        let value: u32 = digits
            .parse()
            .map_err(|_| format!("'{s}' is not a percentage"))?;
        Scale::new(value).ok_or_else(|| format!("'{s}' must be between 1% and 100%"))
    }
}

impl TryFrom<String> for Scale {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Scale> for String {
    fn from(scale: Scale) -> Self {
        scale.to_string()
    }
}

/// A quarter turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Left,
    Right,
}

impl Rotation {
    /// Degrees as passed to `convert -rotate` (positive is clockwise).
    pub fn degrees(self) -> &'static str {
        match self {
            Rotation::Left => "-90",
            Rotation::Right => "90",
        }
    }

    /// Interpret a user answer. Anything that is not left or right means
    /// "leave it alone".
    pub fn from_answer(answer: &str) -> Option<Self> {
        match answer.trim().to_ascii_lowercase().as_str() {
            "l" | "left" => Some(Rotation::Left),
            "r" | "right" => Some(Rotation::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Left => f.write_str("left"),
            Rotation::Right => f.write_str("right"),
        }
    }
}

/// Parameters for a resize operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub scale: Scale,
}

/// Parameters for a rotate operation. `source` and `output` may be the same
/// file; `convert` reads the whole image before writing.
#[derive(Debug, Clone, PartialEq)]
pub struct RotateParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub rotation: Rotation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_rejects_out_of_range() {
        assert!(Scale::new(0).is_none());
        assert!(Scale::new(101).is_none());
        assert_eq!(Scale::new(100).unwrap().percent(), 100);
    }

    #[test]
    fn scale_parses_with_and_without_percent_sign() {
        assert_eq!("10%".parse::<Scale>().unwrap().percent(), 10);
        assert_eq!(" 25 ".parse::<Scale>().unwrap().percent(), 25);
        assert!("ten".parse::<Scale>().is_err());
        assert!("0%".parse::<Scale>().is_err());
    }

    #[test]
    fn scale_rejects_signs_and_repeated_percent() {
        assert!("10%%%".parse::<Scale>().is_err());
        assert!("10%%".parse::<Scale>().is_err());
        assert!("+10".parse::<Scale>().is_err());
        assert!("%".parse::<Scale>().is_err());
        assert!("10 %".parse::<Scale>().is_err());
        assert_eq!("100%".parse::<Scale>().unwrap().percent(), 100);
    }

    #[test]
    fn scale_displays_as_geometry() {
        assert_eq!(Scale::new(10).unwrap().to_string(), "10%");
    }

    #[test]
    fn scale_serializes_as_string() {
        let json = serde_json::to_string(&Scale::new(25).unwrap()).unwrap();
        assert_eq!(json, "\"25%\"");
        let back: Scale = serde_json::from_str("\"40%\"").unwrap();
        assert_eq!(back.percent(), 40);
    }

    #[test]
    fn rotation_degrees() {
        assert_eq!(Rotation::Left.degrees(), "-90");
        assert_eq!(Rotation::Right.degrees(), "90");
    }

    #[test]
    fn rotation_from_answer() {
        assert_eq!(Rotation::from_answer("l"), Some(Rotation::Left));
        assert_eq!(Rotation::from_answer("RIGHT"), Some(Rotation::Right));
        assert_eq!(Rotation::from_answer(" r "), Some(Rotation::Right));
        assert_eq!(Rotation::from_answer(""), None);
        assert_eq!(Rotation::from_answer("n"), None);
        assert_eq!(Rotation::from_answer("up"), None);
    }
}
