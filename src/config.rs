//! Album configuration module.
//!
//! Handles loading, validating, and merging `album.toml`. Stock defaults are
//! overridden by whatever keys the user file sets; everything else keeps its
//! default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [tools]
//! convert = "convert"       # Program used for resize and rotate
//! display = "display"       # Program used to preview thumbnails
//!
//! [sizes]
//! thumbnail = "10%"         # Thumbnail scale
//! medium = "25%"            # Medium-size copy scale
//!
//! [processing]
//! max_processes = 4         # Max concurrent children (omit for auto = CPU cores)
//!
//! [prompt]
//! max_input_len = 256       # Longer answers are truncated
//!
//! [html]
//! title = "Photo Album"     # <title> of index.html
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::tools::Scale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "album.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Album configuration loaded from `album.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlbumConfig {
    /// External program names.
    pub tools: ToolsConfig,
    /// Resize percentages.
    pub sizes: SizesConfig,
    /// Concurrency limits.
    pub processing: ProcessingConfig,
    /// Interactive input settings.
    pub prompt: PromptConfig,
    /// Index page settings.
    pub html: HtmlConfig,
}

impl AlbumConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// Scales are range-checked when deserialized, so only the remaining
    /// fields need checking here.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tools.convert.trim().is_empty() || self.tools.display.trim().is_empty() {
            return Err(ConfigError::Validation(
                "tools.convert and tools.display must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        if self.prompt.max_input_len == 0 {
            return Err(ConfigError::Validation(
                "prompt.max_input_len must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub convert: String,
    pub display: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            convert: "convert".to_string(),
            display: "display".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizesConfig {
    pub thumbnail: Scale,
    pub medium: Scale,
}

impl Default for SizesConfig {
    fn default() -> Self {
        Self {
            thumbnail: Scale::new(10).expect("10% is a valid scale"),
            medium: Scale::new(25).expect("25% is a valid scale"),
        }
    }
}

/// Concurrency settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of concurrent resize children, and of background
    /// finishers. When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective process limit from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_processes(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptConfig {
    /// Answers longer than this many characters are truncated.
    pub max_input_len: usize,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self { max_input_len: 256 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HtmlConfig {
    pub title: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            title: "Photo Album".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(AlbumConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<AlbumConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AlbumConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file.
///
/// When `required` is false a missing file yields the stock defaults; this is
/// how the implicit `album.toml` lookup behaves. An explicitly named file
/// must exist.
pub fn load_config(path: &Path, required: bool) -> Result<AlbumConfig, ConfigError> {
    if !required && !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `album.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Photo Album Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# External programs
# ---------------------------------------------------------------------------
[tools]
# Used for every resize and rotation: convert -resize 10% in.jpg out.jpg
convert = "convert"

# Used to preview each thumbnail while asking for its caption.
display = "display"

# ---------------------------------------------------------------------------
# Output sizes, as a percentage of the source image
# ---------------------------------------------------------------------------
[sizes]
thumbnail = "10%"
medium = "25%"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum concurrent resize children and background finishers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4

# ---------------------------------------------------------------------------
# Prompts
# ---------------------------------------------------------------------------
[prompt]
# Captions longer than this many characters are truncated.
max_input_len = 256

# ---------------------------------------------------------------------------
# Index page
# ---------------------------------------------------------------------------
[html]
title = "Photo Album"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = AlbumConfig::default();
        assert_eq!(config.tools.convert, "convert");
        assert_eq!(config.tools.display, "display");
        assert_eq!(config.sizes.thumbnail.percent(), 10);
        assert_eq!(config.sizes.medium.percent(), 25);
        assert_eq!(config.processing.max_processes, None);
        assert_eq!(config.html.title, "Photo Album");
    }

    #[test]
    fn parse_partial_config() {
        let value: toml::Value = toml::from_str(
            r#"
            [sizes]
            medium = "50%"
            "#,
        )
        .unwrap();
        let config = resolve_config(Some(value)).unwrap();

        assert_eq!(config.sizes.medium.percent(), 50);
        // Untouched keys keep their defaults
        assert_eq!(config.sizes.thumbnail.percent(), 10);
        assert_eq!(config.tools.convert, "convert");
    }

    #[test]
    fn load_config_missing_optional_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(&tmp.path().join("album.toml"), false).unwrap();
        assert_eq!(config.sizes.thumbnail.percent(), 10);
    }

    #[test]
    fn load_config_missing_required_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(&tmp.path().join("album.toml"), true);
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("album.toml");
        fs::write(
            &path,
            r#"
            [tools]
            convert = "magick"

            [processing]
            max_processes = 2

            [html]
            title = "Summer 2022"
            "#,
        )
        .unwrap();

        let config = load_config(&path, true).unwrap();
        assert_eq!(config.tools.convert, "magick");
        assert_eq!(config.tools.display, "display");
        assert_eq!(config.processing.max_processes, Some(2));
        assert_eq!(config.html.title, "Summer 2022");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("album.toml");
        fs::write(&path, "this is not [valid toml").unwrap();
        assert!(matches!(load_config(&path, true), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let value: toml::Value = toml::from_str("[sizes]\nlarge = \"80%\"").unwrap();
        assert!(resolve_config(Some(value)).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let value: toml::Value = toml::from_str("[colors]\nbg = \"#fff\"").unwrap();
        assert!(resolve_config(Some(value)).is_err());
    }

    #[test]
    fn out_of_range_scale_rejected() {
        let value: toml::Value = toml::from_str("[sizes]\nthumbnail = \"0%\"").unwrap();
        assert!(resolve_config(Some(value)).is_err());
        let value: toml::Value = toml::from_str("[sizes]\nmedium = \"150%\"").unwrap();
        assert!(resolve_config(Some(value)).is_err());
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = AlbumConfig::default();
        config.processing.max_processes = Some(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("max_processes")
        ));
    }

    #[test]
    fn validate_empty_program() {
        let mut config = AlbumConfig::default();
        config.tools.display = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_input_len() {
        let mut config = AlbumConfig::default();
        config.prompt.max_input_len = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(AlbumConfig::default().validate().is_ok());
    }

    #[test]
    fn effective_processes_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_processes(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_processes_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_processes(&config), 1);
    }

    #[test]
    fn effective_processes_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 64),
        };
        assert_eq!(effective_processes(&config), cores);
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(Some(value)).unwrap();
        let defaults = AlbumConfig::default();
        assert_eq!(config.sizes.thumbnail, defaults.sizes.thumbnail);
        assert_eq!(config.sizes.medium, defaults.sizes.medium);
        assert_eq!(config.tools.convert, defaults.tools.convert);
        assert_eq!(config.prompt.max_input_len, defaults.prompt.max_input_len);
        assert_eq!(config.html.title, defaults.html.title);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        let table = value.as_table().unwrap();
        for section in ["tools", "sizes", "processing", "prompt", "html"] {
            assert!(table.contains_key(section), "missing section {section}");
        }
    }
}
