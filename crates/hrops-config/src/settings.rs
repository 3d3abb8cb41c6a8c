//! Typed export settings.
//!
//! Every field has a default, so a settings file only needs to name the
//! values it changes:
//!
//! ```toml
//! [defaults]
//! theme = "corporate"
//! page_size = "Letter"
//!
//! [cache]
//! capacity = 128
//! ```

use crate::validate::{ValidationError, ValidationResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names of the built-in themes.
pub const THEME_NAMES: [&str; 3] = ["default", "dark", "corporate"];

/// Page size names accepted by the PDF renderer (case-insensitive).
pub const PAGE_SIZES: [&str; 5] = ["A3", "A4", "A5", "Letter", "Legal"];

/// Root settings document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Values applied to requests that leave them unset.
    pub defaults: DefaultSettings,
    pub cache: CacheSettings,
    pub chart: ChartSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultSettings {
    pub theme: String,
    pub page_size: String,
}

impl Default for DefaultSettings {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            page_size: default_page_size(),
        }
    }
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_page_size() -> String {
    "A4".to_string()
}

/// Rendered-export cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Maximum number of cached exports.
    pub capacity: usize,
    /// Seconds an entry stays valid after insertion.
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 64,
            ttl_secs: 300,
        }
    }
}

/// Chart canvas size in pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartSettings {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 400,
        }
    }
}

impl ExportSettings {
    /// Load settings from a file; `.json` files are parsed as JSON, anything
    /// else as TOML.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::parse_json(&content),
            _ => Self::parse_toml(&content),
        }
    }

    pub fn parse_toml(content: &str) -> ValidationResult<Self> {
        toml::from_str(content).map_err(|e| ValidationError::ParseError(e.to_string()))
    }

    pub fn parse_json(content: &str) -> ValidationResult<Self> {
        serde_json::from_str(content).map_err(|e| ValidationError::ParseError(e.to_string()))
    }

    pub fn to_toml(&self) -> ValidationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ValidationError::ParseError(e.to_string()))
    }

    pub fn to_json(&self) -> ValidationResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ValidationError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ExportSettings::default();
        assert_eq!(settings.defaults.theme, "default");
        assert_eq!(settings.defaults.page_size, "A4");
        assert!(settings.cache.enabled);
        assert_eq!(settings.cache.capacity, 64);
        assert_eq!(settings.cache.ttl_secs, 300);
        assert_eq!((settings.chart.width, settings.chart.height), (800, 400));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings = ExportSettings::parse_toml(
            r#"
            [defaults]
            theme = "dark"

            [cache]
            capacity = 8
            "#,
        )
        .unwrap();
        assert_eq!(settings.defaults.theme, "dark");
        assert_eq!(settings.defaults.page_size, "A4");
        assert_eq!(settings.cache.capacity, 8);
        assert_eq!(settings.cache.ttl_secs, 300);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = ExportSettings::default();
        settings.chart.width = 1024;
        let json = settings.to_json().unwrap();
        assert_eq!(ExportSettings::parse_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_toml_output_parses() {
        let toml = ExportSettings::default().to_toml().unwrap();
        assert!(toml.contains("[cache]"));
        assert_eq!(ExportSettings::parse_toml(&toml).unwrap(), ExportSettings::default());
    }

    #[test]
    fn test_parse_error() {
        let err = ExportSettings::parse_toml("[cache\ncapacity = ").unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
        let err = ExportSettings::parse_json(r#"{"cache": {"capacity": "many"}}"#).unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = ExportSettings::from_file(Path::new("/nonexistent/export.toml")).unwrap_err();
        assert!(matches!(err, ValidationError::IoError(_)));
    }
}
