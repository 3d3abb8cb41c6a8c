//! Export engine settings loading and validation.
//!
//! This crate provides:
//! - Typed settings for report defaults, the export cache and chart rendering
//! - Settings resolution (CLI → env → XDG → /etc → defaults)
//! - Semantic validation that reports every problem at once

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{load_settings, resolve_config_path, ConfigSource, ResolvedSettings};
pub use settings::{CacheSettings, ChartSettings, DefaultSettings, ExportSettings};
pub use validate::{ValidationError, ValidationResult};
