//! Settings file discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths →
//! system config → defaults.

use crate::settings::ExportSettings;
use crate::validate::ValidationResult;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where the settings came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/hrops/.
    SystemConfig,

    /// Using built-in defaults.
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

/// Environment variable holding a settings file path.
pub const ENV_CONFIG_PATH: &str = "HROPS_EXPORT_CONFIG";
/// Environment variable holding a directory containing `export.toml`.
pub const ENV_CONFIG_DIR: &str = "HROPS_CONFIG_DIR";

const SETTINGS_FILENAME: &str = "export.toml";

/// Application name for XDG and system directories.
const APP_NAME: &str = "hrops";

/// Settings together with where they were loaded from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSettings {
    pub settings: ExportSettings,
    pub path: Option<PathBuf>,
    pub source: ConfigSource,
}

/// Find the settings file.
///
/// 1. Explicit CLI path (if it exists)
/// 2. `HROPS_EXPORT_CONFIG`
/// 3. `HROPS_CONFIG_DIR` + `export.toml`
/// 4. XDG config directory (`~/.config/hrops/export.toml`)
/// 5. System config (`/etc/hrops/export.toml`)
/// 6. Built-in defaults (no path)
pub fn resolve_config_path(cli_path: Option<&Path>) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        if path.exists() {
            return (Some(path.to_path_buf()), ConfigSource::CliArgument);
        }
        warn!(path = %path.display(), "Settings file not found, continuing resolution");
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(SETTINGS_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(SETTINGS_FILENAME);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    let system_path = system_config_dir().join(SETTINGS_FILENAME);
    if system_path.exists() {
        return (Some(system_path), ConfigSource::SystemConfig);
    }

    (None, ConfigSource::BuiltinDefault)
}

/// Resolve, parse and validate settings.
pub fn load_settings(cli_path: Option<&Path>) -> ValidationResult<ResolvedSettings> {
    let (path, source) = resolve_config_path(cli_path);

    let settings = match &path {
        Some(path) => ExportSettings::from_file(path)?,
        None => ExportSettings::default(),
    };
    settings.validate()?;

    debug!(
        source = %source,
        path = ?path,
        theme = %settings.defaults.theme,
        cache_enabled = settings.cache.enabled,
        "Settings resolved"
    );

    Ok(ResolvedSettings {
        settings,
        path,
        source,
    })
}

/// Get the XDG config directory for hrops.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
