//! Command failures and how they surface on stderr.

use crate::exit_codes::ExitCode;
use hrops_config::ValidationError;
use hrops_export::reports::UnknownReportKind;
use hrops_export::ExportError;
use serde_json::{json, Value};
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    Input(String),

    #[error(transparent)]
    UnknownReport(#[from] UnknownReportKind),

    #[error(transparent)]
    Settings(#[from] ValidationError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CliError::Read { .. } | CliError::Input(_) | CliError::UnknownReport(_) => {
                ExitCode::ArgsError
            }
            CliError::Write { .. } => ExitCode::IoError,
            CliError::Settings(_) => ExitCode::SettingsError,
            CliError::Export(_) => ExitCode::ExportFailed,
        }
    }

    /// JSON written to stderr. Export failures use the library's payload
    /// shape so callers can treat them like HTTP error bodies.
    pub fn to_json(&self) -> Value {
        match self {
            CliError::Export(e) => json!(e.to_payload()),
            CliError::Settings(ValidationError::Invalid(errors)) => json!({
                "error": self.to_string(),
                "code": self.exit_code().code_name(),
                "errors": errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
            }),
            _ => json!({
                "error": self.to_string(),
                "code": self.exit_code().code_name(),
            }),
        }
    }
}
