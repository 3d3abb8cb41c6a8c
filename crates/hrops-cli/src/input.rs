//! Reading row sets and assembling export options.
//!
//! Input is either a bare JSON array of rows or a request object:
//!
//! ```json
//! { "rows": [{"id": 1}], "options": {"fields": ["id"], "theme": "dark"} }
//! ```

use crate::error::{CliError, Result};
use hrops_export::{ExportOptions, ExportRow, ReportKind};
use serde::Deserialize;
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parsed input document.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportInput {
    #[serde(default)]
    pub rows: Vec<ExportRow>,
    #[serde(default)]
    pub options: Option<ExportOptions>,
}

impl ExportInput {
    /// Parse an input document.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| CliError::Input(format!("not JSON: {}", e)))?;

        match value {
            Value::Array(_) => {
                let rows = serde_json::from_value(value)
                    .map_err(|e| CliError::Input(format!("rows must be objects: {}", e)))?;
                Ok(ExportInput { rows, options: None })
            }
            Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| CliError::Input(format!("bad request object: {}", e))),
            other => Err(CliError::Input(format!(
                "expected an array of rows or an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Read from a file, or stdin when `source` is `-`.
    pub fn read(source: &str) -> Result<Self> {
        let text = if source == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Read {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            buf
        } else {
            read_file(Path::new(source))?
        };
        Self::parse(&text)
    }
}

/// Overrides collected from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct OptionOverrides {
    /// Inline JSON, or `@path` to read it from a file.
    pub options: Option<String>,
    pub title: Option<String>,
    pub theme: Option<String>,
    pub page_size: Option<String>,
}

/// Build the effective options.
///
/// The base is the first present of `--options`, the input's `options`
/// and the report preset. Individual flags then override it. When nothing
/// names any fields, the first row's keys are used.
pub fn assemble_options(
    report: Option<(ReportKind, chrono::NaiveDate)>,
    input_options: Option<ExportOptions>,
    overrides: &OptionOverrides,
    rows: &[ExportRow],
) -> Result<ExportOptions> {
    let flag_options = overrides.options.as_deref().map(parse_options).transpose()?;

    let mut options = flag_options
        .or(input_options)
        .or_else(|| report.map(|(kind, date)| kind.options(date)))
        .unwrap_or_default();

    if let Some(title) = &overrides.title {
        options.title = Some(title.clone());
    }
    if let Some(theme) = &overrides.theme {
        options.theme = Some(theme.clone());
    }
    if let Some(page_size) = &overrides.page_size {
        options.page_size = Some(page_size.clone());
    }

    if options.fields.is_empty() {
        if let Some(first) = rows.first() {
            options.fields = first.keys().cloned().collect();
            debug!(fields = options.fields.len(), "Using first row keys as fields");
        }
    }
    Ok(options)
}

/// Reject filenames that would escape the output directory.
pub fn check_filename(filename: &str) -> Result<()> {
    let bad = filename.is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains(['/', '\\', '\0']);
    if bad {
        return Err(CliError::Input(format!("invalid filename: {:?}", filename)));
    }
    Ok(())
}

fn parse_options(raw: &str) -> Result<ExportOptions> {
    let text = match raw.strip_prefix('@') {
        Some(path) => read_file(Path::new(path))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&text).map_err(|e| CliError::Input(format!("bad --options: {}", e)))
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
