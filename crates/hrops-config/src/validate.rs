//! Settings validation errors and semantic checks.

use crate::settings::{ExportSettings, PAGE_SIZES, THEME_NAMES};
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Smallest and largest accepted chart dimension in pixels.
pub const CHART_SIZE_RANGE: std::ops::RangeInclusive<u32> = 100..=4000;

/// Settings loading and validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid settings: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::Invalid(_) => 67,
        }
    }

    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check settings semantically, collecting every problem.
pub fn validate_settings(settings: &ExportSettings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !THEME_NAMES.contains(&settings.defaults.theme.as_str()) {
        errors.push(ValidationError::invalid(
            "defaults.theme",
            format!(
                "Unknown theme '{}', expected one of {}",
                settings.defaults.theme,
                THEME_NAMES.join(", ")
            ),
        ));
    }

    if !PAGE_SIZES
        .iter()
        .any(|p| p.eq_ignore_ascii_case(&settings.defaults.page_size))
    {
        errors.push(ValidationError::invalid(
            "defaults.page_size",
            format!(
                "Unknown page size '{}', expected one of {}",
                settings.defaults.page_size,
                PAGE_SIZES.join(", ")
            ),
        ));
    }

    if settings.cache.capacity < 1 {
        errors.push(ValidationError::invalid("cache.capacity", "Must be at least 1"));
    }

    if settings.cache.ttl_secs < 1 {
        errors.push(ValidationError::invalid("cache.ttl_secs", "Must be at least 1 second"));
    }

    for (field, value) in [
        ("chart.width", settings.chart.width),
        ("chart.height", settings.chart.height),
    ] {
        if !CHART_SIZE_RANGE.contains(&value) {
            errors.push(ValidationError::invalid(
                field,
                format!(
                    "Must be in [{}, {}], got {}",
                    CHART_SIZE_RANGE.start(),
                    CHART_SIZE_RANGE.end(),
                    value
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl ExportSettings {
    /// Validate, folding all problems into one [`ValidationError::Invalid`].
    pub fn validate(&self) -> ValidationResult<()> {
        validate_settings(self).map_err(ValidationError::Invalid)
    }
}
