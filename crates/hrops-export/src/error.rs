//! Error types for report export.

use serde::Serialize;
use thiserror::Error;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors raised by the export layer.
///
/// Every variant maps to a stable machine-readable code (see [`ExportError::code`])
/// so callers can translate failures into HTTP statuses without matching on
/// message text.
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV serialization failed.
    #[error("Failed to export data to CSV")]
    Csv { details: String },

    /// Workbook construction or serialization failed.
    #[error("Failed to export data to Excel")]
    Excel { details: String },

    /// PDF layout or serialization failed.
    #[error("Failed to export data to PDF")]
    Pdf { details: String },

    /// HTML preview rendering failed.
    #[error("Failed to generate preview")]
    Preview { details: String },

    /// A chart was requested without chart data.
    #[error("Chart data is required")]
    ChartDataRequired,

    /// The chart backend or PNG encoder failed.
    #[error("Failed to generate chart")]
    ChartGeneration { details: String },

    /// The requested format is not one of csv, excel, pdf, preview.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

impl ExportError {
    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            ExportError::Csv { .. } => "CSV_EXPORT_ERROR",
            ExportError::Excel { .. } => "EXCEL_EXPORT_ERROR",
            ExportError::Pdf { .. } => "PDF_EXPORT_ERROR",
            ExportError::Preview { .. } => "PREVIEW_ERROR",
            ExportError::ChartDataRequired => "CHART_DATA_REQUIRED",
            ExportError::ChartGeneration { .. } => "CHART_GENERATION_ERROR",
            ExportError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
        }
    }

    /// Underlying cause, when one was captured.
    pub fn details(&self) -> Option<&str> {
        match self {
            ExportError::Csv { details }
            | ExportError::Excel { details }
            | ExportError::Pdf { details }
            | ExportError::Preview { details }
            | ExportError::ChartGeneration { details } => Some(details.as_str()),
            ExportError::ChartDataRequired | ExportError::UnsupportedFormat(_) => None,
        }
    }

    /// Serializable view of this error for API responses.
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            name: "ExportError",
            message: self.to_string(),
            code: self.code(),
            details: self.details().map(str::to_string),
        }
    }

    /// Message and details on one line.
    pub fn describe(&self) -> String {
        match self.details() {
            Some(details) => format!("{}: {}", self, details),
            None => self.to_string(),
        }
    }

    pub(crate) fn csv(err: impl std::fmt::Display) -> Self {
        ExportError::Csv {
            details: err.to_string(),
        }
    }

    pub(crate) fn excel(err: impl std::fmt::Display) -> Self {
        ExportError::Excel {
            details: err.to_string(),
        }
    }

    pub(crate) fn pdf(err: impl std::fmt::Display) -> Self {
        ExportError::Pdf {
            details: err.to_string(),
        }
    }

    pub(crate) fn preview(err: impl std::fmt::Display) -> Self {
        ExportError::Preview {
            details: err.to_string(),
        }
    }

    pub(crate) fn chart(err: impl std::fmt::Display) -> Self {
        ExportError::ChartGeneration {
            details: err.to_string(),
        }
    }
}

/// JSON shape of an [`ExportError`].
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub name: &'static str,
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ExportError::csv("x").code(), "CSV_EXPORT_ERROR");
        assert_eq!(ExportError::excel("x").code(), "EXCEL_EXPORT_ERROR");
        assert_eq!(ExportError::pdf("x").code(), "PDF_EXPORT_ERROR");
        assert_eq!(ExportError::preview("x").code(), "PREVIEW_ERROR");
        assert_eq!(ExportError::ChartDataRequired.code(), "CHART_DATA_REQUIRED");
        assert_eq!(ExportError::chart("x").code(), "CHART_GENERATION_ERROR");
        assert_eq!(
            ExportError::UnsupportedFormat("xml".into()).code(),
            "UNSUPPORTED_FORMAT"
        );
    }

    #[test]
    fn test_unsupported_format_message() {
        let err = ExportError::UnsupportedFormat("xml".into());
        assert_eq!(err.to_string(), "Unsupported export format: xml");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            ExportError::chart("backend gone").describe(),
            "Failed to generate chart: backend gone"
        );
        assert_eq!(ExportError::ChartDataRequired.describe(), "Chart data is required");
    }

    #[test]
    fn test_payload_serialization() {
        let payload = ExportError::pdf("font missing").to_payload();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["name"], "ExportError");
        assert_eq!(json["code"], "PDF_EXPORT_ERROR");
        assert_eq!(json["message"], "Failed to export data to PDF");
        assert_eq!(json["details"], "font missing");

        let json = serde_json::to_value(ExportError::ChartDataRequired.to_payload()).unwrap();
        assert!(json.get("details").is_none());
    }
}
