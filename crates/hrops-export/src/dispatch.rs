//! Format dispatch.
//!
//! [`handle_export`] is the single entry point used by report handlers: it
//! parses the requested format, renders, and sends. [`Exporter`] adds
//! settings-driven defaults and the response cache on top.

use crate::cache::{fingerprint, ExportCache};
use crate::error::{ExportError, Result};
use crate::options::ExportOptions;
use crate::render::{csv, excel, pdf, preview};
use crate::response::{ExportResponse, ResponseSink};
use crate::value::ExportRow;
use hrops_config::ExportSettings;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
    Preview,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Csv,
        ExportFormat::Excel,
        ExportFormat::Pdf,
        ExportFormat::Preview,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "excel",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Preview => "preview",
        }
    }

    /// File extension of the rendered payload.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Preview => "html",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => csv::CONTENT_TYPE,
            ExportFormat::Excel => excel::CONTENT_TYPE,
            ExportFormat::Pdf => pdf::CONTENT_TYPE,
            ExportFormat::Preview => preview::CONTENT_TYPE,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ExportError::UnsupportedFormat(s.to_string()))
    }
}

/// Render rows in the given format without sending them anywhere.
pub fn render(
    rows: &[ExportRow],
    format: ExportFormat,
    filename: &str,
    options: &ExportOptions,
) -> Result<ExportResponse> {
    match format {
        ExportFormat::Csv => csv::render_csv(rows, options, filename),
        ExportFormat::Excel => excel::render_excel(rows, options, filename),
        ExportFormat::Pdf => pdf::render_pdf(rows, options, filename),
        ExportFormat::Preview => preview::render_preview(rows, options),
    }
}

/// Render `rows` as `format` and send the result to `sink`.
///
/// An unknown format fails with `UNSUPPORTED_FORMAT` before anything is
/// rendered; on any error the sink is left untouched.
pub fn handle_export<S: ResponseSink + ?Sized>(
    rows: &[ExportRow],
    format: &str,
    filename: &str,
    sink: &mut S,
    options: &ExportOptions,
) -> Result<()> {
    let format = parse_format(format)?;
    sink.send(render(rows, format, filename, options)?);
    Ok(())
}

fn parse_format(format: &str) -> Result<ExportFormat> {
    format.parse().map_err(|e: ExportError| {
        error!(format, "Error in handleExport: unsupported format");
        e
    })
}

/// Settings-aware exporter with an optional shared response cache.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    settings: ExportSettings,
    cache: Option<Arc<ExportCache<ExportResponse>>>,
}

impl Exporter {
    /// Exporter with built-in settings and no cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exporter for the given settings; a cache is created when enabled.
    pub fn from_settings(settings: &ExportSettings) -> Self {
        let cache = settings
            .cache
            .enabled
            .then(|| Arc::new(ExportCache::from_settings(&settings.cache)));
        Self {
            settings: settings.clone(),
            cache,
        }
    }

    /// Share an existing cache.
    pub fn with_cache(mut self, cache: Arc<ExportCache<ExportResponse>>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.cache = None;
        self
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn cache(&self) -> Option<&Arc<ExportCache<ExportResponse>>> {
        self.cache.as_ref()
    }

    /// Fill the theme, page size and chart size that `options` leaves unset.
    pub fn apply_defaults(&self, mut options: ExportOptions) -> ExportOptions {
        let defaults = &self.settings.defaults;
        options.theme.get_or_insert_with(|| defaults.theme.clone());
        options
            .page_size
            .get_or_insert_with(|| defaults.page_size.clone());
        options.chart_width.get_or_insert(self.settings.chart.width);
        options.chart_height.get_or_insert(self.settings.chart.height);
        options
    }

    /// Render with settings defaults applied, serving repeats from the cache.
    pub fn render(
        &self,
        rows: &[ExportRow],
        format: &str,
        filename: &str,
        options: &ExportOptions,
    ) -> Result<ExportResponse> {
        let format = parse_format(format)?;
        let options = self.apply_defaults(options.clone());

        let Some(cache) = &self.cache else {
            return render(rows, format, filename, &options);
        };

        let key = match fingerprint(format.as_str(), filename, &options, rows) {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, "Could not fingerprint export request, bypassing cache");
                return render(rows, format, filename, &options);
            }
        };

        if let Some(response) = cache.get(&key) {
            info!(%format, filename, bytes = response.body.len(), "Serving cached export");
            return Ok(response);
        }

        let response = render(rows, format, filename, &options)?;
        cache.set(key, response.clone());
        debug!(%format, filename, entries = cache.len(), "Cached export");
        Ok(response)
    }

    /// Like [`handle_export`], through [`Exporter::render`].
    pub fn export<S: ResponseSink + ?Sized>(
        &self,
        rows: &[ExportRow],
        format: &str,
        filename: &str,
        sink: &mut S,
        options: &ExportOptions,
    ) -> Result<()> {
        sink.send(self.render(rows, format, filename, options)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::BufferedSink;
    use serde_json::json;

    fn rows() -> Vec<ExportRow> {
        serde_json::from_value(json!([{"id": "1", "name": "A"}])).unwrap()
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("excel".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert_eq!("pdf".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("preview".parse::<ExportFormat>().unwrap(), ExportFormat::Preview);

        let err = "CSV".parse::<ExportFormat>().unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_extensions_and_content_types() {
        assert_eq!(ExportFormat::Excel.extension(), "xlsx");
        assert_eq!(ExportFormat::Preview.extension(), "html");
        assert_eq!(ExportFormat::Csv.content_type(), "text/csv");
        assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
        assert_eq!(ExportFormat::Preview.to_string(), "preview");
    }

    #[test]
    fn test_unknown_format_leaves_sink_untouched() {
        let mut sink = BufferedSink::new();
        let err = handle_export(&rows(), "docx", "report", &mut sink, &ExportOptions::new(["id"]))
            .unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_FORMAT");
        assert_eq!(err.to_string(), "Unsupported export format: docx");
        assert_eq!(sink.sends(), 0);
    }

    #[test]
    fn test_handle_export_each_format() {
        let options = ExportOptions::new(["id", "name"]);
        for format in ExportFormat::ALL {
            let mut sink = BufferedSink::new();
            handle_export(&rows(), format.as_str(), "report", &mut sink, &options).unwrap();
            let response = sink.take().unwrap();
            assert_eq!(response.status, 200);
            assert_eq!(response.content_type, format.content_type());
            match format {
                ExportFormat::Preview => assert!(response.attachment.is_none()),
                _ => assert_eq!(
                    response.attachment,
                    Some(format!("report.{}", format.extension()))
                ),
            }
        }
    }

    #[test]
    fn test_empty_excel_export() {
        let mut sink = BufferedSink::new();
        handle_export(&[], "excel", "empty", &mut sink, &ExportOptions::new(Vec::<String>::new()))
            .unwrap();
        let response = sink.last().unwrap();
        assert_eq!(response.status, 200);
        assert!(response.body.starts_with(b"PK"));
    }

    #[test]
    fn test_apply_defaults_keeps_explicit_values() {
        let mut settings = ExportSettings::default();
        settings.defaults.theme = "corporate".to_string();
        settings.chart.width = 640;
        let exporter = Exporter::from_settings(&settings);

        let filled = exporter.apply_defaults(ExportOptions::new(["id"]));
        assert_eq!(filled.theme.as_deref(), Some("corporate"));
        assert_eq!(filled.page_size.as_deref(), Some("A4"));
        assert_eq!(filled.chart_width, Some(640));

        let explicit = exporter.apply_defaults(ExportOptions::new(["id"]).with_theme("dark"));
        assert_eq!(explicit.theme.as_deref(), Some("dark"));
    }

    #[test]
    fn test_exporter_caches_responses() {
        let exporter = Exporter::from_settings(&ExportSettings::default());
        let cache = exporter.cache().unwrap().clone();
        let options = ExportOptions::new(["id"]);

        let first = exporter.render(&rows(), "csv", "report", &options).unwrap();
        assert_eq!(cache.len(), 1);
        let second = exporter.render(&rows(), "csv", "report", &options).unwrap();
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);

        exporter.render(&rows(), "preview", "report", &options).unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_disabled_cache() {
        let mut settings = ExportSettings::default();
        settings.cache.enabled = false;
        let exporter = Exporter::from_settings(&settings);
        assert!(exporter.cache().is_none());

        let mut sink = BufferedSink::new();
        exporter
            .export(&rows(), "csv", "report", &mut sink, &ExportOptions::new(["id"]))
            .unwrap();
        assert_eq!(sink.sends(), 1);
    }

    #[test]
    fn test_exporter_rejects_unknown_format() {
        let exporter = Exporter::new();
        let err = exporter
            .render(&rows(), "xml", "report", &ExportOptions::default())
            .unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(ref f) if f == "xml"));
    }
}
