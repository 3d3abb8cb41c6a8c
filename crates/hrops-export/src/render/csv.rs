//! CSV renderer.

use crate::error::{ExportError, Result};
use crate::options::ExportOptions;
use crate::response::{ExportResponse, ResponseSink};
use crate::value::ExportRow;
use csv::{QuoteStyle, WriterBuilder};
use tracing::{debug, error, info};

pub const CONTENT_TYPE: &str = "text/csv";

/// Render `rows` projected onto `options.fields`.
///
/// The header row holds the field paths; every cell goes through the field
/// resolver, so dotted paths work the same way they do in PDF and preview.
pub fn render_csv(rows: &[ExportRow], options: &ExportOptions, filename: &str) -> Result<ExportResponse> {
    debug!(rows = rows.len(), fields = options.fields.len(), "Rendering CSV");

    let body = write_csv(rows, options).map_err(|e| {
        error!(error = %e, "Error exporting to CSV");
        e
    })?;

    info!(bytes = body.len(), rows = rows.len(), "CSV export generated");
    Ok(ExportResponse::attachment(
        CONTENT_TYPE,
        format!("{}.csv", filename),
        body,
    ))
}

/// Render CSV for `fields` and hand it to `sink`.
pub fn export_to_csv<S: ResponseSink + ?Sized>(
    rows: &[ExportRow],
    fields: &[String],
    filename: &str,
    sink: &mut S,
) -> Result<()> {
    let options = ExportOptions::new(fields.iter().cloned());
    sink.send(render_csv(rows, &options, filename)?);
    Ok(())
}

fn write_csv(rows: &[ExportRow], options: &ExportOptions) -> Result<Vec<u8>> {
    let specs = options.field_specs();
    if specs.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(specs.iter().map(|s| s.path.as_str()))
        .map_err(ExportError::csv)?;

    for row in rows {
        writer
            .write_record(specs.iter().map(|s| s.display(row)))
            .map_err(ExportError::csv)?;
    }

    writer.into_inner().map_err(ExportError::csv)
}
