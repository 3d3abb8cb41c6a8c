//! XLSX renderer.

use crate::error::{ExportError, Result};
use crate::field::FieldSpec;
use crate::options::ExportOptions;
use crate::response::{ExportResponse, ResponseSink};
use crate::theme::Rgb;
use crate::value::{ExportRow, FieldValue};
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::{debug, error, info, warn};

pub const CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const DEFAULT_SHEET_NAME: &str = "Sheet1";
const MAX_SHEET_NAME_LEN: usize = 31;
const MIN_COLUMN_WIDTH: usize = 10;
const MAX_COLUMN_WIDTH: usize = 50;

/// Render rows (or `options.sheets`) into an OOXML workbook.
pub fn render_excel(rows: &[ExportRow], options: &ExportOptions, filename: &str) -> Result<ExportResponse> {
    debug!(
        rows = rows.len(),
        sheets = options.sheets.as_ref().map(Vec::len),
        "Rendering workbook"
    );

    let body = build_workbook(rows, options).map_err(|e| {
        error!(error = %e, "Error exporting to Excel");
        ExportError::excel(e)
    })?;

    info!(bytes = body.len(), "Excel export generated");
    Ok(ExportResponse::attachment(
        CONTENT_TYPE,
        format!("{}.xlsx", filename),
        body,
    ))
}

/// Render a workbook and hand it to `sink`.
pub fn export_to_excel<S: ResponseSink + ?Sized>(
    rows: &[ExportRow],
    options: &ExportOptions,
    filename: &str,
    sink: &mut S,
) -> Result<()> {
    sink.send(render_excel(rows, options, filename)?);
    Ok(())
}

struct SheetFormats {
    header: Format,
    currency: Format,
}

fn build_workbook(rows: &[ExportRow], options: &ExportOptions) -> std::result::Result<Vec<u8>, XlsxError> {
    let primary = Rgb::from_hex(options.theme().colors.primary).unwrap_or(Rgb::BLACK);
    let formats = SheetFormats {
        header: Format::new()
            .set_bold()
            .set_background_color(Color::RGB(primary.to_u32()))
            .set_font_color(Color::White)
            .set_border(FormatBorder::Thin),
        currency: Format::new().set_num_format("$#,##0.00"),
    };

    let mut workbook = Workbook::new();

    match &options.sheets {
        Some(sheets) => {
            for (index, sheet) in sheets.iter().enumerate() {
                let worksheet = workbook.add_worksheet();
                worksheet.set_name(sheet_name(&sheet.name, index))?;
                let columns = key_columns(&sheet.data, options);
                write_sheet(worksheet, &sheet.data, &columns, &formats)?;
            }
        }
        None => {
            let worksheet = workbook.add_worksheet();
            let name = options.title.as_deref().unwrap_or(DEFAULT_SHEET_NAME);
            worksheet.set_name(sheet_name(name, 0))?;
            let columns = sheet_columns(rows, options);
            write_sheet(worksheet, rows, &columns, &formats)?;
        }
    }

    workbook.save_to_buffer()
}

/// Columns for the single-sheet workbook: the configured fields, or every
/// top-level key when no fields were given.
fn sheet_columns(rows: &[ExportRow], options: &ExportOptions) -> Vec<FieldSpec> {
    if options.fields.is_empty() {
        key_columns(rows, options)
    } else {
        options.field_specs()
    }
}

/// Every top-level key in `rows`, in first-seen order. Entries of `sheets`
/// always take their columns from their own data.
fn key_columns(rows: &[ExportRow], options: &ExportOptions) -> Vec<FieldSpec> {
    let mut keys: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !keys.contains(&key.as_str()) {
                keys.push(key.as_str());
            }
        }
    }
    keys.into_iter()
        .map(|k| FieldSpec::new(k, options.field_kind(k)))
        .collect()
}

fn write_sheet(
    worksheet: &mut Worksheet,
    rows: &[ExportRow],
    columns: &[FieldSpec],
    formats: &SheetFormats,
) -> std::result::Result<(), XlsxError> {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.path.chars().count()).collect();

    for (col, spec) in columns.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, spec.path.as_str(), &formats.header)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let r = row_index(idx + 1)?;
        for (col, spec) in columns.iter().enumerate() {
            let c = column_index(col)?;
            let value = spec.value(row);
            widths[col] = widths[col].max(spec.format(&value).chars().count());
            match value {
                FieldValue::Null => {}
                FieldValue::Bool(b) => {
                    worksheet.write_boolean(r, c, b)?;
                }
                FieldValue::Number(n) if n.is_finite() && spec.is_currency() => {
                    worksheet.write_number_with_format(r, c, n, &formats.currency)?;
                }
                FieldValue::Number(n) if n.is_finite() => {
                    worksheet.write_number(r, c, n)?;
                }
                other => {
                    worksheet.write_string(r, c, spec.format(&other))?;
                }
            }
        }
    }

    for (col, width) in widths.iter().enumerate() {
        let width = (*width + 2).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH);
        worksheet.set_column_width(column_index(col)?, width as f64)?;
    }

    if !columns.is_empty() {
        worksheet.set_freeze_panes(1, 0)?;
        if !rows.is_empty() {
            worksheet.autofilter(0, 0, row_index(rows.len())?, column_index(columns.len() - 1)?)?;
        }
    }

    Ok(())
}

fn row_index(idx: usize) -> std::result::Result<u32, XlsxError> {
    u32::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

fn column_index(idx: usize) -> std::result::Result<u16, XlsxError> {
    u16::try_from(idx).map_err(|_| XlsxError::RowColumnLimitError)
}

/// Make `name` acceptable to Excel: at most 31 characters, none of
/// `[]:*?/\`, no leading or trailing apostrophe.
fn sheet_name(name: &str, index: usize) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_matches('\'').trim().to_string();
    let cleaned = if cleaned.is_empty() {
        format!("Sheet{}", index + 1)
    } else {
        cleaned
    };
    if cleaned != name {
        warn!(requested = name, used = %cleaned, "Adjusted worksheet name");
    }
    cleaned
}
