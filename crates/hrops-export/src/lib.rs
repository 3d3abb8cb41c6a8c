//! Report export engine for the hrops workforce backend.
//!
//! Renders already-fetched report rows (attendance, leave, payroll,
//! incidents, equipment, projects) into downloadable files or an inline
//! preview.
//!
//! # Formats
//!
//! - **CSV**: every cell quoted, one record per row
//! - **Excel**: styled OOXML workbook, optionally multi-sheet
//! - **PDF**: themed, paginated table with an optional chart
//! - **Preview**: self-contained, fully escaped HTML page
//!
//! # Features
//!
//! - **Dotted field paths**: `employee.user.firstName` resolves through nested
//!   objects; numeric segments index arrays
//! - **Typed formatting**: dates, numbers and USD amounts, driven by
//!   `fieldTypes` with a name-based fallback
//! - **Themes**: `default`, `dark` and `corporate` palettes shared by all
//!   visual renderers
//! - **Charts**: bar, line, pie and doughnut rendered to PNG
//! - **Response cache**: bounded LRU with TTL keyed by request fingerprint
//!
//! # Example
//!
//! ```no_run
//! use hrops_export::{handle_export, BufferedSink, ExportOptions, ExportRow};
//!
//! let rows: Vec<ExportRow> = serde_json::from_str(r#"[{"id": "1", "name": "A"}]"#).unwrap();
//! let options = ExportOptions::new(["id", "name"]).with_title("Roster");
//!
//! let mut sink = BufferedSink::new();
//! handle_export(&rows, "csv", "report", &mut sink, &options).unwrap();
//! assert_eq!(sink.last().unwrap().status, 200);
//! ```

pub mod cache;
pub mod chart;
pub mod dispatch;
pub mod error;
pub mod field;
pub mod options;
pub mod render;
pub mod reports;
pub mod response;
pub mod theme;
pub mod value;

pub use cache::{fingerprint, Clock, ExportCache, ManualClock, SystemClock};
pub use chart::{generate_chart_image, ChartRenderer};
pub use dispatch::{handle_export, ExportFormat, Exporter};
pub use error::{ErrorPayload, ExportError, Result};
pub use field::{resolve, resolve_display, FieldSpec};
pub use options::{ChartData, ChartType, ColorSpec, Dataset, ExportOptions, PageSize, SheetSpec};
pub use render::{export_to_csv, export_to_excel, export_to_pdf, generate_preview};
pub use reports::ReportKind;
pub use response::{BufferedSink, ExportResponse, ResponseSink};
pub use theme::Theme;
pub use value::{ExportRow, FieldKind, FieldValue};
