//! Format renderers.
//!
//! Each renderer turns rows plus [`ExportOptions`](crate::ExportOptions) into
//! a complete [`ExportResponse`](crate::ExportResponse) before anything is
//! handed to a sink.

pub mod csv;
pub mod excel;
pub mod pdf;
pub mod preview;

pub use self::csv::{export_to_csv, render_csv};
pub use excel::{export_to_excel, render_excel};
pub use pdf::{export_to_pdf, render_pdf};
pub use preview::{generate_preview, html_escape, render_preview};
