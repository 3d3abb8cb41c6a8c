//! Support code for the `hrops-export` binary.
//!
//! The binary renders JSON row sets through the export engine:
//!
//! ```text
//! hrops-export render --input rows.json --format pdf --report payroll --output-dir out/
//! hrops-export render --input - --format preview < rows.json > preview.html
//! hrops-export fields attendance
//! hrops-export config show
//! ```

pub mod error;
pub mod exit_codes;
pub mod input;
pub mod logging;
pub mod output;

pub use error::{CliError, Result};
pub use exit_codes::ExitCode;
pub use input::{assemble_options, check_filename, ExportInput, OptionOverrides};
pub use output::{FileSink, Written};
