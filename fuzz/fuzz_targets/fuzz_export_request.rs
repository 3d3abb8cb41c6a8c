//! Fuzz target for export options and the CSV and preview renderers.
//!
//! Tests that any decodable request renders or fails with an error, and
//! that the preview never echoes raw markup from row values.

#![no_main]

use hrops_export::render::{render_csv, render_preview};
use hrops_export::{ExportOptions, ExportRow};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok((rows, options)) = serde_json::from_slice::<(Vec<ExportRow>, ExportOptions)>(data) else {
        return;
    };
    let mut options = options;
    // Skip chart rasterization.
    options.include_charts = false;

    let _ = render_csv(&rows, &options, "fuzz");
    if let Ok(response) = render_preview(&rows, &options) {
        let html = String::from_utf8_lossy(&response.body);
        assert!(!html.contains("<script"));
    }
});
