//! Fuzz target for dotted field path resolution.
//!
//! Rows come from request bodies, so resolution must never panic on odd
//! paths (empty segments, huge indexes, non-ASCII) or deeply nested values.

#![no_main]

use arbitrary::Arbitrary;
use hrops_export::{resolve_display, ExportOptions, ExportRow, FieldKind};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    row_json: &'a str,
    path: &'a str,
    kind: u8,
}

fuzz_target!(|input: Input<'_>| {
    let Ok(row) = serde_json::from_str::<ExportRow>(input.row_json) else {
        return;
    };
    let kind = match input.kind % 5 {
        0 => FieldKind::Auto,
        1 => FieldKind::Text,
        2 => FieldKind::Number,
        3 => FieldKind::Currency,
        _ => FieldKind::Date,
    };
    let options = ExportOptions::new([input.path]).with_field_type(input.path, kind);
    let _ = resolve_display(&row, input.path, &options);
});
