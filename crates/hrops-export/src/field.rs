//! Dotted field-path resolution.
//!
//! Report rows are arbitrary nested JSON objects. A field path such as
//! `employee.user.firstName` walks the row one segment at a time; any missing
//! or null segment resolves to [`FieldValue::Null`], which renders as an
//! empty string. When the walk meets an array, a numeric segment indexes it
//! (`assignments.0.startDate`); any other segment is applied to every element
//! and the non-null results are collected into a list
//! (`assignments.startDate`).

use crate::options::ExportOptions;
use crate::value::{format_currency, ExportRow, FieldKind, FieldValue};
use serde_json::Value;

/// Resolve `path` with automatic interpretation.
pub fn resolve(row: &ExportRow, path: &str) -> FieldValue {
    FieldSpec::auto(path).value(row)
}

/// Resolve `path` and format it for display, honoring any type annotation
/// in `options`.
pub fn resolve_display(row: &ExportRow, path: &str, options: &ExportOptions) -> String {
    FieldSpec::new(path, options.field_kind(path)).display(row)
}

fn walk(current: &Value, segments: &[&str], kind: FieldKind) -> FieldValue {
    let Some((segment, rest)) = segments.split_first() else {
        return FieldValue::from_json(current, kind);
    };
    match current {
        Value::Object(map) => map
            .get(*segment)
            .map_or(FieldValue::Null, |v| walk(v, rest, kind)),
        Value::Array(items) => match segment.parse::<usize>() {
            Ok(index) => items
                .get(index)
                .map_or(FieldValue::Null, |v| walk(v, rest, kind)),
            Err(_) => FieldValue::List(
                items
                    .iter()
                    .map(|item| walk(item, segments, kind))
                    .filter(|v| !v.is_null())
                    .collect(),
            ),
        },
        _ => FieldValue::Null,
    }
}

/// A field path together with its rendering interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub path: String,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn new(path: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    pub fn auto(path: impl Into<String>) -> Self {
        Self::new(path, FieldKind::Auto)
    }

    /// Last path segment, e.g. `amount` for `payment.amount`.
    pub fn leaf(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    /// Numbers in this field render as currency.
    pub fn is_currency(&self) -> bool {
        match self.kind {
            FieldKind::Currency => true,
            FieldKind::Auto => self.leaf().to_lowercase().contains("amount"),
            _ => false,
        }
    }

    /// Status-like fields are colored by status in PDF output.
    pub fn is_status(&self) -> bool {
        self.leaf().eq_ignore_ascii_case("status")
    }

    pub fn value(&self, row: &ExportRow) -> FieldValue {
        let segments: Vec<&str> = self.path.split('.').collect();
        match segments.split_first() {
            Some((first, rest)) => row
                .get(*first)
                .map_or(FieldValue::Null, |v| walk(v, rest, self.kind)),
            None => FieldValue::Null,
        }
    }

    pub fn display(&self, row: &ExportRow) -> String {
        self.format(&self.value(row))
    }

    pub fn format(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Number(n) if self.is_currency() => format_currency(*n),
            other => other.display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> ExportRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    #[test]
    fn test_nested_lookup() {
        let r = row(json!({"a": {"b": {"c": 5}}}));
        assert_eq!(resolve(&r, "a.b.c").display(), "5");
    }

    #[test]
    fn test_null_intermediate_is_empty() {
        let r = row(json!({"a": {"b": null}}));
        assert_eq!(resolve(&r, "a.b.c").display(), "");
        assert!(resolve(&r, "a.b.c").is_null());
        assert_eq!(resolve(&r, "missing").display(), "");
    }

    #[test]
    fn test_amount_heuristic() {
        let r = row(json!({"payment": {"amount": 1234.5}}));
        let opts = ExportOptions::default();
        assert_eq!(resolve_display(&r, "payment.amount", &opts), "$1,234.50");

        let r = row(json!({"totalAmount": 10}));
        assert_eq!(resolve_display(&r, "totalAmount", &opts), "$10.00");

        // Only the leaf segment is inspected.
        let r = row(json!({"amounts": {"count": 3}}));
        assert_eq!(resolve_display(&r, "amounts.count", &opts), "3");
    }

    #[test]
    fn test_explicit_kind_overrides_heuristic() {
        let r = row(json!({"amount": 7, "netSalary": 2500}));
        let opts = ExportOptions::default()
            .with_field_type("amount", FieldKind::Number)
            .with_field_type("netSalary", FieldKind::Currency);
        assert_eq!(resolve_display(&r, "amount", &opts), "7");
        assert_eq!(resolve_display(&r, "netSalary", &opts), "$2,500.00");
    }

    #[test]
    fn test_array_index_segments() {
        let r = row(json!({"assignments": [{"startDate": "x"}, {"startDate": "y"}]}));
        assert_eq!(resolve(&r, "assignments.1.startDate").display(), "y");
        assert_eq!(resolve(&r, "assignments.9.startDate").display(), "");
        assert_eq!(resolve(&r, "assignments.0.startDate").display(), "x");
    }

    #[test]
    fn test_array_fan_out() {
        let r = row(json!({"assignments": [
            {"employee": {"user": {"firstName": "Ana"}}},
            {"employee": null},
            {"employee": {"user": {"firstName": "Bo"}}}
        ]}));
        assert_eq!(
            resolve(&r, "assignments.employee.user.firstName").display(),
            "Ana,Bo"
        );

        let r = row(json!({"assignments": []}));
        assert_eq!(resolve(&r, "assignments.employee.user.firstName").display(), "");
    }

    #[test]
    fn test_leaf_and_status() {
        let spec = FieldSpec::auto("employee.user.status");
        assert_eq!(spec.leaf(), "status");
        assert!(spec.is_status());
        assert!(!FieldSpec::auto("statusText").is_status());
    }
}
