//! Property-based tests for CSV export invariants.

use hrops_export::render::render_csv;
use hrops_export::{resolve_display, ExportOptions, ExportRow};
use proptest::prelude::*;
use serde_json::{json, Value};

fn row_strategy() -> impl Strategy<Value = ExportRow> {
    (
        0u32..1_000_000,
        "[a-zA-Z0-9 ,\"\n]{0,24}",
        proptest::option::of(-1.0e6f64..1.0e6),
        proptest::option::of("[A-Z_]{1,12}"),
    )
        .prop_map(|(id, name, amount, status)| {
            let mut row = ExportRow::new();
            row.insert("id".into(), json!(id));
            row.insert(
                "employee".into(),
                json!({"user": {"firstName": name}}),
            );
            row.insert(
                "payment".into(),
                json!({"amount": amount.map_or(Value::Null, |a| json!(a))}),
            );
            if let Some(status) = status {
                row.insert("status".into(), json!(status));
            }
            row
        })
}

fn fields() -> Vec<String> {
    ["id", "employee.user.firstName", "payment.amount", "status"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn read_back(body: &[u8]) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(body)
        .records()
        .map(|r| r.expect("valid csv record").iter().map(String::from).collect())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// One record per row plus the header.
    #[test]
    fn record_count_matches_rows(rows in proptest::collection::vec(row_strategy(), 0..40)) {
        let options = ExportOptions::new(fields());
        let response = render_csv(&rows, &options, "report").expect("csv export");
        let records = read_back(&response.body);

        prop_assert_eq!(records.len(), rows.len() + 1);
        prop_assert_eq!(&records[0], &fields());
    }

    /// Every cell reads back as the resolver's display string.
    #[test]
    fn cells_read_back_to_resolved_values(rows in proptest::collection::vec(row_strategy(), 1..20)) {
        let options = ExportOptions::new(fields());
        let response = render_csv(&rows, &options, "report").expect("csv export");
        let records = read_back(&response.body);

        for (row, record) in rows.iter().zip(records.iter().skip(1)) {
            let expected: Vec<String> = fields()
                .iter()
                .map(|f| resolve_display(row, f, &options))
                .collect();
            prop_assert_eq!(record, &expected);
        }
    }

    /// Every field is quoted, so each line starts with a quote.
    #[test]
    fn every_record_is_quoted(rows in proptest::collection::vec(row_strategy(), 0..10)) {
        let options = ExportOptions::new(["id", "status"]);
        let response = render_csv(&rows, &options, "report").expect("csv export");
        let text = response.text().expect("utf-8 csv");
        for line in text.lines() {
            prop_assert!(line.starts_with('"'), "unquoted line: {line}");
        }
    }

    /// Amount fields always read back as USD strings.
    #[test]
    fn amounts_are_currency(amount in -1.0e6f64..1.0e6) {
        let row: ExportRow = serde_json::from_value(json!({"payment": {"amount": amount}})).unwrap();
        let display = resolve_display(&row, "payment.amount", &ExportOptions::default());
        let digits = display.trim_start_matches('-');
        prop_assert!(digits.starts_with('$'), "not currency: {display}");
        prop_assert!(display.rsplit('.').next().map(|c| c.len()) == Some(2));
    }
}
