//! Structural invariants of the HTML preview.

use hrops_export::render::render_preview;
use hrops_export::theme::{BUILTIN_THEMES, DEFAULT};
use hrops_export::{ExportOptions, ExportRow};
use regex::Regex;
use serde_json::json;

fn rows() -> Vec<ExportRow> {
    serde_json::from_value(json!([
        {"id": 1, "name": "<img src=x onerror=alert(1)>", "status": "OPEN"},
        {"id": 2, "name": "O'Brien & \"Sons\"", "status": "RESOLVED"},
        {"id": 3, "name": null, "status": null}
    ]))
    .unwrap()
}

fn preview(options: &ExportOptions) -> String {
    let response = render_preview(&rows(), options).expect("preview renders");
    String::from_utf8(response.body).expect("utf-8 html")
}

#[test]
fn one_header_cell_per_field_and_row_per_record() {
    let options = ExportOptions::new(["id", "name", "status"]);
    let html = preview(&options);

    let th = Regex::new(r"<th>[^<]*</th>").unwrap();
    assert_eq!(th.find_iter(&html).count(), 3);

    let body_rows = Regex::new(r"<tbody>(.*)</tbody>").unwrap();
    let body = &body_rows.captures(&html).expect("tbody present")[1];
    assert_eq!(body.matches("<tr>").count(), 3);
    assert_eq!(body.matches("<td>").count(), 9);
}

#[test]
fn no_raw_markup_from_values() {
    let options = ExportOptions::new(["id", "name"])
        .with_title("<script>steal()</script>")
        .with_subtitle("a < b");
    let html = preview(&options);

    assert!(!html.contains("<script"));
    assert!(!html.contains("<img src=x"));
    assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    assert!(html.contains("O&#x27;Brien &amp; &quot;Sons&quot;"));
    assert!(html.contains("a &lt; b"));

    // Every tag in the document is one the renderer emits itself.
    let tags = Regex::new(r"<(/?)([a-zA-Z!]+)").unwrap();
    let allowed = [
        "!DOCTYPE", "html", "head", "meta", "title", "style", "body", "div", "table", "thead",
        "tbody", "tr", "th", "td", "span",
    ];
    for caps in tags.captures_iter(&html) {
        assert!(allowed.contains(&&caps[2]), "unexpected tag {}", &caps[2]);
    }
}

#[test]
fn unknown_theme_renders_default_colors() {
    let html = preview(&ExportOptions::new(["id"]).with_theme("nonexistent"));
    let header_bg = Regex::new(r"th \{ background-color: (#[0-9a-f]{6});").unwrap();
    assert_eq!(&header_bg.captures(&html).unwrap()[1], DEFAULT.colors.primary);
}

#[test]
fn every_theme_styles_header_and_borders() {
    let header_bg = Regex::new(r"th \{ background-color: (#[0-9a-f]{6});").unwrap();
    let border = Regex::new(r"border: 1px solid (#[0-9a-f]{6});").unwrap();
    for theme in BUILTIN_THEMES {
        let html = preview(&ExportOptions::new(["id"]).with_theme(theme.name));
        assert_eq!(&header_bg.captures(&html).unwrap()[1], theme.colors.primary);
        assert_eq!(&border.captures(&html).unwrap()[1], theme.colors.border);
    }
}

#[test]
fn status_cells_are_colored() {
    let html = preview(&ExportOptions::new(["status"]));
    let status = Regex::new(r#"<span class="status" style="color: (#[0-9a-f]{6})">([A-Z]+)</span>"#)
        .unwrap();
    let found: Vec<(String, String)> = status
        .captures_iter(&html)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .collect();
    assert_eq!(
        found,
        vec![
            (DEFAULT.colors.warning.to_string(), "OPEN".to_string()),
            (DEFAULT.colors.success.to_string(), "RESOLVED".to_string()),
        ]
    );
}
