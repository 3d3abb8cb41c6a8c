//! Export option types.
//!
//! Options travel as camelCase JSON so they can be passed straight through
//! from API query/body payloads.

use crate::field::FieldSpec;
use crate::theme::Theme;
use crate::value::{ExportRow, FieldKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// PDF page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
}

impl PageSize {
    /// Parse a page size name, case-insensitively.
    pub fn parse(name: &str) -> Option<PageSize> {
        match name.trim().to_ascii_uppercase().as_str() {
            "A3" => Some(PageSize::A3),
            "A4" => Some(PageSize::A4),
            "A5" => Some(PageSize::A5),
            "LETTER" => Some(PageSize::Letter),
            "LEGAL" => Some(PageSize::Legal),
            _ => None,
        }
    }

    /// Page dimensions in points (width, height).
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageSize::A3 => "A3",
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::Letter => "LETTER",
            PageSize::Legal => "LEGAL",
        }
    }
}

/// Chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
    Pie,
    Doughnut,
}

/// A single color or one color per data point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    PerPoint(Vec<String>),
}

impl ColorSpec {
    /// Color for the data point at `index`.
    pub fn at(&self, index: usize) -> Option<&str> {
        match self {
            ColorSpec::Single(c) => Some(c.as_str()),
            ColorSpec::PerPoint(colors) if !colors.is_empty() => {
                Some(colors[index % colors.len()].as_str())
            }
            ColorSpec::PerPoint(_) => None,
        }
    }
}

/// One labeled data series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

impl Dataset {
    pub fn new(label: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            data,
            background_color: None,
            border_color: None,
            fill: None,
        }
    }
}

/// Declarative chart input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// A named worksheet with its own rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub name: String,
    pub data: Vec<ExportRow>,
}

/// Options recognized by every renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    /// Ordered field paths to render.
    pub fields: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// Theme name; unknown names fall back to `default`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// PDF page size name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<String>,
    #[serde(default)]
    pub include_charts: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_data: Option<ChartData>,
    /// Chart canvas size in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_height: Option<u32>,
    /// Multi-sheet spreadsheet input; overrides the top-level rows and
    /// `fields`, each sheet taking columns from its own rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheets: Option<Vec<SheetSpec>>,
    /// Explicit interpretation per field path.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_types: BTreeMap<String, FieldKind>,
}

impl ExportOptions {
    /// Options rendering the given fields.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_page_size(mut self, page_size: impl Into<String>) -> Self {
        self.page_size = Some(page_size.into());
        self
    }

    /// Attach a chart and enable chart rendering.
    pub fn with_chart(mut self, chart_type: ChartType, data: ChartData) -> Self {
        self.include_charts = true;
        self.chart_type = Some(chart_type);
        self.chart_data = Some(data);
        self
    }

    pub fn with_chart_title(mut self, title: impl Into<String>) -> Self {
        self.chart_title = Some(title.into());
        self
    }

    pub fn with_chart_size(mut self, width: u32, height: u32) -> Self {
        self.chart_width = Some(width);
        self.chart_height = Some(height);
        self
    }

    /// Append a worksheet for spreadsheet export.
    pub fn with_sheet(mut self, name: impl Into<String>, data: Vec<ExportRow>) -> Self {
        self.sheets.get_or_insert_with(Vec::new).push(SheetSpec {
            name: name.into(),
            data,
        });
        self
    }

    pub fn with_field_type(mut self, path: impl Into<String>, kind: FieldKind) -> Self {
        self.field_types.insert(path.into(), kind);
        self
    }

    /// Interpretation for a field path.
    pub fn field_kind(&self, path: &str) -> FieldKind {
        self.field_types.get(path).copied().unwrap_or_default()
    }

    /// Field paths paired with their interpretation, in output order.
    pub fn field_specs(&self) -> Vec<FieldSpec> {
        self.fields
            .iter()
            .map(|f| FieldSpec::new(f.as_str(), self.field_kind(f)))
            .collect()
    }

    /// Active theme.
    pub fn theme(&self) -> &'static Theme {
        Theme::resolve(self.theme.as_deref())
    }

    /// Active page size; unknown names fall back to A4.
    pub fn page_size(&self) -> PageSize {
        match self.page_size.as_deref() {
            None => PageSize::default(),
            Some(name) => PageSize::parse(name).unwrap_or_else(|| {
                warn!(page_size = name, "Unknown page size, using A4");
                PageSize::default()
            }),
        }
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type.unwrap_or_default()
    }

    /// Whether PDF/preview output should carry a chart.
    pub fn wants_chart(&self) -> bool {
        self.include_charts && self.chart_data.is_some()
    }

    /// Load options from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_page_sizes_parse() {
        for name in hrops_config::settings::PAGE_SIZES {
            assert!(PageSize::parse(name).is_some(), "{name}");
        }
    }

    #[test]
    fn test_default_options() {
        let options = ExportOptions::default();
        assert!(options.fields.is_empty());
        assert_eq!(options.page_size(), PageSize::A4);
        assert_eq!(options.theme().name, "default");
        assert_eq!(options.chart_type(), ChartType::Bar);
        assert!(!options.wants_chart());
    }

    #[test]
    fn test_options_builder() {
        let data = ChartData {
            labels: vec!["Mon".into()],
            datasets: vec![Dataset::new("Hours", vec![8.0])],
        };
        let options = ExportOptions::new(["id", "name"])
            .with_title("Attendance Report")
            .with_theme("corporate")
            .with_page_size("letter")
            .with_chart(ChartType::Line, data);

        assert_eq!(options.fields, vec!["id", "name"]);
        assert_eq!(options.title.as_deref(), Some("Attendance Report"));
        assert_eq!(options.theme().name, "corporate");
        assert_eq!(options.page_size(), PageSize::Letter);
        assert!(options.wants_chart());
    }

    #[test]
    fn test_camel_case_json() {
        let json = r##"{
            "fields": ["employee.user.firstName", "netSalary"],
            "pageSize": "A3",
            "includeCharts": true,
            "chartType": "doughnut",
            "chartData": {
                "labels": ["a", "b"],
                "datasets": [{"label": "x", "data": [1, 2], "backgroundColor": ["#fff", "#000"]}]
            },
            "fieldTypes": {"netSalary": "currency"},
            "sheets": [{"name": "Q1", "data": [{"id": 1}]}]
        }"##;
        let options = ExportOptions::from_json(json).unwrap();
        assert_eq!(options.page_size(), PageSize::A3);
        assert_eq!(options.chart_type(), ChartType::Doughnut);
        assert_eq!(options.field_kind("netSalary"), FieldKind::Currency);
        assert_eq!(options.field_kind("other"), FieldKind::Auto);
        assert_eq!(options.sheets.as_ref().map(Vec::len), Some(1));

        let dataset = &options.chart_data.as_ref().unwrap().datasets[0];
        let colors = dataset.background_color.as_ref().unwrap();
        assert_eq!(colors.at(0), Some("#fff"));
        assert_eq!(colors.at(3), Some("#000"));
    }

    #[test]
    fn test_fields_required() {
        assert!(ExportOptions::from_json("{}").is_err());
    }

    #[test]
    fn test_unknown_page_size_falls_back() {
        let options = ExportOptions::default().with_page_size("B5");
        assert_eq!(options.page_size(), PageSize::A4);
    }

    #[test]
    fn test_roundtrip_json() {
        let options = ExportOptions::new(["id"]).with_subtitle("Generated on 1/2/2024");
        let parsed = ExportOptions::from_json(&options.to_json().unwrap()).unwrap();
        assert_eq!(parsed, options);
    }
}
