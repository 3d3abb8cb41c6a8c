//! PDF renderer.
//!
//! Layout is computed in points measured from the top-left corner and
//! converted to PDF user space (millimetres from the bottom-left) when text
//! is placed.

use crate::chart::ChartRenderer;
use crate::error::{ExportError, Result};
use crate::field::FieldSpec;
use crate::options::ExportOptions;
use crate::response::{ExportResponse, ResponseSink};
use crate::theme::{Rgb, Theme};
use crate::value::ExportRow;
use image::DynamicImage;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference,
};
use std::io::BufWriter;
use tracing::{debug, error, info};

pub const CONTENT_TYPE: &str = "application/pdf";

/// Left edge of the first column.
const COLUMN_ORIGIN: f32 = 50.0;
/// Horizontal distance between columns.
const COLUMN_STEP: f32 = 100.0;
/// Gap between the title block and the table.
const TABLE_GAP: f32 = 20.0;
/// Widest chart drawn on the page.
const MAX_CHART_WIDTH: f32 = 500.0;
/// Average glyph width as a fraction of the font size (Helvetica).
const GLYPH_WIDTH: f32 = 0.5;

/// Render rows as a paginated PDF table.
pub fn render_pdf(rows: &[ExportRow], options: &ExportOptions, filename: &str) -> Result<ExportResponse> {
    debug!(rows = rows.len(), page_size = options.page_size().as_str(), "Rendering PDF");

    let body = build_pdf(rows, options, filename).map_err(|e| {
        error!(error = %e, "Error exporting to PDF");
        e
    })?;

    info!(bytes = body.len(), rows = rows.len(), "PDF export generated");
    Ok(ExportResponse::attachment(
        CONTENT_TYPE,
        format!("{}.pdf", filename),
        body,
    ))
}

/// Render a PDF and hand it to `sink`.
pub fn export_to_pdf<S: ResponseSink + ?Sized>(
    rows: &[ExportRow],
    options: &ExportOptions,
    filename: &str,
    sink: &mut S,
) -> Result<()> {
    sink.send(render_pdf(rows, options, filename)?);
    Ok(())
}

fn build_pdf(rows: &[ExportRow], options: &ExportOptions, filename: &str) -> Result<Vec<u8>> {
    let theme = options.theme();
    let (page_w, page_h) = options.page_size().dimensions_pt();
    let doc_title = options.title.as_deref().unwrap_or(filename);

    let (doc, page, layer) = PdfDocument::new(doc_title, pt_to_mm(page_w), pt_to_mm(page_h), "Layer 1");
    let header_font = doc
        .add_builtin_font(builtin_font(theme.fonts.header, true))
        .map_err(ExportError::pdf)?;
    let body_font = doc
        .add_builtin_font(builtin_font(theme.fonts.body, false))
        .map_err(ExportError::pdf)?;

    let mut page_layout = PageLayout {
        layer: doc.get_page(page).get_layer(layer),
        doc: &doc,
        theme,
        header_font,
        body_font,
        page_w,
        page_h,
        y: theme.spacing.margin,
        pages: 1,
    };

    if let Some(title) = options.title.as_deref() {
        page_layout.centered(title, theme.sizes.title, true, theme.colors.primary);
    }
    if let Some(subtitle) = options.subtitle.as_deref() {
        page_layout.centered(subtitle, theme.sizes.subtitle, false, theme.colors.secondary);
    }
    if options.wants_chart() {
        page_layout.chart(options)?;
    }

    let specs = options.field_specs();
    page_layout.y += TABLE_GAP;
    page_layout.header_row(&specs);

    for row in rows {
        if page_layout.y + theme.spacing.row_height > page_h - theme.spacing.margin {
            page_layout.new_page();
            page_layout.header_row(&specs);
        }
        page_layout.data_row(&specs, row);
    }

    let pages = page_layout.pages;
    debug!(pages, "PDF layout complete");

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf).map_err(ExportError::pdf)?;
    buf.into_inner().map_err(ExportError::pdf)
}

struct PageLayout<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    theme: &'static Theme,
    header_font: IndirectFontRef,
    body_font: IndirectFontRef,
    page_w: f32,
    page_h: f32,
    /// Distance of the next line from the top edge, in points.
    y: f32,
    pages: usize,
}

impl PageLayout<'_> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            pt_to_mm(self.page_w),
            pt_to_mm(self.page_h),
            format!("Page {}", self.pages + 1),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = self.theme.spacing.margin;
        self.pages += 1;
    }

    /// Place `text` with its top at `top` points from the page top.
    fn text(&self, text: &str, size: f32, x: f32, top: f32, bold: bool, color: &str) {
        let font = if bold { &self.header_font } else { &self.body_font };
        self.layer.set_fill_color(pdf_color(color));
        self.layer.use_text(
            text,
            size,
            pt_to_mm(x),
            pt_to_mm(self.page_h - top - size),
            font,
        );
    }

    fn centered(&mut self, text: &str, size: f32, bold: bool, color: &str) {
        let width = text.chars().count() as f32 * size * GLYPH_WIDTH;
        let x = ((self.page_w - width) / 2.0).max(self.theme.spacing.margin);
        self.text(text, size, x, self.y, bold, color);
        self.y += size * 1.2;
    }

    fn chart(&mut self, options: &ExportOptions) -> Result<()> {
        let chart = ChartRenderer::for_options(options).render(options).map_err(|e| {
            ExportError::pdf(e.describe())
        })?;

        let width_pt = (self.page_w - 2.0 * self.theme.spacing.margin).min(MAX_CHART_WIDTH);
        let dpi = chart.width() as f32 * 72.0 / width_pt;
        let height_pt = chart.height() as f32 * 72.0 / dpi;
        let top = self.y + TABLE_GAP / 2.0;

        Image::from_dynamic_image(&DynamicImage::ImageRgb8(chart.image)).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(pt_to_mm((self.page_w - width_pt) / 2.0)),
                translate_y: Some(pt_to_mm(self.page_h - top - height_pt)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        self.y = top + height_pt;
        Ok(())
    }

    fn header_row(&mut self, specs: &[FieldSpec]) {
        let size = self.theme.sizes.header;
        for (index, spec) in specs.iter().enumerate() {
            let label = fit_column(&spec.path, size);
            self.text(&label, size, column_x(index), self.y, true, ink(self.theme));
        }
        self.y += size + self.theme.spacing.header_padding;
    }

    fn data_row(&mut self, specs: &[FieldSpec], row: &ExportRow) {
        let size = self.theme.sizes.body;
        for (index, spec) in specs.iter().enumerate() {
            let value = spec.display(row);
            let color = if spec.is_status() && !value.is_empty() {
                self.theme.status_color(&value)
            } else {
                ink(self.theme)
            };
            self.text(&fit_column(&value, size), size, column_x(index), self.y, false, color);
        }
        self.y += self.theme.spacing.row_height;
    }
}

fn column_x(index: usize) -> f32 {
    COLUMN_ORIGIN + index as f32 * COLUMN_STEP
}

/// Truncate `text` so it stays inside one column.
fn fit_column(text: &str, size: f32) -> String {
    let max_chars = ((COLUMN_STEP - 5.0) / (size * GLYPH_WIDTH)).floor() as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Text color on a white page: the darker of the theme's light and dark
/// tones.
fn ink(theme: &Theme) -> &'static str {
    let luminance = |hex: &str| {
        let (r, g, b) = Rgb::from_hex(hex).unwrap_or(Rgb::BLACK).to_unit();
        0.2126 * r + 0.7152 * g + 0.0722 * b
    };
    if luminance(theme.colors.light) < luminance(theme.colors.dark) {
        theme.colors.light
    } else {
        theme.colors.dark
    }
}

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn pdf_color(hex: &str) -> Color {
    let (r, g, b) = Rgb::from_hex(hex).unwrap_or(Rgb::BLACK).to_unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

/// Map a theme font name onto the PDF base-14 fonts. Arial and other sans
/// faces map to Helvetica.
fn builtin_font(name: &str, bold: bool) -> BuiltinFont {
    let lower = name.to_ascii_lowercase();
    let bold = bold || lower.contains("bold");
    if lower.contains("times") {
        if bold {
            BuiltinFont::TimesBold
        } else {
            BuiltinFont::TimesRoman
        }
    } else if lower.contains("courier") {
        if bold {
            BuiltinFont::CourierBold
        } else {
            BuiltinFont::Courier
        }
    } else if bold {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    }
}
