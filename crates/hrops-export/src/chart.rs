//! Raster chart generation.
//!
//! Charts are drawn with `plotters` into an in-memory RGB buffer and encoded
//! as PNG. The PDF renderer embeds the raw image; the HTML preview inlines
//! the PNG as a data URI.

use crate::error::{ExportError, Result};
use crate::options::{ChartData, ChartType, ExportOptions};
use crate::theme::{Rgb, Theme};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::PI;
use std::io::Cursor;
use tracing::{debug, error};

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 400;
pub const MIN_SIZE: u32 = 100;
pub const MAX_SIZE: u32 = 4000;

const FONT_FAMILY: &str = "sans-serif";
const EXTRA_COLORS: [&str; 4] = ["#8b5cf6", "#ec4899", "#14b8a6", "#f97316"];

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type DrawResult = std::result::Result<(), String>;

/// A rendered chart.
#[derive(Debug, Clone)]
pub struct ChartImage {
    pub image: RgbImage,
}

impl ChartImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encode as PNG.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(self.image.clone())
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| {
                error!(error = %e, "Error encoding chart");
                ExportError::chart(e)
            })?;
        Ok(bytes)
    }
}

/// Chart renderer with a fixed canvas size and theme palette.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
    theme: &'static Theme,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(Theme::resolve(None))
    }
}

impl ChartRenderer {
    pub fn new(theme: &'static Theme) -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            theme,
        }
    }

    /// Renderer for the theme and canvas size requested by `options`. Sizes
    /// are clamped to `MIN_SIZE..=MAX_SIZE`.
    pub fn for_options(options: &ExportOptions) -> Self {
        Self::new(options.theme()).with_size(
            options.chart_width.unwrap_or(DEFAULT_WIDTH).clamp(MIN_SIZE, MAX_SIZE),
            options.chart_height.unwrap_or(DEFAULT_HEIGHT).clamp(MIN_SIZE, MAX_SIZE),
        )
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Draw the chart described by `options`.
    pub fn render(&self, options: &ExportOptions) -> Result<ChartImage> {
        let data = options
            .chart_data
            .as_ref()
            .ok_or(ExportError::ChartDataRequired)?;
        let chart_type = options.chart_type();
        debug!(
            ?chart_type,
            labels = data.labels.len(),
            datasets = data.datasets.len(),
            "Rendering chart"
        );

        let mut buffer = vec![0u8; self.width as usize * self.height as usize * 3];
        self.draw(&mut buffer, data, chart_type, options.chart_title.as_deref())
            .map_err(|e| {
                error!(error = %e, "Error generating chart");
                ExportError::chart(e)
            })?;

        let image = RgbImage::from_raw(self.width, self.height, buffer)
            .ok_or_else(|| ExportError::chart("chart buffer does not match canvas size"))?;
        Ok(ChartImage { image })
    }

    /// Draw the chart and encode it as PNG.
    pub fn render_png(&self, options: &ExportOptions) -> Result<Vec<u8>> {
        self.render(options)?.to_png()
    }

    fn draw(
        &self,
        buffer: &mut [u8],
        data: &ChartData,
        chart_type: ChartType,
        title: Option<&str>,
    ) -> DrawResult {
        let root = BitMapBackend::with_buffer(buffer, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let area = match title {
            Some(title) => root
                .titled(title, (FONT_FAMILY, 20).into_font())
                .map_err(|e| e.to_string())?,
            None => root.clone(),
        };

        match chart_type {
            ChartType::Bar => self.draw_bars(&area, data)?,
            ChartType::Line => self.draw_lines(&area, data)?,
            ChartType::Pie => self.draw_pie(&area, data, 0.0)?,
            ChartType::Doughnut => self.draw_pie(&area, data, 0.5)?,
        }

        root.present().map_err(|e| e.to_string())
    }

    fn draw_bars(&self, area: &Area<'_>, data: &ChartData) -> DrawResult {
        let slots = slot_count(data);
        let (min, max) = value_range(data);
        let labels = &data.labels;
        let label_for = |x: &f64| labels.get(x.floor() as usize).cloned().unwrap_or_default();

        let mut chart = ChartBuilder::on(area)
            .margin(20)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..slots as f64, min..max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots)
            .x_label_formatter(&label_for)
            .draw()
            .map_err(|e| e.to_string())?;

        let groups = data.datasets.len().max(1) as f64;
        let bar_width = 0.8 / groups;
        for (di, dataset) in data.datasets.iter().enumerate() {
            let fallback = self.series_color(di);
            let bars = dataset.data.iter().enumerate().map(|(i, value)| {
                let color = dataset
                    .background_color
                    .as_ref()
                    .and_then(|c| c.at(i))
                    .and_then(to_plot_color)
                    .unwrap_or(fallback);
                let x0 = i as f64 + 0.1 + di as f64 * bar_width;
                Rectangle::new([(x0, 0.0), (x0 + bar_width, *value)], color.filled())
            });
            chart.draw_series(bars).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    fn draw_lines(&self, area: &Area<'_>, data: &ChartData) -> DrawResult {
        let slots = slot_count(data);
        let (min, max) = value_range(data);
        let labels = &data.labels;
        let label_for = |x: &f64| labels.get(x.floor() as usize).cloned().unwrap_or_default();

        let mut chart = ChartBuilder::on(area)
            .margin(20)
            .x_label_area_size(30)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..slots as f64, min..max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .x_labels(slots)
            .x_label_formatter(&label_for)
            .draw()
            .map_err(|e| e.to_string())?;

        for (di, dataset) in data.datasets.iter().enumerate() {
            let color = dataset
                .border_color
                .as_deref()
                .and_then(to_plot_color)
                .unwrap_or_else(|| self.series_color(di));
            let points: Vec<(f64, f64)> = dataset
                .data
                .iter()
                .enumerate()
                .map(|(i, v)| (i as f64 + 0.5, *v))
                .collect();

            if dataset.fill.unwrap_or(false) {
                chart
                    .draw_series(AreaSeries::new(points.clone(), 0.0, color.mix(0.2).filled()))
                    .map_err(|e| e.to_string())?;
            }
            chart
                .draw_series(LineSeries::new(points, color.stroke_width(2)))
                .map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    /// Pie slices from the first dataset; `hole` is the inner radius as a
    /// fraction of the outer one (0 for a pie).
    fn draw_pie(&self, area: &Area<'_>, data: &ChartData, hole: f64) -> DrawResult {
        let Some(dataset) = data.datasets.first() else {
            return Ok(());
        };
        let values: Vec<f64> = dataset.data.iter().map(|v| v.max(0.0)).collect();
        let total: f64 = values.iter().sum();
        if total <= 0.0 {
            return Ok(());
        }

        let (w, h) = area.dim_in_pixel();
        let center = (f64::from(w) / 2.0, f64::from(h) / 2.0);
        let outer = f64::from(w.min(h)) * 0.4;
        let inner = outer * hole;

        let mut start = -PI / 2.0;
        for (i, value) in values.iter().enumerate() {
            let sweep = value / total * 2.0 * PI;
            if sweep <= 0.0 {
                continue;
            }
            let color = dataset
                .background_color
                .as_ref()
                .and_then(|c| c.at(i))
                .and_then(to_plot_color)
                .unwrap_or_else(|| self.series_color(i));
            let points = slice_outline(center, outer, inner, start, start + sweep);
            area.draw(&Polygon::new(points, color.filled()))
                .map_err(|e| e.to_string())?;
            start += sweep;
        }
        Ok(())
    }

    fn series_color(&self, index: usize) -> RGBColor {
        let c = &self.theme.colors;
        let palette = [
            c.primary, c.success, c.warning, c.danger, c.secondary, EXTRA_COLORS[0],
            EXTRA_COLORS[1], EXTRA_COLORS[2], EXTRA_COLORS[3],
        ];
        to_plot_color(palette[index % palette.len()]).unwrap_or(BLACK)
    }
}

/// Render `options.chart_data` as a PNG (800×400 unless the options ask for
/// another size).
pub fn generate_chart_image(options: &ExportOptions) -> Result<Vec<u8>> {
    ChartRenderer::for_options(options).render_png(options)
}

fn to_plot_color(hex: &str) -> Option<RGBColor> {
    Rgb::from_hex(hex).map(|Rgb(r, g, b)| RGBColor(r, g, b))
}

fn slot_count(data: &ChartData) -> usize {
    data.datasets
        .iter()
        .map(|d| d.data.len())
        .chain(std::iter::once(data.labels.len()))
        .max()
        .unwrap_or(0)
        .max(1)
}

/// Y range covering every value and zero, with headroom.
fn value_range(data: &ChartData) -> (f64, f64) {
    let values = data
        .datasets
        .iter()
        .flat_map(|d| d.data.iter().copied())
        .filter(|v| v.is_finite());
    let (min, max) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let max = if max <= 0.0 && min >= 0.0 { 1.0 } else { max * 1.1 };
    (min * 1.1, max)
}

fn slice_outline(
    center: (f64, f64),
    outer: f64,
    inner: f64,
    start: f64,
    end: f64,
) -> Vec<(i32, i32)> {
    let steps = (((end - start) / (PI / 180.0)).ceil() as usize).max(1);
    let at = |radius: f64, angle: f64| {
        (
            (center.0 + radius * angle.cos()).round() as i32,
            (center.1 + radius * angle.sin()).round() as i32,
        )
    };

    let mut points = Vec::with_capacity(steps * 2 + 2);
    for s in 0..=steps {
        points.push(at(outer, start + (end - start) * s as f64 / steps as f64));
    }
    if inner > 0.0 {
        for s in (0..=steps).rev() {
            points.push(at(inner, start + (end - start) * s as f64 / steps as f64));
        }
    } else {
        points.push(at(0.0, start));
    }
    points
}
