//! Inline HTML preview.
//!
//! The document is self-contained: styles are inlined from the active theme
//! and the optional chart is embedded as a base64 PNG data URI. Every piece
//! of caller-supplied text passes through [`html_escape`].

use crate::chart::ChartRenderer;
use crate::error::{ExportError, Result};
use crate::options::ExportOptions;
use crate::response::{ExportResponse, ResponseSink};
use crate::theme::Theme;
use crate::value::ExportRow;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tracing::{debug, error, info};

pub const CONTENT_TYPE: &str = "text/html";

/// Render the preview document.
pub fn render_preview(rows: &[ExportRow], options: &ExportOptions) -> Result<ExportResponse> {
    let theme = options.theme();
    debug!(rows = rows.len(), theme = theme.name, "Rendering preview");

    let html = build_html(rows, options, theme).map_err(|e| {
        error!(error = %e, "Error generating preview");
        e
    })?;

    info!(bytes = html.len(), rows = rows.len(), "Preview generated");
    Ok(ExportResponse::inline(CONTENT_TYPE, html.into_bytes()))
}

/// Render the preview and hand it to `sink`.
pub fn generate_preview<S: ResponseSink + ?Sized>(
    rows: &[ExportRow],
    options: &ExportOptions,
    sink: &mut S,
) -> Result<()> {
    sink.send(render_preview(rows, options)?);
    Ok(())
}

fn build_html(rows: &[ExportRow], options: &ExportOptions, theme: &'static Theme) -> Result<String> {
    let specs = options.field_specs();
    let title = options.title.as_deref().unwrap_or("Export Preview");

    let mut body = String::new();
    if let Some(title) = options.title.as_deref() {
        body.push_str(&format!(r#"<div class="title">{}</div>"#, html_escape(title)));
    }
    if let Some(subtitle) = options.subtitle.as_deref() {
        body.push_str(&format!(
            r#"<div class="subtitle">{}</div>"#,
            html_escape(subtitle)
        ));
    }
    if options.wants_chart() {
        body.push_str(&chart_figure(options)?);
    }

    body.push_str("<table><thead><tr>");
    for spec in &specs {
        body.push_str(&format!("<th>{}</th>", html_escape(&spec.path)));
    }
    body.push_str("</tr></thead><tbody>");

    for row in rows {
        body.push_str("<tr>");
        for spec in &specs {
            let value = spec.display(row);
            if spec.is_status() && !value.is_empty() {
                body.push_str(&format!(
                    r#"<td><span class="status" style="color: {}">{}</span></td>"#,
                    theme.status_color(&value),
                    html_escape(&value)
                ));
            } else {
                body.push_str(&format!("<td>{}</td>", html_escape(&value)));
            }
        }
        body.push_str("</tr>");
    }
    body.push_str("</tbody></table>");

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: {body_font}, sans-serif; margin: 20px; color: {text}; background: {background}; }}
table {{ border-collapse: collapse; width: 100%; }}
th, td {{ border: 1px solid {border}; padding: 8px; text-align: left; font-size: {body_size}px; }}
th {{ background-color: {primary}; color: white; font-size: {header_size}px; }}
.title {{ font-size: {title_size}px; text-align: center; margin-bottom: 10px; }}
.subtitle {{ font-size: {subtitle_size}px; text-align: center; margin-bottom: 20px; color: {secondary}; }}
.chart {{ text-align: center; margin-bottom: 20px; }}
.chart img {{ max-width: 100%; }}
</style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = html_escape(title),
        body_font = theme.fonts.body,
        text = theme.colors.dark,
        background = theme.colors.light,
        border = theme.colors.border,
        primary = theme.colors.primary,
        secondary = theme.colors.secondary,
        body_size = theme.sizes.body,
        header_size = theme.sizes.header,
        title_size = theme.sizes.title,
        subtitle_size = theme.sizes.subtitle,
        body = body,
    ))
}

fn chart_figure(options: &ExportOptions) -> Result<String> {
    let png = ChartRenderer::for_options(options).render_png(options).map_err(|e| {
        ExportError::preview(e.describe())
    })?;
    let alt = options.chart_title.as_deref().unwrap_or("Chart");
    Ok(format!(
        r#"<div class="chart"><img alt="{}" src="data:image/png;base64,{}"></div>"#,
        html_escape(alt),
        BASE64.encode(png)
    ))
}

/// Escape text for HTML element content and quoted attribute values.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
