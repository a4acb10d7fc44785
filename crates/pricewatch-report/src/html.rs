//! Styled HTML rendering of the filtered price table.
//!
//! The report is a single self-contained document: a fixed column
//! projection, rows sorted by the anchor discount (best deals first,
//! missing values last), promo rows highlighted, currency and percentage
//! formatting, and `-` placeholders for anything that failed row-local
//! parsing upstream.

use std::cmp::Ordering;
use std::fmt::Write as _;
use std::path::Path;

use chrono::NaiveDateTime;
use pricewatch_core::PriceRow;

use crate::ReportError;

const STYLE: &str = "\
caption { caption-side: top; font-family: Segoe UI, Arial, sans-serif; font-size: 10px; text-align: left; padding: 10px; }\n\
table { border-collapse: collapse; }\n\
th { background-color: #8E44AD; color: white; text-align: center; border-bottom: 2px solid #666; font-family: Segoe UI, Arial, sans-serif; font-size: 15px; font-weight: 600; letter-spacing: 0.5px; text-transform: uppercase; padding: 14px 10px; }\n\
td { padding: 8px; text-align: center; border-bottom: 1px solid #ccc; font-family: Segoe UI, Arial, sans-serif; font-size: 15px; font-weight: 600; letter-spacing: 0.5px; }\n\
tr.akcija { background-color: LightBlue; }\n";

const COLUMNS: &[&str] = &[
    "product_name",
    "price",
    "unit",
    "unit_price",
    "anchor_price",
    "price_anchor_diff",
    "is_akcija",
];

/// Renders the report document for the given rows.
///
/// `generated_at` becomes the caption timestamp; passing it in keeps the
/// renderer deterministic for tests.
#[must_use]
pub fn render_report(rows: &[PriceRow], generated_at: NaiveDateTime) -> String {
    let ordered = sort_for_report(rows);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n<table>\n");
    let _ = writeln!(
        html,
        "<caption>UPDATED: {}</caption>",
        generated_at.format("%d.%m.%Y %H:%M")
    );

    html.push_str("<thead>\n<tr>");
    for column in COLUMNS {
        let _ = write!(html, "<th>{}</th>", escape_html(column));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in ordered {
        if row.on_promotion() {
            html.push_str("<tr class=\"akcija\">");
        } else {
            html.push_str("<tr>");
        }
        let _ = write!(
            html,
            "<td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            escape_html(&row.product_name),
            format_eur(row.price),
            escape_html(row.unit.as_deref().unwrap_or("-")),
            format_eur(row.unit_price),
            format_eur(row.anchor_price),
            format_percent(row.price_anchor_diff),
            row.is_akcija,
        );
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</body>\n</html>\n");
    html
}

/// Writes the rendered document, creating parent directories as needed.
///
/// # Errors
///
/// [`ReportError::Io`] on any filesystem failure.
pub fn write_report(path: &Path, html: &str) -> Result<(), ReportError> {
    let io_err = |source: std::io::Error| ReportError::Io {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
    }
    std::fs::write(path, html).map_err(io_err)?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "wrote report");
    Ok(())
}

/// Orders rows by discount ratio ascending; rows without a ratio sort last.
fn sort_for_report(rows: &[PriceRow]) -> Vec<&PriceRow> {
    let mut ordered: Vec<&PriceRow> = rows.iter().collect();
    ordered.sort_by(|a, b| match (a.price_anchor_diff, b.price_anchor_diff) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ordered
}

fn format_eur(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("€{v:.2}"),
        None => "-".to_string(),
    }
}

fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "-".to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
