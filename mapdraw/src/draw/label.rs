//! Descriptive HTML labels bound to drawn layers. Display only.

use super::config::DrawLocale;
use crate::geometry::geodesy;
use crate::model::{LatLng, Shape};
use std::fmt::Write;

const CONTAINER: &str = "min-width: 220px; max-height: 300px; overflow-y: auto; scrollbar-width: thin;";
const CONTAINER_SMALL: &str = "min-width: 200px;";
const TITLE: &str = "font-size: 12px;";
const RULE: &str = "margin: 8px 0; border: none; border-top: 1px solid currentColor; opacity: 0.2;";
const TABLE: &str = "width: 100%; font-size: 11px;";
const TABLE_SPACED: &str = "width: 100%; font-size: 11px; margin-top: 4px;";
const KEY: &str = "opacity: 0.7;";
const VALUE: &str = "text-align: right; font-weight: 500;";
const SUBTITLE: &str = "font-size: 11px;";

/// Two fraction digits with the locale's separators.
pub fn format_number(value: f64, locale: &DrawLocale) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let mut out = String::with_capacity(digits.len() + 8);
    if value < 0.0 && cents > 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(locale.group_separator);
        }
        out.push(ch);
    }
    out.push(locale.decimal_separator);
    let _ = write!(out, "{:02}", cents % 100);
    out
}

/// Square meters below one hectare, hectares above.
pub fn format_area(square_meters: f64, locale: &DrawLocale) -> String {
    if square_meters >= 10_000.0 {
        format!("{} ha", format_number(square_meters / 10_000.0, locale))
    } else {
        format!("{} m²", format_number(square_meters, locale))
    }
}

pub fn format_distance(meters: f64, locale: &DrawLocale) -> String {
    if meters >= 1_000.0 {
        format!("{} km", format_number(meters / 1_000.0, locale))
    } else {
        format!("{} m", format_number(meters, locale))
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn row(out: &mut String, key: &str, value: &str) {
    let _ = write!(
        out,
        "<tr><td style=\"{KEY}\">{key}:</td><td style=\"{VALUE}\">{value}</td></tr>"
    );
}

fn areal_label(name: Option<&str>, kind: &str, ring: &[LatLng], locale: &DrawLocale) -> String {
    let t = &locale.labels;
    let title = name.map(escape).unwrap_or_else(|| t.area_title.clone());
    let mut out = String::new();
    let _ = write!(out, "<div style=\"{CONTAINER}\"><strong style=\"{TITLE}\">{title}</strong><hr style=\"{RULE}\">");
    let _ = write!(out, "<table style=\"{TABLE}\">");
    row(&mut out, &t.kind, kind);
    row(&mut out, &t.area, &format_area(geodesy::geodesic_area(ring), locale));
    row(&mut out, &t.points, &ring.len().to_string());
    let _ = write!(out, "</table><hr style=\"{RULE}\"><strong style=\"{SUBTITLE}\">{}</strong>", t.coordinates);
    let _ = write!(out, "<table style=\"{TABLE_SPACED}\">");
    for (i, p) in ring.iter().enumerate() {
        row(&mut out, &format!("{} {}", t.point, i + 1), &format!("{:.6}, {:.6}", p.lat, p.lng));
    }
    out.push_str("</table></div>");
    out
}

fn circle_label(name: Option<&str>, center: LatLng, radius: f64, locale: &DrawLocale) -> String {
    let t = &locale.labels;
    let title = name.map(escape).unwrap_or_else(|| t.circle_title.clone());
    let area = std::f64::consts::PI * radius * radius;
    let mut out = String::new();
    let _ = write!(out, "<div style=\"{CONTAINER_SMALL}\"><strong style=\"{TITLE}\">{title}</strong><hr style=\"{RULE}\">");
    let _ = write!(out, "<table style=\"{TABLE}\">");
    row(&mut out, &t.kind, &t.circle);
    row(&mut out, &t.radius, &format_distance(radius, locale));
    row(&mut out, &t.area, &format_area(area, locale));
    row(&mut out, &t.center, &format!("{:.4}, {:.4}", center.lat, center.lng));
    out.push_str("</table></div>");
    out
}

pub fn describe(name: Option<&str>, shape: &Shape, locale: &DrawLocale) -> String {
    match shape {
        Shape::Polygon { .. } => areal_label(name, &locale.labels.polygon, &shape.outer_ring(), locale),
        Shape::Rectangle { .. } => areal_label(name, &locale.labels.rectangle, &shape.outer_ring(), locale),
        Shape::Circle { center, radius } => circle_label(name, *center, *radius, locale),
    }
}
