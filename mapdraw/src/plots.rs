//! Conversion between drawing collections and the legacy plot record format.

use crate::color;
use crate::draw::config::DrawConfig;
use crate::geojson::{FeatureCollection, GeoFeature, Geometry, Properties, DRAW_COLOR_KEY};
use crate::geometry::geodesy;
use crate::model::{LatLng, ShapeKind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

pub const CODE_KEY: &str = "code";
pub const HECTARES_KEY: &str = "hectares";
pub const FILL_COLOR_KEY: &str = "fillColor";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotPosition {
    pub order: u32,
    pub code: u32,
    /// Decimal degrees as text, 8 fraction digits.
    pub lat: String,
    pub lng: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotRecord {
    pub code: u32,
    pub description: String,
    #[serde(default)]
    pub hectares: Option<f64>,
    #[serde(default)]
    pub border_color: Option<u32>,
    #[serde(default)]
    pub fill_color: Option<u32>,
    pub positions: Vec<PlotPosition>,
}

pub fn default_description(code: u32, cfg: &DrawConfig) -> String {
    format!("{} {code:04}", cfg.name_label)
}

/// Polygon features become records; circles and other geometries are skipped with a warning.
/// Codes are assigned from `base_code` by feature index.
pub fn collection_to_records(fc: &FeatureCollection, base_code: u32, cfg: &DrawConfig) -> Vec<PlotRecord> {
    fc.features
        .iter()
        .enumerate()
        .filter_map(|(i, f)| feature_to_record(f, base_code.saturating_add(i as u32), cfg))
        .collect()
}

pub fn feature_to_record(f: &GeoFeature, code: u32, cfg: &DrawConfig) -> Option<PlotRecord> {
    // Circles export a polygonal outline but carry no plot vertices of their own.
    if f.shape_tag().and_then(ShapeKind::parse) == Some(ShapeKind::Circle) {
        warn!(code, "skipping circle feature");
        return None;
    }
    let geometry = f.geometry.as_ref().and_then(|g| Geometry::from_value(g).ok());
    let ring = match geometry {
        Some(Geometry::Polygon { coordinates }) => coordinates.into_iter().next().unwrap_or_default(),
        other => {
            let kind = other.as_ref().map(Geometry::type_name).unwrap_or("none");
            warn!(kind, code, "skipping non-polygon feature");
            return None;
        }
    };
    let mut points: Vec<LatLng> = ring
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| LatLng::new(p[1], p[0]))
        .collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    let description = f
        .property_str(&cfg.name_key)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_description(code, cfg));
    let hectares = f
        .properties
        .get(HECTARES_KEY)
        .and_then(Value::as_f64)
        .or_else(|| (points.len() >= 3).then(|| geodesy::geodesic_area(&points) / 10_000.0));
    let border_color = f
        .properties
        .get(DRAW_COLOR_KEY)
        .and_then(|v| v.get("hex"))
        .and_then(Value::as_str)
        .and_then(color::hex_to_rgb)
        .or_else(|| f.properties.get(&cfg.legacy_color_key).and_then(color::packed_rgb));
    let fill_color = f.properties.get(FILL_COLOR_KEY).and_then(color::packed_rgb);

    let positions = points
        .iter()
        .enumerate()
        .map(|(i, p)| PlotPosition {
            order: i as u32 + 1,
            code,
            lat: format!("{:.8}", p.lat),
            lng: format!("{:.8}", p.lng),
        })
        .collect();

    Some(PlotRecord { code, description, hectares, border_color, fill_color, positions })
}

/// Records back to polygon features, ring closed. Records with unreadable positions are skipped.
pub fn records_to_collection(records: &[PlotRecord], cfg: &DrawConfig) -> FeatureCollection {
    let features = records
        .iter()
        .filter_map(|r| {
            let mut sorted: Vec<&PlotPosition> = r.positions.iter().collect();
            sorted.sort_by_key(|p| p.order);
            let coords = sorted
                .iter()
                .map(|p| Some([p.lng.trim().parse::<f64>().ok()?, p.lat.trim().parse::<f64>().ok()?]))
                .collect::<Option<Vec<[f64; 2]>>>();
            let Some(mut coords) = coords else {
                warn!(code = r.code, "skipping plot with unreadable positions");
                return None;
            };
            if let (Some(first), Some(last)) = (coords.first().copied(), coords.last().copied()) {
                if first != last {
                    coords.push(first);
                }
            }
            let mut properties = Properties::new();
            properties.insert(CODE_KEY.into(), json!(r.code));
            properties.insert(cfg.name_key.clone(), json!(r.description));
            if let Some(h) = r.hectares {
                properties.insert(HECTARES_KEY.into(), json!(h));
            }
            if let Some(c) = r.border_color {
                properties.insert(cfg.legacy_color_key.clone(), json!(c));
            }
            if let Some(c) = r.fill_color {
                properties.insert(FILL_COLOR_KEY.into(), json!(c));
            }
            let geometry = json!({ "type": "Polygon", "coordinates": [coords] });
            Some(GeoFeature::new(Some(geometry), properties))
        })
        .collect();
    FeatureCollection::new(features)
}
