use super::registry::BoundaryRegistry;
use crate::geojson::FeatureCollection;
use crate::model::{LatLng, LatLngBounds};
use serde_json::Value;

#[inline]
pub fn point_in_bounds(p: LatLng, bounds: &LatLngBounds) -> bool {
    bounds.contains(p)
}

/// First region, in registry order, whose rectangle contains the point.
pub fn detect_from_point(registry: &BoundaryRegistry, lat: f64, lng: f64) -> Option<&'static str> {
    let p = LatLng::new(lat, lng);
    registry.iter().find(|d| point_in_bounds(p, &d.bounds)).map(|d| d.id)
}

/// First point with any hit decides; within a point the registry order decides.
pub fn detect_from_coordinates(registry: &BoundaryRegistry, points: &[LatLng]) -> Option<&'static str> {
    points.iter().find_map(|p| detect_from_point(registry, p.lat, p.lng))
}

/// Every region touched by any coordinate of any feature, unique, in discovery order.
pub fn detect_all(registry: &BoundaryRegistry, fc: &FeatureCollection) -> Vec<&'static str> {
    let mut hits: Vec<&'static str> = Vec::new();
    for p in extract_coordinates(fc) {
        for d in registry.iter() {
            if point_in_bounds(p, &d.bounds) && !hits.contains(&d.id) {
                hits.push(d.id);
            }
        }
    }
    hits
}

/// Flattens every position found in the collection's geometries.
pub fn extract_coordinates(fc: &FeatureCollection) -> Vec<LatLng> {
    let mut out = Vec::new();
    for f in &fc.features {
        if let Some(g) = f.geometry.as_ref() {
            collect_geometry(g, &mut out);
        }
    }
    out
}

fn collect_geometry(g: &Value, out: &mut Vec<LatLng>) {
    if let Some(parts) = g.get("geometries").and_then(Value::as_array) {
        for part in parts {
            collect_geometry(part, out);
        }
    } else if let Some(coords) = g.get("coordinates") {
        collect_positions(coords, out);
    }
}

fn collect_positions(v: &Value, out: &mut Vec<LatLng>) {
    let Some(items) = v.as_array() else { return };
    match (items.first().and_then(Value::as_f64), items.get(1).and_then(Value::as_f64)) {
        (Some(lng), Some(lat)) => out.push(LatLng::new(lat, lng)),
        _ => items.iter().for_each(|i| collect_positions(i, out)),
    }
}
