use mapdraw::geometry::limits;
use mapdraw::{DrawConfig, DrawManager, FeatureCollection, HeadlessSurface};
use serde_json::json;

fn import(v: serde_json::Value) -> mapdraw::ImportReport {
    let mut surface = HeadlessSurface::default();
    let mut dm = DrawManager::new(DrawConfig::default());
    dm.import(&mut surface, &FeatureCollection::from_json_value(v).unwrap(), false)
}

fn circle(lat: f64, lng: f64, radius: f64) -> serde_json::Value {
    json!({"type": "Feature", "geometry": null, "properties": {"shapeKind": "circle", "center": [lat, lng], "radius": radius}})
}

#[test]
fn feature_cap_truncates_import() {
    let features: Vec<_> = (0..limits::MAX_FEATURES + 3).map(|_| circle(0.0, 0.0, 10.0)).collect();
    let report = import(json!({"type": "FeatureCollection", "features": features}));
    assert_eq!(report.imported, limits::MAX_FEATURES);
    assert_eq!(report.skipped, 3);
}

#[test]
fn out_of_range_numbers_are_skipped() {
    let report = import(json!({"type": "FeatureCollection", "features": [
        circle(91.0, 0.0, 10.0),
        circle(0.0, -181.0, 10.0),
        circle(0.0, 0.0, 0.0),
        circle(0.0, 0.0, limits::MAX_RADIUS_M * 2.0),
        circle(0.0, 0.0, 10.0),
    ]}));
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 4);
}

#[test]
fn overlong_ring_is_skipped() {
    let ring: Vec<_> = (0..=limits::MAX_RING_VERTICES + 1)
        .map(|i| {
            let a = i as f64 / (limits::MAX_RING_VERTICES + 1) as f64 * std::f64::consts::TAU;
            json!([a.cos(), a.sin()])
        })
        .collect();
    let report = import(json!({"type": "FeatureCollection", "features": [
        {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [ring]}, "properties": {}}
    ]}));
    assert_eq!(report.imported, 0);
    assert_eq!(report.skipped, 1);
}

#[test]
fn not_a_collection_is_an_error() {
    assert!(FeatureCollection::from_json_value(json!({"type": "Feature"})).is_err());
    assert!(FeatureCollection::from_json_str("[1, 2]").is_err());
}
