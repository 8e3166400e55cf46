use crate::error::{MapError, Result};
use crate::geometry::{geodesy, limits, tolerance};
use crate::model::{LatLng, LatLngBounds, Shape, ShapeKind};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

pub const DRAW_COLOR_KEY: &str = "drawColor";
pub const SHAPE_KIND_KEY: &str = "shapeKind";
/// Older exports tagged circles under this key.
pub const LEGACY_SHAPE_KIND_KEY: &str = "layerType";
pub const CENTER_KEY: &str = "center";
pub const RADIUS_KEY: &str = "radius";

pub type Properties = Map<String, Value>;

/// Serialized drawing set; the storage and export format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_tag")]
    pub kind: String,
    #[serde(default)]
    pub features: Vec<GeoFeature>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        FeatureCollection::new(Vec::new())
    }
}

impl FeatureCollection {
    pub fn new(features: Vec<GeoFeature>) -> Self {
        FeatureCollection {
            kind: collection_tag(),
            features,
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str::<Self>(s)?.checked()
    }

    pub fn from_json_value(v: Value) -> Result<Self> {
        serde_json::from_value::<Self>(v)?.checked()
    }

    fn checked(self) -> Result<Self> {
        if self.kind == collection_tag() {
            Ok(self)
        } else {
            Err(MapError::malformed(format!("expected a FeatureCollection, got `{}`", self.kind)))
        }
    }

    pub fn to_json_value(&self) -> Value {
        json!({ "type": self.kind, "features": self.features })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoFeature {
    #[serde(rename = "type", default = "feature_tag")]
    pub kind: String,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default, deserialize_with = "nullable_properties")]
    pub properties: Properties,
}

impl GeoFeature {
    pub fn new(geometry: Option<Value>, properties: Properties) -> Self {
        GeoFeature {
            kind: feature_tag(),
            geometry,
            properties,
        }
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Shape tag, falling back to the legacy key.
    pub fn shape_tag(&self) -> Option<&str> {
        self.property_str(SHAPE_KIND_KEY)
            .or_else(|| self.property_str(LEGACY_SHAPE_KIND_KEY))
    }
}

fn collection_tag() -> String {
    "FeatureCollection".to_string()
}

fn feature_tag() -> String {
    "Feature".to_string()
}

fn nullable_properties<'de, D>(d: D) -> std::result::Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Properties>::deserialize(d).map(Option::unwrap_or_default)
}

/// `[lng, lat, ...]` as in the GeoJSON wire format.
pub type Position = Vec<f64>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl Geometry {
    pub fn from_value(v: &Value) -> Result<Geometry> {
        let tag = v.get("type").and_then(Value::as_str).unwrap_or("");
        match serde_json::from_value::<Geometry>(v.clone()) {
            Ok(g) => Ok(g),
            Err(_) if !is_known_type(tag) => Err(MapError::UnsupportedGeometry(tag.to_string())),
            Err(e) => Err(MapError::malformed(format!("{tag} geometry: {e}"))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
            Geometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }
}

fn is_known_type(tag: &str) -> bool {
    matches!(
        tag,
        "Point"
            | "MultiPoint"
            | "LineString"
            | "MultiLineString"
            | "Polygon"
            | "MultiPolygon"
            | "GeometryCollection"
    )
}

fn position_to_latlng(p: &[f64]) -> Result<LatLng> {
    if p.len() < 2 {
        return Err(MapError::malformed("position with fewer than two ordinates"));
    }
    let (lng, lat) = (p[0], p[1]);
    if !limits::in_lat_bounds(lat) || !limits::in_lng_bounds(lng) {
        return Err(MapError::malformed(format!("coordinate out of range: [{lng}, {lat}]")));
    }
    Ok(LatLng::new(lat, lng))
}

fn same_point(a: LatLng, b: LatLng) -> bool {
    tolerance::approx_eq(a.lat, b.lat, tolerance::EPS_COORD)
        && tolerance::approx_eq(a.lng, b.lng, tolerance::EPS_COORD)
}

fn decode_ring(ring: &[Position]) -> Result<Vec<LatLng>> {
    if ring.len() > limits::MAX_RING_VERTICES + 1 {
        return Err(MapError::malformed("ring exceeds vertex cap"));
    }
    let mut pts = ring
        .iter()
        .map(|p| position_to_latlng(p))
        .collect::<Result<Vec<_>>>()?;
    if pts.len() > 1 && same_point(pts[0], pts[pts.len() - 1]) {
        pts.pop();
    }
    if pts.len() < 3 {
        return Err(MapError::malformed("ring needs at least three distinct vertices"));
    }
    Ok(pts)
}

/// Four-vertex axis-aligned ring back to rectangle bounds.
fn ring_as_rectangle(ring: &[LatLng]) -> Option<LatLngBounds> {
    if ring.len() != 4 {
        return None;
    }
    let b = LatLngBounds::from_points(ring)?;
    let on_edge = |p: &LatLng| {
        let lat_edge = tolerance::approx_eq(p.lat, b.south_west.lat, tolerance::EPS_COORD)
            || tolerance::approx_eq(p.lat, b.north_east.lat, tolerance::EPS_COORD);
        let lng_edge = tolerance::approx_eq(p.lng, b.south_west.lng, tolerance::EPS_COORD)
            || tolerance::approx_eq(p.lng, b.north_east.lng, tolerance::EPS_COORD);
        lat_edge && lng_edge
    };
    ring.iter().all(on_edge).then_some(b)
}

fn decode_circle(f: &GeoFeature) -> Result<Shape> {
    let center = f
        .properties
        .get(CENTER_KEY)
        .and_then(Value::as_array)
        .filter(|a| a.len() >= 2)
        .and_then(|a| Some(LatLng::new(a[0].as_f64()?, a[1].as_f64()?)))
        .ok_or_else(|| MapError::malformed("circle without a [lat, lng] center"))?;
    if !limits::in_lat_bounds(center.lat) || !limits::in_lng_bounds(center.lng) {
        return Err(MapError::malformed("circle center out of range"));
    }
    let radius = f
        .properties
        .get(RADIUS_KEY)
        .and_then(Value::as_f64)
        .ok_or_else(|| MapError::malformed("circle without a radius"))?;
    if !limits::in_radius_bounds(radius) {
        return Err(MapError::malformed(format!("circle radius {radius} out of range")));
    }
    Ok(Shape::Circle { center, radius })
}

/// Reconstructs a drawable shape. Circles come from their attribute block,
/// never from the display ring.
pub fn decode_shape(f: &GeoFeature) -> Result<Shape> {
    let tag = f.shape_tag().and_then(ShapeKind::parse);
    if tag == Some(ShapeKind::Circle) {
        return decode_circle(f);
    }
    let geometry = f
        .geometry
        .as_ref()
        .filter(|g| !g.is_null())
        .ok_or_else(|| MapError::malformed("feature without geometry"))?;
    match Geometry::from_value(geometry)? {
        Geometry::Polygon { coordinates } => {
            if coordinates.is_empty() || coordinates.len() > limits::MAX_RINGS_PER_POLYGON {
                return Err(MapError::malformed("polygon ring count out of range"));
            }
            let rings = coordinates
                .iter()
                .map(|r| decode_ring(r))
                .collect::<Result<Vec<_>>>()?;
            if tag == Some(ShapeKind::Rectangle) && rings.len() == 1 {
                if let Some(bounds) = ring_as_rectangle(&rings[0]) {
                    return Ok(Shape::Rectangle { bounds });
                }
            }
            Ok(Shape::Polygon { rings })
        }
        other => Err(MapError::UnsupportedGeometry(other.type_name().to_string())),
    }
}

fn closed_positions(ring: &[LatLng]) -> Vec<[f64; 2]> {
    let mut out: Vec<[f64; 2]> = ring.iter().map(|p| [p.lng, p.lat]).collect();
    if let Some(first) = out.first().copied() {
        out.push(first);
    }
    out
}

/// Geometry plus the shape attribute block that has to travel with it.
pub fn encode_shape(shape: &Shape) -> (Value, Properties) {
    let mut attrs = Properties::new();
    let geometry = match shape {
        Shape::Polygon { rings } => {
            let coords: Vec<Vec<[f64; 2]>> = rings.iter().map(|r| closed_positions(r)).collect();
            json!({ "type": "Polygon", "coordinates": coords })
        }
        Shape::Rectangle { bounds } => {
            attrs.insert(SHAPE_KIND_KEY.into(), json!(ShapeKind::Rectangle.as_str()));
            json!({ "type": "Polygon", "coordinates": [closed_positions(&bounds.corners())] })
        }
        Shape::Circle { center, radius } => {
            attrs.insert(SHAPE_KIND_KEY.into(), json!(ShapeKind::Circle.as_str()));
            attrs.insert(CENTER_KEY.into(), json!([center.lat, center.lng]));
            attrs.insert(RADIUS_KEY.into(), json!(radius));
            let ring = geodesy::circle_ring(*center, *radius, tolerance::CIRCLE_SEGMENTS);
            json!({ "type": "Polygon", "coordinates": [closed_positions(&ring)] })
        }
    };
    (geometry, attrs)
}

/// Keys that `encode_shape` regenerates and that must not leak from stale imports.
pub(crate) fn is_shape_attribute(key: &str) -> bool {
    matches!(
        key,
        SHAPE_KIND_KEY | LEGACY_SHAPE_KIND_KEY | CENTER_KEY | RADIUS_KEY | DRAW_COLOR_KEY
    )
}
