use crate::geometry::geodesy;
use serde::{Deserialize, Serialize};

/// Geographic coordinate. Serialized as `[lat, lng]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl From<[f64; 2]> for LatLng {
    fn from(v: [f64; 2]) -> Self {
        LatLng { lat: v[0], lng: v[1] }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

/// Axis-aligned lat/lng rectangle. Serialized as `[[minLat, minLng], [maxLat, maxLng]]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[LatLng; 2]", into = "[LatLng; 2]")]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl From<[LatLng; 2]> for LatLngBounds {
    fn from(v: [LatLng; 2]) -> Self {
        LatLngBounds::new(v[0], v[1])
    }
}

impl From<LatLngBounds> for [LatLng; 2] {
    fn from(b: LatLngBounds) -> Self {
        [b.south_west, b.north_east]
    }
}

impl LatLngBounds {
    /// Builds bounds from two opposite corners in any order.
    pub fn new(a: LatLng, b: LatLng) -> Self {
        LatLngBounds {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        let mut it = points.into_iter();
        let first = *it.next()?;
        let mut b = LatLngBounds::new(first, first);
        for p in it {
            b.extend(*p);
        }
        Some(b)
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    /// Inclusive on every edge.
    pub fn contains(&self, p: LatLng) -> bool {
        p.lat >= self.south_west.lat
            && p.lat <= self.north_east.lat
            && p.lng >= self.south_west.lng
            && p.lng <= self.north_east.lng
    }

    pub fn contains_bounds(&self, other: &LatLngBounds) -> bool {
        self.contains(other.south_west) && self.contains(other.north_east)
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            0.5 * (self.south_west.lat + self.north_east.lat),
            0.5 * (self.south_west.lng + self.north_east.lng),
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.north_east.lat - self.south_west.lat
    }

    pub fn lng_span(&self) -> f64 {
        self.north_east.lng - self.south_west.lng
    }

    /// Corner ring in drawing order: SW, NW, NE, SE (not closed).
    pub fn corners(&self) -> [LatLng; 4] {
        [
            self.south_west,
            LatLng::new(self.north_east.lat, self.south_west.lng),
            self.north_east,
            LatLng::new(self.south_west.lat, self.north_east.lng),
        ]
    }
}

/// Opaque identity stamp assigned to every feature placed on the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Polygon,
    Rectangle,
    Circle,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Polygon => "polygon",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
        }
    }

    pub fn parse(s: &str) -> Option<ShapeKind> {
        match s {
            "polygon" => Some(ShapeKind::Polygon),
            "rectangle" => Some(ShapeKind::Rectangle),
            "circle" => Some(ShapeKind::Circle),
            _ => None,
        }
    }
}

/// Drawn geometry. Polygon rings are stored open (no repeated closing vertex).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Polygon { rings: Vec<Vec<LatLng>> },
    Rectangle { bounds: LatLngBounds },
    Circle { center: LatLng, radius: f64 },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Polygon { .. } => ShapeKind::Polygon,
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
            Shape::Circle { .. } => ShapeKind::Circle,
        }
    }

    /// Outer ring vertices; circles yield their center only.
    pub fn outer_ring(&self) -> Vec<LatLng> {
        match self {
            Shape::Polygon { rings } => rings.first().cloned().unwrap_or_default(),
            Shape::Rectangle { bounds } => bounds.corners().to_vec(),
            Shape::Circle { center, .. } => vec![*center],
        }
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        match self {
            Shape::Polygon { rings } => LatLngBounds::from_points(rings.iter().flatten()),
            Shape::Rectangle { bounds } => Some(*bounds),
            Shape::Circle { center, radius } => Some(geodesy::circle_bounds(*center, *radius)),
        }
    }

    /// Point used for region membership: bbox center for areal shapes, center for circles.
    pub fn representative_point(&self) -> Option<LatLng> {
        match self {
            Shape::Circle { center, .. } => Some(*center),
            _ => self.bounds().map(|b| b.center()),
        }
    }

    /// Geodesic area in square meters.
    pub fn area(&self) -> f64 {
        match self {
            Shape::Circle { radius, .. } => std::f64::consts::PI * radius * radius,
            _ => geodesy::geodesic_area(&self.outer_ring()),
        }
    }
}
