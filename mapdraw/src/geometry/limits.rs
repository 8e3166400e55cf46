// Centralized ingestion limits to harden against untrusted input (imports, stored JSON)

// Collection size caps
pub const MAX_FEATURES: usize = 50_000;

// Polygons
pub const MAX_RING_VERTICES: usize = 10_000;
pub const MAX_RINGS_PER_POLYGON: usize = 64;

// Circles
pub const MAX_RADIUS_M: f64 = 20_000_000.0;

// Numeric bounds
pub const LAT_MIN: f64 = -90.0;
pub const LAT_MAX: f64 = 90.0;
pub const LNG_MIN: f64 = -180.0;
pub const LNG_MAX: f64 = 180.0;

#[inline]
pub fn in_lat_bounds(x: f64) -> bool { x.is_finite() && (LAT_MIN..=LAT_MAX).contains(&x) }

#[inline]
pub fn in_lng_bounds(x: f64) -> bool { x.is_finite() && (LNG_MIN..=LNG_MAX).contains(&x) }

#[inline]
pub fn in_radius_bounds(r: f64) -> bool { r.is_finite() && r > 0.0 && r <= MAX_RADIUS_M }
