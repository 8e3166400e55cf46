// Centralized tolerances for coordinate comparison

pub const EPS_COORD: f64 = 1e-9;          // degrees; vertex coincidence

// Circle display ring resolution
pub const CIRCLE_SEGMENTS: usize = 64;

#[inline] pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool { (a - b).abs() <= eps }
#[inline] pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 { x.max(lo).min(hi) }
