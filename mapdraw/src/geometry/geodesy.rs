use crate::model::{LatLng, LatLngBounds};

/// WGS84 equatorial radius, the sphere used by the drawing tools.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Spherical polygon area in square meters for an open or closed ring.
pub fn geodesic_area(ring: &[LatLng]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let p1 = ring[i];
        let p2 = ring[(i + 1) % n];
        area += (p2.lng - p1.lng).to_radians()
            * (2.0 + p1.lat.to_radians().sin() + p2.lat.to_radians().sin());
    }
    (area * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs()
}

/// Destination point from `origin` after `distance` meters along `bearing` radians.
pub fn destination(origin: LatLng, bearing: f64, distance: f64) -> LatLng {
    let delta = distance / EARTH_RADIUS_M;
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lng.to_radians();
    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * bearing.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let lambda2 = lambda1
        + (bearing.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * sin_phi2);
    LatLng::new(phi2.to_degrees(), lambda2.to_degrees())
}

/// Open ring approximating a circle, counter-clockwise from north.
pub fn circle_ring(center: LatLng, radius: f64, segments: usize) -> Vec<LatLng> {
    let n = segments.max(3);
    (0..n)
        .map(|k| {
            let bearing = -std::f64::consts::TAU * k as f64 / n as f64;
            destination(center, bearing, radius)
        })
        .collect()
}

pub fn circle_bounds(center: LatLng, radius: f64) -> LatLngBounds {
    let delta = radius / EARTH_RADIUS_M;
    let dlat = delta.to_degrees();
    let cos_lat = center.lat.to_radians().cos().abs();
    let dlng = if cos_lat <= delta.sin() {
        180.0
    } else {
        (delta.sin() / cos_lat).asin().to_degrees()
    };
    LatLngBounds::new(
        LatLng::new(center.lat - dlat, center.lng - dlng),
        LatLng::new(center.lat + dlat, center.lng + dlng),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_of_small_square_near_equator() {
        // ~0.01 deg square ≈ 1113 m per side
        let ring = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.01, 0.0),
            LatLng::new(0.01, 0.01),
            LatLng::new(0.0, 0.01),
        ];
        let a = geodesic_area(&ring);
        assert!((a - 1_239_000.0).abs() < 5_000.0, "area {a}");
    }

    #[test]
    fn degenerate_rings_have_no_area() {
        assert_eq!(geodesic_area(&[]), 0.0);
        assert_eq!(geodesic_area(&[LatLng::new(1.0, 1.0), LatLng::new(2.0, 2.0)]), 0.0);
    }

    #[test]
    fn circle_ring_stays_on_radius() {
        let c = LatLng::new(-15.0, -47.0);
        let ring = circle_ring(c, 500.0, 16);
        assert_eq!(ring.len(), 16);
        let b = circle_bounds(c, 500.0);
        for p in &ring {
            assert!(p.lat >= b.south_west.lat - 1e-9 && p.lat <= b.north_east.lat + 1e-9);
            assert!(p.lng >= b.south_west.lng - 1e-9 && p.lng <= b.north_east.lng + 1e-9);
        }
    }
}
