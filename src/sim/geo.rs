//! Flat-plane coordinate helpers
//!
//! Coordinates are `(latitude, longitude)` stored in a `DVec2` (`x` = lat,
//! `y` = lng). Distances are plain Euclidean in degree units; no projection.

use glam::DVec2;

use crate::consts::{ORIGIN_LAT, ORIGIN_LNG};

/// A map coordinate: `x` is latitude, `y` is longitude
pub type LatLng = DVec2;

/// Build a coordinate from latitude and longitude
#[inline]
pub fn lat_lng(lat: f64, lng: f64) -> LatLng {
    DVec2::new(lat, lng)
}

/// Default map origin
#[inline]
pub fn origin() -> LatLng {
    lat_lng(ORIGIN_LAT, ORIGIN_LNG)
}

/// Euclidean distance between two coordinates
#[inline]
pub fn proximity(a: LatLng, b: LatLng) -> f64 {
    a.distance(b)
}

/// True when `b` lies strictly closer than `threshold` to `a`
#[inline]
pub fn within(a: LatLng, b: LatLng, threshold: f64) -> bool {
    // Squared compare avoids the sqrt
    a.distance_squared(b) < threshold * threshold
}

/// True when `point` lies inside the axis-aligned box of side `size` centred on `center`
pub fn in_box(center: LatLng, point: LatLng, size: f64) -> bool {
    // Absorbs rounding from adding small offsets to large coordinates
    const EPS: f64 = 1e-9;
    let half = size / 2.0 + EPS;
    let d = (point - center).abs();
    d.x <= half && d.y <= half
}
