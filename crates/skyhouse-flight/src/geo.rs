//! Geographic helpers.
//!
//! Uses a spherical Earth approximation throughout. Angles are in degrees at
//! the API boundary and converted to radians internally.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for great-circle distances, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Meters covered by one degree of latitude (and of longitude at the equator).
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Floor for `|cos(latitude)|` when converting east displacement to degrees.
///
/// Keeps the longitude update finite at the poles.
pub const MIN_COS_LATITUDE: f64 = 1e-6;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees.
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Great-circle distance to `other` in meters.
    #[must_use]
    pub fn distance_to(self, other: GeoPoint) -> f64 {
        haversine_distance(self, other)
    }
}

/// Great-circle distance between two points in meters (haversine formula).
///
/// Robust for small separations; antipodal points give `pi * R`.
#[must_use]
pub fn haversine_distance(from: GeoPoint, to: GeoPoint) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let half_lat = (d_lat * 0.5).sin();
    let half_lon = (d_lon * 0.5).sin();
    let a = half_lat * half_lat
        + from.lat.to_radians().cos() * to.lat.to_radians().cos() * half_lon * half_lon;

    // Rounding can push `a` marginally outside [0, 1] near antipodes.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Initial great-circle bearing from `from` towards `to`, in `[0, 360)` degrees.
///
/// 0 is north, increasing clockwise. Returns 0 for coincident points.
#[must_use]
pub fn initial_bearing(from: GeoPoint, to: GeoPoint) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lon = (to.lon - from.lon).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
    if y == 0.0 && x == 0.0 {
        return 0.0;
    }
    wrap_heading(y.atan2(x).to_degrees())
}

/// Normalized position of `value` between `a` and `b`, clamped to `[0, 1]`.
///
/// Returns 0 when the range is empty.
#[must_use]
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if a == b {
        return 0.0;
    }
    ((value - a) / (b - a)).clamp(0.0, 1.0)
}

/// Wrap an angle in degrees into `[0, 360)`.
///
/// Values already in range are returned unchanged.
#[must_use]
pub fn wrap_heading(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Wrap a longitude in degrees into `[-180, 180)`.
///
/// Values already in range are returned unchanged.
#[must_use]
pub fn wrap_longitude(degrees: f64) -> f64 {
    if (-180.0..180.0).contains(&degrees) {
        return degrees;
    }
    wrap_heading(degrees + 180.0) - 180.0
}

/// Move `current` towards `target` by at most `max_delta`.
#[must_use]
pub fn move_towards(current: f64, target: f64, max_delta: f64) -> f64 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + delta.signum() * max_delta
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    const NYC: GeoPoint = GeoPoint::new(40.7128, -74.006);
    const PARIS: GeoPoint = GeoPoint::new(48.8566, 2.3522);

    #[test]
    fn test_haversine_identical_points() {
        assert_eq!(haversine_distance(NYC, NYC), 0.0);
        assert_eq!(haversine_distance(GeoPoint::default(), GeoPoint::default()), 0.0);
    }

    #[test]
    fn test_haversine_antipodal() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let expected = PI * EARTH_RADIUS_METERS;
        assert!((haversine_distance(a, b) - expected).abs() < 1e-3);

        let north = GeoPoint::new(90.0, 0.0);
        let south = GeoPoint::new(-90.0, 0.0);
        assert!((haversine_distance(north, south) - expected).abs() < 1e-3);
    }

    #[test]
    fn test_haversine_nyc_paris() {
        // Roughly 5837 km on a spherical Earth.
        let d = haversine_distance(NYC, PARIS);
        assert!((d - 5_837_000.0).abs() < 10_000.0, "got {d}");
        assert!((d - haversine_distance(PARIS, NYC)).abs() < 1e-6);
        assert_eq!(NYC.distance_to(PARIS), d);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let expected = EARTH_RADIUS_METERS * 1.0_f64.to_radians();
        assert!((haversine_distance(a, b) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_initial_bearing_cardinals() {
        let origin = GeoPoint::new(0.0, 0.0);
        assert!((initial_bearing(origin, GeoPoint::new(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((initial_bearing(origin, GeoPoint::new(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((initial_bearing(origin, GeoPoint::new(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((initial_bearing(origin, GeoPoint::new(0.0, -1.0)) - 270.0).abs() < 1e-9);
        assert_eq!(initial_bearing(NYC, NYC), 0.0);
    }

    #[test]
    fn test_inverse_lerp() {
        assert!((inverse_lerp(100.0, 2000.0, 500.0) - 400.0 / 1900.0).abs() < 1e-15);
        assert_eq!(inverse_lerp(100.0, 2000.0, 50.0), 0.0);
        assert_eq!(inverse_lerp(100.0, 2000.0, 5000.0), 1.0);
        assert_eq!(inverse_lerp(300.0, 300.0, 300.0), 0.0);
    }

    #[test]
    fn test_wrap_heading() {
        assert_eq!(wrap_heading(0.0), 0.0);
        assert_eq!(wrap_heading(359.5), 359.5);
        assert_eq!(wrap_heading(360.0), 0.0);
        assert_eq!(wrap_heading(-90.0), 270.0);
        assert_eq!(wrap_heading(725.0), 5.0);
        assert_eq!(wrap_heading(-1e-20), 0.0);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(-74.006), -74.006);
        assert_eq!(wrap_longitude(180.0), -180.0);
        assert!((wrap_longitude(190.0) - -170.0).abs() < 1e-12);
        assert!((wrap_longitude(-190.0) - 170.0).abs() < 1e-12);
    }

    #[test]
    fn test_move_towards() {
        assert_eq!(move_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_towards(0.0, -1.0, 0.25), -0.25);
        assert_eq!(move_towards(0.9, 1.0, 0.25), 1.0);
        assert_eq!(move_towards(0.5, 0.5, 0.0), 0.5);
    }
}
