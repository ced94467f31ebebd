//! Waypoint proximity tracking.
//!
//! Each tick the tracker measures the great-circle distance from the vehicle
//! to every pending waypoint and reports the ones it has entered. A waypoint
//! name is reported at most once until the tracker is cleared, so reward
//! consumers are never credited twice.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error;
use crate::geo::GeoPoint;

/// Default capture radius around a waypoint, in meters.
pub const DEFAULT_WAYPOINT_RADIUS_METERS: f64 = 1000.0;

/// Waypoint tracker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Distance at or below which a waypoint counts as reached, in meters.
    pub radius_meters: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_WAYPOINT_RADIUS_METERS,
        }
    }
}

/// A named geographic target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Name used to attribute the reached signal.
    pub name: String,
    /// Location of the target.
    #[serde(flatten)]
    pub location: GeoPoint,
}

impl Waypoint {
    /// Create a waypoint at the given latitude and longitude.
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            location: GeoPoint::new(lat, lon),
        }
    }
}

/// Detects when the vehicle first comes within range of each waypoint.
///
/// Names are expected to be unique. Duplicates are accepted, but since the
/// reached state is keyed by name, only the first waypoint entered under a
/// given name produces a signal.
#[derive(Debug, Clone)]
pub struct WaypointTracker {
    radius_meters: f64,
    waypoints: Vec<Waypoint>,
    reached: HashSet<String>,
}

impl Default for WaypointTracker {
    fn default() -> Self {
        Self {
            radius_meters: DEFAULT_WAYPOINT_RADIUS_METERS,
            waypoints: Vec::new(),
            reached: HashSet::new(),
        }
    }
}

impl WaypointTracker {
    /// Create an empty tracker.
    pub fn new(config: TrackerConfig) -> error::Result<Self> {
        let radius_meters = error::ensure_positive("radius_meters", config.radius_meters)?;
        Ok(Self {
            radius_meters,
            ..Self::default()
        })
    }

    /// Capture radius in meters.
    #[must_use]
    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// Add a waypoint. Name uniqueness is up to the caller.
    pub fn add_waypoint(&mut self, name: impl Into<String>, lat: f64, lon: f64) {
        self.push(Waypoint::new(name, lat, lon));
    }

    /// Add an already-built waypoint.
    pub fn push(&mut self, waypoint: Waypoint) {
        if !waypoint.location.is_finite() {
            tracing::warn!(name = %waypoint.name, "Waypoint has non-finite coordinates and can never be reached");
        }
        self.waypoints.push(waypoint);
    }

    /// Remove every waypoint and forget which ones were reached.
    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
        self.reached.clear();
    }

    /// All waypoints in insertion order.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether no waypoints are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Whether the named waypoint has been reached.
    #[must_use]
    pub fn is_reached(&self, name: &str) -> bool {
        self.reached.contains(name)
    }

    /// Number of distinct names reached so far.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.reached.len()
    }

    /// Whether every waypoint has been reached. False when empty.
    #[must_use]
    pub fn all_reached(&self) -> bool {
        !self.waypoints.is_empty() && self.waypoints.iter().all(|w| self.is_reached(&w.name))
    }

    /// Waypoints that have not been reached yet.
    pub fn pending(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter().filter(|w| !self.is_reached(&w.name))
    }

    /// Closest pending waypoint and its distance in meters.
    #[must_use]
    pub fn nearest_pending(&self, position: GeoPoint) -> Option<(&Waypoint, f64)> {
        self.pending()
            .map(|w| (w, position.distance_to(w.location)))
            .filter(|(_, d)| !d.is_nan())
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }

    /// Check the vehicle position against every pending waypoint.
    ///
    /// Returns the names entered on this tick, in insertion order.
    pub fn tick(&mut self, position: GeoPoint) -> Vec<String> {
        let mut newly_reached = Vec::new();
        for waypoint in &self.waypoints {
            if self.reached.contains(&waypoint.name) {
                continue;
            }
            let distance = position.distance_to(waypoint.location);
            if distance <= self.radius_meters {
                tracing::debug!(name = %waypoint.name, distance, "Waypoint reached");
                self.reached.insert(waypoint.name.clone());
                newly_reached.push(waypoint.name.clone());
            }
        }
        newly_reached
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::ConfigError;

    const NYC: GeoPoint = GeoPoint::new(40.7128, -74.006);

    #[test]
    fn test_reached_once() {
        let mut tracker = WaypointTracker::default();
        tracker.add_waypoint("NYC", 40.7128, -74.006);

        assert_eq!(tracker.tick(NYC), vec!["NYC".to_string()]);
        for _ in 0..5 {
            assert!(tracker.tick(NYC).is_empty());
        }
        assert!(tracker.is_reached("NYC"));
        assert!(tracker.all_reached());
    }

    #[test]
    fn test_radius_boundary() {
        let mut tracker = WaypointTracker::new(TrackerConfig {
            radius_meters: 1000.0,
        })
        .unwrap();
        tracker.add_waypoint("north", 0.0, 0.0);

        // About 1113 m away: outside.
        assert!(tracker.tick(GeoPoint::new(0.01, 0.0)).is_empty());
        // About 890 m away: inside.
        assert_eq!(tracker.tick(GeoPoint::new(0.008, 0.0)), vec!["north".to_string()]);
    }

    #[test]
    fn test_multiple_waypoints_in_insertion_order() {
        let mut tracker = WaypointTracker::default();
        tracker.add_waypoint("b", 10.0, 10.0);
        tracker.add_waypoint("a", 10.001, 10.0);
        tracker.add_waypoint("far", 50.0, 50.0);

        let reached = tracker.tick(GeoPoint::new(10.0005, 10.0));
        assert_eq!(reached, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(tracker.reached_count(), 2);
        assert!(!tracker.all_reached());

        let pending: Vec<_> = tracker.pending().map(|w| w.name.as_str()).collect();
        assert_eq!(pending, vec!["far"]);
    }

    #[test]
    fn test_duplicate_names_fire_once() {
        let mut tracker = WaypointTracker::default();
        tracker.add_waypoint("dup", 0.0, 0.0);
        tracker.add_waypoint("dup", 0.0, 0.0001);
        assert_eq!(tracker.tick(GeoPoint::new(0.0, 0.0)), vec!["dup".to_string()]);
        assert!(tracker.tick(GeoPoint::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_clear_allows_reaching_again() {
        let mut tracker = WaypointTracker::default();
        tracker.add_waypoint("NYC", 40.7128, -74.006);
        assert_eq!(tracker.tick(NYC).len(), 1);

        tracker.clear_waypoints();
        assert!(tracker.is_empty());
        assert!(!tracker.is_reached("NYC"));
        assert!(tracker.tick(NYC).is_empty());

        tracker.add_waypoint("NYC", 40.7128, -74.006);
        assert_eq!(tracker.tick(NYC), vec!["NYC".to_string()]);
    }

    #[test]
    fn test_nearest_pending() {
        let mut tracker = WaypointTracker::default();
        assert!(tracker.nearest_pending(NYC).is_none());

        tracker.add_waypoint("paris", 48.8566, 2.3522);
        tracker.add_waypoint("sf", 37.7749, -122.4194);
        let (nearest, distance) = tracker.nearest_pending(NYC).unwrap();
        assert_eq!(nearest.name, "sf");
        assert!(distance > 4_000_000.0 && distance < 4_200_000.0);

        tracker.tick(GeoPoint::new(37.7749, -122.4194));
        let (nearest, _) = tracker.nearest_pending(NYC).unwrap();
        assert_eq!(nearest.name, "paris");
    }

    #[test]
    fn test_non_finite_waypoint_never_reached() {
        let mut tracker = WaypointTracker::default();
        tracker.add_waypoint("nowhere", f64::NAN, 0.0);
        assert!(tracker.tick(GeoPoint::new(0.0, 0.0)).is_empty());
        assert!(tracker.nearest_pending(GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_rejects_bad_radius() {
        assert!(matches!(
            WaypointTracker::new(TrackerConfig { radius_meters: 0.0 }),
            Err(ConfigError::NonPositive { .. })
        ));
        assert!(matches!(
            WaypointTracker::new(TrackerConfig {
                radius_meters: f64::INFINITY
            }),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_waypoint_json_shape() {
        let waypoint: Waypoint =
            serde_json::from_str(r#"{ "name": "Paris", "lat": 48.8566, "lon": 2.3522 }"#).unwrap();
        assert_eq!(waypoint, Waypoint::new("Paris", 48.8566, 2.3522));
    }

    proptest! {
        #[test]
        fn prop_never_reports_twice(
            waypoints in prop::collection::vec((0u8..6, -0.05f64..0.05, -0.05f64..0.05), 1..12),
            path in prop::collection::vec((-0.05f64..0.05, -0.05f64..0.05), 1..64),
        ) {
            let mut tracker = WaypointTracker::default();
            for (id, lat, lon) in &waypoints {
                tracker.add_waypoint(format!("wp{id}"), *lat, *lon);
            }

            let mut seen = HashSet::new();
            for (lat, lon) in path {
                for name in tracker.tick(GeoPoint::new(lat, lon)) {
                    prop_assert!(seen.insert(name));
                }
            }
            prop_assert_eq!(seen.len(), tracker.reached_count());
        }
    }
}
