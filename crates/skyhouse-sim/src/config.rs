//! Simulation config file.
//!
//! Every section is optional; missing sections fall back to the defaults.
//!
//! ```json
//! {
//!   "flight": { "base_speed": 50.0, "min_altitude": 100.0, "max_altitude": 2000.0 },
//!   "tracker": { "radius_meters": 1000.0 },
//!   "waypoints": [ { "name": "Liberty", "lat": 40.6892, "lon": -74.0445 } ],
//!   "script": { "segments": [ { "duration": 10.0, "steering": 0.5, "throttle": 1.0 } ] },
//!   "scenarios": []
//! }
//! ```

use std::{fs, path::Path};

use serde::Deserialize;
use skyhouse_flight::{ControlScript, FlightParameters, Scenario, TrackerConfig, Waypoint};

use crate::error::SimError;

/// Contents of a simulation config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Flight tuning.
    pub flight: FlightParameters,
    /// Waypoint capture radius.
    pub tracker: TrackerConfig,
    /// Free-flight waypoints added when no scenario is run.
    pub waypoints: Vec<Waypoint>,
    /// Scripted controls; constant CLI controls are used when absent.
    pub script: Option<ControlScript>,
    /// Extra scenarios selectable with `--scenario`.
    pub scenarios: Vec<Scenario>,
}

impl SimConfig {
    /// Load a config from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| SimError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Find a scenario by name, preferring the config file over built-ins.
    #[must_use]
    pub fn find_scenario(&self, name: &str) -> Option<Scenario> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .or_else(|| skyhouse_flight::scenario::find_builtin(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: SimConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.flight, FlightParameters::default());
        assert_eq!(config.tracker, TrackerConfig::default());
        assert!(config.script.is_none());
    }

    #[test]
    fn test_partial_flight_section() {
        let config: SimConfig =
            serde_json::from_str(r#"{ "flight": { "base_speed": 80.0 } }"#).unwrap();
        assert_eq!(config.flight.base_speed, 80.0);
        assert_eq!(config.flight.max_altitude, 2000.0);
    }

    #[test]
    fn test_find_scenario_prefers_config() {
        let config: SimConfig = serde_json::from_str(
            r#"{ "scenarios": [ { "name": "Tokyo Express", "start": { "lon": 0.0, "lat": 0.0 } } ] }"#,
        )
        .unwrap();
        let scenario = config.find_scenario("Tokyo Express").unwrap();
        assert_eq!(scenario.start.lon, 0.0);
        assert!(config.find_scenario("Night Flight to Paris").is_some());
        assert!(config.find_scenario("nope").is_none());
    }

    #[test]
    fn test_missing_file() {
        let result = SimConfig::load(Path::new("/nonexistent/skyhouse.json"));
        assert!(matches!(result, Err(SimError::Io { .. })));
    }
}
