//! Flight scenarios.
//!
//! A scenario places the vehicle at a start position, loads a set of
//! waypoints and judges the flight against a completion condition and an
//! optional time limit.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error;
use crate::waypoint::Waypoint;

/// Default starting altitude for scenarios and known locations, in meters.
pub const DEFAULT_START_ALTITUDE: f64 = 500.0;

/// Flight time after which an exploration scenario completes, in seconds.
pub const EXPLORE_DURATION_SECS: f64 = 60.0;

/// A geodetic start position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StartPosition {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Altitude in meters.
    #[serde(default = "default_start_altitude")]
    pub alt: f64,
}

fn default_start_altitude() -> f64 {
    DEFAULT_START_ALTITUDE
}

/// Cities the vehicle can jump to directly.
const KNOWN_LOCATIONS: &[(&str, f64, f64)] = &[
    ("NYC", -74.006, 40.7128),
    ("SF", -122.4194, 37.7749),
    ("PARIS", 2.3522, 48.8566),
    ("TOKYO", 139.6917, 35.6895),
    ("LONDON", -0.1276, 51.5074),
    ("SYDNEY", 151.2093, -33.8688),
    ("DUBAI", 55.2708, 25.2048),
    ("RIO", -43.1729, -22.9068),
];

/// Look up a known location by name, ignoring case.
#[must_use]
pub fn known_location(name: &str) -> Option<StartPosition> {
    KNOWN_LOCATIONS
        .iter()
        .find(|(key, _, _)| key.eq_ignore_ascii_case(name))
        .map(|&(_, lon, lat)| StartPosition {
            lon,
            lat,
            alt: DEFAULT_START_ALTITUDE,
        })
}

/// Names of all known locations.
pub fn known_location_names() -> impl Iterator<Item = &'static str> {
    KNOWN_LOCATIONS.iter().map(|(name, _, _)| *name)
}

/// How a scenario is won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionCondition {
    /// Fly freely; completes after [`EXPLORE_DURATION_SECS`].
    #[default]
    Explore,
    /// Reach every waypoint before the time limit.
    Navigate,
    /// Stay airborne until the time limit.
    ///
    /// Running out the clock completes the run, whereas exceeding the time
    /// limit fails the other conditions.
    Survival,
}

/// A scripted flight challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique scenario name.
    pub name: String,
    /// Briefing text.
    #[serde(default)]
    pub description: String,
    /// Where the vehicle starts.
    pub start: StartPosition,
    /// Targets loaded into the waypoint tracker.
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    /// Time limit in seconds, if any.
    #[serde(default)]
    pub time_limit: Option<f64>,
    /// How the scenario is won.
    #[serde(default)]
    pub completion: CompletionCondition,
}

impl Scenario {
    /// Check the scenario for consistency.
    pub fn validate(&self) -> error::Result<()> {
        error::ensure_finite("start.lon", self.start.lon)?;
        error::ensure_finite("start.lat", self.start.lat)?;
        error::ensure_finite("start.alt", self.start.alt)?;
        if let Some(limit) = self.time_limit {
            error::ensure_positive("time_limit", limit)?;
        }
        if self.completion == CompletionCondition::Survival && self.time_limit.is_none() {
            return Err(error::ConfigError::Missing {
                field: "time_limit",
            });
        }
        Ok(())
    }
}

/// The scenarios that ship with the game.
#[must_use]
pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "Calm Skies Over NYC".into(),
            description: "Start in New York and explore the city. Get familiar with the controls."
                .into(),
            start: StartPosition {
                lon: -74.006,
                lat: 40.7128,
                alt: DEFAULT_START_ALTITUDE,
            },
            waypoints: vec![
                Waypoint::new("Statue of Liberty", 40.6892, -74.0445),
                Waypoint::new("Empire State Building", 40.7484, -73.9857),
                Waypoint::new("Central Park", 40.7829, -73.9654),
            ],
            time_limit: None,
            completion: CompletionCondition::Explore,
        },
        Scenario {
            name: "Storm Through the Rockies".into(),
            description:
                "Navigate through turbulent weather over the Rocky Mountains. Keep steady!".into(),
            start: StartPosition {
                lon: -106.0,
                lat: 39.5,
                alt: 1200.0,
            },
            waypoints: vec![
                Waypoint::new("Aspen", 39.1911, -106.8175),
                Waypoint::new("Vail", 39.6403, -106.3742),
                Waypoint::new("Denver", 39.7392, -104.9903),
            ],
            time_limit: Some(300.0),
            completion: CompletionCondition::Survival,
        },
        Scenario {
            name: "Night Flight to Paris".into(),
            description: "A serene evening journey across the Atlantic to the City of Light."
                .into(),
            start: StartPosition {
                lon: -74.006,
                lat: 40.7128,
                alt: DEFAULT_START_ALTITUDE,
            },
            waypoints: vec![
                Waypoint::new("Atlantic Ocean", 45.0, -40.0),
                Waypoint::new("English Channel", 50.2, -1.0),
                Waypoint::new("Paris", 48.8566, 2.3522),
            ],
            time_limit: Some(600.0),
            completion: CompletionCondition::Explore,
        },
        Scenario {
            name: "Tokyo Express".into(),
            description:
                "High speed flight through Japanese mountains and cities. Test your reflexes!"
                    .into(),
            start: StartPosition {
                lon: 139.0,
                lat: 35.5,
                alt: 300.0,
            },
            waypoints: vec![
                Waypoint::new("Mt Fuji", 35.3606, 138.7274),
                Waypoint::new("Tokyo Tower", 35.6586, 139.7454),
                Waypoint::new("Shibuya", 35.6595, 139.7005),
            ],
            time_limit: Some(180.0),
            completion: CompletionCondition::Navigate,
        },
    ]
}

/// Look up a built-in scenario by exact name.
#[must_use]
pub fn find_builtin(name: &str) -> Option<Scenario> {
    builtin_scenarios().into_iter().find(|s| s.name == name)
}

/// Progress of a scenario run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Still in progress.
    Active,
    /// Won.
    Completed,
    /// Lost, with the reason.
    Failed(String),
}

impl ScenarioStatus {
    /// Whether the run has finished, either way.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "mission completed"),
            Self::Failed(reason) => write!(f, "mission failed: {reason}"),
        }
    }
}

/// Timing and outcome of one attempt at a scenario.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    scenario: Scenario,
    elapsed: f64,
    status: ScenarioStatus,
}

impl ScenarioRun {
    /// Begin a run of `scenario`.
    pub fn new(scenario: Scenario) -> error::Result<Self> {
        scenario.validate()?;
        tracing::info!(name = %scenario.name, "Scenario started");
        Ok(Self {
            scenario,
            elapsed: 0.0,
            status: ScenarioStatus::Active,
        })
    }

    /// The scenario being run.
    #[must_use]
    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    /// Seconds elapsed since the run started.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> &ScenarioStatus {
        &self.status
    }

    /// Seconds left before the time limit, if there is one.
    #[must_use]
    pub fn remaining(&self) -> Option<f64> {
        self.scenario
            .time_limit
            .map(|limit| (limit - self.elapsed).max(0.0))
    }

    /// Start the run over from zero.
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
        self.status = ScenarioStatus::Active;
        tracing::info!(name = %self.scenario.name, "Scenario restarted");
    }

    /// Advance the clock and re-evaluate the outcome.
    ///
    /// `all_waypoints_reached` reports the tracker state after this tick.
    /// Finished runs are not updated further.
    pub fn update(&mut self, dt: f64, all_waypoints_reached: bool) -> &ScenarioStatus {
        if self.status.is_finished() {
            return &self.status;
        }
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }

        let out_of_time = self
            .scenario
            .time_limit
            .is_some_and(|limit| self.elapsed > limit);

        let status = match self.scenario.completion {
            CompletionCondition::Survival if out_of_time => ScenarioStatus::Completed,
            _ if out_of_time => ScenarioStatus::Failed("time limit reached".into()),
            CompletionCondition::Explore if self.elapsed > EXPLORE_DURATION_SECS => {
                ScenarioStatus::Completed
            }
            CompletionCondition::Navigate if all_waypoints_reached => ScenarioStatus::Completed,
            _ => ScenarioStatus::Active,
        };

        if status.is_finished() {
            tracing::info!(name = %self.scenario.name, elapsed = self.elapsed, %status, "Scenario finished");
        }
        self.status = status;
        &self.status
    }
}
