//! Tick driver tying the integrator, the waypoint tracker and scenarios together.

use crate::error;
use crate::flight::{FlightIntegrator, FlightParameters, FlightSample, VehicleState};
use crate::input::{ControlSource, Controls};
use crate::scenario::{Scenario, ScenarioRun, ScenarioStatus, known_location};
use crate::waypoint::{TrackerConfig, WaypointTracker};

/// Everything that happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Vehicle state after integration.
    pub sample: FlightSample,
    /// Waypoints entered on this tick.
    pub reached: Vec<String>,
    /// Scenario status after this tick, when a scenario is loaded.
    pub status: Option<ScenarioStatus>,
}

/// Owns one flight integrator and one waypoint tracker and drives them per tick.
#[derive(Debug, Clone)]
pub struct FlightSession {
    integrator: FlightIntegrator,
    tracker: WaypointTracker,
    scenario: Option<ScenarioRun>,
    elapsed: f64,
}

impl FlightSession {
    /// Create a session with the vehicle at `start`.
    pub fn new(
        params: FlightParameters,
        tracker: TrackerConfig,
        start: VehicleState,
    ) -> error::Result<Self> {
        Ok(Self {
            integrator: FlightIntegrator::new(params, start)?,
            tracker: WaypointTracker::new(tracker)?,
            scenario: None,
            elapsed: 0.0,
        })
    }

    /// The flight integrator.
    #[must_use]
    pub fn integrator(&self) -> &FlightIntegrator {
        &self.integrator
    }

    /// Mutable access to the integrator, e.g. for halting or manual steering.
    pub fn integrator_mut(&mut self) -> &mut FlightIntegrator {
        &mut self.integrator
    }

    /// The waypoint tracker.
    #[must_use]
    pub fn tracker(&self) -> &WaypointTracker {
        &self.tracker
    }

    /// Mutable access to the tracker, e.g. for adding free-flight waypoints.
    pub fn tracker_mut(&mut self) -> &mut WaypointTracker {
        &mut self.tracker
    }

    /// The loaded scenario run, if any.
    #[must_use]
    pub fn scenario(&self) -> Option<&ScenarioRun> {
        self.scenario.as_ref()
    }

    /// Total seconds integrated by this session.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Load a scenario: move to its start, replace the waypoints and resume flight.
    pub fn start_scenario(&mut self, scenario: Scenario) -> error::Result<()> {
        let run = ScenarioRun::new(scenario)?;
        self.apply_scenario(run.scenario());
        self.scenario = Some(run);
        Ok(())
    }

    /// Restart the loaded scenario from its start position.
    ///
    /// Returns false when no scenario is loaded.
    pub fn restart_scenario(&mut self) -> bool {
        let Some(mut run) = self.scenario.take() else {
            return false;
        };
        run.restart();
        self.apply_scenario(run.scenario());
        self.scenario = Some(run);
        true
    }

    /// Unload the scenario and its waypoints, returning the finished run.
    pub fn end_scenario(&mut self) -> Option<ScenarioRun> {
        let run = self.scenario.take()?;
        self.tracker.clear_waypoints();
        tracing::info!(name = %run.scenario().name, status = %run.status(), "Scenario ended");
        Some(run)
    }

    /// Jump to a named known location. Returns false for unknown names.
    pub fn go_to_location(&mut self, name: &str) -> bool {
        let Some(location) = known_location(name) else {
            tracing::warn!(name, "Unknown location");
            return false;
        };
        self.integrator
            .reset_position(location.lon, location.lat, location.alt);
        tracing::info!(name, "Jumped to location");
        true
    }

    /// Run one tick with controls pulled from `source`.
    pub fn tick_from(&mut self, source: &mut impl ControlSource, dt: f64) -> TickReport {
        let controls = source.sample(dt);
        self.tick(controls, dt)
    }

    /// Run one tick: integrate, check waypoints, then update the scenario.
    pub fn tick(&mut self, controls: Controls, dt: f64) -> TickReport {
        let sample = self.integrator.advance_controls(controls, dt);
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }

        let reached = self.tracker.tick(sample.state.position());
        let all_reached = self.tracker.all_reached();
        let status = self
            .scenario
            .as_mut()
            .map(|run| run.update(dt, all_reached).clone());

        TickReport {
            sample,
            reached,
            status,
        }
    }

    fn apply_scenario(&mut self, scenario: &Scenario) {
        self.integrator
            .reset_position(scenario.start.lon, scenario.start.lat, scenario.start.alt);
        self.integrator.set_flying(true);
        self.tracker.clear_waypoints();
        for waypoint in &scenario.waypoints {
            self.tracker.push(waypoint.clone());
        }
    }
}
