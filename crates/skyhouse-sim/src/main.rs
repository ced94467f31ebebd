//! Headless flight driver for the flying house.
//!
//! Flies the house for a fixed amount of simulated time using either constant
//! controls from the command line or a control script from a config file,
//! reports waypoints as they are reached, and optionally writes a CSV track.
//!
//! Run with: cargo run -p skyhouse-sim -- --scenario "Tokyo Express" --telemetry track.csv

mod config;
mod error;
mod launch_params;
mod telemetry;

use std::process::ExitCode;

use skyhouse_flight::{
    ControlScript, ControlSource, Controls, FlightSession, VehicleState, geo, scenario,
};
use web_time::Instant;

use config::SimConfig;
use error::SimError;
use launch_params::LaunchParams;
use telemetry::{FileTelemetry, TelemetrySnapshot};

/// Upper bound on simulated ticks, to keep a typo in `--dt` from spinning forever.
const MAX_TICKS: u64 = 10_000_000;

/// Where the controls for each tick come from.
enum Driver {
    Script(ControlScript),
    Constant(Controls),
}

impl ControlSource for Driver {
    fn sample(&mut self, dt: f64) -> Controls {
        match self {
            Driver::Script(script) => script.sample(dt),
            Driver::Constant(controls) => controls.sample(dt),
        }
    }
}

fn main() -> ExitCode {
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    let params = launch_params::parse();
    if params.list {
        print_catalog();
        return ExitCode::SUCCESS;
    }

    match run(&params) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn print_catalog() {
    println!("Scenarios:");
    for scenario in scenario::builtin_scenarios() {
        println!("  {} - {}", scenario.name, scenario.description);
    }
    println!("Locations:");
    for name in scenario::known_location_names() {
        println!("  {name}");
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn run(params: &LaunchParams) -> Result<(), SimError> {
    let config = match &params.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    let mut session = FlightSession::new(
        config.flight,
        config.tracker,
        VehicleState::at(params.lon, params.lat, params.altitude),
    )?;

    if let Some(name) = &params.location {
        if !session.go_to_location(name) {
            return Err(SimError::UnknownLocation(name.clone()));
        }
    }

    match &params.scenario {
        Some(name) => {
            let scenario = config
                .find_scenario(name)
                .ok_or_else(|| SimError::UnknownScenario(name.clone()))?;
            session.start_scenario(scenario)?;
        }
        None => {
            for waypoint in &config.waypoints {
                session.tracker_mut().push(waypoint.clone());
            }
        }
    }

    let mut driver = match config.script {
        Some(script) => Driver::Script(script),
        None => Driver::Constant(Controls::new(params.steering, params.throttle)),
    };

    let mut telemetry = params
        .telemetry
        .as_deref()
        .map(FileTelemetry::create)
        .transpose()?;

    let dt = params.dt;
    let ticks = if dt.is_finite() && dt > 0.0 && params.duration.is_finite() {
        ((params.duration.max(0.0) / dt).ceil() as u64).min(MAX_TICKS)
    } else {
        0
    };

    let start = *session.integrator().state();
    tracing::info!(
        lon = start.longitude,
        lat = start.latitude,
        alt = start.altitude,
        ticks,
        dt,
        waypoints = session.tracker().len(),
        "Starting flight"
    );

    let wall_clock = Instant::now();
    let mut distance = 0.0;
    for _ in 0..ticks {
        let controls = driver.sample(dt);
        let report = session.tick(controls, dt);
        distance += report.sample.state.velocity.length();

        for name in &report.reached {
            tracing::info!(name = %name, elapsed = session.elapsed(), "Waypoint reached");
        }

        if let Some(out) = telemetry.as_mut() {
            let snapshot = TelemetrySnapshot {
                elapsed: session.elapsed(),
                dt,
                controls,
                report: &report,
            };
            out.emit(&snapshot).map_err(|source| SimError::Io {
                path: params.telemetry.clone().unwrap_or_default(),
                source,
            })?;
        }

        if report.status.as_ref().is_some_and(|s| s.is_finished()) {
            break;
        }
    }

    if let Some(out) = telemetry {
        out.finish().map_err(|source| SimError::Io {
            path: params.telemetry.clone().unwrap_or_default(),
            source,
        })?;
    }

    let end = session.integrator().state();
    tracing::info!(
        lon = end.longitude,
        lat = end.latitude,
        alt = end.altitude,
        heading = end.heading,
        distance_km = distance / 1000.0,
        reached = session.tracker().reached_count(),
        waypoints = session.tracker().len(),
        elapsed = session.elapsed(),
        wall_ms = wall_clock.elapsed().as_secs_f64() * 1000.0,
        "Flight finished"
    );

    if let Some((waypoint, meters)) = session.tracker().nearest_pending(end.position()) {
        tracing::info!(
            name = %waypoint.name,
            km = meters / 1000.0,
            bearing = geo::initial_bearing(end.position(), waypoint.location),
            "Nearest pending waypoint"
        );
    }
    if let Some(run) = session.scenario() {
        tracing::info!(name = %run.scenario().name, status = %run.status(), "Scenario result");
    }

    Ok(())
}
