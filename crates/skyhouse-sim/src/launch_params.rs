//! Launch parameter parsing for the simulator.

use std::path::PathBuf;

use clap::Parser;

/// Default starting latitude (NYC).
const DEFAULT_LAT: f64 = 40.7128;
/// Default starting longitude (NYC).
const DEFAULT_LON: f64 = -74.006;
/// Default starting altitude in meters.
const DEFAULT_ALTITUDE: f64 = 500.0;
/// Default simulated time in seconds.
const DEFAULT_DURATION: f64 = 60.0;
/// Default fixed timestep (60 Hz).
const DEFAULT_DT: f64 = 1.0 / 60.0;

/// Launch parameters for a headless flight.
#[derive(Parser, Debug, Clone)]
#[command(about = "Headless flight driver for the flying house")]
pub struct LaunchParams {
    /// Starting latitude in degrees.
    #[arg(long, default_value_t = DEFAULT_LAT, allow_negative_numbers = true)]
    pub lat: f64,

    /// Starting longitude in degrees.
    #[arg(long, default_value_t = DEFAULT_LON, allow_negative_numbers = true)]
    pub lon: f64,

    /// Starting altitude in meters.
    #[arg(long, default_value_t = DEFAULT_ALTITUDE)]
    pub altitude: f64,

    /// Start at a known location instead (NYC, SF, PARIS, TOKYO, ...).
    #[arg(long)]
    pub location: Option<String>,

    /// Run a scenario by name (built-in or from the config file).
    #[arg(long)]
    pub scenario: Option<String>,

    /// JSON config file with flight parameters, waypoints and a control script.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Simulated time in seconds.
    #[arg(long, default_value_t = DEFAULT_DURATION)]
    pub duration: f64,

    /// Fixed timestep in seconds.
    #[arg(long, default_value_t = DEFAULT_DT)]
    pub dt: f64,

    /// Constant steering when no control script is configured.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub steering: f64,

    /// Constant throttle when no control script is configured.
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub throttle: f64,

    /// Write a CSV flight track to this path.
    #[arg(long)]
    pub telemetry: Option<PathBuf>,

    /// List built-in scenarios and known locations, then exit.
    #[arg(long)]
    pub list: bool,
}

/// Parse launch parameters from the command line.
pub fn parse() -> LaunchParams {
    LaunchParams::parse()
}
