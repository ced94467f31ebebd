//! Geodetic flight core for the flying house simulator.
//!
//! The house is flown over a spherical Earth by two control scalars:
//! steering turns it, throttle changes its altitude, and altitude sets its
//! speed. This crate integrates those inputs into a latitude/longitude/altitude
//! track and watches that track for named waypoints.
//!
//! Everything here is synchronous and engine-free. A host game loop owns a
//! [`FlightSession`] (or the individual [`FlightIntegrator`] and
//! [`WaypointTracker`]) and calls it once per frame.
//!
//! # Example
//!
//! ```
//! use skyhouse_flight::{Controls, FlightSession, FlightParameters, TrackerConfig, VehicleState};
//!
//! let mut session = FlightSession::new(
//!     FlightParameters::default(),
//!     TrackerConfig::default(),
//!     VehicleState::at(-74.006, 40.7128, 500.0),
//! )?;
//! session.tracker_mut().add_waypoint("NYC", 40.7128, -74.006);
//!
//! let report = session.tick(Controls::new(0.0, 0.0), 1.0 / 60.0);
//! assert_eq!(report.reached, ["NYC"]);
//! # Ok::<(), skyhouse_flight::ConfigError>(())
//! ```

mod error;
pub mod flight;
pub mod geo;
pub mod input;
pub mod scenario;
mod session;
pub mod waypoint;

pub use error::{ConfigError, Result};
pub use flight::{FlightIntegrator, FlightParameters, FlightSample, VehicleState};
pub use geo::GeoPoint;
pub use input::{ControlScript, ControlSegment, ControlSource, Controls, SmoothedControls};
pub use scenario::{CompletionCondition, Scenario, ScenarioRun, ScenarioStatus, StartPosition};
pub use session::{FlightSession, TickReport};
pub use waypoint::{TrackerConfig, Waypoint, WaypointTracker};
