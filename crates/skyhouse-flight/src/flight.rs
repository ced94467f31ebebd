//! Geodetic flight integration.
//!
//! The integrator advances longitude, latitude, altitude and heading from two
//! control scalars. Speed is a pure function of altitude: the craft flies at
//! half its base speed at the bottom of the altitude band and two and a half
//! times its base speed at the top.
//!
//! Motion is integrated on a local east/north tangent plane each tick and
//! converted back to degrees using a fixed meters-per-degree scale.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{self, ConfigError};
use crate::geo::{
    GeoPoint, METERS_PER_DEGREE, MIN_COS_LATITUDE, inverse_lerp, wrap_heading, wrap_longitude,
};
use crate::input::{ControlSource, Controls, clamp_axis};

/// Bank angle in degrees at full steering deflection.
pub const MAX_BANK_DEGREES: f64 = 30.0;

/// Turn rate multiplier applied to the manual steering fallback.
pub const MANUAL_TURN_SCALE: f64 = 0.5;

/// Speed multiplier at the bottom of the altitude band.
const MIN_SPEED_FACTOR: f64 = 0.5;

/// Additional speed multiplier gained across the full altitude band.
const ALTITUDE_SPEED_GAIN: f64 = 2.0;

/// Tunable flight parameters.
///
/// Validated once by [`FlightIntegrator::new`]; read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightParameters {
    /// Ground speed at the middle of the speed curve, in meters per second.
    pub base_speed: f64,
    /// Lowest allowed altitude in meters.
    pub min_altitude: f64,
    /// Highest allowed altitude in meters.
    pub max_altitude: f64,
    /// Heading change in degrees per second at full steering.
    pub turn_speed: f64,
    /// Altitude change in meters per second at full throttle.
    pub altitude_change_rate: f64,
}

impl Default for FlightParameters {
    fn default() -> Self {
        Self {
            base_speed: 50.0,
            min_altitude: 100.0,
            max_altitude: 2000.0,
            turn_speed: 30.0,
            altitude_change_rate: 100.0,
        }
    }
}

impl FlightParameters {
    /// Check the parameters for consistency.
    pub fn validate(&self) -> error::Result<()> {
        error::ensure_non_negative("base_speed", self.base_speed)?;
        error::ensure_finite("min_altitude", self.min_altitude)?;
        error::ensure_finite("max_altitude", self.max_altitude)?;
        error::ensure_non_negative("turn_speed", self.turn_speed)?;
        error::ensure_non_negative("altitude_change_rate", self.altitude_change_rate)?;
        if self.min_altitude > self.max_altitude {
            return Err(ConfigError::InvalidAltitudeBand {
                min: self.min_altitude,
                max: self.max_altitude,
            });
        }
        Ok(())
    }

    /// Clamp an altitude into the configured band.
    #[must_use]
    pub fn clamp_altitude(&self, altitude: f64) -> f64 {
        altitude.clamp(self.min_altitude, self.max_altitude)
    }

    /// Ground speed in meters per second at the given altitude.
    ///
    /// Monotonically non-decreasing in altitude.
    #[must_use]
    pub fn speed_at_altitude(&self, altitude: f64) -> f64 {
        let altitude_factor = inverse_lerp(self.min_altitude, self.max_altitude, altitude);
        self.base_speed * (MIN_SPEED_FACTOR + altitude_factor * ALTITUDE_SPEED_GAIN)
    }
}

/// Geodetic state of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleState {
    /// Longitude in degrees, kept in `[-180, 180)`.
    pub longitude: f64,
    /// Latitude in degrees, kept in `[-90, 90]`.
    pub latitude: f64,
    /// Altitude in meters, kept inside the altitude band.
    pub altitude: f64,
    /// Heading in degrees, 0 = north, clockwise, kept in `[0, 360)`.
    pub heading: f64,
    /// Pitch in degrees. Set externally, never integrated.
    pub pitch: f64,
    /// East/north ground displacement of the last tick, in meters.
    #[serde(skip)]
    pub velocity: DVec2,
}

impl VehicleState {
    /// Create a state at the given position, heading north.
    #[must_use]
    pub fn at(longitude: f64, latitude: f64, altitude: f64) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
            ..Self::default()
        }
    }

    /// Latitude/longitude of the vehicle.
    #[must_use]
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Output of one integration step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightSample {
    /// The vehicle state after the step.
    pub state: VehicleState,
    /// Visual bank angle in degrees; negative when turning right.
    pub bank: f64,
    /// Ground speed in meters per second at the new altitude.
    pub speed: f64,
}

/// Integrates control inputs into a moving geodetic position.
#[derive(Debug, Clone)]
pub struct FlightIntegrator {
    params: FlightParameters,
    state: VehicleState,
    bank: f64,
    manual_steering: f64,
    flying: bool,
}

impl FlightIntegrator {
    /// Create an integrator starting from `initial`.
    ///
    /// Every component of `initial` must be finite. The altitude is then
    /// clamped into the band, the latitude into `[-90, 90]`, and the
    /// longitude and heading wrapped.
    pub fn new(params: FlightParameters, initial: VehicleState) -> error::Result<Self> {
        params.validate()?;
        let state = VehicleState {
            longitude: wrap_longitude(error::ensure_finite(
                "initial.longitude",
                initial.longitude,
            )?),
            latitude: error::ensure_finite("initial.latitude", initial.latitude)?
                .clamp(-90.0, 90.0),
            altitude: params.clamp_altitude(error::ensure_finite(
                "initial.altitude",
                initial.altitude,
            )?),
            heading: wrap_heading(error::ensure_finite("initial.heading", initial.heading)?),
            pitch: error::ensure_finite("initial.pitch", initial.pitch)?,
            velocity: DVec2::ZERO,
        };
        Ok(Self {
            params,
            state,
            bank: 0.0,
            manual_steering: 0.0,
            flying: true,
        })
    }

    /// The configured flight parameters.
    #[must_use]
    pub fn params(&self) -> &FlightParameters {
        &self.params
    }

    /// The current vehicle state.
    #[must_use]
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    /// The bank angle produced by the last effective step.
    #[must_use]
    pub fn bank(&self) -> f64 {
        self.bank
    }

    /// The current state as a sample, without advancing.
    #[must_use]
    pub fn sample(&self) -> FlightSample {
        FlightSample {
            state: self.state,
            bank: self.bank,
            speed: self.params.speed_at_altitude(self.state.altitude),
        }
    }

    /// Whether [`advance`](Self::advance) currently moves the vehicle.
    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.flying
    }

    /// Halt or resume integration.
    pub fn set_flying(&mut self, flying: bool) {
        if self.flying != flying {
            tracing::debug!(flying, "Flight state changed");
        }
        self.flying = flying;
    }

    /// Set the pitch in degrees. Non-finite values are ignored.
    pub fn set_pitch(&mut self, pitch: f64) {
        if pitch.is_finite() {
            self.state.pitch = pitch;
        }
    }

    /// The persisted manual steering scalar.
    #[must_use]
    pub fn manual_steering(&self) -> f64 {
        self.manual_steering
    }

    /// Store the manual steering scalar used when no steering device is attached.
    pub fn set_manual_steering(&mut self, steering: f64) {
        self.manual_steering = clamp_axis(steering);
    }

    /// Teleport the vehicle and face north.
    ///
    /// Altitude is clamped into the band. Non-finite components are ignored
    /// and the previous value is kept. Pitch is left untouched.
    pub fn reset_position(&mut self, longitude: f64, latitude: f64, altitude: f64) {
        if longitude.is_finite() {
            self.state.longitude = wrap_longitude(longitude);
        } else {
            tracing::warn!(longitude, "Ignoring non-finite longitude in reset");
        }
        if latitude.is_finite() {
            self.state.latitude = latitude.clamp(-90.0, 90.0);
        } else {
            tracing::warn!(latitude, "Ignoring non-finite latitude in reset");
        }
        if altitude.is_finite() {
            self.state.altitude = self.params.clamp_altitude(altitude);
        } else {
            tracing::warn!(altitude, "Ignoring non-finite altitude in reset");
        }
        self.state.heading = 0.0;
        self.state.velocity = DVec2::ZERO;
        self.bank = 0.0;

        tracing::debug!(
            lon = self.state.longitude,
            lat = self.state.latitude,
            alt = self.state.altitude,
            "Position reset"
        );
    }

    /// Advance from a control source sampled for this tick.
    pub fn advance_from(&mut self, source: &mut impl ControlSource, dt: f64) -> FlightSample {
        let controls = source.sample(dt);
        self.advance_controls(controls, dt)
    }

    /// Advance using possibly-missing control channels.
    ///
    /// A missing steering channel falls back to the manual steering scalar at
    /// [`MANUAL_TURN_SCALE`] of the normal turn rate. A missing throttle
    /// channel holds altitude.
    pub fn advance_controls(&mut self, controls: Controls, dt: f64) -> FlightSample {
        let throttle = controls.throttle.unwrap_or(0.0);
        match controls.steering {
            Some(steering) => self.step(steering, 1.0, throttle, dt),
            None => self.step(self.manual_steering, MANUAL_TURN_SCALE, throttle, dt),
        }
    }

    /// Advance the state by `dt` seconds.
    ///
    /// `steering` and `throttle` are clamped into `[-1, 1]`. A zero, negative
    /// or non-finite `dt` leaves the state untouched, as does a halted
    /// integrator.
    pub fn advance(&mut self, steering: f64, throttle: f64, dt: f64) -> FlightSample {
        self.step(steering, 1.0, throttle, dt)
    }

    fn step(&mut self, steering: f64, turn_scale: f64, throttle: f64, dt: f64) -> FlightSample {
        let dt = sanitize_dt(dt);
        if !self.flying || dt == 0.0 {
            return self.sample();
        }

        let steering = clamp_axis(steering);
        let throttle = clamp_axis(throttle);
        let params = &self.params;
        let state = &mut self.state;

        state.heading = wrap_heading(state.heading + steering * params.turn_speed * turn_scale * dt);
        state.altitude =
            params.clamp_altitude(state.altitude + throttle * params.altitude_change_rate * dt);

        let speed = params.speed_at_altitude(state.altitude);
        let (sin_h, cos_h) = state.heading.to_radians().sin_cos();
        state.velocity = DVec2::new(sin_h * speed * dt, cos_h * speed * dt);

        let cos_lat = state.latitude.to_radians().cos();
        let meters_per_degree_lon = METERS_PER_DEGREE * cos_lat.abs().max(MIN_COS_LATITUDE);
        state.longitude = wrap_longitude(state.longitude + state.velocity.x / meters_per_degree_lon);
        state.latitude = (state.latitude + state.velocity.y / METERS_PER_DEGREE).clamp(-90.0, 90.0);

        self.bank = -steering * MAX_BANK_DEGREES;

        FlightSample {
            state: self.state,
            bank: self.bank,
            speed,
        }
    }
}

/// Treat negative and non-finite time steps as zero.
fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}
