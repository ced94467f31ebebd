//! Control inputs for the flight integrator.
//!
//! Any input device (keyboard mapper, VR wheel and lever, scripted driver) is
//! reduced to a [`ControlSource`] that yields one [`Controls`] value per tick.
//! A missing channel is reported as `None` so the integrator can fall back to
//! its manual steering scalar.

use serde::{Deserialize, Serialize};

use crate::geo::move_towards;

/// Default rate at which keyboard steering approaches its target, per second.
pub const DEFAULT_STEERING_RATE: f64 = 1.0;

/// Default rate at which keyboard throttle approaches its target, per second.
pub const DEFAULT_THROTTLE_RATE: f64 = 0.5;

/// Control values for a single tick, each in `[-1, 1]` when present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Controls {
    /// Steering input, positive turns clockwise. `None` when no steering device is attached.
    pub steering: Option<f64>,
    /// Throttle input, positive climbs. `None` when no throttle device is attached.
    pub throttle: Option<f64>,
}

impl Controls {
    /// No input devices attached.
    pub const NONE: Self = Self {
        steering: None,
        throttle: None,
    };

    /// Both channels present.
    #[must_use]
    pub const fn new(steering: f64, throttle: f64) -> Self {
        Self {
            steering: Some(steering),
            throttle: Some(throttle),
        }
    }
}

/// Produces control values once per tick.
pub trait ControlSource {
    /// Sample the controls for a tick lasting `dt` seconds.
    fn sample(&mut self, dt: f64) -> Controls;
}

impl ControlSource for Controls {
    fn sample(&mut self, _dt: f64) -> Controls {
        *self
    }
}

/// Keyboard-style controls that ease towards their targets.
///
/// Holding a key sets the target to ±1; the output then moves towards the
/// target at a fixed rate instead of jumping.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothedControls {
    steering: f64,
    throttle: f64,
    target_steering: f64,
    target_throttle: f64,
    steering_rate: f64,
    throttle_rate: f64,
}

impl Default for SmoothedControls {
    fn default() -> Self {
        Self::new(DEFAULT_STEERING_RATE, DEFAULT_THROTTLE_RATE)
    }
}

impl SmoothedControls {
    /// Create smoothed controls with the given approach rates (units per second).
    #[must_use]
    pub fn new(steering_rate: f64, throttle_rate: f64) -> Self {
        Self {
            steering: 0.0,
            throttle: 0.0,
            target_steering: 0.0,
            target_throttle: 0.0,
            steering_rate: steering_rate.max(0.0),
            throttle_rate: throttle_rate.max(0.0),
        }
    }

    /// Set the raw axis targets, clamped to `[-1, 1]`.
    pub fn set_targets(&mut self, steering: f64, throttle: f64) {
        self.target_steering = clamp_axis(steering);
        self.target_throttle = clamp_axis(throttle);
    }

    /// Current smoothed steering value.
    #[must_use]
    pub fn steering(&self) -> f64 {
        self.steering
    }

    /// Current smoothed throttle value.
    #[must_use]
    pub fn throttle(&self) -> f64 {
        self.throttle
    }
}

impl ControlSource for SmoothedControls {
    fn sample(&mut self, dt: f64) -> Controls {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.steering = move_towards(self.steering, self.target_steering, self.steering_rate * dt);
        self.throttle = move_towards(self.throttle, self.target_throttle, self.throttle_rate * dt);
        Controls::new(self.steering, self.throttle)
    }
}

/// One timed step of a [`ControlScript`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSegment {
    /// How long the segment lasts, in seconds.
    pub duration: f64,
    /// Steering held during the segment; omitted means no steering device.
    #[serde(default)]
    pub steering: Option<f64>,
    /// Throttle held during the segment; omitted means no throttle device.
    #[serde(default)]
    pub throttle: Option<f64>,
}

/// A scripted sequence of held control values.
///
/// Each sample advances the script clock by `dt` and returns the segment that
/// was active at the start of the tick. Once the script runs out it yields
/// neutral controls.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlScript {
    /// Segments played in order.
    pub segments: Vec<ControlSegment>,
    #[serde(skip)]
    elapsed: f64,
}

impl ControlScript {
    /// Create a script from its segments.
    #[must_use]
    pub fn new(segments: Vec<ControlSegment>) -> Self {
        Self {
            segments,
            elapsed: 0.0,
        }
    }

    /// Total scripted duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration.max(0.0)).sum()
    }

    /// Whether the script clock has passed the last segment.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration()
    }

    /// Rewind to the first segment.
    pub fn rewind(&mut self) {
        self.elapsed = 0.0;
    }

    fn controls_at(&self, time: f64) -> Controls {
        let mut start = 0.0;
        for segment in &self.segments {
            let end = start + segment.duration.max(0.0);
            if time < end {
                return Controls {
                    steering: segment.steering.map(clamp_axis),
                    throttle: segment.throttle.map(clamp_axis),
                };
            }
            start = end;
        }
        Controls::new(0.0, 0.0)
    }
}

impl ControlSource for ControlScript {
    fn sample(&mut self, dt: f64) -> Controls {
        let controls = self.controls_at(self.elapsed);
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
        controls
    }
}

/// Clamp an axis value into `[-1, 1]`, mapping NaN to 0.
#[must_use]
pub fn clamp_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(0.3), 0.3);
        assert_eq!(clamp_axis(4.0), 1.0);
        assert_eq!(clamp_axis(-4.0), -1.0);
        assert_eq!(clamp_axis(f64::NAN), 0.0);
        assert_eq!(clamp_axis(f64::NEG_INFINITY), -1.0);
    }

    #[test]
    fn test_smoothed_controls_ease_towards_target() {
        let mut controls = SmoothedControls::default();
        controls.set_targets(1.0, -1.0);

        let c = controls.sample(0.5);
        assert_eq!(c.steering, Some(0.5));
        assert_eq!(c.throttle, Some(-0.25));

        let c = controls.sample(1.0);
        assert_eq!(c.steering, Some(1.0));
        assert_eq!(c.throttle, Some(-0.75));

        // Releasing the keys eases back to neutral.
        controls.set_targets(0.0, 0.0);
        let c = controls.sample(10.0);
        assert_eq!(c, Controls::new(0.0, 0.0));
    }

    #[test]
    fn test_smoothed_controls_ignore_negative_dt() {
        let mut controls = SmoothedControls::default();
        controls.set_targets(1.0, 1.0);
        let c = controls.sample(-1.0);
        assert_eq!(c, Controls::new(0.0, 0.0));
    }

    #[test]
    fn test_control_script_segments() {
        let mut script = ControlScript::new(vec![
            ControlSegment {
                duration: 2.0,
                steering: Some(1.0),
                throttle: Some(0.5),
            },
            ControlSegment {
                duration: 1.0,
                steering: None,
                throttle: Some(3.0),
            },
        ]);
        assert_eq!(script.duration(), 3.0);

        assert_eq!(script.sample(1.0), Controls::new(1.0, 0.5));
        assert_eq!(script.sample(1.0), Controls::new(1.0, 0.5));

        // Second segment: steering device missing, throttle clamped.
        let c = script.sample(1.0);
        assert_eq!(c.steering, None);
        assert_eq!(c.throttle, Some(1.0));
        assert!(script.is_finished());

        // Past the end the script holds neutral controls.
        assert_eq!(script.sample(1.0), Controls::new(0.0, 0.0));

        script.rewind();
        assert!(!script.is_finished());
        assert_eq!(script.sample(0.1), Controls::new(1.0, 0.5));
    }

    #[test]
    fn test_control_script_from_json() {
        let json = r#"{ "segments": [ { "duration": 5.0, "throttle": 1.0 } ] }"#;
        let mut script: ControlScript = serde_json::from_str(json).unwrap();
        let c = script.sample(1.0);
        assert_eq!(c.steering, None);
        assert_eq!(c.throttle, Some(1.0));
    }
}
