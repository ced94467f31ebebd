//! Error types for flight configuration.

use std::fmt;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors reported once when building an integrator, tracker or scenario.
///
/// Per-tick inputs are never rejected; they are clamped instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The altitude band is inverted.
    InvalidAltitudeBand {
        /// Configured lower bound in meters.
        min: f64,
        /// Configured upper bound in meters.
        max: f64,
    },
    /// A parameter is NaN or infinite.
    NonFinite {
        /// Name of the offending parameter.
        field: &'static str,
    },
    /// A parameter that must be zero or positive is negative.
    Negative {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A parameter required by the chosen mode is absent.
    Missing {
        /// Name of the missing parameter.
        field: &'static str,
    },
    /// A parameter that must be strictly positive is not.
    NonPositive {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAltitudeBand { min, max } => {
                write!(
                    f,
                    "invalid altitude band: min altitude {min} exceeds max altitude {max}"
                )
            }
            Self::NonFinite { field } => write!(f, "{field} must be finite"),
            Self::Missing { field } => write!(f, "{field} is required"),
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::NonPositive { field, value } => {
                write!(f, "{field} must be positive, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Check that `value` is finite.
pub(crate) fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field })
    }
}

/// Check that `value` is finite and not negative.
pub(crate) fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64> {
    let value = ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(value)
}

/// Check that `value` is finite and strictly positive.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<f64> {
    let value = ensure_finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::NonPositive { field, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ConfigError::InvalidAltitudeBand {
            min: 2000.0,
            max: 100.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid altitude band: min altitude 2000 exceeds max altitude 100"
        );

        let err = ConfigError::NonFinite { field: "base_speed" };
        assert_eq!(err.to_string(), "base_speed must be finite");
    }

    #[test]
    fn test_ensure_helpers() {
        assert_eq!(ensure_finite("x", 1.5), Ok(1.5));
        assert!(matches!(
            ensure_finite("x", f64::NAN),
            Err(ConfigError::NonFinite { field: "x" })
        ));
        assert!(matches!(
            ensure_non_negative("x", -1.0),
            Err(ConfigError::Negative { .. })
        ));
        assert_eq!(ensure_non_negative("x", 0.0), Ok(0.0));
        assert!(matches!(
            ensure_positive("x", 0.0),
            Err(ConfigError::NonPositive { .. })
        ));
    }
}
