//! Error types for the simulator binary.

use std::{fmt, io, path::PathBuf};

use skyhouse_flight::ConfigError;

/// Errors that abort a simulation run.
#[derive(Debug)]
pub enum SimError {
    /// Reading or writing a file failed.
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// A config file could not be parsed.
    Json {
        /// The config file.
        path: PathBuf,
        /// The underlying error.
        source: serde_json::Error,
    },
    /// Flight, tracker or scenario configuration was rejected.
    Config(ConfigError),
    /// No built-in or configured scenario has this name.
    UnknownScenario(String),
    /// No known location has this name.
    UnknownLocation(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Io { path, source } => {
                write!(f, "i/o error on {}: {source}", path.display())
            }
            SimError::Json { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            SimError::Config(e) => write!(f, "invalid configuration: {e}"),
            SimError::UnknownScenario(name) => write!(f, "unknown scenario '{name}'"),
            SimError::UnknownLocation(name) => write!(f, "unknown location '{name}'"),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Io { source, .. } => Some(source),
            SimError::Json { source, .. } => Some(source),
            SimError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(e)
    }
}
