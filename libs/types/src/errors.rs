//! Error types for the simulation
//!
//! The engine itself is total: operator controls are clamped, never
//! rejected. Errors only arise at the edges, when configuration or a
//! recorded input script is loaded.

use thiserror::Error;

/// Top-level simulation error
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Replay error: {0}")]
    Replay(#[from] ReplayError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid engine configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("base capacity must be positive")]
    ZeroCapacity,

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must lie in (0, 1), got {value}")]
    FractionOutOfRange { field: &'static str, value: f64 },

    #[error("high-load ratio {high_load} must be below overload ratio {overload}")]
    ThresholdOrder { high_load: f64, overload: f64 },

    #[error("scale-down ratio {down} must be below scale-up ratio {up}")]
    ScalingOrder { down: f64, up: f64 },

    #[error("ceiling factor must be at least 1.0, got {0}")]
    CeilingBelowCapacity(f64),

    #[error("{0} must be at least 1")]
    ZeroLimit(&'static str),

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },
}

/// Malformed recorded input script
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReplayError {
    #[error("Failed to parse input script: {0}")]
    Parse(String),

    #[error("Input script is empty")]
    Empty,
}

impl From<serde_json::Error> for ReplayError {
    fn from(err: serde_json::Error) -> Self {
        ReplayError::Parse(err.to_string())
    }
}
