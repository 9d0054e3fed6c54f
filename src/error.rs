//! Error types for configuration and calibration loading
//!
//! The calculators themselves never fail; only the surfaces that accept
//! external configuration return these errors.

use thiserror::Error;

/// Errors raised while building engine configuration or calibration data
#[derive(Error, Debug)]
pub enum EngineError {
    /// Scoring weights must sum to one
    #[error("scoring weights must sum to 1.0 (got {sum:.6})")]
    InvalidWeights { sum: f64 },

    /// A single scoring weight was negative or not finite
    #[error("scoring weight for {criterion} must be a finite non-negative number (got {value})")]
    NegativeWeight { criterion: &'static str, value: f64 },

    /// A spine chart failed validation
    #[error("invalid spine chart: {0}")]
    InvalidChart(String),

    /// A numeric engine setting was out of range
    #[error("invalid setting: {0}")]
    InvalidSetting(String),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// I/O error while reading a configuration file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, EngineError>;
