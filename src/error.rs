// src/error.rs

/// Error types for the fast-pnl library
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PnlError {
    /// Invalid parameter values
    #[error("Invalid parameter '{parameter}' = {value}: {constraint}")]
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    /// Strategy name not recognised by the payoff models
    #[error("Unknown strategy '{0}' (expected 'calendar' or 'straddle')")]
    UnknownStrategy(String),

    /// Checkpoint index outside the scenario day axis
    #[error("Day index {index} out of range for an axis of {len} checkpoints")]
    DayIndexOutOfRange { index: usize, len: usize },

    /// File export failure
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON encoding or decoding failure
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for PnlError {
    fn from(e: std::io::Error) -> Self {
        PnlError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for PnlError {
    fn from(e: serde_json::Error) -> Self {
        PnlError::Serialization(e.to_string())
    }
}

/// Result type alias for fast-pnl operations
pub type PnlResult<T> = Result<T, PnlError>;

/// Validation utilities
pub mod validation {
    use super::{PnlError, PnlResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PnlResult<()> {
        // NaN fails the comparison, so reject it explicitly
        if value.is_nan() || value <= 0.0 {
            Err(PnlError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> PnlResult<()> {
        if value.is_nan() || value < 0.0 {
            Err(PnlError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> PnlResult<()> {
        if value.is_nan() || value < min || value > max {
            Err(PnlError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PnlResult<()> {
        if !value.is_finite() {
            Err(PnlError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
