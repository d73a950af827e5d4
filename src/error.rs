// src/error.rs
use std::fmt;

/// Custom error types for the fast-iv library
#[derive(Debug, Clone, PartialEq)]
pub enum PricerError {
    /// Invalid parameter values
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// A date field could not be parsed as `YYYY-MM-DD`
    DateParse { input: String, reason: String },

    /// Malformed input record
    InputFormat { line: u64, reason: String },

    /// File could not be opened, read or written
    Io { path: String, reason: String },

    /// Input file has no header row
    EmptyInput { path: String },

    /// Implied volatility search exhausted its iteration budget
    NonConvergence { iterations: usize, last_error: f64 },

    /// Market price cannot be reproduced by any volatility inside the bounds
    PriceOutOfBounds {
        market_price: f64,
        lower: f64,
        upper: f64,
    },

    /// Invalid configuration
    InvalidConfiguration { field: String, reason: String },
}

impl fmt::Display for PricerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricerError::InvalidParameters {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = {}: {}",
                    parameter, value, constraint
                )
            }
            PricerError::DateParse { input, reason } => {
                write!(f, "Cannot parse date '{}': {}", input, reason)
            }
            PricerError::InputFormat { line, reason } => {
                write!(f, "Malformed input at line {}: {}", line, reason)
            }
            PricerError::Io { path, reason } => {
                write!(f, "I/O error on '{}': {}", path, reason)
            }
            PricerError::EmptyInput { path } => {
                write!(f, "Empty file: '{}' has no header row", path)
            }
            PricerError::NonConvergence {
                iterations,
                last_error,
            } => {
                write!(
                    f,
                    "Implied volatility did not converge after {} iterations (last price error: {:.6e})",
                    iterations, last_error
                )
            }
            PricerError::PriceOutOfBounds {
                market_price,
                lower,
                upper,
            } => {
                write!(
                    f,
                    "Market price {} outside attainable model range [{:.8}, {:.8}]",
                    market_price, lower, upper
                )
            }
            PricerError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for PricerError {}

/// Result type alias for fast-iv operations
pub type PricerResult<T> = Result<T, PricerError>;

/// Validation utilities
pub mod validation {
    use super::{PricerError, PricerResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> PricerResult<()> {
        if !(value > 0.0) {
            Err(PricerError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> PricerResult<()> {
        if !(value >= min && value <= max) {
            Err(PricerError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> PricerResult<()> {
        if !value.is_finite() {
            Err(PricerError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
