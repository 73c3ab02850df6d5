//! Error types for the leave optimisation engine.
//!
//! The planning core itself degrades gracefully instead of failing: unknown
//! regions and weekend keys fall back to documented defaults, missing holiday
//! data is reported as a coverage flag, and infeasible allowances produce an
//! empty plan. The variants here cover configuration loading, lookups that a
//! caller may want to treat strictly, and request validation at the API edge.

use thiserror::Error;

/// The main error type for the leave optimisation engine.
///
/// # Example
///
/// ```
/// use leave_optimizer::error::EngineError;
///
/// let error = EngineError::UnsupportedRegion {
///     region: "atlantis".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unsupported region: atlantis");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The requested region is not one of the configured locations.
    #[error("Unsupported region: {region}")]
    UnsupportedRegion {
        /// The region identifier that was requested.
        region: String,
    },

    /// The requested weekend pattern is not one of the presets.
    #[error("Unknown weekend pattern: {key}")]
    UnknownWeekendPattern {
        /// The preset key that was requested.
        key: String,
    },

    /// A calendar date string could not be parsed as `YYYY-MM-DD`.
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The offending input.
        value: String,
    },

    /// The leave allowance is outside the accepted range.
    #[error("Invalid allowance {allowance}: must be between 1 and 365")]
    InvalidAllowance {
        /// The allowance that was rejected.
        allowance: u32,
    },

    /// The year is outside the range the API accepts.
    #[error("Unsupported year {year}: must be between 1900 and 2200")]
    UnsupportedYear {
        /// The year that was rejected.
        year: i32,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
