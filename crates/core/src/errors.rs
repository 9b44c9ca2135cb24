//! Core error types for the persona engine.
//!
//! Every stage of the classification pipeline reports failures through the
//! root [`Error`] enum. Area-specific enums ([`ProfileError`], [`ReferenceError`])
//! carry the structured detail and convert into it with `?`.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the persona engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-side data error. Not retryable without changed input.
    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    /// An identifier that is not present in the reference tables.
    #[error("Unknown reference data: {0}")]
    UnknownReferenceData(#[from] ReferenceError),

    /// A post-computation invariant failed. Indicates a defect in the
    /// reference tables or the resolver, never bad input.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),
}

/// Validation failures raised by the profile normalizer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    #[error("Income must be a positive number, got {0}")]
    NonPositiveIncome(f64),

    #[error("Field '{field}' must be a finite number")]
    NonFinite { field: String },

    #[error("Share '{field}' must not be negative, got {value}")]
    NegativeShare { field: String, value: f64 },

    #[error("Needs + wants + savings = {sum:.3}, outside the accepted range [{min}, {max}]")]
    RatioSumOutOfBounds { sum: f64, min: f64, max: f64 },
}

impl ProfileError {
    pub fn non_finite(field: impl Into<String>) -> Self {
        Self::NonFinite {
            field: field.into(),
        }
    }

    pub fn negative_share(field: impl Into<String>, value: f64) -> Self {
        Self::NegativeShare {
            field: field.into(),
            value,
        }
    }
}

/// Lookups against the read-only reference tables that found nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("Goal '{0}' is not defined in the goal table")]
    UnknownGoal(String),

    #[error("Persona '{0}' is not defined in the persona set")]
    UnknownPersona(String),

    #[error("No allocation band for {horizon}/{risk}")]
    MissingBand { horizon: String, risk: String },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigIO(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::ConfigIO(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err: Error = ProfileError::NonPositiveIncome(-5.0).into();
        assert_eq!(
            err.to_string(),
            "Invalid profile: Income must be a positive number, got -5"
        );

        let err: Error = ReferenceError::UnknownGoal("FG999".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Unknown reference data: Goal 'FG999' is not defined in the goal table"
        );

        let err = ProfileError::RatioSumOutOfBounds {
            sum: 120.0,
            min: 95.0,
            max: 105.0,
        };
        assert_eq!(
            err.to_string(),
            "Needs + wants + savings = 120.000, outside the accepted range [95, 105]"
        );
    }

    #[test]
    fn test_io_errors_map_to_config_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        assert!(matches!(Error::from(io), Error::ConfigIO(_)));
    }
}
