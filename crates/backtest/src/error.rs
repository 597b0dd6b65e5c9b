use thiserror::Error;

/// Errors reported by the simulation engine.
///
/// Input errors name the offending field so the request boundary can pass
/// the message straight back to the caller. `ShapeMismatch` only arises from
/// a forced outcome matrix that does not fit the parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} must be a positive integer, got {value}")]
    NonPositiveCount { field: &'static str, value: i64 },

    #[error("{field} must be a probability between 0 and 1, got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },

    #[error("{field} must be greater than 0 and at most 1, got {value}")]
    RiskFractionOutOfRange { field: &'static str, value: f64 },

    #[error("{field} of {value} exceeds the maximum of {max}")]
    LimitExceeded {
        field: &'static str,
        value: usize,
        max: usize,
    },

    #[error("outcome matrix is {actual_paths}x{actual_steps}, expected {expected_paths}x{expected_steps}")]
    ShapeMismatch {
        expected_paths: usize,
        expected_steps: usize,
        actual_paths: usize,
        actual_steps: usize,
    },
}

impl EngineError {
    /// Returns true if the error was caused by the caller's input rather
    /// than by an internal inconsistency.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        match self {
            Self::NonFinite { .. }
            | Self::NonPositiveCount { .. }
            | Self::ProbabilityOutOfRange { .. }
            | Self::RiskFractionOutOfRange { .. }
            | Self::LimitExceeded { .. } => true,
            Self::ShapeMismatch { .. } => false,
        }
    }
}
