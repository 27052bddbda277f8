//! Error types for statics operations.

use thiserror::Error;

/// Errors that can occur while building structure matrices or distributing forces.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StaticsError {
    /// Matrix or vector dimensions do not agree.
    #[error("dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being checked.
        context: &'static str,
        /// Expected size.
        expected: usize,
        /// Actual size.
        actual: usize,
    },

    /// Force bounds are malformed.
    #[error("invalid force bounds: {reason}")]
    InvalidBounds {
        /// Description of the problem.
        reason: String,
    },

    /// The square structure matrix cannot be inverted.
    #[error("structure matrix is singular")]
    Singular,

    /// No force distribution satisfies the equilibrium within the bounds.
    #[error("no feasible force distribution: {reason}")]
    Infeasible {
        /// Description of why the solve gave up.
        reason: String,
    },

    /// The iterative solver exhausted its iteration budget.
    #[error("force distribution did not converge after {iterations} iterations")]
    NotConverged {
        /// Iterations performed.
        iterations: usize,
    },
}

impl StaticsError {
    /// Create an invalid bounds error.
    #[must_use]
    pub fn invalid_bounds(reason: impl Into<String>) -> Self {
        Self::InvalidBounds {
            reason: reason.into(),
        }
    }

    /// Create an infeasibility error.
    #[must_use]
    pub fn infeasible(reason: impl Into<String>) -> Self {
        Self::Infeasible {
            reason: reason.into(),
        }
    }

    /// Whether this error means "no valid force distribution at this pose"
    /// rather than a malformed request.
    #[must_use]
    pub const fn is_inadmissible(&self) -> bool {
        matches!(
            self,
            Self::Singular | Self::Infeasible { .. } | Self::NotConverged { .. }
        )
    }
}

/// Result type for statics operations.
pub type StaticsResult<T> = std::result::Result<T, StaticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StaticsError::DimensionMismatch {
            context: "wrench",
            expected: 6,
            actual: 3,
        };
        let display = err.to_string();
        assert!(display.contains("wrench"));
        assert!(display.contains('6'));

        let err = StaticsError::NotConverged { iterations: 5000 };
        assert!(err.to_string().contains("5000"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(StaticsError::Singular.is_inadmissible());
        assert!(StaticsError::infeasible("reduced system").is_inadmissible());
        assert!(StaticsError::NotConverged { iterations: 1 }.is_inadmissible());
        assert!(!StaticsError::invalid_bounds("min > max").is_inadmissible());
    }
}
