//! Error types for workspace evaluation.

use cdpr_kinematics::KinematicsError;
use cdpr_statics::StaticsError;
use thiserror::Error;

/// Errors that can occur during workspace evaluation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorkspaceError {
    /// Coordinate bounds are malformed.
    #[error("invalid bounds: {reason}")]
    InvalidBounds {
        /// Description of the problem.
        reason: String,
    },

    /// A step count is zero.
    #[error("invalid step count {steps} on axis {axis}")]
    InvalidSteps {
        /// Axis index.
        axis: usize,
        /// Requested steps.
        steps: usize,
    },

    /// A method or criterion parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// The operation is not available for this robot.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// The sweep was cancelled through its token.
    #[error("workspace evaluation cancelled")]
    Cancelled,

    /// Kinematics failure.
    #[error(transparent)]
    Kinematics(#[from] KinematicsError),

    /// Statics failure.
    #[error(transparent)]
    Statics(#[from] StaticsError),
}

impl WorkspaceError {
    /// Create an invalid bounds error.
    #[must_use]
    pub fn invalid_bounds(reason: impl Into<String>) -> Self {
        Self::InvalidBounds {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Whether this error only marks the evaluated pose as outside the workspace.
    ///
    /// Sweeps downgrade these to `false`; every other error aborts the sweep.
    #[must_use]
    pub const fn is_inadmissible(&self) -> bool {
        match self {
            Self::Kinematics(e) => e.is_inadmissible(),
            Self::Statics(e) => e.is_inadmissible(),
            _ => false,
        }
    }
}

/// Result type for workspace operations.
pub type WorkspaceResult<T> = std::result::Result<T, WorkspaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WorkspaceError::InvalidSteps { axis: 2, steps: 0 };
        assert!(err.to_string().contains("axis 2"));

        let err = WorkspaceError::invalid_parameter("depth", "too deep");
        assert!(err.to_string().contains("depth"));
    }

    #[test]
    fn test_inadmissible_downgrade() {
        assert!(WorkspaceError::from(StaticsError::Singular).is_inadmissible());
        assert!(WorkspaceError::from(KinematicsError::InsidePulley { chain: 0 }).is_inadmissible());
        assert!(!WorkspaceError::from(KinematicsError::PoseCount { expected: 1, actual: 2 })
            .is_inadmissible());
        assert!(!WorkspaceError::Cancelled.is_inadmissible());
        assert!(!WorkspaceError::from(StaticsError::invalid_bounds("min > max")).is_inadmissible());
    }
}
