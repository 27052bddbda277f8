//! Error types for kinematics operations.

use cdpr_types::RobotError;
use thiserror::Error;

/// Errors that can occur while solving kinematics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KinematicsError {
    /// Number of poses does not match the number of platforms.
    #[error("expected {expected} pose(s), one per platform, got {actual}")]
    PoseCount {
        /// Number of platforms on the robot.
        expected: usize,
        /// Number of poses supplied.
        actual: usize,
    },

    /// The robot uses a configuration this solver does not handle.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// The platform anchor lies inside the pulley circle of a chain.
    #[error("platform anchor of chain {chain} lies inside its pulley")]
    InsidePulley {
        /// Chain index.
        chain: usize,
    },

    /// Number of measured lengths does not match the number of chains.
    #[error("expected {expected} cable length(s), got {actual}")]
    LengthCount {
        /// Number of chains.
        expected: usize,
        /// Number of lengths supplied.
        actual: usize,
    },

    /// The forward kinematics optimizer did not reach the residual tolerance.
    #[error("could not solve forward kinematics: residual {residual:e} after {iterations} iterations")]
    ForwardNotConverged {
        /// Best squared length residual.
        residual: f64,
        /// Iterations performed.
        iterations: u64,
    },

    /// The optimizer itself failed.
    #[error("optimizer error: {0}")]
    Optimizer(String),

    /// The robot description is inconsistent.
    #[error(transparent)]
    InvalidRobot(#[from] RobotError),
}

impl KinematicsError {
    /// Whether this error describes an unreachable pose rather than a bad request.
    ///
    /// Workspace criteria downgrade these to "inadmissible".
    #[must_use]
    pub const fn is_inadmissible(&self) -> bool {
        matches!(self, Self::InsidePulley { .. })
    }
}

/// Result type for kinematics operations.
pub type Result<T> = std::result::Result<T, KinematicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KinematicsError::PoseCount {
            expected: 1,
            actual: 2,
        };
        assert!(err.to_string().contains("got 2"));

        let err = KinematicsError::ForwardNotConverged {
            residual: 0.5,
            iterations: 100,
        };
        let display = err.to_string();
        assert!(display.contains("could not solve forward kinematics"));
        assert!(display.contains("100"));
    }

    #[test]
    fn test_error_predicates() {
        assert!(KinematicsError::InsidePulley { chain: 0 }.is_inadmissible());
        assert!(!KinematicsError::NotImplemented("multi-platform").is_inadmissible());
        assert!(!KinematicsError::from(RobotError::NoPlatform).is_inadmissible());
    }
}
