//! Error types for robot descriptions.

use thiserror::Error;

/// Errors raised while building or validating a robot description.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RobotError {
    /// A kinematic chain references an anchor, cable or platform that does not exist.
    #[error("kinematic chain {chain} references missing {kind} {index}")]
    InvalidChain {
        /// Index of the offending chain.
        chain: usize,
        /// What was referenced (`frame anchor`, `platform anchor`, `cable`, `platform`).
        kind: &'static str,
        /// The missing index.
        index: usize,
    },

    /// The robot has no platform.
    #[error("robot has no platform")]
    NoPlatform,

    /// The robot has no kinematic chain.
    #[error("robot has no kinematic chains")]
    NoChains,

    /// A pulley radius is not strictly positive.
    #[error("invalid pulley radius on frame anchor {anchor}: {radius} (must be positive and finite)")]
    InvalidPulley {
        /// Frame anchor carrying the pulley.
        anchor: usize,
        /// The rejected radius.
        radius: f64,
    },

    /// A platform mass is negative or not finite.
    #[error("invalid mass on platform {platform}: {mass}")]
    InvalidMass {
        /// Platform index.
        platform: usize,
        /// The rejected mass.
        mass: f64,
    },

    /// A cable property is not strictly positive.
    #[error("invalid {property} on cable {cable}: {value}")]
    InvalidCable {
        /// Cable index.
        cable: usize,
        /// Property name.
        property: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Unknown motion pattern tag.
    #[error("unknown motion pattern: {0}")]
    UnknownMotionPattern(String),

    /// Unknown Euler sequence.
    #[error("unknown Euler sequence: {0}")]
    UnknownEulerSequence(String),
}

/// Result type for robot description operations.
pub type RobotResult<T> = std::result::Result<T, RobotError>;
