//! Inverse and forward kinematics of cable-driven parallel robots.
//!
//! This crate solves the relation between a platform [`Pose`] and the cable
//! state of every kinematic chain:
//!
//! - [`StandardKinematics`] - Vector-loop closure with point anchors
//! - [`PulleyKinematics`] - Cables guided over swivelling pulleys
//! - [`KinematicsModel`] - Value-level selection of either model
//! - [`solve_forward`] - Pose from measured lengths by derivative-free least squares
//!
//! # Inverse Kinematics
//!
//! ```
//! use cdpr_kinematics::{Kinematics, StandardKinematics};
//! use cdpr_types::{
//!     Cable, FrameAnchor, KinematicChain, MotionPattern, Platform, PlatformAnchor, Pose, Robot,
//! };
//! use nalgebra::Vector3;
//!
//! let robot = Robot::builder("linear")
//!     .frame_anchor(FrameAnchor::at(Vector3::new(-1.0, 0.0, 0.0)))
//!     .frame_anchor(FrameAnchor::at(Vector3::new(1.0, 0.0, 0.0)))
//!     .platform(Platform::new(MotionPattern::T1).with_anchor(PlatformAnchor::origin()))
//!     .cables(2, Cable::default())
//!     .chain(KinematicChain::new(0, 0, 0))
//!     .chain(KinematicChain::new(1, 0, 1))
//!     .build()?;
//!
//! let pose = Pose::from_position(Vector3::new(0.5, 0.0, 0.0));
//! let result = StandardKinematics.backward(&robot, &[pose])?;
//!
//! assert!((result.lengths[0] - 1.5).abs() < 1e-12);
//! assert!((result.lengths[1] - 0.5).abs() < 1e-12);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Platforms
//!
//! Only single-platform robots are supported; multi-platform robots fail with
//! [`KinematicsError::NotImplemented`].

#![doc(html_root_url = "https://docs.rs/cdpr-kinematics/0.1.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::neg_cmp_op_on_partial_ord, // !(x > y) rejects NaN
)]

mod error;
mod forward;
mod pulley;
mod result;
mod standard;

pub use error::{KinematicsError, Result};
pub use forward::{ForwardOptions, solve_forward};
pub use pulley::PulleyKinematics;
pub use result::KinematicsResult;
pub use standard::StandardKinematics;

use cdpr_types::{Pose, Robot};
use nalgebra::DVector;

/// A kinematic model of a robot.
///
/// Implementations must be pure: the result depends only on the robot and
/// the poses, so one model can be shared across threads.
pub trait Kinematics: Send + Sync {
    /// Solve the inverse kinematics: cable state for one pose per platform.
    ///
    /// # Errors
    ///
    /// Returns an error if the pose list does not match the robot, the robot
    /// has more than one platform, or the pose is geometrically impossible
    /// for the model.
    fn backward(&self, robot: &Robot, poses: &[Pose]) -> Result<KinematicsResult>;

    /// Solve the forward kinematics: pose from measured cable lengths.
    ///
    /// # Errors
    ///
    /// See [`solve_forward`].
    fn forward(
        &self,
        robot: &Robot,
        lengths: &DVector<f64>,
        options: &ForwardOptions,
    ) -> Result<Pose> {
        solve_forward(self, robot, lengths, options)
    }
}

/// Value-level choice of kinematic model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KinematicsModel {
    /// Point anchors.
    #[default]
    Standard,
    /// Swivelling pulleys where mounted.
    Pulley,
}

impl Kinematics for KinematicsModel {
    fn backward(&self, robot: &Robot, poses: &[Pose]) -> Result<KinematicsResult> {
        match self {
            Self::Standard => StandardKinematics.backward(robot, poses),
            Self::Pulley => PulleyKinematics.backward(robot, poses),
        }
    }
}
