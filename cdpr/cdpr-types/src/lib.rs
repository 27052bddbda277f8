//! Core types for cable-driven parallel robot analysis.
//!
//! This crate provides the read-only robot description consumed by the
//! kinematics, statics and workspace crates:
//!
//! - [`Pose`] - Position, orientation and optional time tag of a platform
//! - [`MotionPattern`] - Translational/rotational DOF signature (`1T` .. `3R3T`)
//! - [`Robot`] - Frame anchors, platforms, cables and the kinematic chains binding them
//! - [`EulerSequence`] - Intrinsic/extrinsic Euler angle conventions
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. It is pure data
//! with only the geometry helpers needed to evaluate vector loops.
//!
//! # Coordinate System
//!
//! - X: right
//! - Y: forward
//! - Z: up
//! - Right-handed
//!
//! Planar robots (`1T`, `2T`, `1R2T`) move in the XY plane; their rotation,
//! if any, is about Z.
//!
//! # Example
//!
//! ```
//! use cdpr_types::{
//!     Cable, FrameAnchor, KinematicChain, MotionPattern, Platform, PlatformAnchor, Pose, Robot,
//! };
//! use nalgebra::Vector3;
//!
//! // A 1T robot: two cables pulling a point along X.
//! let robot = Robot::builder("linear")
//!     .frame_anchor(FrameAnchor::at(Vector3::new(-1.0, 0.0, 0.0)))
//!     .frame_anchor(FrameAnchor::at(Vector3::new(1.0, 0.0, 0.0)))
//!     .platform(
//!         Platform::new(MotionPattern::T1)
//!             .with_anchor(PlatformAnchor::origin())
//!     )
//!     .cable(Cable::default())
//!     .cable(Cable::default())
//!     .chain(KinematicChain::new(0, 0, 0))
//!     .chain(KinematicChain::new(1, 0, 1))
//!     .build()?;
//!
//! assert_eq!(robot.num_chains(), 2);
//! let pose = Pose::from_position(Vector3::new(0.25, 0.0, 0.0));
//! assert_eq!(pose.position.x, 0.25);
//! # Ok::<(), cdpr_types::RobotError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/cdpr-types/0.1.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::cast_precision_loss,       // usize to f64 is fine for counts
)]

mod error;
mod euler;
mod motion;
mod pose;
mod robot;

pub use error::{RobotError, RobotResult};
pub use euler::{Axis, EulerSequence, axis_rotation};
pub use motion::MotionPattern;
pub use pose::Pose;
pub use robot::{
    Cable, Frame, FrameAnchor, Inertia, KinematicChain, Platform, PlatformAnchor, Pulley, Robot,
    RobotBuilder,
};

// Re-export math types for convenience
pub use nalgebra::{DMatrix, DVector, Matrix3, Rotation3, UnitQuaternion, Vector3};

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_robot_round_trip() {
        let robot = Robot::builder("planar")
            .frame_anchor(FrameAnchor::at(Vector3::new(-1.0, -1.0, 0.0)))
            .frame_anchor(FrameAnchor::at(Vector3::new(1.0, -1.0, 0.0)))
            .frame_anchor(FrameAnchor::at(Vector3::new(0.0, 1.0, 0.0)))
            .platform(Platform::new(MotionPattern::T2).with_anchor(PlatformAnchor::origin()))
            .cables(3, Cable::default())
            .chain(KinematicChain::new(0, 0, 0))
            .chain(KinematicChain::new(1, 0, 1))
            .chain(KinematicChain::new(2, 0, 2))
            .build()
            .unwrap();

        assert_eq!(robot.num_chains(), 3);
        assert_eq!(robot.platform().unwrap().motion_pattern.dof(), 2);
    }

    #[test]
    fn test_pose_from_euler() {
        let pose = Pose::from_euler(
            Vector3::zeros(),
            [0.0, 0.0, std::f64::consts::FRAC_PI_2],
            EulerSequence::XYZ,
        );
        let world = pose.transform_point(&Vector3::x());
        assert!((world.y - 1.0).abs() < 1e-12);
        assert!(world.x.abs() < 1e-12);
    }
}
