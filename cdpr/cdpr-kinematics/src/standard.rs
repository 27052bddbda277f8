//! Standard (point anchor) kinematics by vector-loop closure.
//!
//! For chain `i` with frame anchor `aᵢ` and platform anchor `bᵢ`:
//!
//! ```text
//! lᵢ = aᵢ - (r + R bᵢ)
//! ```
//!
//! The cable length is `|lᵢ|` over the platform's translational axes and
//! the unit direction is `lᵢ / |lᵢ|`, or zero for a zero-length cable.

use cdpr_types::{FrameAnchor, KinematicChain, Platform, Pose, Robot, RobotError};
use nalgebra::Vector3;

use crate::error::{KinematicsError, Result};
use crate::{Kinematics, KinematicsResult};

/// Kinematics of robots whose cables leave the frame at fixed points.
///
/// Pulleys mounted on frame anchors are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardKinematics;

impl Kinematics for StandardKinematics {
    fn backward(&self, robot: &Robot, poses: &[Pose]) -> Result<KinematicsResult> {
        let (platform, pose) = single_platform(robot, poses)?;
        let rows = platform.motion_pattern.dof_translation();
        let chains: Vec<&KinematicChain> = robot.chains_for(0).collect();
        let mut result = KinematicsResult::zeros(rows, chains.len());

        for (col, chain) in chains.into_iter().enumerate() {
            let (frame, anchor) = chain_points(robot, chain, col)?;
            let platform_point = pose.transform_point(&anchor);
            write_segment(&mut result, col, &frame.position, &platform_point, rows);
            result.swivel_angles[col] = swivel(&(frame.position - platform_point), rows);
        }

        Ok(result)
    }
}

/// Check the pose list against the robot and return its only platform.
pub(crate) fn single_platform<'a>(
    robot: &'a Robot,
    poses: &'a [Pose],
) -> Result<(&'a Platform, &'a Pose)> {
    if poses.len() != robot.num_platforms() {
        return Err(KinematicsError::PoseCount {
            expected: robot.num_platforms(),
            actual: poses.len(),
        });
    }
    match (robot.platforms.as_slice(), poses) {
        ([platform], [pose]) => Ok((platform, pose)),
        ([], _) => Err(RobotError::NoPlatform.into()),
        _ => Err(KinematicsError::NotImplemented("multi-platform robots")),
    }
}

/// Frame anchor and platform-local anchor position of a chain.
pub(crate) fn chain_points<'a>(
    robot: &'a Robot,
    chain: &KinematicChain,
    index: usize,
) -> Result<(&'a FrameAnchor, Vector3<f64>)> {
    let frame = robot
        .frame_anchor(chain)
        .ok_or(RobotError::InvalidChain {
            chain: index,
            kind: "frame anchor",
            index: chain.frame_anchor,
        })?;
    let anchor = robot
        .platform_anchor(chain)
        .ok_or(RobotError::InvalidChain {
            chain: index,
            kind: "platform anchor",
            index: chain.platform_anchor,
        })?;
    Ok((frame, anchor.position))
}

/// Store length, direction and leave point of the straight segment from
/// `platform_point` to `leave_point`.
///
/// Returns the straight segment length.
pub(crate) fn write_segment(
    result: &mut KinematicsResult,
    col: usize,
    leave_point: &Vector3<f64>,
    platform_point: &Vector3<f64>,
    rows: usize,
) -> f64 {
    let full = leave_point - platform_point;
    let segment = full.rows(0, rows);
    let length = segment.norm();

    // Zero-length cables transmit no force.
    if length > 0.0 {
        result.directions.column_mut(col).copy_from(&(segment / length));
    } else {
        result.directions.column_mut(col).fill(0.0);
    }
    result.lengths[col] = length;
    result.leave_points[col] = *leave_point;
    length
}

/// Swivel angle of a cable vector; zero for single-axis motion.
pub(crate) fn swivel(direction: &Vector3<f64>, rows: usize) -> f64 {
    if rows >= 2 {
        direction.y.atan2(direction.x)
    } else {
        0.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cdpr_types::{Cable, FrameAnchor, MotionPattern, PlatformAnchor};

    fn linear_robot() -> Robot {
        Robot::builder("linear")
            .frame_anchor(FrameAnchor::at(Vector3::new(-1.0, 0.0, 0.0)))
            .frame_anchor(FrameAnchor::at(Vector3::new(1.0, 0.0, 0.0)))
            .platform(Platform::new(MotionPattern::T1).with_anchor(PlatformAnchor::origin()))
            .cables(2, Cable::default())
            .chain(KinematicChain::new(0, 0, 0))
            .chain(KinematicChain::new(1, 0, 1))
            .build()
            .unwrap()
    }

    #[test]
    fn test_linear_lengths() {
        let robot = linear_robot();
        let pose = Pose::from_position(Vector3::new(0.25, 0.0, 0.0));
        let result = StandardKinematics.backward(&robot, &[pose]).unwrap();

        assert_relative_eq!(result.lengths[0], 1.25, epsilon = 1e-12);
        assert_relative_eq!(result.lengths[1], 0.75, epsilon = 1e-12);
        assert_eq!(result.directions.shape(), (1, 2));
        assert_relative_eq!(result.directions[(0, 0)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(result.directions[(0, 1)], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_length_cable_has_zero_direction() {
        let robot = linear_robot();
        let pose = Pose::from_position(Vector3::new(1.0, 0.0, 0.0));
        let result = StandardKinematics.backward(&robot, &[pose]).unwrap();

        assert_eq!(result.lengths[1], 0.0);
        assert_eq!(result.directions[(0, 1)], 0.0);
    }

    #[test]
    fn test_pose_count_mismatch() {
        let robot = linear_robot();
        let err = StandardKinematics.backward(&robot, &[]).unwrap_err();
        assert_eq!(
            err,
            KinematicsError::PoseCount {
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn test_multi_platform_not_implemented() {
        let mut robot = linear_robot();
        robot.platforms.push(robot.platforms[0].clone());
        let poses = [Pose::identity(), Pose::identity()];
        let err = StandardKinematics.backward(&robot, &poses).unwrap_err();
        assert!(matches!(err, KinematicsError::NotImplemented(_)));
    }

    #[test]
    fn test_swivel_angle() {
        let robot = Robot::builder("planar")
            .frame_anchor(FrameAnchor::at(Vector3::new(0.0, 1.0, 0.0)))
            .platform(Platform::new(MotionPattern::T2).with_anchor(PlatformAnchor::origin()))
            .cable(Cable::default())
            .chain(KinematicChain::new(0, 0, 0))
            .build()
            .unwrap();
        let result = StandardKinematics
            .backward(&robot, &[Pose::identity()])
            .unwrap();
        assert_relative_eq!(
            result.swivel_angles[0],
            std::f64::consts::FRAC_PI_2,
            epsilon = 1e-12
        );
    }
}
