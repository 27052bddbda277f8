//! Kinematics of cables guided over swivelling pulleys.
//!
//! A pulley anchor swivels about its local Z axis so that the pulley plane
//! contains the platform anchor. The frame anchor position is the point where
//! the cable enters the pulley; the cable wraps over the pulley and leaves it
//! tangentially towards the platform. Anchors without a pulley use the
//! vector-loop model.

use std::f64::consts::PI;

use cdpr_types::{KinematicChain, Pose, Pulley, Robot};
use nalgebra::{Rotation3, Vector3};

use crate::error::{KinematicsError, Result};
use crate::standard::{chain_points, single_platform, swivel, write_segment};
use crate::{Kinematics, KinematicsResult};

/// Kinematics honoring pulleys on frame anchors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PulleyKinematics;

/// Pulley state of one chain, in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PulleyContact {
    swivel: f64,
    wrap: f64,
    tangent: Vector3<f64>,
}

impl Kinematics for PulleyKinematics {
    fn backward(&self, robot: &Robot, poses: &[Pose]) -> Result<KinematicsResult> {
        let (platform, pose) = single_platform(robot, poses)?;
        let rows = platform.motion_pattern.dof_translation();
        let chains: Vec<&KinematicChain> = robot.chains_for(0).collect();
        let mut result = KinematicsResult::zeros(rows, chains.len());

        for (col, chain) in chains.into_iter().enumerate() {
            let (frame, anchor) = chain_points(robot, chain, col)?;
            let platform_point = pose.transform_point(&anchor);

            match frame.pulley {
                Some(pulley) => {
                    let contact = pulley_contact(
                        &frame.position,
                        &frame.orientation,
                        pulley,
                        &platform_point,
                    )
                    .ok_or(KinematicsError::InsidePulley { chain: col })?;
                    let free =
                        write_segment(&mut result, col, &contact.tangent, &platform_point, rows);
                    result.lengths[col] = pulley.radius.mul_add(contact.wrap, free);
                    result.swivel_angles[col] = contact.swivel;
                    result.wrap_angles[col] = contact.wrap;
                }
                None => {
                    write_segment(&mut result, col, &frame.position, &platform_point, rows);
                    result.swivel_angles[col] = swivel(&(frame.position - platform_point), rows);
                }
            }
        }

        Ok(result)
    }
}

/// Solve the pulley geometry for one cable.
///
/// Returns `None` if the platform point lies on or inside the pulley circle.
fn pulley_contact(
    inlet: &Vector3<f64>,
    orientation: &Rotation3<f64>,
    pulley: Pulley,
    platform_point: &Vector3<f64>,
) -> Option<PulleyContact> {
    let r = pulley.radius;
    let local = orientation.inverse() * (platform_point - inlet);

    let swivel = local.y.atan2(local.x);
    let (sin_s, cos_s) = swivel.sin_cos();
    let radial = Vector3::new(cos_s, sin_s, 0.0);
    let axial = Vector3::z();

    // Platform point relative to the pulley center, in the pulley plane.
    let rho = local.x.hypot(local.y) - r;
    let height = local.z;
    let distance = rho.hypot(height);
    if !(distance > r) {
        return None;
    }

    let wrap = PI - (r / distance).acos() - height.atan2(rho);
    let theta = PI - wrap;
    let center = radial * r;
    let tangent_local = center + (radial * theta.cos() + axial * theta.sin()) * r;

    Some(PulleyContact {
        swivel,
        wrap,
        tangent: inlet + orientation * tangent_local,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::StandardKinematics;
    use approx::assert_relative_eq;
    use cdpr_types::{Cable, FrameAnchor, MotionPattern, Platform, PlatformAnchor};

    fn hanging_robot(radius: f64) -> Robot {
        Robot::builder("hanging")
            .frame_anchor(
                FrameAnchor::at(Vector3::new(0.0, 0.0, 2.0)).with_pulley(Pulley::new(radius)),
            )
            .platform(Platform::new(MotionPattern::T3).with_anchor(PlatformAnchor::origin()))
            .cable(Cable::default())
            .chain(KinematicChain::new(0, 0, 0))
            .build()
            .unwrap()
    }

    #[test]
    fn test_tangent_point_on_pulley() {
        let r = 0.1;
        let inlet = Vector3::new(0.0, 0.0, 2.0);
        let point = Vector3::new(1.0, 0.5, 0.0);
        let contact =
            pulley_contact(&inlet, &Rotation3::identity(), Pulley::new(r), &point).unwrap();

        let (s, c) = contact.swivel.sin_cos();
        let center = inlet + Vector3::new(c, s, 0.0) * r;
        assert_relative_eq!((contact.tangent - center).norm(), r, epsilon = 1e-12);
        // Cable leaves tangentially.
        let radius_vec = contact.tangent - center;
        let cable = point - contact.tangent;
        assert_relative_eq!(radius_vec.dot(&cable), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wrap_straight_down_is_half_turn_limit() {
        let r = 1e-3;
        let robot = hanging_robot(r);
        // Platform far below and slightly offset so the swivel is defined.
        let pose = Pose::from_position(Vector3::new(r + 1e-9, 0.0, -1000.0));
        let result = PulleyKinematics.backward(&robot, &[pose]).unwrap();
        assert_relative_eq!(result.wrap_angles[0], PI, epsilon = 1e-3);
    }

    #[test]
    fn test_small_pulley_matches_standard() {
        let robot = hanging_robot(1e-9);
        let pose = Pose::from_position(Vector3::new(0.7, -0.3, 0.4));
        let with_pulley = PulleyKinematics.backward(&robot, &[pose]).unwrap();
        let standard = StandardKinematics.backward(&robot, &[pose]).unwrap();

        assert_relative_eq!(with_pulley.lengths[0], standard.lengths[0], epsilon = 1e-6);
        assert_relative_eq!(
            with_pulley.directions.column(0).into_owned(),
            standard.directions.column(0).into_owned(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_pulley_length_exceeds_free_length() {
        let robot = hanging_robot(0.05);
        let pose = Pose::from_position(Vector3::new(0.5, 0.5, 0.5));
        let result = PulleyKinematics.backward(&robot, &[pose]).unwrap();
        let free = (result.leave_points[0] - pose.position).norm();
        assert!(result.lengths[0] > free);
        assert!(result.wrap_angles[0] > 0.0);
    }

    #[test]
    fn test_inside_pulley_is_reported() {
        let robot = hanging_robot(0.5);
        // Center of the pulley when swivelled towards +X.
        let pose = Pose::from_position(Vector3::new(0.5, 0.0, 2.0));
        let err = PulleyKinematics.backward(&robot, &[pose]).unwrap_err();
        assert_eq!(err, KinematicsError::InsidePulley { chain: 0 });
        assert!(err.is_inadmissible());
    }

    #[test]
    fn test_dangling_frame_anchor_is_reported() {
        let mut robot = hanging_robot(0.05);
        robot.chains[0].frame_anchor = 3;
        let pose = Pose::from_position(Vector3::new(0.5, 0.5, 0.5));
        let err = PulleyKinematics.backward(&robot, &[pose]).unwrap_err();
        assert_eq!(
            err,
            KinematicsError::InvalidRobot(cdpr_types::RobotError::InvalidChain {
                chain: 0,
                kind: "frame anchor",
                index: 3,
            })
        );
        assert!(!err.is_inadmissible());
    }
}
