//! Cable-cable interference criterion.

use cdpr_kinematics::KinematicsModel;
use cdpr_types::{Pose, Robot};
use nalgebra::{Matrix2, Vector2, Vector3};

use crate::criterion::{Criterion, solve_backward};
use crate::error::{WorkspaceError, WorkspaceResult};

/// No two cables intersect.
///
/// Each cable is the straight segment from where it leaves the frame to its
/// platform anchor. Segments that only meet at a shared end point (cables
/// attached to the same anchor) do not interfere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interference {
    tolerance: f64,
    kinematics: KinematicsModel,
}

impl Default for Interference {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            kinematics: KinematicsModel::default(),
        }
    }
}

impl Interference {
    /// Interference check with default tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance below which two cables are considered touching.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Use a different kinematic model.
    #[must_use]
    pub const fn with_kinematics(mut self, kinematics: KinematicsModel) -> Self {
        self.kinematics = kinematics;
        self
    }
}

impl Criterion for Interference {
    fn evaluate(&self, robot: &Robot, pose: &Pose) -> WorkspaceResult<bool> {
        if robot.num_platforms() > 1 {
            return Err(WorkspaceError::NotImplemented(
                "interference of multi-platform robots",
            ));
        }
        let Some(result) = solve_backward(self.kinematics, robot, pose)? else {
            return Ok(false);
        };

        let segments: Vec<(Vector3<f64>, Vector3<f64>)> = robot
            .chains_for(0)
            .zip(result.leave_points.iter())
            .filter_map(|(chain, leave)| {
                robot
                    .platform_anchor(chain)
                    .map(|anchor| (*leave, pose.transform_point(&anchor.position)))
            })
            .collect();

        for (i, a) in segments.iter().enumerate() {
            for b in &segments[i + 1..] {
                if segments_intersect(a, b, self.tolerance) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }
}

/// Whether two segments cross anywhere other than a common end point.
///
/// Solves `[d_a, -d_b] λ = s_b - s_a` in the least-squares sense. Parallel
/// segments never count as intersecting.
fn segments_intersect(
    a: &(Vector3<f64>, Vector3<f64>),
    b: &(Vector3<f64>, Vector3<f64>),
    tolerance: f64,
) -> bool {
    let (sa, ea) = a;
    let (sb, eb) = b;
    let da = ea - sa;
    let db = eb - sb;
    let rhs = sb - sa;

    let normal = Matrix2::new(da.dot(&da), -da.dot(&db), -da.dot(&db), db.dot(&db));
    let scale = da.norm_squared() * db.norm_squared();
    if normal.determinant().abs() <= 1e-12 * scale.max(f64::MIN_POSITIVE) {
        return false;
    }
    let Some(inverse) = normal.try_inverse() else {
        return false;
    };
    let lambda = inverse * Vector2::new(da.dot(&rhs), -db.dot(&rhs));

    let within = |t: f64| (-tolerance..=1.0 + tolerance).contains(&t);
    if !(within(lambda.x) && within(lambda.y)) {
        return false;
    }

    let pa = sa + da * lambda.x;
    let pb = sb + db * lambda.y;
    if (pa - pb).norm() > tolerance {
        return false;
    }

    let near = |p: &Vector3<f64>, q: &Vector3<f64>| (p - q).norm() <= tolerance;
    let shared = [sa, ea]
        .into_iter()
        .any(|p| near(p, &pa) && (near(p, sb) || near(p, eb)));
    !shared
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::criterion::tests::linear_robot;
    use cdpr_types::{Cable, FrameAnchor, KinematicChain, MotionPattern, Platform, PlatformAnchor};

    fn segment(a: [f64; 3], b: [f64; 3]) -> (Vector3<f64>, Vector3<f64>) {
        (Vector3::from(a), Vector3::from(b))
    }

    #[test]
    fn test_crossing_segments() {
        let a = segment([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let b = segment([0.0, -1.0, 0.0], [0.0, 1.0, 0.0]);
        assert!(segments_intersect(&a, &b, 1e-9));
    }

    #[test]
    fn test_skew_segments() {
        let a = segment([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let b = segment([0.0, -1.0, 0.5], [0.0, 1.0, 0.5]);
        assert!(!segments_intersect(&a, &b, 1e-9));
    }

    #[test]
    fn test_disjoint_and_parallel_segments() {
        let a = segment([-1.0, 0.0, 0.0], [1.0, 0.0, 0.0]);
        let b = segment([2.0, -1.0, 0.0], [2.0, 1.0, 0.0]);
        assert!(!segments_intersect(&a, &b, 1e-9));

        let c = segment([-1.0, 1.0, 0.0], [1.0, 1.0, 0.0]);
        assert!(!segments_intersect(&a, &c, 1e-9));
    }

    #[test]
    fn test_shared_end_point_is_not_interference() {
        let a = segment([-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        let b = segment([1.0, 1.0, 0.0], [0.0, 0.0, 0.0]);
        assert!(!segments_intersect(&a, &b, 1e-9));
    }

    #[test]
    fn test_point_platform_is_admissible() {
        let robot = linear_robot();
        let pose = Pose::from_position(Vector3::new(0.2, 0.0, 0.0));
        assert!(Interference::new().evaluate(&robot, &pose).unwrap());
    }

    #[test]
    fn test_crossed_cables_interfere() {
        // Cables attached crosswise to a planar bar.
        let robot = Robot::builder("crossed")
            .frame_anchor(FrameAnchor::at(Vector3::new(-1.0, 1.0, 0.0)))
            .frame_anchor(FrameAnchor::at(Vector3::new(1.0, 1.0, 0.0)))
            .platform(
                Platform::new(MotionPattern::R1T2)
                    .with_anchor(PlatformAnchor::at(Vector3::new(0.5, 0.0, 0.0)))
                    .with_anchor(PlatformAnchor::at(Vector3::new(-0.5, 0.0, 0.0))),
            )
            .cables(2, Cable::default())
            .chain(KinematicChain::new(0, 0, 0))
            .chain(KinematicChain::new(1, 1, 1))
            .build()
            .unwrap();
        assert!(!Interference::new().evaluate(&robot, &Pose::identity()).unwrap());
    }
}
