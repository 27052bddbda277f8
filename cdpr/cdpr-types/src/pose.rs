//! Platform pose.

use nalgebra::{Rotation3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::EulerSequence;

/// Position and orientation of a platform, with an optional time tag.
///
/// Poses are plain values: equality compares position, orientation and time.
///
/// # Example
///
/// ```
/// use cdpr_types::Pose;
/// use nalgebra::Vector3;
///
/// let pose = Pose::from_position(Vector3::new(1.0, 2.0, 3.0));
/// let world = pose.transform_point(&Vector3::new(1.0, 0.0, 0.0));
/// assert_eq!(world, Vector3::new(2.0, 2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position of the platform reference point in world coordinates.
    pub position: Vector3<f64>,
    /// Orientation of the platform frame.
    pub orientation: Rotation3<f64>,
    /// Optional time tag.
    pub time: Option<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Pose at the origin with identity orientation.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: Rotation3::identity(),
            time: None,
        }
    }

    /// Pose from position and orientation.
    #[must_use]
    pub const fn new(position: Vector3<f64>, orientation: Rotation3<f64>) -> Self {
        Self {
            position,
            orientation,
            time: None,
        }
    }

    /// Pose from position only (identity orientation).
    #[must_use]
    pub fn from_position(position: Vector3<f64>) -> Self {
        Self::new(position, Rotation3::identity())
    }

    /// Pose from position and Euler angles in the given sequence.
    #[must_use]
    pub fn from_euler(position: Vector3<f64>, angles: [f64; 3], sequence: EulerSequence) -> Self {
        Self::new(position, sequence.to_rotation(angles))
    }

    /// Pose from position and a unit quaternion.
    #[must_use]
    pub fn from_quaternion(position: Vector3<f64>, quaternion: &UnitQuaternion<f64>) -> Self {
        Self::new(position, quaternion.to_rotation_matrix())
    }

    /// Attach a time tag.
    #[must_use]
    pub const fn with_time(mut self, time: f64) -> Self {
        self.time = Some(time);
        self
    }

    /// Orientation as a unit quaternion.
    #[must_use]
    pub fn quaternion(&self) -> UnitQuaternion<f64> {
        UnitQuaternion::from_rotation_matrix(&self.orientation)
    }

    /// Transform a point from platform to world coordinates.
    #[must_use]
    pub fn transform_point(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.position + self.orientation * local
    }

    /// Rotate a vector from platform to world coordinates.
    #[must_use]
    pub fn transform_vector(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.orientation * local
    }

    /// Check if the pose contains `NaN` or `Inf` values.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|x| x.is_finite())
            && self.orientation.matrix().iter().all(|x| x.is_finite())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_value_equality() {
        let a = Pose::from_position(Vector3::new(1.0, 0.0, 0.0));
        let b = Pose::from_position(Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(a, b);
        assert_ne!(a, b.with_time(0.5));
    }

    #[test]
    fn test_quaternion_round_trip() {
        let q = UnitQuaternion::from_euler_angles(0.1, -0.2, 0.3);
        let pose = Pose::from_quaternion(Vector3::zeros(), &q);
        assert_relative_eq!(pose.quaternion().angle_to(&q), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_is_finite() {
        assert!(Pose::identity().is_finite());
        let bad = Pose::from_position(Vector3::new(f64::NAN, 0.0, 0.0));
        assert!(!bad.is_finite());
    }
}
