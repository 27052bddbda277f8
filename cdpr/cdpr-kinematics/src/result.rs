//! Result of an inverse kinematics evaluation.

use nalgebra::{DMatrix, DVector, Vector3};

/// Cable state at a pose, one column/entry per kinematic chain.
#[derive(Debug, Clone, PartialEq)]
pub struct KinematicsResult {
    /// Cable lengths.
    pub lengths: DVector<f64>,

    /// Unit cable directions pointing from the platform towards the frame,
    /// restricted to the platform's translational axes
    /// (`dof_translation` × chains). Zero for zero-length cables.
    pub directions: DMatrix<f64>,

    /// Swivel angle of each cable about the anchor's vertical axis.
    pub swivel_angles: DVector<f64>,

    /// Angle of pulley contact; zero without pulleys.
    pub wrap_angles: DVector<f64>,

    /// World point where each cable leaves the frame (anchor or pulley tangent point).
    pub leave_points: Vec<Vector3<f64>>,
}

impl KinematicsResult {
    /// Allocate a zeroed result for `rows` translational axes and `chains` cables.
    #[must_use]
    pub fn zeros(rows: usize, chains: usize) -> Self {
        Self {
            lengths: DVector::zeros(chains),
            directions: DMatrix::zeros(rows, chains),
            swivel_angles: DVector::zeros(chains),
            wrap_angles: DVector::zeros(chains),
            leave_points: vec![Vector3::zeros(); chains],
        }
    }

    /// Number of cables.
    #[must_use]
    pub fn num_cables(&self) -> usize {
        self.lengths.len()
    }

    /// Shortest cable length.
    #[must_use]
    pub fn min_length(&self) -> f64 {
        self.lengths.min()
    }

    /// Longest cable length.
    #[must_use]
    pub fn max_length(&self) -> f64 {
        self.lengths.max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_shape() {
        let result = KinematicsResult::zeros(2, 4);
        assert_eq!(result.num_cables(), 4);
        assert_eq!(result.directions.shape(), (2, 4));
        assert_eq!(result.leave_points.len(), 4);
    }
}
