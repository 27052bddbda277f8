//! Structure matrix of a cable-driven platform.
//!
//! The structure matrix `A` maps cable forces to the wrench they exert on the
//! platform. Equilibrium under an external wrench `w` reads
//!
//! ```text
//! A f + w = 0
//! ```
//!
//! Each column belongs to one cable. The first rows hold the unit direction of
//! the cable along the platform's translational axes; the remaining rows hold
//! the moment `(R b) × u` about the platform's rotational axes.

use cdpr_kinematics::KinematicsResult;
use cdpr_types::{MotionPattern, Pose, Robot};
use nalgebra::{DMatrix, DVector, SVD, Vector3};

use crate::error::{StaticsError, StaticsResult};

/// Structure matrix with its rank and null space.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureMatrix {
    /// The matrix (`dof` × cables).
    pub matrix: DMatrix<f64>,
    /// Orthonormal null space basis, one column per null direction.
    pub nullspace: DMatrix<f64>,
    /// Numerical rank.
    pub rank: usize,
    /// Singular values below this threshold count as zero.
    pub rank_tolerance: f64,
}

impl StructureMatrix {
    /// Build the structure matrix for a pose.
    ///
    /// `anchors` are the platform anchors in platform coordinates, one per
    /// cable, and `directions` are the unit cable directions restricted to the
    /// translational axes (`dof_translation` × cables), as produced by the
    /// kinematics.
    ///
    /// # Errors
    ///
    /// Returns [`StaticsError::DimensionMismatch`] if the anchor count does
    /// not match the direction columns or the direction rows do not match the
    /// motion pattern.
    pub fn evaluate(
        motion_pattern: MotionPattern,
        anchors: &[Vector3<f64>],
        pose: &Pose,
        directions: &DMatrix<f64>,
    ) -> StaticsResult<Self> {
        let translation = motion_pattern.dof_translation();
        if directions.nrows() != translation {
            return Err(StaticsError::DimensionMismatch {
                context: "direction rows",
                expected: translation,
                actual: directions.nrows(),
            });
        }
        if anchors.len() != directions.ncols() {
            return Err(StaticsError::DimensionMismatch {
                context: "anchor count",
                expected: directions.ncols(),
                actual: anchors.len(),
            });
        }

        let matrix = match motion_pattern {
            MotionPattern::T1 | MotionPattern::T2 | MotionPattern::T3 => directions.clone(),
            MotionPattern::R1T2 | MotionPattern::R2T3 | MotionPattern::R3T3 => {
                with_moment_rows(motion_pattern, anchors, pose, directions)
            }
        };

        Ok(Self::from_matrix(matrix))
    }

    /// Build the structure matrix from an inverse kinematics result.
    ///
    /// # Errors
    ///
    /// Returns an error if the robot has no platform, references a missing
    /// platform anchor, or does not match the kinematics result.
    pub fn from_kinematics(
        robot: &Robot,
        pose: &Pose,
        kinematics: &KinematicsResult,
    ) -> StaticsResult<Self> {
        let platform = robot.platform().ok_or(StaticsError::DimensionMismatch {
            context: "platform count",
            expected: 1,
            actual: 0,
        })?;

        let anchors = robot
            .chains_for(0)
            .map(|chain| {
                robot
                    .platform_anchor(chain)
                    .map(|anchor| anchor.position)
                    .ok_or(StaticsError::DimensionMismatch {
                        context: "platform anchors",
                        expected: chain.platform_anchor + 1,
                        actual: platform.anchors.len(),
                    })
            })
            .collect::<StaticsResult<Vec<_>>>()?;

        Self::evaluate(
            platform.motion_pattern,
            &anchors,
            pose,
            &kinematics.directions,
        )
    }

    /// Wrap an existing matrix, computing rank and null space.
    #[must_use]
    pub fn from_matrix(matrix: DMatrix<f64>) -> Self {
        let (rows, cols) = matrix.shape();

        // Pad wide matrices to square so the SVD yields a full right basis.
        let square = if rows < cols {
            let mut padded = DMatrix::zeros(cols, cols);
            padded.rows_mut(0, rows).copy_from(&matrix);
            padded
        } else {
            matrix.clone()
        };

        let svd = SVD::new(square, false, true);
        let sigma_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
        let rank_tolerance = rows.max(cols) as f64 * f64::EPSILON * sigma_max;

        let rank = svd
            .singular_values
            .iter()
            .filter(|&&s| s > rank_tolerance)
            .count();

        let nullspace = match svd.v_t.as_ref() {
            Some(v_t) => {
                let basis: Vec<DVector<f64>> = svd
                    .singular_values
                    .iter()
                    .enumerate()
                    .filter(|&(_, &s)| s <= rank_tolerance)
                    .map(|(i, _)| v_t.row(i).transpose())
                    .collect();
                if basis.is_empty() {
                    DMatrix::zeros(cols, 0)
                } else {
                    DMatrix::from_columns(&basis)
                }
            }
            None => DMatrix::zeros(cols, 0),
        };

        Self {
            matrix,
            nullspace,
            rank,
            rank_tolerance,
        }
    }

    /// Number of rows (platform degrees of freedom).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of columns (cables).
    #[must_use]
    pub fn cols(&self) -> usize {
        self.matrix.ncols()
    }

    /// Numerical rank.
    #[must_use]
    pub const fn rank(&self) -> usize {
        self.rank
    }

    /// Whether the matrix lost rank, i.e. the cables cannot span every wrench direction.
    #[must_use]
    pub fn is_singular(&self) -> bool {
        self.rank < self.rows()
    }

    /// Dimension of the null space (internal force directions).
    #[must_use]
    pub fn nullity(&self) -> usize {
        self.nullspace.ncols()
    }
}

fn with_moment_rows(
    motion_pattern: MotionPattern,
    anchors: &[Vector3<f64>],
    pose: &Pose,
    directions: &DMatrix<f64>,
) -> DMatrix<f64> {
    let translation = motion_pattern.dof_translation();
    let axes = motion_pattern.moment_axes();
    let mut matrix = DMatrix::zeros(translation + axes.len(), directions.ncols());

    for (col, anchor) in anchors.iter().enumerate() {
        let mut direction = Vector3::zeros();
        for row in 0..translation {
            direction[row] = directions[(row, col)];
            matrix[(row, col)] = directions[(row, col)];
        }

        let moment = pose.transform_vector(anchor).cross(&direction);
        for (offset, &axis) in axes.iter().enumerate() {
            matrix[(translation + offset, col)] = moment[axis];
        }
    }

    matrix
}
