//! Pose admissibility criteria.
//!
//! A criterion decides whether a single pose belongs to the workspace. All
//! collaborators (kinematic model, force distribution) are fixed at
//! construction, so evaluation is a pure function of robot and pose.

use cdpr_kinematics::{Kinematics, KinematicsModel, KinematicsResult};
use cdpr_statics::StructureMatrix;
use cdpr_types::{Pose, Robot};
use nalgebra::DVector;

use crate::error::{WorkspaceError, WorkspaceResult};

/// A pose predicate.
pub trait Criterion: Send + Sync {
    /// Whether `pose` is admissible for `robot`.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed requests. Geometric or numeric failures
    /// at this particular pose are reported as `Ok(false)`.
    fn evaluate(&self, robot: &Robot, pose: &Pose) -> WorkspaceResult<bool>;
}

impl<C: Criterion + ?Sized> Criterion for &C {
    fn evaluate(&self, robot: &Robot, pose: &Pose) -> WorkspaceResult<bool> {
        (**self).evaluate(robot, pose)
    }
}

impl<C: Criterion + ?Sized> Criterion for Box<C> {
    fn evaluate(&self, robot: &Robot, pose: &Pose) -> WorkspaceResult<bool> {
        (**self).evaluate(robot, pose)
    }
}

/// Inverse kinematics at one pose, with inadmissible failures mapped to `None`.
pub(crate) fn solve_backward(
    kinematics: KinematicsModel,
    robot: &Robot,
    pose: &Pose,
) -> WorkspaceResult<Option<KinematicsResult>> {
    match kinematics.backward(robot, std::slice::from_ref(pose)) {
        Ok(result) => Ok(Some(result)),
        Err(e) if e.is_inadmissible() => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Expand per-cable bounds; a single value applies to every cable.
pub(crate) fn broadcast(
    bounds: &DVector<f64>,
    cables: usize,
    name: &'static str,
) -> WorkspaceResult<DVector<f64>> {
    match bounds.len() {
        1 => Ok(DVector::from_element(cables, bounds[0])),
        n if n == cables => Ok(bounds.clone()),
        n => Err(WorkspaceError::invalid_parameter(
            name,
            format!("{n} values given for {cables} cables"),
        )),
    }
}

/// Cable lengths within bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct CableLength {
    min: DVector<f64>,
    max: DVector<f64>,
    kinematics: KinematicsModel,
}

impl CableLength {
    /// Per-cable length bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidBounds`] if the bounds are empty,
    /// differ in length, are negative, or are not ordered.
    pub fn new(min: DVector<f64>, max: DVector<f64>) -> WorkspaceResult<Self> {
        if min.is_empty() || min.len() != max.len() {
            return Err(WorkspaceError::invalid_bounds(format!(
                "{} minimum and {} maximum cable lengths",
                min.len(),
                max.len()
            )));
        }
        for (i, (lo, hi)) in min.iter().zip(max.iter()).enumerate() {
            if !(*lo >= 0.0) {
                return Err(WorkspaceError::invalid_bounds(format!(
                    "cable {i}: minimum length {lo} is negative"
                )));
            }
            if !(lo <= hi) {
                return Err(WorkspaceError::invalid_bounds(format!(
                    "cable {i}: minimum length {lo} exceeds maximum {hi}"
                )));
            }
        }

        Ok(Self {
            min,
            max,
            kinematics: KinematicsModel::default(),
        })
    }

    /// The same bounds for every cable.
    ///
    /// # Errors
    ///
    /// See [`CableLength::new`].
    pub fn scalar(min: f64, max: f64) -> WorkspaceResult<Self> {
        Self::new(DVector::from_element(1, min), DVector::from_element(1, max))
    }

    /// Use a different kinematic model.
    #[must_use]
    pub const fn with_kinematics(mut self, kinematics: KinematicsModel) -> Self {
        self.kinematics = kinematics;
        self
    }
}

impl Criterion for CableLength {
    fn evaluate(&self, robot: &Robot, pose: &Pose) -> WorkspaceResult<bool> {
        let Some(result) = solve_backward(self.kinematics, robot, pose)? else {
            return Ok(false);
        };
        let cables = result.num_cables();
        let min = broadcast(&self.min, cables, "min")?;
        let max = broadcast(&self.max, cables, "max")?;

        Ok(result
            .lengths
            .iter()
            .enumerate()
            .all(|(i, &l)| min[i] <= l && l <= max[i]))
    }
}

/// Structure matrix of full rank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Singularities {
    kinematics: KinematicsModel,
}

impl Singularities {
    /// Singularity check with the standard kinematic model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different kinematic model.
    #[must_use]
    pub const fn with_kinematics(mut self, kinematics: KinematicsModel) -> Self {
        self.kinematics = kinematics;
        self
    }
}

impl Criterion for Singularities {
    fn evaluate(&self, robot: &Robot, pose: &Pose) -> WorkspaceResult<bool> {
        let Some(result) = solve_backward(self.kinematics, robot, pose)? else {
            return Ok(false);
        };
        let structure = StructureMatrix::from_kinematics(robot, pose, &result)?;
        Ok(!structure.is_singular())
    }
}
