//! Wrench feasibility and wrench closure criteria.

use cdpr_kinematics::KinematicsModel;
use cdpr_statics::{ForceDistribution, ForceDistributionMethod, StructureMatrix};
use cdpr_types::{Pose, Robot};
use nalgebra::{DMatrix, DVector, Vector3};
use tracing::debug;

use crate::criterion::{Criterion, broadcast, solve_backward};
use crate::error::{WorkspaceError, WorkspaceResult};

/// Wrenches the cables must be able to balance.
#[derive(Debug, Clone, PartialEq)]
pub enum WrenchSet {
    /// Fixed wrenches, one per column (`dof` rows).
    Fixed(DMatrix<f64>),
    /// The weight of the platform under the given gravity vector.
    Gravitational(Vector3<f64>),
}

impl WrenchSet {
    fn at(&self, robot: &Robot, pose: &Pose) -> WorkspaceResult<DMatrix<f64>> {
        match self {
            Self::Fixed(wrenches) => Ok(wrenches.clone()),
            Self::Gravitational(gravity) => {
                let platform = robot
                    .platform()
                    .ok_or(WorkspaceError::NotImplemented("robots without a platform"))?;
                let wrench = platform.gravitational_wrench(pose, gravity);
                Ok(DMatrix::from_column_slice(wrench.len(), 1, wrench.as_slice()))
            }
        }
    }
}

/// Every wrench of a set can be balanced within the force bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct WrenchFeasible {
    wrenches: WrenchSet,
    force_min: DVector<f64>,
    force_max: DVector<f64>,
    method: ForceDistributionMethod,
    kinematics: KinematicsModel,
}

impl WrenchFeasible {
    /// Feasibility of fixed wrenches under per-cable (or single) force bounds.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidBounds`] if the bounds are empty,
    /// differ in length, or are not ordered.
    pub fn new(
        wrenches: DMatrix<f64>,
        force_min: DVector<f64>,
        force_max: DVector<f64>,
    ) -> WorkspaceResult<Self> {
        Self::with_set(WrenchSet::Fixed(wrenches), force_min, force_max)
    }

    /// Feasibility of holding the platform's own weight.
    ///
    /// # Errors
    ///
    /// See [`WrenchFeasible::new`].
    pub fn gravitational(
        gravity: Vector3<f64>,
        force_min: DVector<f64>,
        force_max: DVector<f64>,
    ) -> WorkspaceResult<Self> {
        Self::with_set(WrenchSet::Gravitational(gravity), force_min, force_max)
    }

    fn with_set(
        wrenches: WrenchSet,
        force_min: DVector<f64>,
        force_max: DVector<f64>,
    ) -> WorkspaceResult<Self> {
        if force_min.is_empty() || force_min.len() != force_max.len() {
            return Err(WorkspaceError::invalid_bounds(format!(
                "{} minimum and {} maximum forces",
                force_min.len(),
                force_max.len()
            )));
        }
        if force_min.iter().zip(force_max.iter()).any(|(lo, hi)| !(lo <= hi)) {
            return Err(WorkspaceError::invalid_bounds(
                "minimum force exceeds maximum force",
            ));
        }

        Ok(Self {
            wrenches,
            force_min,
            force_max,
            method: ForceDistributionMethod::default(),
            kinematics: KinematicsModel::default(),
        })
    }

    /// Use a different force distribution algorithm.
    #[must_use]
    pub const fn with_method(mut self, method: ForceDistributionMethod) -> Self {
        self.method = method;
        self
    }

    /// Use a different kinematic model.
    #[must_use]
    pub const fn with_kinematics(mut self, kinematics: KinematicsModel) -> Self {
        self.kinematics = kinematics;
        self
    }
}

impl Criterion for WrenchFeasible {
    fn evaluate(&self, robot: &Robot, pose: &Pose) -> WorkspaceResult<bool> {
        let Some(result) = solve_backward(self.kinematics, robot, pose)? else {
            return Ok(false);
        };
        let structure = StructureMatrix::from_kinematics(robot, pose, &result)?;
        let cables = structure.cols();
        let force_min = broadcast(&self.force_min, cables, "force_min")?;
        let force_max = broadcast(&self.force_max, cables, "force_max")?;
        let wrenches = self.wrenches.at(robot, pose)?;

        balances_all(&self.method, &structure, &wrenches, &force_min, &force_max)
    }
}

/// The cables can balance any wrench with positive forces.
///
/// Checked by balancing the positive and negative unit wrench along every
/// degree of freedom with forces bounded below by `minimum_force` and
/// unbounded above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrenchClosure {
    minimum_force: f64,
    method: ForceDistributionMethod,
    kinematics: KinematicsModel,
}

impl Default for WrenchClosure {
    fn default() -> Self {
        Self {
            minimum_force: 1e-3,
            method: ForceDistributionMethod::default(),
            kinematics: KinematicsModel::default(),
        }
    }
}

impl WrenchClosure {
    /// Closure check with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the smallest force a cable may carry.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidParameter`] if the force is negative
    /// or not finite.
    pub fn with_minimum_force(mut self, minimum_force: f64) -> WorkspaceResult<Self> {
        if !(minimum_force.is_finite() && minimum_force >= 0.0) {
            return Err(WorkspaceError::invalid_parameter(
                "minimum_force",
                format!("{minimum_force} is not a finite non-negative force"),
            ));
        }
        self.minimum_force = minimum_force;
        Ok(self)
    }

    /// Use a different force distribution algorithm.
    #[must_use]
    pub const fn with_method(mut self, method: ForceDistributionMethod) -> Self {
        self.method = method;
        self
    }

    /// Use a different kinematic model.
    #[must_use]
    pub const fn with_kinematics(mut self, kinematics: KinematicsModel) -> Self {
        self.kinematics = kinematics;
        self
    }
}

impl Criterion for WrenchClosure {
    fn evaluate(&self, robot: &Robot, pose: &Pose) -> WorkspaceResult<bool> {
        let Some(result) = solve_backward(self.kinematics, robot, pose)? else {
            return Ok(false);
        };
        let structure = StructureMatrix::from_kinematics(robot, pose, &result)?;
        if structure.is_singular() {
            return Ok(false);
        }

        let dof = structure.rows();
        let mut wrenches = DMatrix::zeros(dof, 2 * dof);
        for axis in 0..dof {
            wrenches[(axis, 2 * axis)] = 1.0;
            wrenches[(axis, 2 * axis + 1)] = -1.0;
        }
        let force_min = DVector::from_element(structure.cols(), self.minimum_force);
        let force_max = DVector::from_element(structure.cols(), f64::INFINITY);

        balances_all(&self.method, &structure, &wrenches, &force_min, &force_max)
    }
}

fn balances_all(
    method: &ForceDistributionMethod,
    structure: &StructureMatrix,
    wrenches: &DMatrix<f64>,
    force_min: &DVector<f64>,
    force_max: &DVector<f64>,
) -> WorkspaceResult<bool> {
    for (index, wrench) in wrenches.column_iter().enumerate() {
        match method.evaluate(&structure.matrix, &wrench.into_owned(), force_min, force_max) {
            Ok(_) => {}
            Err(e) if e.is_inadmissible() => {
                debug!(wrench = index, error = %e, "Wrench cannot be balanced");
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}
