//! Forward kinematics by derivative-free least squares.
//!
//! The platform pose is found by minimizing
//!
//! ```text
//! f(x) = |l(x) - l_measured|²
//! ```
//!
//! over the translational coordinates and, for rotating platforms, a unit
//! quaternion. The optimizer works on scaled variables `y = s ⊙ x`; bounds are
//! enforced by clamping the position inside the cost function.

use argmin::core::{CostFunction, Executor, State};
use argmin::solver::neldermead::NelderMead;
use cdpr_types::{Pose, Robot};
use nalgebra::{DVector, Quaternion, UnitQuaternion, Vector3};
use tracing::debug;

use crate::Kinematics;
use crate::error::{KinematicsError, Result};

/// Cost returned when the backward solve fails inside the optimizer.
const PENALTY: f64 = 1e10;

/// Options for the forward kinematics solve.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardOptions {
    /// Initial guess.
    pub initial: Pose,
    /// Lower position bound.
    pub lower: Vector3<f64>,
    /// Upper position bound.
    pub upper: Vector3<f64>,
    /// Scale applied to position coordinates.
    pub position_scale: f64,
    /// Scale applied to quaternion coordinates.
    pub quaternion_scale: f64,
    /// Edge length of the initial simplex, in scaled units.
    pub simplex_size: f64,
    /// Maximum optimizer iterations.
    pub max_iterations: u64,
    /// Accepted squared length residual.
    pub tolerance: f64,
}

impl Default for ForwardOptions {
    fn default() -> Self {
        Self {
            initial: Pose::identity(),
            lower: Vector3::repeat(f64::NEG_INFINITY),
            upper: Vector3::repeat(f64::INFINITY),
            position_scale: 1.0,
            quaternion_scale: 1.0,
            simplex_size: 0.1,
            max_iterations: 5000,
            tolerance: 1e-10,
        }
    }
}

impl ForwardOptions {
    /// Options starting from an initial guess.
    #[must_use]
    pub fn from_initial(initial: Pose) -> Self {
        Self {
            initial,
            ..Self::default()
        }
    }

    /// Set position bounds.
    #[must_use]
    pub const fn with_bounds(mut self, lower: Vector3<f64>, upper: Vector3<f64>) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    /// Set variable scaling.
    #[must_use]
    pub const fn with_scaling(mut self, position: f64, quaternion: f64) -> Self {
        self.position_scale = position;
        self.quaternion_scale = quaternion;
        self
    }

    /// Set maximum iterations.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: u64) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set accepted squared residual.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Squared length residual as a function of the scaled pose state.
struct LengthResidual<'a, K: ?Sized> {
    kinematics: &'a K,
    robot: &'a Robot,
    measured: &'a DVector<f64>,
    options: &'a ForwardOptions,
    translation: usize,
    rotating: bool,
}

impl<K: ?Sized> Clone for LengthResidual<'_, K> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<K: Kinematics + ?Sized> LengthResidual<'_, K> {
    fn encode(&self, pose: &Pose) -> Vec<f64> {
        let mut state: Vec<f64> = pose
            .position
            .iter()
            .take(self.translation)
            .map(|x| x * self.options.position_scale)
            .collect();
        if self.rotating {
            let q = pose.quaternion();
            state.extend(
                [q.w, q.i, q.j, q.k]
                    .into_iter()
                    .map(|x| x * self.options.quaternion_scale),
            );
        }
        state
    }

    fn decode(&self, state: &[f64]) -> Pose {
        let mut position = self.options.initial.position;
        for axis in 0..self.translation {
            position[axis] = (state[axis] / self.options.position_scale)
                .clamp(self.options.lower[axis], self.options.upper[axis]);
        }

        let orientation = if self.rotating {
            let s = self.options.quaternion_scale;
            let q = &state[self.translation..self.translation + 4];
            let raw = Quaternion::new(q[0] / s, q[1] / s, q[2] / s, q[3] / s);
            if raw.norm() > f64::EPSILON {
                UnitQuaternion::from_quaternion(raw).to_rotation_matrix()
            } else {
                self.options.initial.orientation
            }
        } else {
            self.options.initial.orientation
        };

        Pose::new(position, orientation)
    }
}

impl<K: Kinematics + ?Sized> CostFunction for LengthResidual<'_, K> {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, state: &Self::Param) -> std::result::Result<Self::Output, argmin::core::Error> {
        let pose = self.decode(state);
        match self.kinematics.backward(self.robot, &[pose]) {
            Ok(estimate) => Ok((estimate.lengths - self.measured).norm_squared()),
            Err(_) => Ok(PENALTY),
        }
    }
}

/// Solve forward kinematics for any backward model.
///
/// # Errors
///
/// - [`KinematicsError::LengthCount`] if `lengths` does not match the chain count
/// - [`KinematicsError::NotImplemented`] for multi-platform robots
/// - [`KinematicsError::ForwardNotConverged`] if the residual stays above tolerance
/// - [`KinematicsError::Optimizer`] if the optimizer fails
pub fn solve_forward<K: Kinematics + ?Sized>(
    kinematics: &K,
    robot: &Robot,
    lengths: &DVector<f64>,
    options: &ForwardOptions,
) -> Result<Pose> {
    let platform = match robot.platforms.as_slice() {
        [platform] => platform,
        [] => return Err(cdpr_types::RobotError::NoPlatform.into()),
        _ => return Err(KinematicsError::NotImplemented("multi-platform robots")),
    };
    let chains = robot.chains_for(0).count();
    if lengths.len() != chains {
        return Err(KinematicsError::LengthCount {
            expected: chains,
            actual: lengths.len(),
        });
    }

    let problem = LengthResidual {
        kinematics,
        robot,
        measured: lengths,
        options,
        translation: platform.motion_pattern.dof_translation(),
        rotating: !platform.motion_pattern.is_point(),
    };

    let start = problem.encode(&options.initial);
    let mut simplex = Vec::with_capacity(start.len() + 1);
    simplex.push(start.clone());
    for i in 0..start.len() {
        let mut vertex = start.clone();
        vertex[i] += options.simplex_size;
        simplex.push(vertex);
    }

    let solver = NelderMead::new(simplex)
        .with_sd_tolerance(options.tolerance * 1e-3)
        .map_err(|e| KinematicsError::Optimizer(e.to_string()))?;
    let outcome = Executor::new(problem.clone(), solver)
        .configure(|state| state.max_iters(options.max_iterations))
        .run()
        .map_err(|e| KinematicsError::Optimizer(e.to_string()))?;

    let state = outcome.state();
    let residual = state.get_best_cost();
    let iterations = state.get_iter();
    debug!(residual, iterations, "Forward kinematics finished");

    match state.get_best_param() {
        Some(best) if residual <= options.tolerance => Ok(problem.decode(best)),
        _ => Err(KinematicsError::ForwardNotConverged {
            residual,
            iterations,
        }),
    }
}
