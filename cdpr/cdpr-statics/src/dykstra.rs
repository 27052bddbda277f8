//! Force distribution by Dykstra's alternating projections.
//!
//! The feasible forces are the intersection of the affine equilibrium set
//! `{f : A f = -w}` and the box `[f_min, f_max]`. Dykstra's method alternates
//! the two Euclidean projections with correction increments and converges to
//! the point of the intersection closest to the reference forces.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::closed_form::pseudo_inverse;
use crate::distribution::{ForceDistribution, reference_forces, validate};
use crate::error::{StaticsError, StaticsResult};

/// Configuration for [`Dykstra`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DykstraConfig {
    /// Accepted distance between the affine and the box iterate (∞-norm).
    pub eps_projection: f64,
    /// Box iterate change below which the iteration has stalled (∞-norm).
    pub eps_convergence: f64,
    /// Iteration budget.
    pub max_iterations: usize,
}

impl Default for DykstraConfig {
    fn default() -> Self {
        Self {
            eps_projection: 1e-3,
            eps_convergence: 1e-6,
            max_iterations: 5000,
        }
    }
}

impl DykstraConfig {
    /// Tight tolerances for accurate force values.
    #[must_use]
    pub fn precise() -> Self {
        Self {
            eps_projection: 1e-8,
            eps_convergence: 1e-12,
            max_iterations: 50_000,
        }
    }

    /// Set the projection tolerance.
    #[must_use]
    pub const fn with_eps_projection(mut self, eps: f64) -> Self {
        self.eps_projection = eps;
        self
    }

    /// Set the convergence tolerance.
    #[must_use]
    pub const fn with_eps_convergence(mut self, eps: f64) -> Self {
        self.eps_convergence = eps;
        self
    }

    /// Set the iteration budget.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Alternating-projection force distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Dykstra {
    /// Solver configuration.
    pub config: DykstraConfig,
}

impl Dykstra {
    /// Create with a configuration.
    #[must_use]
    pub const fn new(config: DykstraConfig) -> Self {
        Self { config }
    }
}

impl ForceDistribution for Dykstra {
    fn evaluate(
        &self,
        structure: &DMatrix<f64>,
        wrench: &DVector<f64>,
        force_min: &DVector<f64>,
        force_max: &DVector<f64>,
    ) -> StaticsResult<DVector<f64>> {
        validate(structure, wrench, force_min, force_max)?;

        let pinv = pseudo_inverse(structure)?;
        let project_affine = |x: &DVector<f64>| x - &pinv * (structure * x + wrench);
        let project_box = |x: &DVector<f64>| {
            DVector::from_fn(x.len(), |i, _| x[i].clamp(force_min[i], force_max[i]))
        };

        let cols = structure.ncols();
        let mut x = reference_forces(force_min, force_max);
        let mut p = DVector::zeros(cols);
        let mut q = DVector::zeros(cols);

        for iteration in 1..=self.config.max_iterations {
            let y = project_affine(&(&x + &p));
            p = &x + &p - &y;

            let next = project_box(&(&y + &q));
            q = &y + &q - &next;

            let gap = (&next - &y).amax();
            let step = (&next - &x).amax();
            x = next;

            if gap <= self.config.eps_projection {
                return Ok(x);
            }
            if step <= self.config.eps_convergence {
                debug!(iteration, gap, "Dykstra stalled outside the equilibrium set");
                return Err(StaticsError::infeasible(format!(
                    "projections stalled {gap:.3e} apart"
                )));
            }
        }

        debug!(iterations = self.config.max_iterations, "Dykstra exhausted its budget");
        Err(StaticsError::NotConverged {
            iterations: self.config.max_iterations,
        })
    }
}
