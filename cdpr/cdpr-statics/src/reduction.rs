//! Improved closed form: closed form with recursive reduction.
//!
//! Whenever the closed-form forces violate a bound, the cable with the worst
//! violation is fixed at that bound. Its force contribution moves into the
//! wrench and the problem is solved again on the remaining cables. The
//! reduction stops once all forces are within bounds, or fails once fewer
//! cables than degrees of freedom remain.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::closed_form::pinv_correction;
use crate::distribution::{ForceDistribution, is_equilibrium, reference_forces, validate};
use crate::error::{StaticsError, StaticsResult};

/// Closed-form force distribution with recursive reduction of violated cables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImprovedClosedForm {
    /// Violations up to this magnitude are accepted.
    pub tolerance: f64,
}

impl Default for ImprovedClosedForm {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}

impl ImprovedClosedForm {
    /// Create with a violation tolerance.
    #[must_use]
    pub const fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl ForceDistribution for ImprovedClosedForm {
    fn evaluate(
        &self,
        structure: &DMatrix<f64>,
        wrench: &DVector<f64>,
        force_min: &DVector<f64>,
        force_max: &DVector<f64>,
    ) -> StaticsResult<DVector<f64>> {
        validate(structure, wrench, force_min, force_max)?;

        let rows = structure.nrows();
        let mut forces = DVector::zeros(structure.ncols());
        let mut active: Vec<usize> = (0..structure.ncols()).collect();
        let mut remaining = wrench.clone();

        loop {
            if active.len() < rows {
                debug!(active = active.len(), rows, "Reduction left too few cables");
                return Err(StaticsError::infeasible(format!(
                    "{} cables remain for {rows} degrees of freedom",
                    active.len()
                )));
            }

            let reduced = structure.select_columns(active.iter());
            let lo = force_min.select_rows(active.iter());
            let hi = force_max.select_rows(active.iter());
            let candidate = pinv_correction(&reduced, &remaining, &reference_forces(&lo, &hi))?;

            let worst = candidate
                .iter()
                .enumerate()
                .map(|(k, &f)| {
                    let violation = (lo[k] - f).max(f - hi[k]);
                    (k, violation)
                })
                .filter(|&(_, violation)| violation > self.tolerance)
                .max_by(|a, b| a.1.total_cmp(&b.1));

            match worst {
                None => {
                    for (k, &cable) in active.iter().enumerate() {
                        forces[cable] = candidate[k];
                    }
                    break;
                }
                Some((k, _)) => {
                    let bound = candidate[k].clamp(lo[k], hi[k]);
                    let cable = active.remove(k);
                    forces[cable] = bound;
                    remaining += structure.column(cable) * bound;
                }
            }
        }

        if is_equilibrium(structure, wrench, &forces) {
            Ok(forces)
        } else {
            Err(StaticsError::infeasible(
                "reduced structure matrix cannot balance the wrench",
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_matches_closed_form_when_feasible() {
        let a = DMatrix::from_row_slice(1, 2, &[-1.0, 1.0]);
        let w = DVector::from_vec(vec![0.5]);
        let lo = DVector::from_element(2, 1.0);
        let hi = DVector::from_element(2, 10.0);

        let f = ImprovedClosedForm::default()
            .evaluate(&a, &w, &lo, &hi)
            .unwrap();
        assert_relative_eq!(f[0], 5.75, epsilon = 1e-12);
        assert_relative_eq!(f[1], 5.25, epsilon = 1e-12);
    }

    #[test]
    fn test_clamps_violated_cable() {
        let a = DMatrix::from_row_slice(1, 3, &[-1.0, 1.0, 1.0]);
        let w = DVector::zeros(1);
        let lo = DVector::zeros(3);
        let hi = DVector::from_element(3, 6.0);

        let f = ImprovedClosedForm::default()
            .evaluate(&a, &w, &lo, &hi)
            .unwrap();
        assert_relative_eq!(f[0], 6.0, epsilon = 1e-12);
        assert_relative_eq!(f[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(f[2], 3.0, epsilon = 1e-12);
        assert_relative_eq!((&a * &f)[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_infeasible_when_reduced_below_rank() {
        // The opposing cable would need a force outside [1, 2].
        let a = DMatrix::from_row_slice(1, 2, &[-1.0, 1.0]);
        let w = DVector::from_vec(vec![5.0]);
        let lo = DVector::from_element(2, 1.0);
        let hi = DVector::from_element(2, 2.0);

        let err = ImprovedClosedForm::default()
            .evaluate(&a, &w, &lo, &hi)
            .unwrap_err();
        assert!(matches!(err, StaticsError::Infeasible { .. }));
        assert!(err.is_inadmissible());
    }
}
