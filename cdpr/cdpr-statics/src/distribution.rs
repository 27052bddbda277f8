//! Force distribution interface and shared helpers.

use nalgebra::{DMatrix, DVector};

use crate::closed_form::ClosedForm;
use crate::dykstra::Dykstra;
use crate::error::{StaticsError, StaticsResult};
use crate::reduction::ImprovedClosedForm;

/// Tolerance on the equilibrium residual, relative to the wrench magnitude.
pub(crate) const EQUILIBRIUM_TOLERANCE: f64 = 1e-6;

/// Computes cable forces balancing a wrench.
///
/// Given a structure matrix `A`, an external wrench `w` and per-cable force
/// bounds, find forces `f` with `A f + w = 0`.
pub trait ForceDistribution: Send + Sync {
    /// Compute a force distribution.
    ///
    /// # Errors
    ///
    /// Returns [`StaticsError::DimensionMismatch`] or
    /// [`StaticsError::InvalidBounds`] for malformed input, and an
    /// inadmissible error (see [`StaticsError::is_inadmissible`]) when no
    /// valid distribution exists.
    fn evaluate(
        &self,
        structure: &DMatrix<f64>,
        wrench: &DVector<f64>,
        force_min: &DVector<f64>,
        force_max: &DVector<f64>,
    ) -> StaticsResult<DVector<f64>>;
}

/// Value-level choice of force distribution algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForceDistributionMethod {
    /// Unbounded closed form.
    ClosedForm(ClosedForm),
    /// Closed form with recursive reduction of violated cables.
    ImprovedClosedForm(ImprovedClosedForm),
    /// Alternating projections.
    Dykstra(Dykstra),
}

impl Default for ForceDistributionMethod {
    fn default() -> Self {
        Self::Dykstra(Dykstra::default())
    }
}

impl ForceDistribution for ForceDistributionMethod {
    fn evaluate(
        &self,
        structure: &DMatrix<f64>,
        wrench: &DVector<f64>,
        force_min: &DVector<f64>,
        force_max: &DVector<f64>,
    ) -> StaticsResult<DVector<f64>> {
        match self {
            Self::ClosedForm(m) => m.evaluate(structure, wrench, force_min, force_max),
            Self::ImprovedClosedForm(m) => m.evaluate(structure, wrench, force_min, force_max),
            Self::Dykstra(m) => m.evaluate(structure, wrench, force_min, force_max),
        }
    }
}

/// Check that the problem dimensions agree and the bounds are ordered.
pub(crate) fn validate(
    structure: &DMatrix<f64>,
    wrench: &DVector<f64>,
    force_min: &DVector<f64>,
    force_max: &DVector<f64>,
) -> StaticsResult<()> {
    let (rows, cols) = structure.shape();
    if wrench.len() != rows {
        return Err(StaticsError::DimensionMismatch {
            context: "wrench",
            expected: rows,
            actual: wrench.len(),
        });
    }
    if force_min.len() != cols {
        return Err(StaticsError::DimensionMismatch {
            context: "minimum forces",
            expected: cols,
            actual: force_min.len(),
        });
    }
    if force_max.len() != cols {
        return Err(StaticsError::DimensionMismatch {
            context: "maximum forces",
            expected: cols,
            actual: force_max.len(),
        });
    }

    for (i, (lo, hi)) in force_min.iter().zip(force_max.iter()).enumerate() {
        if lo.is_nan() || hi.is_nan() {
            return Err(StaticsError::invalid_bounds(format!(
                "bounds of cable {i} are NaN"
            )));
        }
        if lo > hi {
            return Err(StaticsError::invalid_bounds(format!(
                "cable {i}: minimum {lo} exceeds maximum {hi}"
            )));
        }
    }

    Ok(())
}

/// Reference force around which the closed form is centered.
///
/// The midpoint of the bounds when both are finite, otherwise whichever bound
/// is finite, otherwise zero.
pub(crate) fn reference_forces(force_min: &DVector<f64>, force_max: &DVector<f64>) -> DVector<f64> {
    force_min.zip_map(force_max, |lo, hi| match (lo.is_finite(), hi.is_finite()) {
        (true, true) => 0.5 * (lo + hi),
        (true, false) => lo,
        (false, true) => hi,
        (false, false) => 0.0,
    })
}

/// Whether `structure * forces + wrench` vanishes within tolerance.
pub(crate) fn is_equilibrium(
    structure: &DMatrix<f64>,
    wrench: &DVector<f64>,
    forces: &DVector<f64>,
) -> bool {
    let residual = structure * forces + wrench;
    let scale = wrench.amax().max(1.0);
    residual.amax() <= EQUILIBRIUM_TOLERANCE * scale
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_forces() {
        let lo = DVector::from_vec(vec![1.0, 0.0, f64::NEG_INFINITY, f64::NEG_INFINITY]);
        let hi = DVector::from_vec(vec![3.0, f64::INFINITY, 2.0, f64::INFINITY]);
        let reference = reference_forces(&lo, &hi);
        assert_relative_eq!(reference[0], 2.0);
        assert_relative_eq!(reference[1], 0.0);
        assert_relative_eq!(reference[2], 2.0);
        assert_relative_eq!(reference[3], 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let a = DMatrix::from_row_slice(1, 2, &[-1.0, 1.0]);
        let w = DVector::from_vec(vec![0.0]);
        let lo = DVector::from_vec(vec![0.0, 0.0]);
        let hi = DVector::from_vec(vec![1.0, 1.0]);
        assert!(validate(&a, &w, &lo, &hi).is_ok());

        let err = validate(&a, &DVector::zeros(2), &lo, &hi).unwrap_err();
        assert!(matches!(err, StaticsError::DimensionMismatch { context: "wrench", .. }));

        let err = validate(&a, &w, &hi, &lo.add_scalar(-1.0)).unwrap_err();
        assert!(matches!(err, StaticsError::InvalidBounds { .. }));
        assert!(!err.is_inadmissible());

        let nan = DVector::from_vec(vec![f64::NAN, 0.0]);
        assert!(validate(&a, &w, &nan, &hi).is_err());
    }

    #[test]
    fn test_default_method_is_dykstra() {
        assert!(matches!(
            ForceDistributionMethod::default(),
            ForceDistributionMethod::Dykstra(_)
        ));
    }
}
