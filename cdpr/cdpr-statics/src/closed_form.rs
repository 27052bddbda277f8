//! Closed-form force distribution.
//!
//! For a square structure matrix the forces follow from a direct solve. For a
//! redundant robot the minimum-norm correction around the reference forces is
//!
//! ```text
//! f = f_ref - A⁺ (w + A f_ref)
//! ```
//!
//! The result satisfies the equilibrium but is not guaranteed to respect the
//! force bounds.

use nalgebra::{DMatrix, DVector};

use crate::distribution::{ForceDistribution, is_equilibrium, reference_forces, validate};
use crate::error::{StaticsError, StaticsResult};

/// Singular values below this are dropped by the pseudo-inverse.
pub(crate) const PINV_EPSILON: f64 = 1e-12;

/// Unbounded closed-form force distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClosedForm;

impl ForceDistribution for ClosedForm {
    fn evaluate(
        &self,
        structure: &DMatrix<f64>,
        wrench: &DVector<f64>,
        force_min: &DVector<f64>,
        force_max: &DVector<f64>,
    ) -> StaticsResult<DVector<f64>> {
        validate(structure, wrench, force_min, force_max)?;

        if structure.is_square() {
            return structure
                .clone()
                .lu()
                .solve(&(-wrench))
                .ok_or(StaticsError::Singular);
        }

        let reference = reference_forces(force_min, force_max);
        let forces = pinv_correction(structure, wrench, &reference)?;
        if is_equilibrium(structure, wrench, &forces) {
            Ok(forces)
        } else {
            Err(StaticsError::Singular)
        }
    }
}

/// Correct `reference` onto the affine set `{f : A f = -w}` along the
/// minimum-norm direction.
pub(crate) fn pinv_correction(
    structure: &DMatrix<f64>,
    wrench: &DVector<f64>,
    reference: &DVector<f64>,
) -> StaticsResult<DVector<f64>> {
    let pinv = pseudo_inverse(structure)?;
    Ok(reference - pinv * (wrench + structure * reference))
}

pub(crate) fn pseudo_inverse(structure: &DMatrix<f64>) -> StaticsResult<DMatrix<f64>> {
    structure
        .clone()
        .pseudo_inverse(PINV_EPSILON)
        .map_err(|_| StaticsError::Singular)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_solve() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, -1.0, 1.0, 1.0]);
        let w = DVector::from_vec(vec![-1.0, -3.0]);
        let lo = DVector::zeros(2);
        let hi = DVector::from_element(2, 10.0);

        let f = ClosedForm.evaluate(&a, &w, &lo, &hi).unwrap();
        assert_relative_eq!(&a * &f + &w, DVector::zeros(2), epsilon = 1e-12);
        assert_relative_eq!(f[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(f[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_square_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let w = DVector::from_vec(vec![1.0, 2.0]);
        let bounds = DVector::zeros(2);
        let err = ClosedForm.evaluate(&a, &w, &bounds, &bounds).unwrap_err();
        assert_eq!(err, StaticsError::Singular);
    }

    #[test]
    fn test_redundant_centers_on_mean() {
        // Two opposing cables on a linear axis.
        let a = DMatrix::from_row_slice(1, 2, &[-1.0, 1.0]);
        let w = DVector::from_vec(vec![0.5]);
        let lo = DVector::from_element(2, 1.0);
        let hi = DVector::from_element(2, 10.0);

        let f = ClosedForm.evaluate(&a, &w, &lo, &hi).unwrap();
        assert_relative_eq!(f[0], 5.75, epsilon = 1e-12);
        assert_relative_eq!(f[1], 5.25, epsilon = 1e-12);
    }

    #[test]
    fn test_redundant_may_violate_bounds() {
        let a = DMatrix::from_row_slice(1, 3, &[-1.0, 1.0, 1.0]);
        let w = DVector::zeros(1);
        let lo = DVector::zeros(3);
        let hi = DVector::from_element(3, 6.0);

        let f = ClosedForm.evaluate(&a, &w, &lo, &hi).unwrap();
        assert!(f[0] > 6.0);
        assert_relative_eq!((&a * &f)[0], 0.0, epsilon = 1e-12);
    }
}
