//! Property-based tests for force distribution.
//!
//! Run with: cargo test -p cdpr-statics -- proptest

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use cdpr_statics::{
    ClosedForm, Dykstra, DykstraConfig, ForceDistribution, ImprovedClosedForm, StructureMatrix,
};
use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A redundant planar structure matrix: four cables, three degrees of freedom.
fn arb_structure() -> impl Strategy<Value = DMatrix<f64>> {
    prop::collection::vec(-1.0..1.0f64, 12)
        .prop_map(|values| DMatrix::from_column_slice(3, 4, &values))
}

/// A well-conditioned square matrix.
fn arb_square() -> impl Strategy<Value = DMatrix<f64>> {
    prop::collection::vec(-0.3..0.3f64, 9)
        .prop_map(|values| DMatrix::identity(3, 3) + DMatrix::from_column_slice(3, 3, &values))
}

fn arb_wrench() -> impl Strategy<Value = DVector<f64>> {
    prop::collection::vec(-2.0..2.0f64, 3).prop_map(DVector::from_vec)
}

fn bounds() -> (DVector<f64>, DVector<f64>) {
    (DVector::from_element(4, 0.5), DVector::from_element(4, 10.0))
}

fn within(forces: &DVector<f64>, lo: &DVector<f64>, hi: &DVector<f64>, tol: f64) -> bool {
    forces
        .iter()
        .zip(lo.iter().zip(hi.iter()))
        .all(|(f, (l, h))| *f >= l - tol && *f <= h + tol)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_closed_form_square_balances(a in arb_square(), w in arb_wrench()) {
        let lo = DVector::zeros(3);
        let hi = DVector::from_element(3, f64::INFINITY);
        let f = ClosedForm.evaluate(&a, &w, &lo, &hi).unwrap();
        prop_assert!((&a * &f + &w).amax() < 1e-9);
    }

    #[test]
    fn proptest_dykstra_respects_box(a in arb_structure(), w in arb_wrench()) {
        let (lo, hi) = bounds();
        let solver = Dykstra::new(DykstraConfig::default().with_eps_projection(1e-6));
        if let Ok(f) = solver.evaluate(&a, &w, &lo, &hi) {
            prop_assert!(within(&f, &lo, &hi, 0.0));
            prop_assert!((&a * &f + &w).amax() < 1e-4);
        }
    }

    #[test]
    fn proptest_improved_closed_form_respects_box(a in arb_structure(), w in arb_wrench()) {
        let (lo, hi) = bounds();
        let solver = ImprovedClosedForm::default();
        if let Ok(f) = solver.evaluate(&a, &w, &lo, &hi) {
            prop_assert!(within(&f, &lo, &hi, 1e-9));
            prop_assert!((&a * &f + &w).amax() < 1e-6 * w.amax().max(1.0));
        }
    }

    #[test]
    fn proptest_nullspace_is_annihilated(a in arb_structure()) {
        let structure = StructureMatrix::from_matrix(a.clone());
        prop_assert_eq!(structure.rank() + structure.nullity(), 4);
        prop_assert!((&a * &structure.nullspace).amax() < 1e-9);
    }
}
