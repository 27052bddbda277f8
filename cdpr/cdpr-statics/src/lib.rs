//! Statics of cable-driven parallel robots.
//!
//! This crate relates cable forces to the wrench acting on the platform:
//!
//! - [`StructureMatrix`] - Maps cable forces to platform wrenches, with rank and null space
//! - [`ClosedForm`] - Direct or minimum-norm force solution, bounds ignored
//! - [`ImprovedClosedForm`] - Closed form with recursive reduction of violated cables
//! - [`Dykstra`] - Alternating projections onto equilibrium and force box
//!
//! # Example
//!
//! ```
//! use cdpr_statics::{Dykstra, ForceDistribution, StructureMatrix};
//! use nalgebra::{DMatrix, DVector};
//!
//! // Two cables pulling a slider in opposite directions.
//! let structure = StructureMatrix::from_matrix(DMatrix::from_row_slice(1, 2, &[-1.0, 1.0]));
//! assert!(!structure.is_singular());
//!
//! let wrench = DVector::from_vec(vec![0.5]);
//! let forces = Dykstra::default().evaluate(
//!     &structure.matrix,
//!     &wrench,
//!     &DVector::from_element(2, 1.0),
//!     &DVector::from_element(2, 10.0),
//! )?;
//! assert!((forces[1] - forces[0] + 0.5).abs() < 1e-6);
//! # Ok::<(), cdpr_statics::StaticsError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/cdpr-statics/0.1.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(clippy::missing_const_for_fn)]

mod closed_form;
mod distribution;
mod dykstra;
mod error;
mod reduction;
mod structure;

pub use closed_form::ClosedForm;
pub use distribution::{ForceDistribution, ForceDistributionMethod};
pub use dykstra::{Dykstra, DykstraConfig};
pub use error::{StaticsError, StaticsResult};
pub use reduction::ImprovedClosedForm;
pub use structure::StructureMatrix;
