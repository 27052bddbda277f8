//! Workspace determination for cable-driven parallel robots.
//!
//! A workspace is the set of coordinates where a [`Criterion`] holds for the
//! poses an [`Archetype`] generates. Two methods search coordinate space:
//!
//! - [`GridMethod`] - Classifies every coordinate of a regular grid
//! - [`HullMethod`] - Marches rays from a center to the workspace boundary
//!
//! # Criteria
//!
//! - [`CableLength`] - Cable lengths within bounds
//! - [`Singularities`] - Structure matrix of full rank
//! - [`WrenchFeasible`] - Given wrenches balanced within force bounds
//! - [`WrenchClosure`] - Any wrench balanced with positive forces
//! - [`Interference`] - No two cables cross
//!
//! # Example
//!
//! ```
//! use cdpr_types::{Cable, FrameAnchor, KinematicChain, MotionPattern, Platform, PlatformAnchor, Robot};
//! use cdpr_workspace::{CableLength, CancellationToken, GridConfig, GridMethod, Translation};
//! use nalgebra::Vector3;
//!
//! let robot = Robot::builder("linear")
//!     .frame_anchor(FrameAnchor::at(Vector3::new(-1.0, 0.0, 0.0)))
//!     .frame_anchor(FrameAnchor::at(Vector3::new(1.0, 0.0, 0.0)))
//!     .platform(Platform::new(MotionPattern::T1).with_anchor(PlatformAnchor::origin()))
//!     .cables(2, Cable::default())
//!     .chain(KinematicChain::new(0, 0, 0))
//!     .chain(KinematicChain::new(1, 0, 1))
//!     .build()?;
//!
//! let method = GridMethod::new(
//!     Translation::default(),
//!     CableLength::scalar(0.5, 1.5)?,
//!     GridConfig::new(vec![-1.0], vec![1.0], vec![49]),
//! );
//! let workspace = method.evaluate(&robot, &CancellationToken::new())?;
//!
//! assert!(workspace.contains(&[0.4]));
//! assert!(!workspace.contains(&[0.6]));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Failure Handling
//!
//! Failures that only concern one pose (a singular structure matrix, a force
//! distribution that does not converge, a platform inside a pulley) mark that
//! coordinate as outside the workspace. Malformed requests abort the sweep.

#![doc(html_root_url = "https://docs.rs/cdpr-workspace/0.1.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::neg_cmp_op_on_partial_ord, // !(x > y) rejects NaN
)]

mod archetype;
mod cancel;
mod convex;
mod criterion;
mod error;
mod grid;
mod hull;
mod interference;
mod mesh;
mod subdivide;
mod wrench;

pub use archetype::{
    Archetype, Comparator, Dextrous, InclusionOrientation, Maximum, Orientation,
    OrientationSweep, TotalOrientation, Translation, is_admissible,
};
pub use cancel::CancellationToken;
pub use convex::convex_hull;
pub use criterion::{CableLength, Criterion, Singularities};
pub use error::{WorkspaceError, WorkspaceResult};
pub use grid::{GridConfig, GridMethod, GridResult};
pub use hull::{HullConfig, HullMethod, HullResult, MAX_DEPTH, MAX_HALVINGS};
pub use interference::Interference;
pub use mesh::TriangleMesh;
pub use subdivide::{loop_subdivide, subdivide};
pub use wrench::{WrenchClosure, WrenchFeasible, WrenchSet};
