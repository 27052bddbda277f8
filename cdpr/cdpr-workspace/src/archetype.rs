//! Archetypes expand a workspace coordinate into the poses to check.
//!
//! | Archetype | Coordinate | Orientations | Comparator |
//! |-----------|------------|--------------|------------|
//! | [`Translation`] | position | one fixed | all |
//! | [`Orientation`] | Euler angles | the coordinate | all |
//! | [`Dextrous`] | position | full angle box | all |
//! | [`TotalOrientation`] | position | user angle box | all |
//! | [`Maximum`] | position | full angle box | any |
//! | [`InclusionOrientation`] | position | user angle box | any |

use std::f64::consts::PI;

use cdpr_types::{EulerSequence, Pose, Robot, Rotation3};
use nalgebra::Vector3;

use crate::criterion::Criterion;
use crate::error::WorkspaceResult;

/// How criterion results over the poses of one coordinate are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Comparator {
    /// Every pose must be admissible.
    #[default]
    All,
    /// At least one pose must be admissible.
    Any,
}

impl Comparator {
    /// Combine results. An empty set is admissible under `All` only.
    pub fn combine(self, results: impl IntoIterator<Item = bool>) -> bool {
        let mut results = results.into_iter();
        match self {
            Self::All => results.all(|r| r),
            Self::Any => results.any(|r| r),
        }
    }

    /// Combine fallible results, stopping at the first deciding value or error.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered before the outcome is decided.
    pub fn try_combine(
        self,
        results: impl IntoIterator<Item = WorkspaceResult<bool>>,
    ) -> WorkspaceResult<bool> {
        for result in results {
            match (self, result?) {
                (Self::All, false) => return Ok(false),
                (Self::Any, true) => return Ok(true),
                _ => {}
            }
        }
        Ok(self == Self::All)
    }
}

/// Expands a coordinate into candidate poses.
pub trait Archetype: Send + Sync {
    /// Poses to check at `coordinate`.
    fn poses(&self, coordinate: &Vector3<f64>) -> Vec<Pose>;

    /// How the per-pose results are combined.
    fn comparator(&self) -> Comparator;
}

impl<A: Archetype + ?Sized> Archetype for &A {
    fn poses(&self, coordinate: &Vector3<f64>) -> Vec<Pose> {
        (**self).poses(coordinate)
    }

    fn comparator(&self) -> Comparator {
        (**self).comparator()
    }
}

impl<A: Archetype + ?Sized> Archetype for Box<A> {
    fn poses(&self, coordinate: &Vector3<f64>) -> Vec<Pose> {
        (**self).poses(coordinate)
    }

    fn comparator(&self) -> Comparator {
        (**self).comparator()
    }
}

/// Whether a coordinate belongs to the workspace.
///
/// Per-pose errors that only mark the pose as inadmissible count as `false`.
///
/// # Errors
///
/// Propagates criterion errors caused by malformed requests.
pub fn is_admissible<A, C>(
    robot: &Robot,
    archetype: &A,
    criterion: &C,
    coordinate: &Vector3<f64>,
) -> WorkspaceResult<bool>
where
    A: Archetype + ?Sized,
    C: Criterion + ?Sized,
{
    let poses = archetype.poses(coordinate);
    archetype
        .comparator()
        .try_combine(poses.iter().map(|pose| match criterion.evaluate(robot, pose) {
            Err(e) if e.is_inadmissible() => Ok(false),
            other => other,
        }))
}

/// Linearly spaced samples; a zero span or a single step gives one sample.
pub(crate) fn linspace(lower: f64, upper: f64, steps: usize) -> Vec<f64> {
    if steps <= 1 || upper == lower {
        return vec![lower];
    }
    let delta = (upper - lower) / (steps - 1) as f64;
    (0..steps)
        .map(|i| if i + 1 == steps { upper } else { lower + delta * i as f64 })
        .collect()
}

/// A box of Euler angles sampled on a regular grid.
#[derive(Debug, Clone, PartialEq)]
pub struct OrientationSweep {
    /// Lower angle per axis.
    pub lower: [f64; 3],
    /// Upper angle per axis.
    pub upper: [f64; 3],
    /// Samples per axis.
    pub steps: [usize; 3],
    /// Euler sequence interpreting the angles.
    pub sequence: EulerSequence,
}

impl OrientationSweep {
    /// Sweep over an angle box.
    #[must_use]
    pub const fn new(
        lower: [f64; 3],
        upper: [f64; 3],
        steps: [usize; 3],
        sequence: EulerSequence,
    ) -> Self {
        Self {
            lower,
            upper,
            steps,
            sequence,
        }
    }

    /// Every angle in `[-π, π]` on each axis.
    #[must_use]
    pub const fn full(steps: [usize; 3], sequence: EulerSequence) -> Self {
        Self::new([-PI; 3], [PI; 3], steps, sequence)
    }

    /// Set the Euler sequence.
    #[must_use]
    pub const fn with_sequence(mut self, sequence: EulerSequence) -> Self {
        self.sequence = sequence;
        self
    }

    /// All sampled rotations, last axis varying fastest.
    #[must_use]
    pub fn rotations(&self) -> Vec<Rotation3<f64>> {
        let [a, b, c] = [0, 1, 2].map(|i| linspace(self.lower[i], self.upper[i], self.steps[i]));
        let mut rotations = Vec::with_capacity(a.len() * b.len() * c.len());
        for &alpha in &a {
            for &beta in &b {
                for &gamma in &c {
                    rotations.push(self.sequence.to_rotation([alpha, beta, gamma]));
                }
            }
        }
        rotations
    }
}

fn at_rotations(coordinate: &Vector3<f64>, rotations: &[Rotation3<f64>]) -> Vec<Pose> {
    rotations
        .iter()
        .map(|rotation| Pose::new(*coordinate, *rotation))
        .collect()
}

/// Position workspace at a fixed orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Translation {
    /// Platform orientation at every coordinate.
    pub orientation: Rotation3<f64>,
}

impl Default for Translation {
    fn default() -> Self {
        Self {
            orientation: Rotation3::identity(),
        }
    }
}

impl Translation {
    /// Translation workspace at the given orientation.
    #[must_use]
    pub const fn new(orientation: Rotation3<f64>) -> Self {
        Self { orientation }
    }
}

impl Archetype for Translation {
    fn poses(&self, coordinate: &Vector3<f64>) -> Vec<Pose> {
        vec![Pose::new(*coordinate, self.orientation)]
    }

    fn comparator(&self) -> Comparator {
        Comparator::All
    }
}

/// Orientation workspace at a fixed position; coordinates are Euler angles.
#[derive(Debug, Clone, PartialEq)]
pub struct Orientation {
    /// Platform position at every coordinate.
    pub position: Vector3<f64>,
    /// Euler sequence interpreting the coordinate.
    pub sequence: EulerSequence,
}

impl Orientation {
    /// Orientation workspace at the given position.
    #[must_use]
    pub const fn new(position: Vector3<f64>, sequence: EulerSequence) -> Self {
        Self { position, sequence }
    }
}

impl Archetype for Orientation {
    fn poses(&self, coordinate: &Vector3<f64>) -> Vec<Pose> {
        vec![Pose::from_euler(
            self.position,
            [coordinate.x, coordinate.y, coordinate.z],
            self.sequence,
        )]
    }

    fn comparator(&self) -> Comparator {
        Comparator::All
    }
}

macro_rules! swept_archetype {
    ($(#[$doc:meta])* $name:ident, $comparator:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            rotations: Vec<Rotation3<f64>>,
        }

        impl $name {
            /// Sample the sweep once; the rotations are reused at every coordinate.
            #[must_use]
            pub fn new(sweep: &OrientationSweep) -> Self {
                Self {
                    rotations: sweep.rotations(),
                }
            }

            /// Number of orientations checked per coordinate.
            #[must_use]
            pub fn num_orientations(&self) -> usize {
                self.rotations.len()
            }
        }

        impl Archetype for $name {
            fn poses(&self, coordinate: &Vector3<f64>) -> Vec<Pose> {
                at_rotations(coordinate, &self.rotations)
            }

            fn comparator(&self) -> Comparator {
                $comparator
            }
        }
    };
}

swept_archetype!(
    /// Positions where every orientation of a user-defined box is admissible.
    TotalOrientation,
    Comparator::All
);

swept_archetype!(
    /// Positions where at least one orientation of a user-defined box is admissible.
    InclusionOrientation,
    Comparator::Any
);

swept_archetype!(
    /// Positions where every orientation is admissible.
    ///
    /// Build with [`Dextrous::full`] to sweep the whole angle box.
    Dextrous,
    Comparator::All
);

swept_archetype!(
    /// Positions where at least one orientation is admissible.
    ///
    /// Build with [`Maximum::full`] to sweep the whole angle box.
    Maximum,
    Comparator::Any
);

impl Dextrous {
    /// Sweep the full angle box.
    #[must_use]
    pub fn full(steps: [usize; 3], sequence: EulerSequence) -> Self {
        Self::new(&OrientationSweep::full(steps, sequence))
    }
}

impl Maximum {
    /// Sweep the full angle box.
    #[must_use]
    pub fn full(steps: [usize; 3], sequence: EulerSequence) -> Self {
        Self::new(&OrientationSweep::full(steps, sequence))
    }
}
