//! Exhaustive grid evaluation of a workspace.

use std::sync::OnceLock;

use cdpr_types::Robot;
use nalgebra::Vector3;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::archetype::{Archetype, is_admissible, linspace};
use crate::cancel::CancellationToken;
use crate::convex::convex_hull;
use crate::criterion::Criterion;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::mesh::TriangleMesh;

/// Coordinate grid of a [`GridMethod`].
#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    /// Lower coordinate per axis (one to three axes).
    pub lower: Vec<f64>,
    /// Upper coordinate per axis.
    pub upper: Vec<f64>,
    /// Samples per axis, including both ends.
    pub steps: Vec<usize>,
    /// Evaluate coordinates on the rayon thread pool.
    pub parallel: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            lower: vec![-1.0; 3],
            upper: vec![1.0; 3],
            steps: vec![11; 3],
            parallel: false,
        }
    }
}

impl GridConfig {
    /// Grid between `lower` and `upper` with `steps` samples per axis.
    #[must_use]
    pub fn new(lower: Vec<f64>, upper: Vec<f64>, steps: Vec<usize>) -> Self {
        Self {
            lower,
            upper,
            steps,
            parallel: false,
        }
    }

    /// Cube `[-half_width, half_width]³` with the same steps on every axis.
    #[must_use]
    pub fn cube(half_width: f64, steps: usize) -> Self {
        Self::new(vec![-half_width; 3], vec![half_width; 3], vec![steps; 3])
    }

    /// Enable or disable parallel evaluation.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check dimensions, ordering and step counts.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidBounds`] or
    /// [`WorkspaceError::InvalidSteps`].
    pub fn validate(&self) -> WorkspaceResult<()> {
        let axes = self.lower.len();
        if !(1..=3).contains(&axes) || self.upper.len() != axes || self.steps.len() != axes {
            return Err(WorkspaceError::invalid_bounds(format!(
                "expected 1 to 3 axes with matching lengths, got {} lower, {} upper, {} steps",
                axes,
                self.upper.len(),
                self.steps.len()
            )));
        }
        for axis in 0..axes {
            let (lo, hi) = (self.lower[axis], self.upper[axis]);
            if !(lo.is_finite() && hi.is_finite()) || lo > hi {
                return Err(WorkspaceError::invalid_bounds(format!(
                    "axis {axis}: [{lo}, {hi}] is not a finite ordered interval"
                )));
            }
            if self.steps[axis] == 0 {
                return Err(WorkspaceError::InvalidSteps {
                    axis,
                    steps: self.steps[axis],
                });
            }
        }
        Ok(())
    }

    /// All grid coordinates, zero-padded to 3D, last axis varying fastest.
    #[must_use]
    pub fn coordinates(&self) -> Vec<Vector3<f64>> {
        let samples: Vec<Vec<f64>> = (0..3)
            .map(|axis| match (self.lower.get(axis), self.upper.get(axis)) {
                (Some(&lo), Some(&hi)) => {
                    linspace(lo, hi, self.steps.get(axis).copied().unwrap_or(1))
                }
                _ => vec![0.0],
            })
            .collect();

        let mut coordinates = Vec::with_capacity(samples.iter().map(Vec::len).product());
        for &x in &samples[0] {
            for &y in &samples[1] {
                for &z in &samples[2] {
                    coordinates.push(Vector3::new(x, y, z));
                }
            }
        }
        coordinates
    }
}

/// Classifies every coordinate of a grid.
#[derive(Debug, Clone)]
pub struct GridMethod<A, C> {
    /// Expands coordinates into poses.
    pub archetype: A,
    /// Decides pose admissibility.
    pub criterion: C,
    /// The grid.
    pub config: GridConfig,
}

impl<A: Archetype, C: Criterion> GridMethod<A, C> {
    /// Create a grid method.
    #[must_use]
    pub const fn new(archetype: A, criterion: C, config: GridConfig) -> Self {
        Self {
            archetype,
            criterion,
            config,
        }
    }

    /// Evaluate every grid coordinate.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a criterion rejects
    /// the request as malformed, or the token is cancelled.
    pub fn evaluate(
        &self,
        robot: &Robot,
        cancel: &CancellationToken,
    ) -> WorkspaceResult<GridResult> {
        self.config.validate()?;
        let coordinates = self.config.coordinates();
        info!(
            samples = coordinates.len(),
            parallel = self.config.parallel,
            "Evaluating grid workspace"
        );

        let classify = |coordinate: &Vector3<f64>| {
            if cancel.is_cancelled() {
                return Err(WorkspaceError::Cancelled);
            }
            is_admissible(robot, &self.archetype, &self.criterion, coordinate)
        };

        let flags: WorkspaceResult<Vec<bool>> = if self.config.parallel {
            coordinates.par_iter().map(classify).collect()
        } else {
            coordinates.iter().map(classify).collect()
        };
        let flags = flags.inspect_err(|e| {
            if matches!(e, WorkspaceError::Cancelled) {
                warn!("Grid evaluation cancelled");
            }
        })?;

        let result = GridResult::new(coordinates, flags)?;
        info!(inside = result.inside().len(), "Grid workspace evaluated");
        Ok(result)
    }
}

/// Classified grid coordinates.
#[derive(Debug, Clone)]
pub struct GridResult {
    coordinates: Vec<Vector3<f64>>,
    flags: Vec<bool>,
    inside: OnceLock<Vec<Vector3<f64>>>,
    outside: OnceLock<Vec<Vector3<f64>>>,
    hull: OnceLock<TriangleMesh>,
}

impl GridResult {
    /// Pair coordinates with their flags.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidParameter`] if there is not exactly
    /// one flag per coordinate.
    pub fn new(coordinates: Vec<Vector3<f64>>, flags: Vec<bool>) -> WorkspaceResult<Self> {
        if coordinates.len() != flags.len() {
            return Err(WorkspaceError::invalid_parameter(
                "flags",
                format!("{} flags for {} coordinates", flags.len(), coordinates.len()),
            ));
        }
        Ok(Self {
            coordinates,
            flags,
            inside: OnceLock::new(),
            outside: OnceLock::new(),
            hull: OnceLock::new(),
        })
    }

    /// Evaluated coordinates.
    #[must_use]
    pub fn coordinates(&self) -> &[Vector3<f64>] {
        &self.coordinates
    }

    /// Admissibility of each coordinate.
    #[must_use]
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    /// Number of evaluated coordinates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Whether no coordinates were evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Admissible coordinates.
    pub fn inside(&self) -> &[Vector3<f64>] {
        self.inside.get_or_init(|| self.partition(true))
    }

    /// Inadmissible coordinates.
    pub fn outside(&self) -> &[Vector3<f64>] {
        self.outside.get_or_init(|| self.partition(false))
    }

    fn partition(&self, flag: bool) -> Vec<Vector3<f64>> {
        self.coordinates
            .iter()
            .zip(&self.flags)
            .filter(|&(_, &f)| f == flag)
            .map(|(c, _)| *c)
            .collect()
    }

    /// Convex hull of the admissible coordinates; empty if degenerate.
    pub fn hull(&self) -> &TriangleMesh {
        self.hull.get_or_init(|| convex_hull(self.inside()))
    }

    /// Surface area of the admissible region's convex hull.
    pub fn surface(&self) -> f64 {
        self.hull().surface_area()
    }

    /// Volume of the admissible region's convex hull.
    pub fn volume(&self) -> f64 {
        self.hull().volume()
    }

    /// Flag of the sample nearest to `query` (zero-padded to 3D).
    ///
    /// Returns `false` for an empty result.
    #[must_use]
    pub fn contains(&self, query: &[f64]) -> bool {
        let point = pad(query);
        self.coordinates
            .iter()
            .zip(&self.flags)
            .map(|(c, &f)| ((c - point).norm_squared(), f))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .is_some_and(|(_, f)| f)
    }
}

/// Zero-pad up to three components into a vector.
pub(crate) fn pad(query: &[f64]) -> Vector3<f64> {
    Vector3::from_fn(|i, _| query.get(i).copied().unwrap_or(0.0))
}
