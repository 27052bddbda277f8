//! Boundary search along subdivided octahedron directions.
//!
//! Rays from a center are marched outwards with step halving until the
//! workspace boundary is bracketed. The ray end points form the vertices of a
//! triangle mesh whose connectivity is the subdivided octahedron's.

use cdpr_types::Robot;
use nalgebra::Vector3;
use std::sync::OnceLock;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::archetype::{Archetype, is_admissible};
use crate::cancel::CancellationToken;
use crate::criterion::Criterion;
use crate::error::{WorkspaceError, WorkspaceResult};
use crate::grid::pad;
use crate::mesh::TriangleMesh;
use crate::subdivide::subdivide;

/// Deepest supported subdivision; the mesh then has `8 · 4^10` faces.
pub const MAX_DEPTH: usize = 10;

/// Most step halvings per ray; smaller steps are below `f64` resolution.
pub const MAX_HALVINGS: u32 = 64;

/// Search parameters of a [`HullMethod`].
#[derive(Debug, Clone, PartialEq)]
pub struct HullConfig {
    /// Origin of all search rays.
    pub center: Vector3<f64>,
    /// Subdivision levels of the octahedron.
    pub depth: usize,
    /// Halvings of the step length before a ray stops.
    pub maximum_halvings: u32,
    /// Criterion evaluations per ray before it stops.
    pub maximum_iterations: usize,
    /// Initial step length.
    pub initial_step: f64,
    /// Evaluate rays on the rayon thread pool.
    pub parallel: bool,
}

impl Default for HullConfig {
    fn default() -> Self {
        Self {
            center: Vector3::zeros(),
            depth: 2,
            maximum_halvings: 10,
            maximum_iterations: 1000,
            initial_step: 1.0,
            parallel: false,
        }
    }
}

impl HullConfig {
    /// Search from `center` (zero-padded to 3D).
    #[must_use]
    pub fn from_center(center: &[f64]) -> Self {
        Self {
            center: pad(center),
            ..Self::default()
        }
    }

    /// Coarse, quick search.
    #[must_use]
    pub fn coarse() -> Self {
        Self {
            depth: 1,
            maximum_halvings: 6,
            ..Self::default()
        }
    }

    /// Fine, slow search.
    #[must_use]
    pub fn fine() -> Self {
        Self {
            depth: 4,
            maximum_halvings: 16,
            ..Self::default()
        }
    }

    /// Set subdivision depth.
    #[must_use]
    pub const fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set maximum step halvings.
    #[must_use]
    pub const fn with_maximum_halvings(mut self, halvings: u32) -> Self {
        self.maximum_halvings = halvings;
        self
    }

    /// Set maximum evaluations per ray.
    #[must_use]
    pub const fn with_maximum_iterations(mut self, iterations: usize) -> Self {
        self.maximum_iterations = iterations;
        self
    }

    /// Set the initial step length.
    #[must_use]
    pub const fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    /// Enable or disable parallel evaluation.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceError::InvalidParameter`] for a depth above
    /// [`MAX_DEPTH`], halvings outside `1..=MAX_HALVINGS`, zero iterations, a
    /// non-positive step, or a non-finite center.
    pub fn validate(&self) -> WorkspaceResult<()> {
        if self.depth > MAX_DEPTH {
            return Err(WorkspaceError::invalid_parameter(
                "depth",
                format!("{} exceeds {MAX_DEPTH}", self.depth),
            ));
        }
        if !(1..=MAX_HALVINGS).contains(&self.maximum_halvings) {
            return Err(WorkspaceError::invalid_parameter(
                "maximum_halvings",
                format!("{} is not in 1..={MAX_HALVINGS}", self.maximum_halvings),
            ));
        }
        if self.maximum_iterations == 0 {
            return Err(WorkspaceError::invalid_parameter(
                "maximum_iterations",
                "must be at least 1",
            ));
        }
        if !(self.initial_step.is_finite() && self.initial_step > 0.0) {
            return Err(WorkspaceError::invalid_parameter(
                "initial_step",
                format!("{} is not a positive length", self.initial_step),
            ));
        }
        if !self.center.iter().all(|c| c.is_finite()) {
            return Err(WorkspaceError::invalid_parameter("center", "must be finite"));
        }
        Ok(())
    }
}

/// Finds the workspace boundary along rays from a center.
#[derive(Debug, Clone)]
pub struct HullMethod<A, C> {
    /// Expands coordinates into poses.
    pub archetype: A,
    /// Decides pose admissibility.
    pub criterion: C,
    /// Search parameters.
    pub config: HullConfig,
}

impl<A: Archetype, C: Criterion> HullMethod<A, C> {
    /// Create a hull method.
    #[must_use]
    pub const fn new(archetype: A, criterion: C, config: HullConfig) -> Self {
        Self {
            archetype,
            criterion,
            config,
        }
    }

    /// Search the boundary along every direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, a criterion rejects
    /// the request as malformed, or the token is cancelled.
    pub fn evaluate(
        &self,
        robot: &Robot,
        cancel: &CancellationToken,
    ) -> WorkspaceResult<HullResult> {
        self.config.validate()?;
        let mut mesh = subdivide(&TriangleMesh::octahedron(), self.config.depth);
        let directions: Vec<Vector3<f64>> = mesh.vertices.iter().map(|v| v.normalize()).collect();
        info!(
            directions = directions.len(),
            depth = self.config.depth,
            parallel = self.config.parallel,
            "Evaluating hull workspace"
        );

        let march = |direction: &Vector3<f64>| {
            if cancel.is_cancelled() {
                return Err(WorkspaceError::Cancelled);
            }
            self.march(robot, direction)
        };
        let distances: WorkspaceResult<Vec<f64>> = if self.config.parallel {
            directions.par_iter().map(march).collect()
        } else {
            directions.iter().map(march).collect()
        };
        let distances = distances.inspect_err(|e| {
            if matches!(e, WorkspaceError::Cancelled) {
                warn!("Hull evaluation cancelled");
            }
        })?;

        mesh.vertices = directions
            .iter()
            .zip(&distances)
            .map(|(d, &t)| self.config.center + d * t)
            .collect();

        let result = HullResult::new(mesh, self.config.center, directions, distances);
        info!(volume = result.volume(), "Hull workspace evaluated");
        Ok(result)
    }

    /// Distance from the center to the boundary along `direction`.
    // maximum_halvings is validated against MAX_HALVINGS
    #[allow(clippy::cast_possible_wrap)]
    fn march(&self, robot: &Robot, direction: &Vector3<f64>) -> WorkspaceResult<f64> {
        let minimum_step = 0.5_f64.powi(self.config.maximum_halvings as i32);
        let mut step = self.config.initial_step;
        let mut distance = 0.0;

        for _ in 0..self.config.maximum_iterations {
            if step < minimum_step {
                break;
            }
            let candidate = distance + step;
            let coordinate = self.config.center + direction * candidate;
            if is_admissible(robot, &self.archetype, &self.criterion, &coordinate)? {
                distance = candidate;
            } else {
                step *= 0.5;
            }
        }
        Ok(distance)
    }
}

/// Boundary mesh found by a [`HullMethod`].
///
/// Surface area and volume are computed on first use.
#[derive(Debug, Clone)]
pub struct HullResult {
    mesh: TriangleMesh,
    center: Vector3<f64>,
    directions: Vec<Vector3<f64>>,
    distances: Vec<f64>,
    surface: OnceLock<f64>,
    volume: OnceLock<f64>,
}

impl HullResult {
    fn new(
        mesh: TriangleMesh,
        center: Vector3<f64>,
        directions: Vec<Vector3<f64>>,
        distances: Vec<f64>,
    ) -> Self {
        Self {
            mesh,
            center,
            directions,
            distances,
            surface: OnceLock::new(),
            volume: OnceLock::new(),
        }
    }

    /// Boundary vertices (ray end points) and faces.
    #[must_use]
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Origin of the rays.
    #[must_use]
    pub fn center(&self) -> &Vector3<f64> {
        &self.center
    }

    /// Unit direction of each ray.
    #[must_use]
    pub fn directions(&self) -> &[Vector3<f64>] {
        &self.directions
    }

    /// Boundary distance along each ray.
    #[must_use]
    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Boundary vertices.
    #[must_use]
    pub fn vertices(&self) -> &[Vector3<f64>] {
        &self.mesh.vertices
    }

    /// Boundary triangles.
    #[must_use]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.mesh.faces
    }

    /// Surface area of the boundary.
    pub fn surface(&self) -> f64 {
        *self.surface.get_or_init(|| self.mesh.surface_area())
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        *self.volume.get_or_init(|| self.mesh.volume())
    }

    /// Whether `query` (zero-padded to 3D) lies behind every boundary vertex
    /// as seen along that vertex's ray.
    #[must_use]
    pub fn contains(&self, query: &[f64]) -> bool {
        let point = pad(query);
        self.mesh
            .vertices
            .iter()
            .zip(&self.directions)
            .all(|(vertex, direction)| (vertex - point).dot(direction) >= 0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::archetype::Translation;
    use crate::criterion::CableLength;
    use approx::assert_relative_eq;
    use cdpr_types::{Cable, FrameAnchor, KinematicChain, MotionPattern, Platform, PlatformAnchor};

    /// One cable from the origin: the workspace is a ball of radius `max`.
    fn tether() -> Robot {
        Robot::builder("tether")
            .frame_anchor(FrameAnchor::at(Vector3::zeros()))
            .platform(Platform::new(MotionPattern::T3).with_anchor(PlatformAnchor::origin()))
            .cable(Cable::default())
            .chain(KinematicChain::new(0, 0, 0))
            .build()
            .unwrap()
    }

    fn ball_method(config: HullConfig) -> HullMethod<Translation, CableLength> {
        HullMethod::new(
            Translation::default(),
            CableLength::scalar(0.0, 0.75).unwrap(),
            config.with_maximum_halvings(20),
        )
    }

    #[test]
    fn test_rays_stop_at_boundary() {
        let result = ball_method(HullConfig::default())
            .evaluate(&tether(), &CancellationToken::new())
            .unwrap();
        assert_eq!(result.faces().len(), 8 * 16);
        for &distance in result.distances() {
            assert_relative_eq!(distance, 0.75, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_octahedron_at_depth_zero() {
        let result = ball_method(HullConfig::default().with_depth(0))
            .evaluate(&tether(), &CancellationToken::new())
            .unwrap();
        assert_eq!(result.vertices().len(), 6);
        assert_relative_eq!(result.volume(), 4.0 / 3.0 * 0.75_f64.powi(3), epsilon = 1e-4);
    }

    #[test]
    fn test_contains() {
        let result = ball_method(HullConfig::default())
            .evaluate(&tether(), &CancellationToken::new())
            .unwrap();
        assert!(result.contains(&[0.0]));
        assert!(result.contains(&[0.3, 0.3]));
        assert!(!result.contains(&[1.0, 0.0, 0.0]));
    }

    #[test]
    fn test_validation() {
        let config = HullConfig::default().with_maximum_halvings(0);
        assert!(config.validate().is_err());
        let config = HullConfig::default().with_maximum_iterations(0);
        assert!(config.validate().is_err());
        let config = HullConfig::default().with_initial_step(-1.0);
        assert!(config.validate().is_err());
        assert!(HullConfig::coarse().validate().is_ok());
        assert!(HullConfig::fine().validate().is_ok());
    }

    #[test]
    fn test_depth_and_halvings_are_capped() {
        assert!(HullConfig::default().with_depth(MAX_DEPTH).validate().is_ok());
        let err = HullConfig::default()
            .with_depth(MAX_DEPTH + 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, WorkspaceError::InvalidParameter { name: "depth", .. }));

        let config = HullConfig::default().with_maximum_halvings(MAX_HALVINGS);
        assert!(config.validate().is_ok());
        for halvings in [MAX_HALVINGS + 1, u32::MAX] {
            let err = HullConfig::default()
                .with_maximum_halvings(halvings)
                .validate()
                .unwrap_err();
            assert!(matches!(
                err,
                WorkspaceError::InvalidParameter {
                    name: "maximum_halvings",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_measures_are_computed_once() {
        let result = ball_method(HullConfig::default().with_depth(1))
            .evaluate(&tether(), &CancellationToken::new())
            .unwrap();
        // Volume is logged by evaluate, surface is left for the caller.
        assert_eq!(result.volume.get().copied(), Some(result.mesh().volume()));
        assert!(result.surface.get().is_none());

        let surface = result.surface();
        assert_eq!(result.surface.get().copied(), Some(surface));
        assert_relative_eq!(surface, result.mesh().surface_area());
    }

    #[test]
    fn test_iteration_budget_limits_distance() {
        let method = HullMethod::new(
            Translation::default(),
            CableLength::scalar(0.0, 100.0).unwrap(),
            HullConfig::default().with_depth(0).with_maximum_iterations(3),
        );
        let result = method
            .evaluate(&tether(), &CancellationToken::new())
            .unwrap();
        for &distance in result.distances() {
            assert_relative_eq!(distance, 3.0);
        }
    }

    #[test]
    fn test_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = ball_method(HullConfig::default())
            .evaluate(&tether(), &cancel)
            .unwrap_err();
        assert_eq!(err, WorkspaceError::Cancelled);
    }
}
