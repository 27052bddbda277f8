//! Robot description: frame, platforms, cables and kinematic chains.
//!
//! The robot is read-only input to every analysis. Chains bind one frame
//! anchor, one platform anchor and one cable; their order defines the column
//! order of every per-cable quantity (lengths, directions, forces).

use nalgebra::{DVector, Matrix3, Rotation3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{MotionPattern, Pose, RobotError, RobotResult};

/// Swivelling pulley mounted on a frame anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pulley {
    /// Pulley radius.
    pub radius: f64,
}

impl Pulley {
    /// Create a pulley with the given radius.
    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }
}

/// Cable exit point on the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameAnchor {
    /// Position in world coordinates.
    pub position: Vector3<f64>,
    /// Orientation of the anchor (pulley) frame.
    pub orientation: Rotation3<f64>,
    /// Optional pulley guiding the cable.
    pub pulley: Option<Pulley>,
}

impl FrameAnchor {
    /// Plain anchor (no pulley) at a position.
    #[must_use]
    pub fn at(position: Vector3<f64>) -> Self {
        Self {
            position,
            orientation: Rotation3::identity(),
            pulley: None,
        }
    }

    /// Set the anchor orientation.
    #[must_use]
    pub const fn with_orientation(mut self, orientation: Rotation3<f64>) -> Self {
        self.orientation = orientation;
        self
    }

    /// Mount a pulley on the anchor.
    #[must_use]
    pub const fn with_pulley(mut self, pulley: Pulley) -> Self {
        self.pulley = Some(pulley);
        self
    }
}

/// The static frame of the robot.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Frame anchors.
    pub anchors: Vec<FrameAnchor>,
}

/// Cable attachment point on a platform, in platform coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlatformAnchor {
    /// Position relative to the platform reference point.
    pub position: Vector3<f64>,
}

impl PlatformAnchor {
    /// Anchor at a platform-local position.
    #[must_use]
    pub const fn at(position: Vector3<f64>) -> Self {
        Self { position }
    }

    /// Anchor at the platform reference point.
    #[must_use]
    pub fn origin() -> Self {
        Self::at(Vector3::zeros())
    }
}

/// Inertial properties of a platform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Inertia {
    /// Mass.
    pub mass: f64,
    /// Rotational inertia about the center of gravity, in platform coordinates.
    pub angular: Matrix3<f64>,
    /// Center of gravity in platform coordinates.
    pub center_of_gravity: Vector3<f64>,
}

impl Default for Inertia {
    fn default() -> Self {
        Self {
            mass: 0.0,
            angular: Matrix3::zeros(),
            center_of_gravity: Vector3::zeros(),
        }
    }
}

impl Inertia {
    /// Point mass at the platform reference point.
    #[must_use]
    pub fn point_mass(mass: f64) -> Self {
        Self {
            mass,
            ..Self::default()
        }
    }
}

/// A moving platform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Platform {
    /// Degree-of-freedom signature.
    pub motion_pattern: MotionPattern,
    /// Cable attachment points.
    pub anchors: Vec<PlatformAnchor>,
    /// Inertial properties.
    pub inertia: Inertia,
}

impl Platform {
    /// Massless platform without anchors.
    #[must_use]
    pub fn new(motion_pattern: MotionPattern) -> Self {
        Self {
            motion_pattern,
            anchors: Vec::new(),
            inertia: Inertia::default(),
        }
    }

    /// Add an anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: PlatformAnchor) -> Self {
        self.anchors.push(anchor);
        self
    }

    /// Add several anchors.
    #[must_use]
    pub fn with_anchors(mut self, anchors: impl IntoIterator<Item = PlatformAnchor>) -> Self {
        self.anchors.extend(anchors);
        self
    }

    /// Set inertial properties.
    #[must_use]
    pub const fn with_inertia(mut self, inertia: Inertia) -> Self {
        self.inertia = inertia;
        self
    }

    /// Total degrees of freedom.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.motion_pattern.dof()
    }

    /// Gravitational wrench acting on the platform at a pose.
    ///
    /// The result has one entry per DOF: the force components along the
    /// translational axes followed by the moments about the rotational axes
    /// (moment of the weight about the platform reference point).
    #[must_use]
    pub fn gravitational_wrench(&self, pose: &Pose, gravity: &Vector3<f64>) -> DVector<f64> {
        let pattern = self.motion_pattern;
        let weight = gravity * self.inertia.mass;
        let lever = pose.transform_vector(&self.inertia.center_of_gravity);
        let moment = lever.cross(&weight);

        let mut wrench = DVector::zeros(pattern.dof());
        for axis in 0..pattern.dof_translation() {
            wrench[axis] = weight[axis];
        }
        for (row, &axis) in pattern.moment_axes().iter().enumerate() {
            wrench[pattern.dof_translation() + row] = moment[axis];
        }
        wrench
    }
}

/// Cable properties.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cable {
    /// Human-readable name.
    pub name: String,
    /// Cable diameter, if known.
    pub diameter: Option<f64>,
    /// Young's modulus, if known.
    pub modulus: Option<f64>,
}

impl Default for Cable {
    fn default() -> Self {
        Self {
            name: String::from("cable"),
            diameter: None,
            modulus: None,
        }
    }
}

impl Cable {
    /// Named cable without material data.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Binding of one frame anchor, one platform anchor and one cable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KinematicChain {
    /// Index into `Frame::anchors`.
    pub frame_anchor: usize,
    /// Index into `Platform::anchors`.
    pub platform_anchor: usize,
    /// Index into `Robot::cables`.
    pub cable: usize,
    /// Index into `Robot::platforms`.
    pub platform: usize,
}

impl KinematicChain {
    /// Chain on the first (single) platform.
    #[must_use]
    pub const fn new(frame_anchor: usize, platform_anchor: usize, cable: usize) -> Self {
        Self {
            frame_anchor,
            platform_anchor,
            cable,
            platform: 0,
        }
    }

    /// Assign the chain to another platform.
    #[must_use]
    pub const fn on_platform(mut self, platform: usize) -> Self {
        self.platform = platform;
        self
    }
}

/// A cable-driven parallel robot.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Robot {
    /// Robot name.
    pub name: String,
    /// Static frame.
    pub frame: Frame,
    /// Moving platforms.
    pub platforms: Vec<Platform>,
    /// Cables.
    pub cables: Vec<Cable>,
    /// Kinematic chains; their order defines cable column order.
    pub chains: Vec<KinematicChain>,
}

impl Robot {
    /// Start building a robot.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> RobotBuilder {
        RobotBuilder::new(name)
    }

    /// Number of kinematic chains.
    #[must_use]
    pub fn num_chains(&self) -> usize {
        self.chains.len()
    }

    /// Number of cables.
    #[must_use]
    pub fn num_cables(&self) -> usize {
        self.cables.len()
    }

    /// Number of platforms.
    #[must_use]
    pub fn num_platforms(&self) -> usize {
        self.platforms.len()
    }

    /// First platform, if any.
    #[must_use]
    pub fn platform(&self) -> Option<&Platform> {
        self.platforms.first()
    }

    /// Chains attached to one platform, in robot order.
    pub fn chains_for(&self, platform: usize) -> impl Iterator<Item = &KinematicChain> {
        self.chains.iter().filter(move |c| c.platform == platform)
    }

    /// Frame anchor of a chain.
    ///
    /// Callers must have validated the robot; out-of-range indices yield `None`.
    #[must_use]
    pub fn frame_anchor(&self, chain: &KinematicChain) -> Option<&FrameAnchor> {
        self.frame.anchors.get(chain.frame_anchor)
    }

    /// Platform anchor of a chain.
    #[must_use]
    pub fn platform_anchor(&self, chain: &KinematicChain) -> Option<&PlatformAnchor> {
        self.platforms
            .get(chain.platform)
            .and_then(|p| p.anchors.get(chain.platform_anchor))
    }

    /// Check that every chain references existing parts and that physical
    /// parameters are sane.
    ///
    /// # Errors
    ///
    /// Returns the first [`RobotError`] found.
    pub fn validate(&self) -> RobotResult<()> {
        if self.platforms.is_empty() {
            return Err(RobotError::NoPlatform);
        }
        if self.chains.is_empty() {
            return Err(RobotError::NoChains);
        }

        for (index, anchor) in self.frame.anchors.iter().enumerate() {
            if let Some(pulley) = anchor.pulley {
                if !(pulley.radius.is_finite() && pulley.radius > 0.0) {
                    return Err(RobotError::InvalidPulley {
                        anchor: index,
                        radius: pulley.radius,
                    });
                }
            }
        }

        for (index, platform) in self.platforms.iter().enumerate() {
            let mass = platform.inertia.mass;
            if !(mass.is_finite() && mass >= 0.0) {
                return Err(RobotError::InvalidMass {
                    platform: index,
                    mass,
                });
            }
        }

        for (index, cable) in self.cables.iter().enumerate() {
            for (property, value) in [("diameter", cable.diameter), ("modulus", cable.modulus)] {
                if let Some(value) = value {
                    if !(value.is_finite() && value > 0.0) {
                        return Err(RobotError::InvalidCable {
                            cable: index,
                            property,
                            value,
                        });
                    }
                }
            }
        }

        for (index, chain) in self.chains.iter().enumerate() {
            let missing = |kind, idx| RobotError::InvalidChain {
                chain: index,
                kind,
                index: idx,
            };
            let Some(platform) = self.platforms.get(chain.platform) else {
                return Err(missing("platform", chain.platform));
            };
            if chain.frame_anchor >= self.frame.anchors.len() {
                return Err(missing("frame anchor", chain.frame_anchor));
            }
            if chain.platform_anchor >= platform.anchors.len() {
                return Err(missing("platform anchor", chain.platform_anchor));
            }
            if chain.cable >= self.cables.len() {
                return Err(missing("cable", chain.cable));
            }
        }

        Ok(())
    }
}

/// Incremental builder for [`Robot`].
#[derive(Debug, Clone)]
pub struct RobotBuilder {
    robot: Robot,
}

impl RobotBuilder {
    /// Empty robot with a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            robot: Robot {
                name: name.into(),
                frame: Frame::default(),
                platforms: Vec::new(),
                cables: Vec::new(),
                chains: Vec::new(),
            },
        }
    }

    /// Add a frame anchor.
    #[must_use]
    pub fn frame_anchor(mut self, anchor: FrameAnchor) -> Self {
        self.robot.frame.anchors.push(anchor);
        self
    }

    /// Add a platform.
    #[must_use]
    pub fn platform(mut self, platform: Platform) -> Self {
        self.robot.platforms.push(platform);
        self
    }

    /// Add a cable.
    #[must_use]
    pub fn cable(mut self, cable: Cable) -> Self {
        self.robot.cables.push(cable);
        self
    }

    /// Add `count` copies of a cable.
    #[must_use]
    pub fn cables(mut self, count: usize, cable: Cable) -> Self {
        self.robot
            .cables
            .extend(std::iter::repeat_n(cable, count));
        self
    }

    /// Add a kinematic chain.
    #[must_use]
    pub fn chain(mut self, chain: KinematicChain) -> Self {
        self.robot.chains.push(chain);
        self
    }

    /// Validate and return the robot.
    ///
    /// # Errors
    ///
    /// Returns a [`RobotError`] if [`Robot::validate`] fails.
    pub fn build(self) -> RobotResult<Robot> {
        self.robot.validate()?;
        Ok(self.robot)
    }
}
