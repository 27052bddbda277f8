//! Motion patterns of a cable-driven platform.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::RobotError;

/// Degree-of-freedom signature of a platform.
///
/// The tag reads "rotational DOF, translational DOF", so `R1T2` is the
/// planar pattern with one rotation about Z and translation in XY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotionPattern {
    /// Point moving along X.
    T1,
    /// Point moving in the XY plane.
    T2,
    /// Point moving in space.
    T3,
    /// Planar body: XY translation, rotation about Z.
    R1T2,
    /// Beam: spatial translation, rotation about X and Y.
    R2T3,
    /// Full rigid body: spatial translation and rotation.
    R3T3,
}

impl MotionPattern {
    /// All motion patterns, ordered by total DOF.
    pub const ALL: [Self; 6] = [
        Self::T1,
        Self::T2,
        Self::T3,
        Self::R1T2,
        Self::R2T3,
        Self::R3T3,
    ];

    /// Number of translational degrees of freedom (1..=3).
    #[must_use]
    pub const fn dof_translation(self) -> usize {
        match self {
            Self::T1 => 1,
            Self::T2 | Self::R1T2 => 2,
            Self::T3 | Self::R2T3 | Self::R3T3 => 3,
        }
    }

    /// Number of rotational degrees of freedom (0..=3).
    #[must_use]
    pub const fn dof_rotation(self) -> usize {
        match self {
            Self::T1 | Self::T2 | Self::T3 => 0,
            Self::R1T2 => 1,
            Self::R2T3 => 2,
            Self::R3T3 => 3,
        }
    }

    /// Total degrees of freedom.
    #[must_use]
    pub const fn dof(self) -> usize {
        self.dof_translation() + self.dof_rotation()
    }

    /// Platform behaves like a point (no rotational DOF).
    #[must_use]
    pub const fn is_point(self) -> bool {
        self.dof_rotation() == 0
    }

    /// Platform behaves like a beam (rotation about its own axis is free).
    #[must_use]
    pub const fn is_beam(self) -> bool {
        matches!(self, Self::R2T3)
    }

    /// Platform behaves like a full rigid body.
    #[must_use]
    pub const fn is_cuboid(self) -> bool {
        matches!(self, Self::R3T3)
    }

    /// Motion is confined to the XY plane (or the X axis).
    #[must_use]
    pub const fn is_planar(self) -> bool {
        self.dof_translation() < 3
    }

    /// Motion is spatial.
    #[must_use]
    pub const fn is_spatial(self) -> bool {
        !self.is_planar()
    }

    /// World axes about which moments are balanced, in structure-matrix row order.
    #[must_use]
    pub const fn moment_axes(self) -> &'static [usize] {
        match self {
            Self::T1 | Self::T2 | Self::T3 => &[],
            Self::R1T2 => &[2],
            Self::R2T3 => &[0, 1],
            Self::R3T3 => &[0, 1, 2],
        }
    }

    /// Canonical tag, e.g. `"1R2T"`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::T1 => "1T",
            Self::T2 => "2T",
            Self::T3 => "3T",
            Self::R1T2 => "1R2T",
            Self::R2T3 => "2R3T",
            Self::R3T3 => "3R3T",
        }
    }
}

impl fmt::Display for MotionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for MotionPattern {
    type Err = RobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().trim_start_matches('_').to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|pattern| pattern.tag() == tag)
            .ok_or_else(|| RobotError::UnknownMotionPattern(s.to_string()))
    }
}
