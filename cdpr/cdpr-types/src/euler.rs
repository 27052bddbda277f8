//! Euler angle sequences and elementary axis rotations.
//!
//! Sequences are written with upper-case letters for intrinsic rotations
//! (about the moving axes, `XYZ`) and lower-case letters for extrinsic
//! rotations (about the fixed axes, `xyz`). Both Tait–Bryan (`XYZ`) and
//! proper Euler (`ZXZ`) sequences are accepted; consecutive axes must differ.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3, Rotation3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::RobotError;

/// Coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'X' => Some(Self::X),
            'Y' => Some(Self::Y),
            'Z' => Some(Self::Z),
            _ => None,
        }
    }

    const fn as_char(self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
        }
    }
}

/// Elementary rotation matrix about a coordinate axis.
#[must_use]
pub fn axis_rotation(axis: Axis, angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    match axis {
        Axis::X => Matrix3::new(1.0, 0.0, 0.0, 0.0, c, -s, 0.0, s, c),
        Axis::Y => Matrix3::new(c, 0.0, s, 0.0, 1.0, 0.0, -s, 0.0, c),
        Axis::Z => Matrix3::new(c, -s, 0.0, s, c, 0.0, 0.0, 0.0, 1.0),
    }
}

/// An Euler angle convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EulerSequence {
    axes: [Axis; 3],
    intrinsic: bool,
}

impl EulerSequence {
    /// Intrinsic roll-pitch-yaw about moving X, Y', Z''.
    pub const XYZ: Self = Self::intrinsic([Axis::X, Axis::Y, Axis::Z]);
    /// Intrinsic yaw-pitch-roll about moving Z, Y', X''.
    pub const ZYX: Self = Self::intrinsic([Axis::Z, Axis::Y, Axis::X]);
    /// Intrinsic proper Euler sequence Z, X', Z''.
    pub const ZXZ: Self = Self::intrinsic([Axis::Z, Axis::X, Axis::Z]);

    /// Intrinsic sequence (rotations about the moving frame).
    #[must_use]
    pub const fn intrinsic(axes: [Axis; 3]) -> Self {
        Self {
            axes,
            intrinsic: true,
        }
    }

    /// Extrinsic sequence (rotations about the fixed frame).
    #[must_use]
    pub const fn extrinsic(axes: [Axis; 3]) -> Self {
        Self {
            axes,
            intrinsic: false,
        }
    }

    /// The three rotation axes in application order.
    #[must_use]
    pub const fn axes(&self) -> [Axis; 3] {
        self.axes
    }

    /// Whether rotations are about the moving frame.
    #[must_use]
    pub const fn is_intrinsic(&self) -> bool {
        self.intrinsic
    }

    /// Compose the rotation matrix for the given angles.
    ///
    /// Intrinsic sequences post-multiply (`R = R1 R2 R3`), extrinsic
    /// sequences pre-multiply (`R = R3 R2 R1`).
    #[must_use]
    pub fn to_matrix(&self, angles: [f64; 3]) -> Matrix3<f64> {
        self.axes
            .iter()
            .zip(angles)
            .fold(Matrix3::identity(), |acc, (&axis, angle)| {
                let step = axis_rotation(axis, angle);
                if self.intrinsic { acc * step } else { step * acc }
            })
    }

    /// Compose the rotation for the given angles.
    #[must_use]
    pub fn to_rotation(&self, angles: [f64; 3]) -> Rotation3<f64> {
        Rotation3::from_matrix_unchecked(self.to_matrix(angles))
    }
}

impl Default for EulerSequence {
    fn default() -> Self {
        Self::XYZ
    }
}

impl fmt::Display for EulerSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in self.axes {
            let c = axis.as_char();
            let c = if self.intrinsic { c.to_ascii_uppercase() } else { c };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for EulerSequence {
    type Err = RobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || RobotError::UnknownEulerSequence(s.to_string());
        let chars: Vec<char> = s.trim().chars().collect();
        if chars.len() != 3 {
            return Err(unknown());
        }

        let intrinsic = if chars.iter().all(char::is_ascii_uppercase) {
            true
        } else if chars.iter().all(char::is_ascii_lowercase) {
            false
        } else {
            return Err(unknown());
        };

        let mut axes = [Axis::X; 3];
        for (slot, &c) in axes.iter_mut().zip(&chars) {
            *slot = Axis::from_char(c).ok_or_else(unknown)?;
        }
        if axes[0] == axes[1] || axes[1] == axes[2] {
            return Err(unknown());
        }

        Ok(Self { axes, intrinsic })
    }
}
