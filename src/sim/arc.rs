//! Swap arc geometry for exchanging two cups
//!
//! Two cups trade places by each making a half-turn around the midpoint
//! between them. In the cup's local frame:
//! - the pivot is moved to the midpoint (signed offset along local X)
//! - the cup is translated by the same offset so it does not jump
//! - the cup rotates by π about the vertical axis
//! - the pivot is reset and the translation compensated

use std::f32::consts::PI;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Which way a cup currently faces
///
/// Every half-turn flips a cup's local X axis, so arc offsets computed in
/// the local frame must account for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationParity {
    #[default]
    Forward,
    Reversed,
}

impl RotationParity {
    /// Parity of a node rotated by `angle` radians about the vertical axis
    pub fn from_angle(angle: f32) -> Self {
        if angle.cos() < 0.0 {
            RotationParity::Reversed
        } else {
            RotationParity::Forward
        }
    }

    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            RotationParity::Forward => 1.0,
            RotationParity::Reversed => -1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            RotationParity::Forward => RotationParity::Reversed,
            RotationParity::Reversed => RotationParity::Forward,
        }
    }
}

/// One stage of a swap animation, in the order they must run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArcPhase {
    /// Instantly move the pivot to `pivot` and translate by `translate`
    Reanchor { pivot: Vec3, translate: Vec3 },
    /// Rotate by `angle` around `axis` through the pivot over `duration` seconds
    Rotate { axis: Vec3, angle: f32, duration: f32 },
    /// Instantly reset the pivot and translate by `translate`
    Restore { translate: Vec3 },
}

/// Geometry and timing of one cup's half of a swap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcDescriptor {
    /// Slot the cup leaves
    pub from: usize,
    /// Slot the cup arrives at
    pub to: usize,
    /// Signed distance from the cup to the arc midpoint along local X
    pub pivot_offset: f32,
    /// Arc length travelled by the cup
    pub path_length: f32,
    /// Seconds the half-turn takes
    pub duration: f32,
    /// +1 counter-clockwise, -1 clockwise
    pub rotation_direction: f32,
}

impl ArcDescriptor {
    /// Radius of the semicircle
    #[inline]
    pub fn radius(&self) -> f32 {
        self.pivot_offset.abs()
    }

    /// Signed rotation angle (a half-turn)
    #[inline]
    pub fn angle(&self) -> f32 {
        PI * self.rotation_direction
    }

    pub fn is_clockwise(&self) -> bool {
        self.rotation_direction < 0.0
    }

    pub fn pivot(&self) -> Vec3 {
        Vec3::new(self.pivot_offset, 0.0, 0.0)
    }

    /// The reanchor, rotate, restore stages for an animation player
    pub fn phases(&self) -> [ArcPhase; 3] {
        let pivot = self.pivot();
        [
            ArcPhase::Reanchor {
                pivot,
                translate: pivot,
            },
            ArcPhase::Rotate {
                axis: Vec3::Y,
                angle: self.angle(),
                duration: self.duration,
            },
            ArcPhase::Restore { translate: -pivot },
        ]
    }

    /// Displacement from the start position at progress `t` in `[0, 1]`,
    /// expressed in the cup's local frame before the turn
    pub fn sample(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let pivot = self.pivot();
        pivot - Quat::from_rotation_y(self.angle() * t) * pivot
    }

    /// Facing of the cup once the half-turn has finished
    pub fn final_parity(&self, start: RotationParity) -> RotationParity {
        start.flipped()
    }
}
