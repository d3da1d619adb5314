use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
pub type Fixed64 = I32F32;

/// Convert an f64 to Fixed64. Use at the host boundary only.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::saturating_from_num(v)
}

/// A world-space position. Host coordinates are converted once on entry so
/// every distance comparison in the core is exact and reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: Fixed64,
    pub y: Fixed64,
    pub z: Fixed64,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: Fixed64::ZERO,
        y: Fixed64::ZERO,
        z: Fixed64::ZERO,
    };

    pub fn new(x: Fixed64, y: Fixed64, z: Fixed64) -> Self {
        Self { x, y, z }
    }

    pub fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Self::new(f64_to_fixed64(x), f64_to_fixed64(y), f64_to_fixed64(z))
    }

    /// Squared Euclidean distance. Saturates at `Fixed64::MAX` instead of
    /// overflowing for far-apart points.
    pub fn distance_sq(&self, other: &Position) -> Fixed64 {
        let dx = self.x.saturating_sub(other.x);
        let dy = self.y.saturating_sub(other.y);
        let dz = self.z.saturating_sub(other.z);
        dx.saturating_mul(dx)
            .saturating_add(dy.saturating_mul(dy))
            .saturating_add(dz.saturating_mul(dz))
    }

    /// True if `other` lies within `radius` of this point (inclusive).
    pub fn within(&self, other: &Position, radius: Fixed64) -> bool {
        self.distance_sq(other) <= radius.saturating_mul(radius)
    }
}
