use crate::fixed::{Fixed64, f64_to_fixed64};
use crate::flags::Color;
use crate::rng::PrepRng;
use serde::{Deserialize, Serialize};

/// Tunables shared by every calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Reach of the player, in world units. Bounds both how far a board may
    /// be from the observer and how far a station may be from its board.
    pub use_distance: f64,
    /// Colour painted on cost labels that cannot be covered.
    pub alert_color: Color,
    /// Shuffle ingredients before placing them.
    pub shuffle_ingredients: bool,
    /// Fixed shuffle seed. `None` draws a random seed per calculator.
    pub rng_seed: Option<u64>,
    /// Top up a station's fuel on confirm when the player carries fuel.
    pub refuel_on_confirm: bool,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            use_distance: 3.0,
            alert_color: Color::RED,
            shuffle_ingredients: true,
            rng_seed: None,
            refuel_on_confirm: true,
        }
    }
}

impl PrepConfig {
    pub fn use_distance_fixed(&self) -> Fixed64 {
        f64_to_fixed64(self.use_distance.max(0.0))
    }

    /// A fresh rng for one calculator. With a fixed seed, `salt` keeps
    /// calculators from sharing one shuffle sequence.
    pub fn make_rng(&self, salt: u64) -> PrepRng {
        match self.rng_seed {
            Some(seed) => PrepRng::new(seed ^ salt.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => PrepRng::new(rand::random()),
        }
    }
}
