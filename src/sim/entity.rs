//! Shared entity plumbing: per-frame update capability and tints

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Seeded RNG threaded through entity updates
pub type SimRng = Pcg32;

/// Per-frame behavior shared by every entity kind
///
/// `delta` is a frame factor: 1.0 is one 60 fps frame.
pub trait Updatable {
    fn update(&mut self, delta: f32, rng: &mut SimRng);
}

/// Color overlay applied to an entity sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tint {
    #[default]
    None,
    /// Player is hauling an item
    Carrying,
    /// NPC just received an item
    Satisfied,
}

impl Tint {
    /// RGB color for hosts that draw flat shapes
    pub fn rgb(self, base: u32) -> u32 {
        match self {
            Tint::None => base,
            Tint::Carrying => 0xf1c40f,
            Tint::Satisfied => 0x2ecc71,
        }
    }
}
