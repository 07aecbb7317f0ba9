//! Deliverable items and time bonus pickups

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use super::entity::{SimRng, Updatable};
use crate::consts::{BONUS_PULSE_AMPLITUDE, BONUS_PULSE_RATE, ITEM_BOB_AMPLITUDE, ITEM_BOB_PERIOD_MS};

/// An item waiting on the floor or riding on the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Set once the player has picked it up
    pub collected: bool,
    /// Phase offset for the idle bob (presentation only)
    pub bob_offset: f32,
}

impl Item {
    pub fn new(id: u32, pos: Vec2, radius: f32, bob_offset: f32) -> Self {
        Self {
            id,
            pos,
            radius,
            collected: false,
            bob_offset,
        }
    }

    /// Draw scale for the floor bob at simulation time `clock_ms`
    pub fn scale(&self, clock_ms: f64) -> f32 {
        let angle = clock_ms / ITEM_BOB_PERIOD_MS + f64::from(self.bob_offset);
        1.0 + angle.sin() as f32 * ITEM_BOB_AMPLITUDE
    }
}

impl Updatable for Item {
    fn update(&mut self, _delta: f32, _rng: &mut SimRng) {}
}

impl Circle for Item {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// A pickup that adds time to the countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusItem {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Pulse accumulator
    pub phase: f32,
}

impl BonusItem {
    pub fn new(id: u32, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            radius,
            phase: 0.0,
        }
    }

    /// Draw scale for the pulse animation
    pub fn scale(&self) -> f32 {
        1.0 + self.phase.sin() * BONUS_PULSE_AMPLITUDE
    }
}

impl Updatable for BonusItem {
    fn update(&mut self, delta: f32, _rng: &mut SimRng) {
        self.phase += delta * BONUS_PULSE_RATE;
    }
}

impl Circle for BonusItem {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_bonus_pulse_is_bounded() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut bonus = BonusItem::new(1, Vec2::ZERO, 15.0);
        assert_eq!(bonus.scale(), 1.0);
        for _ in 0..500 {
            bonus.update(1.0, &mut rng);
            let s = bonus.scale();
            assert!((0.9..=1.1).contains(&s), "scale {s} out of pulse range");
        }
        assert!((bonus.phase - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_item_update_is_inert() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut item = Item::new(3, Vec2::new(10.0, 20.0), 20.0, 0.5);
        item.update(2.0, &mut rng);
        assert_eq!(item.pos, Vec2::new(10.0, 20.0));
        assert!(!item.collected);
    }

    #[test]
    fn test_item_bob_uses_offset() {
        let a = Item::new(1, Vec2::ZERO, 20.0, 0.0);
        let b = Item::new(2, Vec2::ZERO, 20.0, 1.5);
        assert_eq!(a.scale(0.0), 1.0);
        assert!((b.scale(0.0) - (1.0 + 1.5f32.sin() * 0.1)).abs() < 1e-6);
        for ms in (0..10_000).step_by(37) {
            let s = b.scale(ms as f64);
            assert!((0.9..=1.1).contains(&s), "scale {s} out of bob range");
        }
    }
}
