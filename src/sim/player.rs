//! The player avatar

use glam::Vec2;
use serde::Serialize;

use super::collision::Circle;
use super::entity::{SimRng, Tint, Updatable};
use super::item::Item;
use crate::config::{GameConfig, MovementModel};
use crate::consts::{CARRY_SPEED_FACTOR, VELOCITY_EPSILON};

/// The player. Holds at most one item at a time.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Current speed cap (reduced while carrying)
    pub max_speed: f32,
    pub tint: Tint,
    base_speed: f32,
    movement: MovementModel,
    world: Vec2,
    carrying: Option<Item>,
}

impl Player {
    pub fn new(config: &GameConfig, pos: Vec2) -> Self {
        let mut player = Self {
            pos,
            vel: Vec2::ZERO,
            radius: config.player_radius,
            max_speed: config.player_speed,
            tint: Tint::None,
            base_speed: config.player_speed,
            movement: config.movement,
            world: Vec2::new(config.world_width, config.world_height),
            carrying: None,
        };
        player.clamp_to_world();
        player
    }

    /// Integrate one frame of movement intent
    pub fn move_by(&mut self, input: Vec2, delta: f32) {
        match self.movement {
            MovementModel::Direct => {
                self.pos += input * self.max_speed * delta;
                self.clamp_to_world();
            }
            MovementModel::Accelerated {
                acceleration,
                friction,
            } => {
                self.vel += input * acceleration * delta;
                self.vel *= friction;
                self.vel = self.vel.clamp_length_max(self.max_speed);

                self.pos += self.vel * delta;
                self.clamp_to_world();

                // Stop completely when barely moving
                if self.vel.x.abs() < VELOCITY_EPSILON {
                    self.vel.x = 0.0;
                }
                if self.vel.y.abs() < VELOCITY_EPSILON {
                    self.vel.y = 0.0;
                }
            }
        }
    }

    /// Take an item. Hands it back if already carrying one.
    pub fn pickup(&mut self, mut item: Item) -> Result<(), Item> {
        if self.carrying.is_some() {
            return Err(item);
        }
        item.collected = true;
        self.carrying = Some(item);
        self.max_speed = self.base_speed * CARRY_SPEED_FACTOR;
        self.tint = Tint::Carrying;
        Ok(())
    }

    /// Give up the carried item, if any, restoring full speed
    pub fn deliver(&mut self) -> Option<Item> {
        let item = self.carrying.take()?;
        self.max_speed = self.base_speed;
        self.tint = Tint::None;
        Some(item)
    }

    pub fn carrying(&self) -> Option<&Item> {
        self.carrying.as_ref()
    }

    pub fn is_carrying(&self) -> bool {
        self.carrying.is_some()
    }

    fn clamp_to_world(&mut self) {
        self.pos.x = crate::clamp_soft(self.pos.x, self.radius, self.world.x - self.radius);
        self.pos.y = crate::clamp_soft(self.pos.y, self.radius, self.world.y - self.radius);
    }
}

impl Updatable for Player {
    fn update(&mut self, _delta: f32, _rng: &mut SimRng) {}
}

impl Circle for Player {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}
