//! Pick & Deliver - A pick-up-and-deliver arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `input`: Keyboard and virtual joystick aggregation
//! - `ui`: HUD models fed by the simulation (timer bar)
//! - `config`: Immutable game configuration

pub mod config;
pub mod input;
pub mod sim;
pub mod ui;

pub use config::{ConfigError, GameConfig, MovementModel, WinRule};

use glam::Vec2;
use rand::Rng;

/// Fixed simulation constants (not tunable through `GameConfig`)
pub mod consts {
    /// Milliseconds in one reference frame; frame-factor deltas are multiples of this
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Largest frame-factor delta accepted per tick (prevents jumps after stalls)
    pub const MAX_FRAME_DELTA: f32 = 2.0;

    /// Max speed multiplier while the player carries an item
    pub const CARRY_SPEED_FACTOR: f32 = 0.6;
    /// Velocity components below this snap to zero (accelerated movement)
    pub const VELOCITY_EPSILON: f32 = 0.1;

    /// NPC speed relative to the player's base speed
    pub const NPC_SPEED_FACTOR: f32 = 0.2;
    /// Distance at which a wandering NPC counts as arrived
    pub const NPC_ARRIVE_DISTANCE: f32 = 5.0;
    /// Extra clearance kept between a wander target and the playfield edge
    pub const NPC_EDGE_PADDING: f32 = 10.0;
    /// Idle wait after arriving, in frames (1-3 seconds at 60 fps)
    pub const NPC_IDLE_MIN_FRAMES: f32 = 60.0;
    pub const NPC_IDLE_MAX_FRAMES: f32 = 180.0;
    /// NPC wobble while walking
    pub const NPC_WOBBLE_RATE: f32 = 0.2;
    pub const NPC_WOBBLE_AMPLITUDE: f32 = 0.2;
    /// Inset of the four NPC home corners from the world edges
    pub const NPC_CORNER_PADDING: f32 = 80.0;

    /// Bonus item pulse
    pub const BONUS_PULSE_RATE: f32 = 0.05;
    pub const BONUS_PULSE_AMPLITUDE: f32 = 0.1;
    /// Floor item bob: one radian per this many milliseconds
    pub const ITEM_BOB_PERIOD_MS: f64 = 200.0;
    pub const ITEM_BOB_AMPLITUDE: f32 = 0.1;

    /// Spawn area insets for items and bonus items
    pub const SPAWN_INSET_X: f32 = 100.0;
    pub const SPAWN_INSET_Y: f32 = 200.0;
}

/// Squared distance between two points
#[inline]
pub fn distance_squared(a: Vec2, b: Vec2) -> f32 {
    let d = b - a;
    d.x * d.x + d.y * d.y
}

/// Distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    distance_squared(a, b).sqrt()
}

/// Uniform sample between `min` and `max`; returns `min` when the range is empty
#[inline]
pub fn random_range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    rng.random::<f32>() * (max - min) + min
}

/// Clamp without panicking when `min > max` (degenerate playfields)
#[inline]
pub(crate) fn clamp_soft(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}
