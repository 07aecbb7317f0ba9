//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - Deferred work goes through the schedule, never host timers
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod entity;
pub mod item;
pub mod npc;
pub mod player;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{Circle, circles_overlap};
pub use entity::{SimRng, Tint, Updatable};
pub use item::{BonusItem, Item};
pub use npc::{Npc, NpcState, NpcVisual};
pub use player::Player;
pub use schedule::{PendingEvent, Schedule, ScheduledEvent};
pub use state::{GameEvent, GamePhase, GameState, Snapshot};
pub use tick::{FrameDelta, TickInput, game_over, tick};
