//! Game state and core simulation types
//!
//! Everything the per-frame tick reads or writes lives here. The state owns
//! the entity collections, the seeded RNG and the pending-event schedule.

use glam::Vec2;
use rand::SeedableRng;
use serde::Serialize;

use super::entity::SimRng;
use super::item::{BonusItem, Item};
use super::npc::Npc;
use super::player::Player;
use super::schedule::Schedule;
use crate::config::GameConfig;
use crate::consts::{NPC_CORNER_PADDING, SPAWN_INSET_X, SPAWN_INSET_Y};
use crate::{clamp_soft, random_range};
use crate::ui::Hud;

/// Overall run phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    Playing,
    Won,
    Lost,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GamePhase::Playing)
    }
}

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GameEvent {
    ItemSpawned { item_id: u32 },
    ItemPickedUp { item_id: u32 },
    BonusSpawned { bonus_id: u32 },
    BonusCollected { bonus_id: u32, time_left: f32 },
    Delivered { npc_id: u32, item_id: u32, score: u32 },
    /// NPC finished its cooldown and wants another item
    NpcReady { npc_id: u32 },
    /// The whole-second counter changed
    TimerDisplayChanged { seconds: i32 },
    GameOver { won: bool, score: u32 },
    /// Time to switch to the menu scene
    ReturnToMenu,
}

/// Complete game state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: SimRng,
    pub phase: GamePhase,
    /// Countdown in seconds, within [0, time_limit]
    pub time_left: f32,
    pub score: u32,
    pub player: Player,
    /// Uncollected items, in spawn order
    pub items: Vec<Item>,
    pub bonus_items: Vec<BonusItem>,
    pub npcs: Vec<Npc>,
    pub schedule: Schedule,
    pub hud: Hud,
    /// Set once the return-to-menu delay has elapsed
    pub menu_requested: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Hosts must call `drain_events` every frame or this grows without bound
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new run with the given config and seed
    pub fn new(config: GameConfig, seed: u64) -> Self {
        let player = Player::new(
            &config,
            Vec2::new(config.world_width / 2.0, config.world_height / 2.0),
        );
        let mut state = Self {
            seed,
            rng: SimRng::seed_from_u64(seed),
            phase: GamePhase::Playing,
            time_left: config.time_limit,
            score: 0,
            player,
            items: Vec::new(),
            bonus_items: Vec::new(),
            npcs: Vec::new(),
            schedule: Schedule::new(),
            hud: Hud::new(config.time_limit),
            menu_requested: false,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
            config,
        };

        state.spawn_npcs();
        for _ in 0..state.config.item_count {
            state.spawn_item();
        }
        for _ in 0..state.config.bonus_item_count {
            state.spawn_bonus_item();
        }
        // Initial spawns are not news
        state.events.clear();

        log::info!(
            "New run (seed {}): {} npcs, {} items, {} bonus items, {}s",
            seed,
            state.npcs.len(),
            state.items.len(),
            state.bonus_items.len(),
            state.config.time_limit
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Home positions: the four corners, then the center for any extras.
    /// Large NPCs are pushed inward so they start fully inside the world.
    pub fn npc_homes(config: &GameConfig) -> Vec<Vec2> {
        let (w, h, p) = (config.world_width, config.world_height, NPC_CORNER_PADDING);
        let r = config.npc_radius;
        let corners = [
            Vec2::new(p, p),
            Vec2::new(w - p, p),
            Vec2::new(p, h - p),
            Vec2::new(w - p, h - p),
        ];
        (0..config.npc_count)
            .map(|i| corners.get(i).copied().unwrap_or(Vec2::new(w / 2.0, h / 2.0)))
            .map(|home| Vec2::new(clamp_soft(home.x, r, w - r), clamp_soft(home.y, r, h - r)))
            .collect()
    }

    fn spawn_npcs(&mut self) {
        for home in Self::npc_homes(&self.config) {
            let id = self.next_entity_id();
            let npc = Npc::new(id, home, &self.config);
            self.npcs.push(npc);
        }
    }

    /// Random point in the item spawn area
    fn random_spawn_pos(&mut self) -> Vec2 {
        let (w, h) = (self.config.world_width, self.config.world_height);
        let x = random_range(&mut self.rng, SPAWN_INSET_X, w - SPAWN_INSET_X);
        let y = random_range(&mut self.rng, SPAWN_INSET_Y, h - SPAWN_INSET_Y);
        // Tiny worlds: keep the center inside the world
        Vec2::new(x.clamp(0.0, w), y.clamp(0.0, h))
    }

    pub fn spawn_item(&mut self) -> u32 {
        let id = self.next_entity_id();
        let pos = self.random_spawn_pos();
        let bob_offset = random_range(&mut self.rng, 0.0, 100.0);
        self.items
            .push(Item::new(id, pos, self.config.item_radius, bob_offset));
        self.events.push(GameEvent::ItemSpawned { item_id: id });
        id
    }

    pub fn spawn_bonus_item(&mut self) -> u32 {
        let id = self.next_entity_id();
        let pos = self.random_spawn_pos();
        self.bonus_items
            .push(BonusItem::new(id, pos, self.config.bonus_radius));
        self.events.push(GameEvent::BonusSpawned { bonus_id: id });
        id
    }

    /// Take the events produced since the last drain. Call once per frame;
    /// nothing else empties the buffer.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Number of NPCs currently holding a delivery
    pub fn satisfied_count(&self) -> usize {
        self.npcs.iter().filter(|npc| !npc.needs_item()).count()
    }

    /// Serializable view for hosts and debugging
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            time_left: self.time_left,
            score: self.score,
            player: &self.player,
            items: &self.items,
            bonus_items: &self.bonus_items,
            npcs: &self.npcs,
            hud: &self.hud,
        }
    }
}

/// Read-only view of everything a renderer needs
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub time_left: f32,
    pub score: u32,
    pub player: &'a Player,
    pub items: &'a [Item],
    pub bonus_items: &'a [BonusItem],
    pub npcs: &'a [Npc],
    pub hud: &'a Hud,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{FrameDelta, TickInput, tick};
    use proptest::prelude::*;

    fn npcs_inside(state: &GameState) -> bool {
        let (w, h) = (state.config.world_width, state.config.world_height);
        state.npcs.iter().all(|npc| {
            let r = npc.radius;
            let eps = 1e-3;
            npc.pos.x >= r - eps
                && npc.pos.x <= w - r + eps
                && npc.pos.y >= r - eps
                && npc.pos.y <= h - r + eps
        })
    }

    #[test]
    fn test_new_run_layout() {
        let config = GameConfig::default();
        let state = GameState::new(config.clone(), 1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_left, 10.0);
        assert_eq!(state.npcs.len(), 4);
        assert_eq!(state.items.len(), 4);
        assert_eq!(state.bonus_items.len(), 2);
        assert_eq!(state.player.pos, Vec2::new(360.0, 640.0));
        assert!(state.events().is_empty());

        assert_eq!(state.npcs[0].home, Vec2::new(80.0, 80.0));
        assert_eq!(state.npcs[3].home, Vec2::new(640.0, 1200.0));

        for item in &state.items {
            assert!((100.0..=620.0).contains(&item.pos.x));
            assert!((200.0..=1080.0).contains(&item.pos.y));
        }
    }

    #[test]
    fn test_extra_npcs_go_to_center() {
        let config = GameConfig {
            npc_count: 5,
            ..GameConfig::default()
        };
        let homes = GameState::npc_homes(&config);
        assert_eq!(homes.len(), 5);
        assert_eq!(homes[4], Vec2::new(360.0, 640.0));
    }

    #[test]
    fn test_large_npcs_start_inside() {
        let config = GameConfig {
            npc_radius: 100.0,
            npc_count: 5,
            item_count: 0,
            bonus_item_count: 0,
            ..GameConfig::default()
        };
        assert!(config.validate().is_ok());
        let homes = GameState::npc_homes(&config);
        assert_eq!(homes[0], Vec2::new(100.0, 100.0));
        assert_eq!(homes[3], Vec2::new(620.0, 1180.0));
        assert_eq!(homes[4], Vec2::new(360.0, 640.0));

        let mut state = GameState::new(config, 9);
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), FrameDelta::one());
            assert!(npcs_inside(&state));
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let state = GameState::new(GameConfig::default(), 5);
        let mut ids: Vec<u32> = state
            .npcs
            .iter()
            .map(|n| n.id)
            .chain(state.items.iter().map(|i| i.id))
            .chain(state.bonus_items.iter().map(|b| b.id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(GameConfig::default(), 77);
        let b = GameState::new(GameConfig::default(), 77);
        for (x, y) in a.items.iter().zip(&b.items) {
            assert_eq!(x.pos, y.pos);
        }
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(GameConfig::default(), 3);
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"Playing\""));
        assert!(json.contains("\"npcs\""));
    }

    proptest! {
        #[test]
        fn npc_positions_stay_in_bounds(
            npc_radius in 1.0f32..=360.0,
            npc_count in 1usize..6,
            speed in 0.0f32..50.0,
            wander in 0.0f32..800.0,
            seed in any::<u64>(),
            ticks in 1usize..400,
        ) {
            let config = GameConfig {
                npc_radius,
                npc_count,
                player_speed: speed,
                npc_wander_radius: wander,
                item_count: 0,
                bonus_item_count: 0,
                time_limit: 1000.0,
                ..GameConfig::default()
            };
            prop_assume!(config.validate().is_ok());
            let mut state = GameState::new(config, seed);
            prop_assert!(npcs_inside(&state));
            for _ in 0..ticks {
                tick(&mut state, &TickInput::default(), FrameDelta::one());
                prop_assert!(npcs_inside(&state));
            }
        }
    }
}
