//! Game configuration
//!
//! Immutable after construction; components copy what they need out of it.
//! Loaded from JSON (file on native, inline `<script>` element on the web).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// How player input turns into motion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementModel {
    /// position += input * speed * delta
    Direct,
    /// Velocity integrates input, decays by friction, capped at max speed
    Accelerated { acceleration: f32, friction: f32 },
}

impl Default for MovementModel {
    fn default() -> Self {
        MovementModel::Accelerated {
            acceleration: 1.5,
            friction: 0.85,
        }
    }
}

/// Condition that ends a run in a win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinRule {
    /// Score reaches `target_score`
    #[default]
    ScoreTarget,
    /// Every NPC is satisfied at once
    AllSatisfied,
}

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Height of the HUD strip at the top that NPCs never wander into
    pub ui_top_band: f32,

    // === Player ===
    /// Base max speed (pixels per reference frame)
    pub player_speed: f32,
    pub player_radius: f32,
    pub movement: MovementModel,

    // === Entities ===
    pub item_radius: f32,
    pub bonus_radius: f32,
    pub npc_radius: f32,
    /// How far an NPC strays from home
    pub npc_wander_radius: f32,
    pub npc_count: usize,
    pub item_count: usize,
    pub bonus_item_count: usize,

    // === Rules ===
    /// Countdown length (seconds)
    pub time_limit: f32,
    /// Seconds granted per bonus item (capped at `time_limit`)
    pub bonus_time_value: f32,
    pub delivery_score: u32,
    pub target_score: u32,
    pub win_rule: WinRule,

    // === Timers (milliseconds) ===
    pub npc_cooldown_ms: f32,
    pub item_respawn_ms: f32,
    pub bonus_respawn_min_ms: f32,
    pub bonus_respawn_max_ms: f32,
    /// Delay between the end of a run and the return to the menu
    pub menu_delay_ms: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 720.0,
            world_height: 1280.0,
            ui_top_band: 100.0,

            player_speed: 5.0,
            player_radius: 30.0,
            movement: MovementModel::default(),

            item_radius: 20.0,
            bonus_radius: 15.0,
            npc_radius: 35.0,
            npc_wander_radius: 200.0,
            npc_count: 4,
            item_count: 4,
            bonus_item_count: 2,

            time_limit: 10.0,
            bonus_time_value: 3.0,
            delivery_score: 10,
            target_score: 40,
            win_rule: WinRule::ScoreTarget,

            npc_cooldown_ms: 5000.0,
            item_respawn_ms: 2000.0,
            bonus_respawn_min_ms: 5000.0,
            bonus_respawn_max_ms: 10000.0,
            menu_delay_ms: 3000.0,
        }
    }
}

impl GameConfig {
    /// Element id holding an inline JSON config on the web
    #[cfg(target_arch = "wasm32")]
    const ELEMENT_ID: &'static str = "game-config";

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid { field, reason })
        }

        if !(self.world_width > 0.0) {
            return invalid("world_width", "must be positive");
        }
        if !(self.world_height > 0.0) {
            return invalid("world_height", "must be positive");
        }
        if !(self.player_radius > 0.0) {
            return invalid("player_radius", "must be positive");
        }
        let half_min = self.world_width.min(self.world_height) / 2.0;
        for (field, radius) in [
            ("player_radius", self.player_radius),
            ("item_radius", self.item_radius),
            ("bonus_radius", self.bonus_radius),
            ("npc_radius", self.npc_radius),
        ] {
            if radius < 0.0 || radius > half_min {
                return invalid(field, "must fit inside the world");
            }
        }
        if !(self.player_speed >= 0.0) {
            return invalid("player_speed", "must not be negative");
        }
        if let MovementModel::Accelerated { friction, .. } = self.movement {
            if !(0.0..=1.0).contains(&friction) {
                return invalid("movement.friction", "must be within 0..=1");
            }
        }
        if !(self.time_limit > 0.0) {
            return invalid("time_limit", "must be positive");
        }
        if self.bonus_time_value < 0.0 {
            return invalid("bonus_time_value", "must not be negative");
        }
        if self.bonus_respawn_min_ms > self.bonus_respawn_max_ms {
            return invalid("bonus_respawn_min_ms", "must not exceed bonus_respawn_max_ms");
        }
        if self.win_rule == WinRule::ScoreTarget && self.delivery_score == 0 && self.target_score > 0 {
            return invalid("delivery_score", "target score is unreachable");
        }
        if self.win_rule == WinRule::AllSatisfied && self.npc_count == 0 {
            return invalid("npc_count", "all_satisfied needs at least one npc");
        }
        Ok(())
    }

    /// Bottom edge of the HUD strip, used as the top of the NPC playfield
    pub fn playfield_top(&self) -> f32 {
        self.ui_top_band.max(0.0)
    }

    /// Load the inline config element, falling back to defaults (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded game config from #{}", Self::ELEMENT_ID);
                    return config;
                }
                Err(e) => log::warn!("Ignoring game config: {}", e),
            }
        }

        log::info!("Using default game config");
        Self::default()
    }

    /// Load from an optional file path, falling back to defaults (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: Option<&str>) -> Self {
        let Some(path) = path else {
            log::info!("Using default game config");
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded game config from {}", path);
                config
            }
            Err(e) => {
                log::warn!("Ignoring game config {}: {}", path, e);
                Self::default()
            }
        }
    }
}
