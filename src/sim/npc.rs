//! NPCs that wander around home and wait for deliveries
//!
//! State machine:
//! - `Idle` counts down, then picks a wander target near home
//! - `Moving` walks to the target with a wobble, then idles again
//! - `Satisfied` (after a delivery) stands still until the cooldown runs out

use glam::Vec2;
use serde::Serialize;

use super::collision::Circle;
use super::entity::{SimRng, Tint, Updatable};
use crate::config::GameConfig;
use crate::consts::*;
use crate::{clamp_soft, random_range};

/// Behavior state, each variant carrying its own timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum NpcState {
    /// Waiting before the next wander (frames remaining)
    Idle { timer: f32 },
    /// Walking to `target`
    Moving { target: Vec2, wobble_time: f32 },
    /// Holding a delivered item (milliseconds remaining)
    Satisfied { cooldown_ms: f32 },
}

/// Presentation state, read by the host
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct NpcVisual {
    pub tint: Tint,
    /// Sprite rotation (radians)
    pub rotation: f32,
    /// Heart above the head
    pub heart_visible: bool,
    pub heart_rotation: f32,
    /// Shows the delivered item in the NPC's hands
    pub holding_item: bool,
    /// Remaining cooldown as a 0..=1 ratio
    pub cooldown_fill: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Npc {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub home: Vec2,
    pub state: NpcState,
    pub visual: NpcVisual,
    speed: f32,
    wander_radius: f32,
    cooldown_total_ms: f32,
    /// Wander targets are clamped into this box
    bounds_min: Vec2,
    bounds_max: Vec2,
    satisfied_ms: f32,
}

impl Npc {
    pub fn new(id: u32, home: Vec2, config: &GameConfig) -> Self {
        let (w, h, r) = (config.world_width, config.world_height, config.npc_radius);
        let margin = r + NPC_EDGE_PADDING;
        // Wander area, kept where the whole body stays inside the world
        let bounds_min = Vec2::new(
            clamp_soft(margin, r, w - r),
            clamp_soft(config.playfield_top() + margin, r, h - r),
        );
        let bounds_max = Vec2::new(
            clamp_soft(w - margin, r, w - r),
            clamp_soft(h - margin, r, h - r),
        );
        Self {
            id,
            pos: home,
            radius: config.npc_radius,
            home,
            state: NpcState::Idle { timer: 0.0 },
            visual: NpcVisual::default(),
            speed: config.player_speed * NPC_SPEED_FACTOR,
            wander_radius: config.npc_wander_radius,
            cooldown_total_ms: config.npc_cooldown_ms,
            bounds_min,
            bounds_max,
            satisfied_ms: 0.0,
        }
    }

    /// True while idle or moving
    pub fn needs_item(&self) -> bool {
        !matches!(self.state, NpcState::Satisfied { .. })
    }

    /// Accept a delivery. Returns false (and does nothing) while satisfied.
    pub fn receive_item(&mut self) -> bool {
        if !self.needs_item() {
            return false;
        }
        self.state = NpcState::Satisfied {
            cooldown_ms: self.cooldown_total_ms,
        };
        self.satisfied_ms = 0.0;
        self.visual = NpcVisual {
            tint: Tint::Satisfied,
            rotation: 0.0,
            heart_visible: true,
            heart_rotation: 0.0,
            holding_item: true,
            cooldown_fill: 1.0,
        };
        true
    }

    /// Clamp a point into the area NPCs may wander
    pub fn clamp_to_playfield(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            clamp_soft(point.x, self.bounds_min.x, self.bounds_max.x),
            clamp_soft(point.y, self.bounds_min.y, self.bounds_max.y),
        )
    }

    fn pick_target(&self, rng: &mut SimRng) -> Vec2 {
        let angle = random_range(rng, 0.0, std::f32::consts::TAU);
        let dist = random_range(rng, 0.0, self.wander_radius);
        self.clamp_to_playfield(self.home + Vec2::from_angle(angle) * dist)
    }

    fn start_idle(&mut self, rng: &mut SimRng) {
        self.state = NpcState::Idle {
            timer: random_range(rng, NPC_IDLE_MIN_FRAMES, NPC_IDLE_MAX_FRAMES),
        };
        self.visual.rotation = 0.0;
    }

    fn update_idle(&mut self, timer: f32, delta: f32, rng: &mut SimRng) {
        let timer = timer - delta;
        self.state = if timer <= 0.0 {
            NpcState::Moving {
                target: self.pick_target(rng),
                wobble_time: 0.0,
            }
        } else {
            NpcState::Idle { timer }
        };
    }

    fn update_moving(&mut self, target: Vec2, wobble_time: f32, delta: f32, rng: &mut SimRng) {
        let to_target = target - self.pos;
        let dist = to_target.length();

        if dist < NPC_ARRIVE_DISTANCE {
            self.start_idle(rng);
            return;
        }

        let step = (self.speed * delta).min(dist);
        self.pos += to_target / dist * step;

        let wobble_time = wobble_time + delta * NPC_WOBBLE_RATE;
        self.visual.rotation = wobble_time.sin() * NPC_WOBBLE_AMPLITUDE;
        self.state = NpcState::Moving {
            target,
            wobble_time,
        };
    }

    fn update_satisfied(&mut self, cooldown_ms: f32, delta: f32, rng: &mut SimRng) {
        let elapsed_ms = delta * FRAME_MS;
        let cooldown_ms = cooldown_ms - elapsed_ms;

        if cooldown_ms <= 0.0 {
            self.visual = NpcVisual::default();
            self.start_idle(rng);
            return;
        }

        self.satisfied_ms += elapsed_ms;
        self.visual.heart_rotation = (self.satisfied_ms * 0.02).sin() * 0.2;
        self.visual.cooldown_fill = if self.cooldown_total_ms > 0.0 {
            (cooldown_ms / self.cooldown_total_ms).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.state = NpcState::Satisfied { cooldown_ms };
    }
}

impl Updatable for Npc {
    fn update(&mut self, delta: f32, rng: &mut SimRng) {
        match self.state {
            NpcState::Idle { timer } => self.update_idle(timer, delta, rng),
            NpcState::Moving {
                target,
                wobble_time,
            } => self.update_moving(target, wobble_time, delta, rng),
            NpcState::Satisfied { cooldown_ms } => self.update_satisfied(cooldown_ms, delta, rng),
        }
    }
}

impl Circle for Npc {
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

    fn npc() -> (Npc, SimRng) {
        let config = GameConfig::default();
        (
            Npc::new(1, Vec2::new(360.0, 640.0), &config),
            SimRng::seed_from_u64(42),
        )
    }

    #[test]
    fn test_home_from_constructor() {
        let (npc, _) = npc();
        assert_eq!(npc.home, Vec2::new(360.0, 640.0));
        assert_eq!(npc.pos, npc.home);
        assert!(npc.needs_item());
    }

    #[test]
    fn test_first_update_starts_wandering() {
        let (mut npc, mut rng) = npc();
        npc.update(1.0, &mut rng);
        let NpcState::Moving { target, .. } = npc.state else {
            panic!("expected Moving, got {:?}", npc.state);
        };
        assert!(target.distance(npc.home) <= 200.0 + 1e-3);
    }

    #[test]
    fn test_wander_cycle() {
        let (mut npc, mut rng) = npc();
        let mut arrivals = 0;
        let mut departures = 0;
        let mut was_moving = false;

        for _ in 0..20_000 {
            npc.update(1.0, &mut rng);
            let moving = matches!(npc.state, NpcState::Moving { .. });
            if moving && !was_moving {
                departures += 1;
            }
            if !moving && was_moving {
                arrivals += 1;
                assert_eq!(npc.visual.rotation, 0.0);
                let NpcState::Idle { timer } = npc.state else {
                    panic!("expected Idle");
                };
                assert!((NPC_IDLE_MIN_FRAMES..=NPC_IDLE_MAX_FRAMES).contains(&timer));
            }
            was_moving = moving;
            assert!(npc.needs_item());
            assert!(npc.pos.distance(npc.home) <= 200.0 + 1e-2);
        }

        assert!(arrivals >= 5, "only {arrivals} arrivals");
        assert!(departures >= arrivals);
    }

    #[test]
    fn test_wobble_is_bounded() {
        let (mut npc, mut rng) = npc();
        for _ in 0..2_000 {
            npc.update(1.0, &mut rng);
            assert!(npc.visual.rotation.abs() <= NPC_WOBBLE_AMPLITUDE + 1e-6);
        }
    }

    #[test]
    fn test_targets_avoid_ui_band() {
        let config = GameConfig::default();
        let mut npc = Npc::new(1, Vec2::new(80.0, 80.0), &config);
        let mut rng = SimRng::seed_from_u64(9);
        let top = config.ui_top_band + config.npc_radius + NPC_EDGE_PADDING;
        for _ in 0..200 {
            let target = npc.pick_target(&mut rng);
            assert!(target.y >= top);
            assert!(target.x >= config.npc_radius + NPC_EDGE_PADDING);
        }
        // Starting inside the band is allowed, but walking only heads out of it
        npc.update(1.0, &mut rng);
        assert!(matches!(npc.state, NpcState::Moving { target, .. } if target.y >= top));
    }

    #[test]
    fn test_receive_item_and_cooldown() {
        let (mut npc, mut rng) = npc();
        npc.update(1.0, &mut rng);
        npc.update(1.0, &mut rng);
        assert!(npc.receive_item());

        assert!(!npc.needs_item());
        assert_eq!(npc.visual.tint, Tint::Satisfied);
        assert!(npc.visual.heart_visible);
        assert!(npc.visual.holding_item);
        assert_eq!(npc.visual.rotation, 0.0);

        // A second delivery is refused
        assert!(!npc.receive_item());

        // 5000 ms cooldown = 300 frames; stands still the whole time
        let pos = npc.pos;
        for _ in 0..299 {
            npc.update(1.0, &mut rng);
            assert!(!npc.needs_item());
            assert_eq!(npc.pos, pos);
            assert!(npc.visual.holding_item);
        }
        assert!(npc.visual.cooldown_fill > 0.0 && npc.visual.cooldown_fill < 0.01);

        // Rounding may need one extra frame
        npc.update(1.0, &mut rng);
        if !npc.needs_item() {
            npc.update(1.0, &mut rng);
        }
        assert!(npc.needs_item());
        assert!(matches!(npc.state, NpcState::Idle { .. }));
        assert_eq!(npc.visual, NpcVisual::default());
    }

    #[test]
    fn test_cooldown_fill_decreases() {
        let (mut npc, mut rng) = npc();
        npc.receive_item();
        let mut last = npc.visual.cooldown_fill;
        for _ in 0..100 {
            npc.update(1.0, &mut rng);
            assert!(npc.visual.cooldown_fill < last);
            last = npc.visual.cooldown_fill;
        }
    }
}
