//! Idle/demo mode - the game plays itself
//!
//! Carrying: head for the nearest NPC that wants something. Empty-handed:
//! grab a bonus when time is short, otherwise the nearest item.

use glam::Vec2;

use super::state::GameState;
use super::tick::TickInput;
use crate::distance_squared;

/// Below this share of the time limit, bonus items take priority
const LOW_TIME_RATIO: f32 = 1.0 / 3.0;

fn nearest(from: Vec2, points: impl Iterator<Item = Vec2>) -> Option<Vec2> {
    points.min_by(|a, b| {
        distance_squared(from, *a)
            .partial_cmp(&distance_squared(from, *b))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}

/// Where the autopilot wants to go, if anywhere
pub fn target(state: &GameState) -> Option<Vec2> {
    if state.phase.is_terminal() {
        return None;
    }
    let from = state.player.pos;

    if state.player.is_carrying() {
        return nearest(
            from,
            state
                .npcs
                .iter()
                .filter(|npc| npc.needs_item())
                .map(|npc| npc.pos),
        );
    }

    let low_on_time = state.time_left < state.config.time_limit * LOW_TIME_RATIO;
    let bonus = nearest(from, state.bonus_items.iter().map(|b| b.pos));
    let item = nearest(
        from,
        state
            .items
            .iter()
            .filter(|item| !item.collected)
            .map(|item| item.pos),
    );

    if low_on_time {
        bonus.or(item)
    } else {
        item.or(bonus)
    }
}

/// Movement intent toward the current target
pub fn steer(state: &GameState) -> TickInput {
    let movement = target(state)
        .map(|t| (t - state.player.pos).normalize_or_zero())
        .unwrap_or(Vec2::ZERO);
    TickInput { movement }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::item::{BonusItem, Item};
    use crate::sim::state::GamePhase;
    use crate::sim::tick::{FrameDelta, game_over, tick};

    fn empty_state() -> GameState {
        let config = GameConfig {
            item_count: 0,
            bonus_item_count: 0,
            npc_count: 0,
            ..GameConfig::default()
        };
        GameState::new(config, 1)
    }

    #[test]
    fn test_nothing_to_chase() {
        let state = empty_state();
        assert_eq!(steer(&state).movement, Vec2::ZERO);
    }

    #[test]
    fn test_prefers_item_then_bonus_when_low() {
        let mut state = empty_state();
        let p = state.player.pos;
        state.items.push(Item::new(100, p + Vec2::new(200.0, 0.0), 20.0, 0.0));
        state.bonus_items.push(BonusItem::new(101, p + Vec2::new(-50.0, 0.0), 15.0));

        assert_eq!(target(&state), Some(p + Vec2::new(200.0, 0.0)));

        state.time_left = 2.0;
        assert_eq!(target(&state), Some(p + Vec2::new(-50.0, 0.0)));
        assert_eq!(steer(&state).movement, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_stops_after_game_over() {
        let mut state = empty_state();
        let p = state.player.pos;
        state.items.push(Item::new(100, p + Vec2::new(200.0, 0.0), 20.0, 0.0));
        game_over(&mut state, false);
        assert_eq!(target(&state), None);
    }

    #[test]
    fn test_autopilot_wins_default_game() {
        let config = GameConfig {
            time_limit: 120.0,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config, 2024);
        for _ in 0..(120 * 60) {
            let input = steer(&state);
            tick(&mut state, &input, FrameDelta::one());
            if state.phase.is_terminal() {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.score >= state.config.target_score);
    }
}
