//! Per-frame simulation tick
//!
//! Order within a tick: scheduled events, countdown, movement, entity
//! updates, collisions, win check. Nothing but scheduled events runs once the
//! run has ended.

use glam::Vec2;

use super::collision::circles_overlap;
use super::entity::Updatable;
use super::schedule::ScheduledEvent;
use super::state::{GameEvent, GamePhase, GameState};
use crate::config::WinRule;
use crate::consts::{FRAME_MS, MAX_FRAME_DELTA};
use crate::random_range;
use crate::ui::StatusMessage;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Movement intent, magnitude 0..=1
    pub movement: Vec2,
}

/// Elapsed time for one host frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta {
    /// Frame factor (1.0 = one 60 fps frame); drives movement and animation
    pub frames: f32,
    /// Wall-clock milliseconds; drives the countdown and the schedule
    pub ms: f32,
}

impl FrameDelta {
    pub fn from_ms(ms: f32) -> Self {
        Self {
            frames: ms / FRAME_MS,
            ms,
        }
    }

    pub fn from_frames(frames: f32) -> Self {
        Self {
            frames,
            ms: frames * FRAME_MS,
        }
    }

    /// One reference frame
    pub fn one() -> Self {
        Self::from_frames(1.0)
    }
}

/// Advance the game state by one host frame
pub fn tick(state: &mut GameState, input: &TickInput, frame: FrameDelta) {
    run_scheduled(state, frame.ms);

    if state.phase.is_terminal() {
        return;
    }

    // Clamp delta to avoid huge jumps after stalls
    let delta = frame.frames.clamp(0.0, MAX_FRAME_DELTA);
    state.time_ticks += 1;

    update_timer(state, frame.ms);
    if state.time_left <= 0.0 {
        game_over(state, false);
        return;
    }

    if input.movement != Vec2::ZERO {
        state.player.move_by(input.movement, delta);
    }

    state.player.update(delta, &mut state.rng);
    for item in &mut state.items {
        item.update(delta, &mut state.rng);
    }
    for bonus in &mut state.bonus_items {
        bonus.update(delta, &mut state.rng);
    }
    for npc in &mut state.npcs {
        let was_waiting = npc.needs_item();
        npc.update(delta, &mut state.rng);
        if !was_waiting && npc.needs_item() {
            state.events.push(GameEvent::NpcReady { npc_id: npc.id });
        }
    }

    resolve_collisions(state);
    check_win(state);
}

fn run_scheduled(state: &mut GameState, elapsed_ms: f32) {
    for event in state.schedule.advance(elapsed_ms) {
        match event {
            ScheduledEvent::SpawnItem if !state.phase.is_terminal() => {
                let id = state.spawn_item();
                log::debug!("Respawned item {}", id);
            }
            ScheduledEvent::SpawnBonusItem if !state.phase.is_terminal() => {
                let id = state.spawn_bonus_item();
                log::debug!("Respawned bonus item {}", id);
            }
            ScheduledEvent::SpawnItem | ScheduledEvent::SpawnBonusItem => {}
            ScheduledEvent::ReturnToMenu => {
                state.menu_requested = true;
                state.events.push(GameEvent::ReturnToMenu);
            }
        }
    }
}

fn update_timer(state: &mut GameState, elapsed_ms: f32) {
    state.time_left = (state.time_left - elapsed_ms.max(0.0) / 1000.0).max(0.0);

    let seconds = state.time_left.ceil() as i32;
    if seconds != state.hud.displayed_seconds {
        state.hud.displayed_seconds = seconds;
        state
            .events
            .push(GameEvent::TimerDisplayChanged { seconds });
    }
    state.hud.timer_bar.update(state.time_left);
}

/// Pickups, bonus collection and delivery, in that order
pub fn resolve_collisions(state: &mut GameState) {
    // Player vs items: newest first, one per frame
    if !state.player.is_carrying() {
        let hit = state
            .items
            .iter()
            .rposition(|item| !item.collected && circles_overlap(&state.player, item));
        if let Some(idx) = hit {
            let item = state.items.remove(idx);
            let item_id = item.id;
            match state.player.pickup(item) {
                Ok(()) => {
                    state
                        .schedule
                        .schedule(state.config.item_respawn_ms, ScheduledEvent::SpawnItem);
                    state.events.push(GameEvent::ItemPickedUp { item_id });
                    log::debug!("Picked up item {}", item_id);
                }
                Err(item) => state.items.insert(idx, item),
            }
        }
    }

    // Player vs bonus items: every overlap counts
    let collected: Vec<u32> = state
        .bonus_items
        .iter()
        .filter(|bonus| circles_overlap(&state.player, *bonus))
        .map(|bonus| bonus.id)
        .collect();
    if !collected.is_empty() {
        state.bonus_items.retain(|bonus| !collected.contains(&bonus.id));
        for bonus_id in collected {
            state.time_left =
                (state.time_left + state.config.bonus_time_value).min(state.config.time_limit);
            let delay = random_range(
                &mut state.rng,
                state.config.bonus_respawn_min_ms,
                state.config.bonus_respawn_max_ms,
            );
            state.schedule.schedule(delay, ScheduledEvent::SpawnBonusItem);
            state.events.push(GameEvent::BonusCollected {
                bonus_id,
                time_left: state.time_left,
            });
            log::debug!("Bonus {} collected, {:.2}s left", bonus_id, state.time_left);
        }
    }

    // Player vs NPCs: first waiting NPC in reach, one per frame
    if state.player.is_carrying() {
        let hit = state
            .npcs
            .iter()
            .position(|npc| npc.needs_item() && circles_overlap(&state.player, npc));
        if let Some(idx) = hit {
            if let Some(item) = state.player.deliver() {
                let npc = &mut state.npcs[idx];
                npc.receive_item();
                state.score += state.config.delivery_score;
                state.hud.score = state.score;
                state.events.push(GameEvent::Delivered {
                    npc_id: npc.id,
                    item_id: item.id,
                    score: state.score,
                });
                log::info!("Delivered item {} to npc {}, score {}", item.id, npc.id, state.score);
            }
        }
    }
}

fn check_win(state: &mut GameState) {
    let won = match state.config.win_rule {
        WinRule::ScoreTarget => state.score >= state.config.target_score,
        WinRule::AllSatisfied => {
            !state.npcs.is_empty() && state.satisfied_count() == state.npcs.len()
        }
    };
    if won {
        game_over(state, true);
    }
}

/// End the run: banner, hide joystick, drop respawns, queue the menu
pub fn game_over(state: &mut GameState, won: bool) {
    if state.phase.is_terminal() {
        return;
    }

    state.phase = if won { GamePhase::Won } else { GamePhase::Lost };
    state.hud.status = Some(if won {
        StatusMessage::WIN
    } else {
        StatusMessage::LOSE
    });
    state.hud.joystick_visible = false;

    let cancelled = state.schedule.cancel_where(ScheduledEvent::is_spawn);
    state
        .schedule
        .schedule(state.config.menu_delay_ms, ScheduledEvent::ReturnToMenu);

    state.events.push(GameEvent::GameOver {
        won,
        score: state.score,
    });
    log::info!(
        "Run over: {} with score {} ({} pending respawns cancelled)",
        if won { "won" } else { "lost" },
        state.score,
        cancelled
    );
}
