//! Deferred one-shot events (respawns, return to menu)
//!
//! Owned by the game state and advanced at the start of every tick, so
//! pending work can be inspected and cancelled when a run ends.

use serde::Serialize;

/// Work to do once a delay has elapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScheduledEvent {
    /// Put a fresh deliverable item on the floor
    SpawnItem,
    /// Put a fresh bonus item on the floor
    SpawnBonusItem,
    /// Hand control back to the menu after a run ended
    ReturnToMenu,
}

impl ScheduledEvent {
    /// Respawns only make sense while a run is live
    pub fn is_spawn(self) -> bool {
        matches!(self, ScheduledEvent::SpawnItem | ScheduledEvent::SpawnBonusItem)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PendingEvent {
    /// Scheduler clock time at which the event fires (ms)
    pub due_ms: f64,
    pub event: ScheduledEvent,
}

/// Time-ordered queue of pending events
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    now_ms: f64,
    /// Sorted by due time, ties in insertion order
    pending: Vec<PendingEvent>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scheduler clock (ms since the run started)
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Queue `event` to fire `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: f32, event: ScheduledEvent) {
        let due_ms = self.now_ms + f64::from(delay_ms.max(0.0));
        // Equal due times keep insertion order
        let idx = self.pending.partition_point(|p| p.due_ms <= due_ms);
        self.pending.insert(idx, PendingEvent { due_ms, event });
    }

    /// Cancel every pending event matching `pred`; returns how many were dropped
    pub fn cancel_where(&mut self, mut pred: impl FnMut(ScheduledEvent) -> bool) -> usize {
        let before = self.pending.len();
        self.pending.retain(|p| !pred(p.event));
        before - self.pending.len()
    }

    /// Advance the clock and return every event that came due, in order
    pub fn advance(&mut self, elapsed_ms: f32) -> Vec<ScheduledEvent> {
        self.now_ms += f64::from(elapsed_ms.max(0.0));
        let due = self.pending.partition_point(|p| p.due_ms <= self.now_ms);
        self.pending.drain(..due).map(|p| p.event).collect()
    }

    pub fn pending(&self) -> &[PendingEvent] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
