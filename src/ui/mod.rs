//! HUD models
//!
//! Plain data updated by the simulation and drawn by the host.

pub mod timer_bar;

pub use timer_bar::{BarColor, TimerBar};

use serde::Serialize;

/// End-of-run banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: &'static str,
    pub color: u32,
}

impl StatusMessage {
    pub const WIN: Self = Self {
        text: "YOU WIN!",
        color: 0x2ecc71,
    };
    pub const LOSE: Self = Self {
        text: "GAME OVER",
        color: 0xe74c3c,
    };
}

#[derive(Debug, Clone, Serialize)]
pub struct Hud {
    /// Whole seconds shown in the "Time:" counter (rounded up)
    pub displayed_seconds: i32,
    pub timer_bar: TimerBar,
    pub score: u32,
    pub status: Option<StatusMessage>,
    /// Virtual joystick is hidden once the run ends
    pub joystick_visible: bool,
}

impl Hud {
    pub fn new(time_limit: f32) -> Self {
        Self {
            displayed_seconds: time_limit.ceil() as i32,
            timer_bar: TimerBar::new(time_limit),
            score: 0,
            status: None,
            joystick_visible: true,
        }
    }

    /// Counter label as drawn on screen
    pub fn timer_label(&self) -> String {
        format!("Time: {}", self.displayed_seconds)
    }
}
