//! Countdown bar: fill ratio plus a traffic-light color

use serde::Serialize;

/// Color band of the timer bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BarColor {
    Green,
    Yellow,
    Red,
}

impl BarColor {
    pub fn rgb(self) -> u32 {
        match self {
            BarColor::Green => 0x2ecc71,
            BarColor::Yellow => 0xf1c40f,
            BarColor::Red => 0xe74c3c,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimerBar {
    pub max_time: f32,
    /// Fill ratio in 0..=1
    pub ratio: f32,
    pub color: BarColor,
}

impl TimerBar {
    pub fn new(max_time: f32) -> Self {
        let mut bar = Self {
            max_time,
            ratio: 1.0,
            color: BarColor::Green,
        };
        bar.update(max_time);
        bar
    }

    pub fn update(&mut self, time_left: f32) {
        self.ratio = if self.max_time > 0.0 {
            (time_left / self.max_time).clamp(0.0, 1.0)
        } else {
            0.0
        };

        self.color = if self.ratio > 0.6 {
            BarColor::Green
        } else if self.ratio > 0.3 {
            BarColor::Yellow
        } else {
            BarColor::Red
        };
    }
}
