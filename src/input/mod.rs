//! Input aggregation
//!
//! Tracks held direction keys and an optional virtual joystick, and merges
//! them into one movement intent (joystick wins when active).

pub mod joystick;

pub use joystick::Joystick;

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::TickInput;

/// Keys that steer the player (both arrow and WASD layouts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    KeyW,
    KeyS,
    KeyA,
    KeyD,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ArrowUp" => Some(KeyCode::ArrowUp),
            "ArrowDown" => Some(KeyCode::ArrowDown),
            "ArrowLeft" => Some(KeyCode::ArrowLeft),
            "ArrowRight" => Some(KeyCode::ArrowRight),
            "KeyW" => Some(KeyCode::KeyW),
            "KeyS" => Some(KeyCode::KeyS),
            "KeyA" => Some(KeyCode::KeyA),
            "KeyD" => Some(KeyCode::KeyD),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputHandler {
    keys: HashSet<KeyCode>,
    /// Unit vector (or zero) derived from held keys
    keyboard: Vec2,
    pub joystick: Option<Joystick>,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_joystick(&mut self, joystick: Joystick) {
        self.joystick = Some(joystick);
    }

    pub fn key_down(&mut self, key: KeyCode) {
        if self.keys.insert(key) {
            self.recompute();
        }
    }

    pub fn key_up(&mut self, key: KeyCode) {
        if self.keys.remove(&key) {
            self.recompute();
        }
    }

    /// Forget held keys (e.g. window lost focus)
    pub fn clear_keys(&mut self) {
        self.keys.clear();
        self.recompute();
    }

    pub fn hide_joystick(&mut self) {
        if let Some(joystick) = self.joystick.as_mut() {
            joystick.hide();
        }
    }

    /// Current movement intent
    pub fn movement(&self) -> Vec2 {
        if let Some(joystick) = &self.joystick {
            let v = joystick.velocity();
            if v != Vec2::ZERO {
                return v;
            }
        }
        self.keyboard
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            movement: self.movement(),
        }
    }

    fn held(&self, a: KeyCode, b: KeyCode) -> bool {
        self.keys.contains(&a) || self.keys.contains(&b)
    }

    fn recompute(&mut self) {
        let mut v = Vec2::ZERO;
        if self.held(KeyCode::ArrowUp, KeyCode::KeyW) {
            v.y -= 1.0;
        }
        if self.held(KeyCode::ArrowDown, KeyCode::KeyS) {
            v.y += 1.0;
        }
        if self.held(KeyCode::ArrowLeft, KeyCode::KeyA) {
            v.x -= 1.0;
        }
        if self.held(KeyCode::ArrowRight, KeyCode::KeyD) {
            v.x += 1.0;
        }
        self.keyboard = v.normalize_or_zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_key() {
        let mut input = InputHandler::new();
        input.key_down(KeyCode::ArrowRight);
        assert_eq!(input.movement(), Vec2::new(1.0, 0.0));
        input.key_up(KeyCode::ArrowRight);
        assert_eq!(input.movement(), Vec2::ZERO);
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let mut input = InputHandler::new();
        input.key_down(KeyCode::KeyW);
        input.key_down(KeyCode::KeyD);
        let m = input.movement();
        assert!((m.length() - 1.0).abs() < 1e-6);
        assert!(m.x > 0.0 && m.y < 0.0);
    }

    #[test]
    fn test_opposites_cancel() {
        let mut input = InputHandler::new();
        input.key_down(KeyCode::ArrowLeft);
        input.key_down(KeyCode::KeyD);
        assert_eq!(input.movement(), Vec2::ZERO);
    }

    #[test]
    fn test_both_layouts_for_same_direction() {
        let mut input = InputHandler::new();
        input.key_down(KeyCode::ArrowUp);
        input.key_down(KeyCode::KeyW);
        input.key_up(KeyCode::ArrowUp);
        // W still held
        assert_eq!(input.movement(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_joystick_takes_priority() {
        let mut input = InputHandler::new();
        input.set_joystick(Joystick::default());
        input.key_down(KeyCode::ArrowRight);

        // Idle joystick falls through to keyboard
        assert_eq!(input.movement(), Vec2::new(1.0, 0.0));

        if let Some(joystick) = input.joystick.as_mut() {
            joystick.pointer_down(1, Vec2::new(0.0, 35.0));
        }
        assert!((input.movement() - Vec2::new(0.0, 1.0)).length() < 1e-6);

        input.hide_joystick();
        assert_eq!(input.movement(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_from_code() {
        assert_eq!(KeyCode::from_code("KeyA"), Some(KeyCode::KeyA));
        assert_eq!(KeyCode::from_code("Space"), None);
    }

    #[test]
    fn test_clear_keys() {
        let mut input = InputHandler::new();
        input.key_down(KeyCode::KeyS);
        input.clear_keys();
        assert_eq!(input.tick_input().movement, Vec2::ZERO);
    }
}
