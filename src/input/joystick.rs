//! Virtual joystick (pointer drag) movement source
//!
//! Coordinates are relative to the joystick center. Only the widget's state
//! lives here; the host draws it.

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct Joystick {
    pub outer_radius: f32,
    pub inner_radius: f32,
    /// Stick offset from center, clamped to the travel limit
    pub stick: Vec2,
    pub dragging: bool,
    pub visible: bool,
    pointer_id: Option<i32>,
    velocity: Vec2,
}

impl Default for Joystick {
    fn default() -> Self {
        Self::new(60.0, 25.0)
    }
}

impl Joystick {
    pub fn new(outer_radius: f32, inner_radius: f32) -> Self {
        Self {
            outer_radius,
            inner_radius,
            stick: Vec2::ZERO,
            dragging: false,
            visible: true,
            pointer_id: None,
            velocity: Vec2::ZERO,
        }
    }

    /// How far the stick can travel while staying inside the base
    pub fn limit(&self) -> f32 {
        self.outer_radius - self.inner_radius
    }

    /// Normalized direction scaled by drag force (magnitude 0..=1)
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Start a drag. Ignored while hidden or already tracking a pointer.
    pub fn pointer_down(&mut self, pointer_id: i32, local: Vec2) {
        if !self.visible || self.dragging {
            return;
        }
        self.dragging = true;
        self.pointer_id = Some(pointer_id);
        self.update_stick(local);
    }

    pub fn pointer_move(&mut self, pointer_id: i32, local: Vec2) {
        if !self.dragging || self.pointer_id != Some(pointer_id) {
            return;
        }
        self.update_stick(local);
    }

    pub fn pointer_up(&mut self, pointer_id: i32) {
        if self.pointer_id.is_some_and(|id| id != pointer_id) {
            return;
        }
        self.release();
    }

    /// Hide the widget and stop producing input
    pub fn hide(&mut self) {
        self.visible = false;
        self.release();
    }

    fn release(&mut self) {
        self.dragging = false;
        self.pointer_id = None;
        self.stick = Vec2::ZERO;
        self.velocity = Vec2::ZERO;
    }

    fn update_stick(&mut self, local: Vec2) {
        let dist = local.length();
        let limit = self.limit();
        if dist == 0.0 || limit <= 0.0 {
            self.stick = Vec2::ZERO;
            self.velocity = Vec2::ZERO;
            return;
        }

        let dir = local / dist;
        self.stick = dir * dist.min(limit);
        // Full speed at the travel limit
        self.velocity = dir * (dist / limit).min(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_scales_with_drag() {
        let mut joystick = Joystick::default();
        // limit = 35
        joystick.pointer_down(1, Vec2::new(17.5, 0.0));
        assert!((joystick.velocity() - Vec2::new(0.5, 0.0)).length() < 1e-6);

        joystick.pointer_move(1, Vec2::new(0.0, -70.0));
        assert!((joystick.velocity() - Vec2::new(0.0, -1.0)).length() < 1e-6);
        assert!((joystick.stick - Vec2::new(0.0, -35.0)).length() < 1e-4);
    }

    #[test]
    fn test_release_resets() {
        let mut joystick = Joystick::default();
        joystick.pointer_down(3, Vec2::new(10.0, 10.0));
        joystick.pointer_up(3);
        assert_eq!(joystick.velocity(), Vec2::ZERO);
        assert_eq!(joystick.stick, Vec2::ZERO);
        assert!(!joystick.dragging);
    }

    #[test]
    fn test_other_pointers_ignored() {
        let mut joystick = Joystick::default();
        joystick.pointer_down(1, Vec2::new(35.0, 0.0));
        joystick.pointer_move(2, Vec2::new(-35.0, 0.0));
        joystick.pointer_up(2);
        assert!(joystick.dragging);
        assert!((joystick.velocity().x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_center_drag_is_zero() {
        let mut joystick = Joystick::default();
        joystick.pointer_down(1, Vec2::ZERO);
        assert_eq!(joystick.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_hidden_ignores_input() {
        let mut joystick = Joystick::default();
        joystick.pointer_down(1, Vec2::new(20.0, 0.0));
        joystick.hide();
        assert_eq!(joystick.velocity(), Vec2::ZERO);
        joystick.pointer_down(1, Vec2::new(20.0, 0.0));
        assert_eq!(joystick.velocity(), Vec2::ZERO);
    }
}
