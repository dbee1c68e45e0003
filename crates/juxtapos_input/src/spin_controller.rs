//! Spin controller for the model rotation
//!
//! Controls:
//! - Space (held): pause the spin
//! - Backspace (held): spin backwards
//!
//! Space wins if both are held.

use juxtapos_math::{Mat4, RotationPlane};
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Which way the angle moves this frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpinDirection {
    Forward,
    Reverse,
    Paused,
}

impl SpinDirection {
    fn sign(self) -> f32 {
        match self {
            SpinDirection::Forward => 1.0,
            SpinDirection::Reverse => -1.0,
            SpinDirection::Paused => 0.0,
        }
    }
}

/// Accumulates the rotation angle from the frame clock and key state
pub struct SpinController {
    // Key state
    pause: bool,
    reverse: bool,

    angle: f32,

    // Configuration
    pub plane: RotationPlane,
    /// Radians per second
    pub speed: f32,
}

impl Default for SpinController {
    fn default() -> Self {
        Self::new(RotationPlane::YW, std::f32::consts::FRAC_PI_4)
    }
}

impl SpinController {
    pub fn new(plane: RotationPlane, speed: f32) -> Self {
        Self {
            pause: false,
            reverse: false,
            angle: 0.0,
            plane,
            speed,
        }
    }

    /// Process keyboard input, returns true if the key was consumed
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let pressed = state == ElementState::Pressed;

        match key {
            KeyCode::Space => { self.pause = pressed; true }
            KeyCode::Backspace => { self.reverse = pressed; true }
            _ => false,
        }
    }

    pub fn direction(&self) -> SpinDirection {
        if self.pause {
            SpinDirection::Paused
        } else if self.reverse {
            SpinDirection::Reverse
        } else {
            SpinDirection::Forward
        }
    }

    /// Advance by `dt` seconds and return the new angle
    pub fn update(&mut self, dt: f32) -> f32 {
        self.angle += self.direction().sign() * self.speed * dt;
        // Keep precision over long sessions
        self.angle = self.angle.rem_euclid(std::f32::consts::TAU);
        self.angle
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Rotation for the current angle
    pub fn model_matrix(&self) -> Mat4 {
        self.plane.rotation(self.angle)
    }

    /// Builder: set the rotation plane
    pub fn with_plane(mut self, plane: RotationPlane) -> Self {
        self.plane = plane;
        self
    }

    /// Builder: set the angular speed
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_spins_forward_by_default() {
        let mut spin = SpinController::default();
        assert_eq!(spin.direction(), SpinDirection::Forward);
        let angle = spin.update(1.0);
        assert!((angle - FRAC_PI_4).abs() < EPSILON);
    }

    #[test]
    fn test_space_pauses() {
        let mut spin = SpinController::default();
        spin.update(0.5);
        let before = spin.angle();

        assert!(spin.process_keyboard(KeyCode::Space, ElementState::Pressed));
        spin.update(1.0);
        assert_eq!(spin.angle(), before);

        spin.process_keyboard(KeyCode::Space, ElementState::Released);
        spin.update(1.0);
        assert!(spin.angle() > before);
    }

    #[test]
    fn test_backspace_reverses() {
        let mut spin = SpinController::default().with_speed(1.0);
        spin.update(2.0);
        spin.process_keyboard(KeyCode::Backspace, ElementState::Pressed);
        assert_eq!(spin.direction(), SpinDirection::Reverse);
        let angle = spin.update(0.5);
        assert!((angle - 1.5).abs() < EPSILON);
    }

    #[test]
    fn test_pause_beats_reverse() {
        let mut spin = SpinController::default();
        spin.process_keyboard(KeyCode::Backspace, ElementState::Pressed);
        spin.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert_eq!(spin.direction(), SpinDirection::Paused);
    }

    #[test]
    fn test_angle_wraps() {
        let mut spin = SpinController::default().with_speed(1.0);
        spin.process_keyboard(KeyCode::Backspace, ElementState::Pressed);
        let angle = spin.update(0.25);
        assert!(angle >= 0.0 && angle < std::f32::consts::TAU);
        assert!((angle - (std::f32::consts::TAU - 0.25)).abs() < 1e-4);
    }

    #[test]
    fn test_other_keys_ignored() {
        let mut spin = SpinController::default();
        assert!(!spin.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
    }

    #[test]
    fn test_model_matrix_uses_plane() {
        let mut spin = SpinController::default().with_plane(RotationPlane::XW);
        spin.update(1.0);
        assert_eq!(spin.model_matrix(), RotationPlane::XW.rotation(spin.angle()));
    }
}
