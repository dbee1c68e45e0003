//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard input to high-level actions like Exit and ToggleEdges.
//! Spin keys (Space, Backspace) are NOT mapped here - they go directly to SpinController.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Actions triggered by special input (not spin control)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Exit application (Escape)
    Exit,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
    /// Toggle the wireframe overlay (E key)
    ToggleEdges,
}

/// Maps raw input events to semantic actions
///
/// Spin keys are NOT mapped here - they go directly to the SpinController.
/// This mapper handles "special" keys only.
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for special keys, `None` otherwise
    pub fn map_keyboard(key: KeyCode, state: ElementState) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Exit),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            KeyCode::KeyE => Some(InputAction::ToggleEdges),
            _ => None, // Spin keys handled by controller
        }
    }
}
