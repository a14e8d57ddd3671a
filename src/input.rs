//! Pointer input as seen by a scene.
//!
//! Hosts translate raw window events into these types and push them into the
//! scene. The scene only ever reads them.

use glam::Vec2;
use winit::event::MouseButton as WinitMouseButton;

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    /// Map a winit button, ignoring back/forward/extra buttons.
    pub fn from_winit(button: WinitMouseButton) -> Option<Self> {
        match button {
            WinitMouseButton::Left => Some(PointerButton::Primary),
            WinitMouseButton::Right => Some(PointerButton::Secondary),
            WinitMouseButton::Middle => Some(PointerButton::Middle),
            _ => None,
        }
    }
}

/// Current pointer state, in surface pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    /// Last known position, `None` before the first move or after leaving.
    pub position: Option<Vec2>,
    /// Whether the primary button is held.
    pub down: bool,
}

impl Pointer {
    /// Record a move and return the motion since the previous position.
    pub fn move_to(&mut self, position: Option<Vec2>) -> Vec2 {
        let motion = match (self.position, position) {
            (Some(from), Some(to)) => to - from,
            _ => Vec2::ZERO,
        };
        self.position = position;
        motion
    }
}
