//! Pointer input for the canvas.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Up { position, .. }
            | PointerEvent::Move { position } => *position,
        }
    }
}

/// Tracks pointer position and held buttons between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Last known pointer position.
    pub pointer_position: Point,
    pressed_buttons: HashSet<MouseButton>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold an event into the tracked state.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        self.pointer_position = event.position();
        match event {
            PointerEvent::Down { button, .. } => {
                self.pressed_buttons.insert(*button);
            }
            PointerEvent::Up { button, .. } => {
                self.pressed_buttons.remove(button);
            }
            PointerEvent::Move { .. } => {}
        }
    }

    /// Check if a mouse button is currently held.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Forget held buttons (e.g. after the host lost pointer capture).
    pub fn release_all(&mut self) {
        self.pressed_buttons.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_tracking() {
        let mut input = InputState::new();
        let p = Point::new(4.0, 2.0);
        input.handle_pointer_event(&PointerEvent::Down { position: p, button: MouseButton::Left });
        assert!(input.is_button_pressed(MouseButton::Left));
        assert!(!input.is_button_pressed(MouseButton::Right));
        assert_eq!(input.pointer_position, p);

        input.handle_pointer_event(&PointerEvent::Move { position: Point::new(9.0, 9.0) });
        assert!(input.is_button_pressed(MouseButton::Left));

        input.handle_pointer_event(&PointerEvent::Up { position: p, button: MouseButton::Left });
        assert!(!input.is_button_pressed(MouseButton::Left));
    }

    #[test]
    fn test_release_all() {
        let mut input = InputState::new();
        input.handle_pointer_event(&PointerEvent::Down { position: Point::ZERO, button: MouseButton::Right });
        input.release_all();
        assert!(!input.is_button_pressed(MouseButton::Right));
    }
}
