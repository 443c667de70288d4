//! Pointer and keyboard events as delivered by the host.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }

    /// Modifier that toggles selection membership on click.
    pub fn multi_select(&self) -> bool {
        self.shift || self.command()
    }
}

/// Pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
    /// Pointer left the canvas region.
    Leave,
    /// Wheel or trackpad scroll; positive `delta.y` scrolls down.
    Wheel { position: Point, delta: Vec2 },
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    Character(String),
}

impl Key {
    /// Case-insensitive match against a single character key.
    pub fn is_char(&self, c: char) -> bool {
        match self {
            Key::Character(s) => {
                let mut chars = s.chars();
                matches!((chars.next(), chars.next()), (Some(k), None) if k.eq_ignore_ascii_case(&c))
            }
            _ => false,
        }
    }
}

/// Tracks pointer position, pressed buttons and modifiers between events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in screen coordinates.
    pub pointer_position: Point,
    /// Position before the last move, for screen deltas.
    pub previous_pointer_position: Point,
    /// Where the current press started.
    pub press_origin: Option<Point>,
    pressed_buttons: HashSet<MouseButton>,
    pub modifiers: Modifiers,
    /// Whether the pointer is over the canvas.
    pub inside: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer event.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) {
        match *event {
            PointerEvent::Down { position, button } => {
                self.move_to(position);
                self.pressed_buttons.insert(button);
                if self.press_origin.is_none() {
                    self.press_origin = Some(position);
                }
            }
            PointerEvent::Up { position, button } => {
                self.move_to(position);
                self.pressed_buttons.remove(&button);
                if self.pressed_buttons.is_empty() {
                    self.press_origin = None;
                }
            }
            PointerEvent::Move { position } | PointerEvent::Wheel { position, .. } => {
                self.move_to(position);
            }
            PointerEvent::Leave => {
                self.inside = false;
                self.pressed_buttons.clear();
                self.press_origin = None;
            }
        }
    }

    fn move_to(&mut self, position: Point) {
        self.previous_pointer_position = if self.inside { self.pointer_position } else { position };
        self.pointer_position = position;
        self.inside = true;
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Screen-space movement of the last event.
    pub fn pointer_delta(&self) -> Vec2 {
        self.pointer_position - self.previous_pointer_position
    }

    /// Screen-space movement since the press started.
    pub fn press_delta(&self) -> Option<Vec2> {
        self.press_origin.map(|start| self.pointer_position - start)
    }
}
