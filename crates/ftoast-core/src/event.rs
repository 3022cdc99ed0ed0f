#![forbid(unsafe_code)]

//! Canonical pointer and keyboard events delivered by a host surface.
//!
//! Events mirror the subset of DOM `PointerEvent` / `KeyboardEvent` the toast
//! state machine reads: identity, button, pointer type, client coordinates,
//! a timestamp from the host clock, and a default-prevention flag that
//! handler composition honors.
//!
//! # Design Notes
//!
//! - Coordinates are client pixels as `f64` (hosts report fractional values).
//! - `timestamp` is the host's monotonic time, not wall-clock time.
//! - `default_prevented` is private so it can only be set, never cleared.

use core::time::Duration;

use bitflags::bitflags;

use crate::geometry::Point;

/// Events that carry a one-way "default prevented" flag.
pub trait DefaultPrevention {
    /// Mark the event's default action as prevented.
    fn prevent_default(&mut self);

    /// Whether any handler prevented the default action.
    fn is_default_prevented(&self) -> bool;
}

bitflags! {
    /// Modifier keys held during a pointer or key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

/// Pointer button identifiers, following DOM `PointerEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Main button (left mouse, touch contact, pen tip). DOM `0`.
    Primary,
    /// Auxiliary button (wheel click). DOM `1`.
    Auxiliary,
    /// Secondary button (right mouse). DOM `2`.
    Secondary,
    /// Browser back button. DOM `3`.
    Back,
    /// Browser forward button. DOM `4`.
    Forward,
    /// No button change (DOM `-1`, reported on moves) or an unknown id.
    Other(i16),
}

impl PointerButton {
    /// Map a DOM button id.
    #[must_use]
    pub const fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            3 => Self::Back,
            4 => Self::Forward,
            other => Self::Other(other),
        }
    }

    /// True for the main button.
    #[inline]
    #[must_use]
    pub const fn is_primary(self) -> bool {
        matches!(self, Self::Primary)
    }
}

/// Input device class, following DOM `PointerEvent.pointerType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerType {
    #[default]
    Mouse,
    Pen,
    Touch,
}

impl PointerType {
    /// Map a DOM pointer type string. Unknown or empty values map to `Mouse`.
    #[must_use]
    pub fn from_dom(kind: &str) -> Self {
        match kind {
            "touch" => Self::Touch,
            "pen" => Self::Pen,
            _ => Self::Mouse,
        }
    }

    /// DOM spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Pen => "pen",
            Self::Touch => "touch",
        }
    }
}

/// A pointer event (down, move, or up) in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Host-assigned pointer id, stable for the life of one contact.
    pub pointer_id: u32,
    /// Button that changed state.
    pub button: PointerButton,
    /// Device class.
    pub pointer_type: PointerType,
    /// Client coordinates.
    pub position: Point,
    /// Host monotonic time of the event.
    pub timestamp: Duration,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    default_prevented: bool,
}

impl PointerEvent {
    /// Create a primary-button mouse event at `position`.
    #[must_use]
    pub const fn new(pointer_id: u32, position: Point) -> Self {
        Self {
            pointer_id,
            button: PointerButton::Primary,
            pointer_type: PointerType::Mouse,
            position,
            timestamp: Duration::ZERO,
            modifiers: Modifiers::NONE,
            default_prevented: false,
        }
    }

    /// Set the button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Set the pointer type.
    #[must_use]
    pub const fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = pointer_type;
        self
    }

    /// Set the timestamp.
    #[must_use]
    pub const fn at(mut self, timestamp: Duration) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Set modifier keys.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

impl DefaultPrevention for PointerEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Key identity, following DOM `KeyboardEvent.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Escape,
    Enter,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    /// A printable character.
    Char(char),
    /// A key this crate does not distinguish.
    Unidentified,
}

impl KeyCode {
    /// Map a DOM `key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Unidentified,
                }
            }
        }
    }
}

/// A key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key pressed.
    pub code: KeyCode,
    /// Modifier keys held.
    pub modifiers: Modifiers,
    /// True for auto-repeat.
    pub repeat: bool,
    default_prevented: bool,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            repeat: false,
            default_prevented: false,
        }
    }

    /// Shorthand for an Escape press.
    #[must_use]
    pub const fn escape() -> Self {
        Self::new(KeyCode::Escape)
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Mark as an auto-repeat.
    #[must_use]
    pub const fn repeated(mut self) -> Self {
        self.repeat = true;
        self
    }

    /// Check if this is the Escape key.
    #[must_use]
    pub const fn is_escape(&self) -> bool {
        matches!(self.code, KeyCode::Escape)
    }
}

impl DefaultPrevention for KeyEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_button_mapping() {
        assert_eq!(PointerButton::from_dom(0), PointerButton::Primary);
        assert_eq!(PointerButton::from_dom(2), PointerButton::Secondary);
        assert_eq!(PointerButton::from_dom(-1), PointerButton::Other(-1));
        assert!(PointerButton::from_dom(0).is_primary());
        assert!(!PointerButton::from_dom(1).is_primary());
    }

    #[test]
    fn dom_pointer_type_mapping() {
        assert_eq!(PointerType::from_dom("touch"), PointerType::Touch);
        assert_eq!(PointerType::from_dom("pen"), PointerType::Pen);
        assert_eq!(PointerType::from_dom(""), PointerType::Mouse);
        assert_eq!(PointerType::Touch.as_str(), "touch");
    }

    #[test]
    fn dom_key_mapping() {
        assert_eq!(KeyCode::from_dom("Escape"), KeyCode::Escape);
        assert_eq!(KeyCode::from_dom("Esc"), KeyCode::Escape);
        assert_eq!(KeyCode::from_dom("a"), KeyCode::Char('a'));
        assert_eq!(KeyCode::from_dom("F13"), KeyCode::Unidentified);
    }

    #[test]
    fn prevent_default_is_sticky() {
        let mut key = KeyEvent::escape();
        assert!(!key.is_default_prevented());
        key.prevent_default();
        assert!(key.is_default_prevented());

        let mut ptr = PointerEvent::new(1, Point::ORIGIN);
        ptr.prevent_default();
        assert!(ptr.is_default_prevented());
    }

    #[test]
    fn pointer_builder() {
        let ev = PointerEvent::new(7, Point::new(1.0, 2.0))
            .with_pointer_type(PointerType::Touch)
            .with_button(PointerButton::Secondary)
            .at(Duration::from_millis(40));
        assert_eq!(ev.pointer_id, 7);
        assert_eq!(ev.pointer_type, PointerType::Touch);
        assert_eq!(ev.button, PointerButton::Secondary);
        assert_eq!(ev.timestamp, Duration::from_millis(40));
    }
}
