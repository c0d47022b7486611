//! Input abstraction layer.
//!
//! Normalizes host pointer and keyboard events into a unified
//! `InputEvent` enum consumed by the editor. Coordinates are canvas
//! pixels.

/// Keyboard modifiers held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    /// Platform command key: ⌘ on macOS, Ctrl elsewhere.
    pub fn cmd(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },
    PointerMove {
        x: f64,
        y: f64,
    },
    /// Released anywhere, not only over the canvas.
    PointerUp {
        x: f64,
        y: f64,
    },
    /// `key` is the `KeyboardEvent.key` value (`"z"`, `"ArrowLeft"`).
    Key {
        key: String,
        modifiers: Modifiers,
    },
}

impl InputEvent {
    /// Extract position if this is a pointer event.
    pub fn position(&self) -> Option<(f64, f64)> {
        match self {
            Self::PointerDown { x, y, .. } | Self::PointerMove { x, y } | Self::PointerUp { x, y } => {
                Some((*x, *y))
            }
            Self::Key { .. } => None,
        }
    }
}
