//! Input events for board interaction.
//!
//! Hosts translate their native pointer and keyboard events into these
//! before handing them to the interaction controller. Hit testing stays with
//! the host: a pointer-down names what it landed on.

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// What a pointer-down landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", content = "id", rename_all = "snake_case")]
pub enum PointerTarget {
    /// Empty board background.
    Board,
    /// The body of an element.
    Element(ElementId),
    /// The resize affordance of an element.
    ResizeHandle(ElementId),
}

/// Keys the board reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Forward delete.
    Delete,
    /// Backspace.
    Backspace,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value. Unhandled keys map to `None`.
    #[must_use]
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            "ArrowUp" => Some(Self::ArrowUp),
            "ArrowDown" => Some(Self::ArrowDown),
            "Delete" => Some(Self::Delete),
            "Backspace" => Some(Self::Backspace),
            _ => None,
        }
    }

    /// Unit direction for arrow keys.
    #[must_use]
    pub const fn direction(self) -> Option<(f64, f64)> {
        match self {
            Self::ArrowLeft => Some((-1.0, 0.0)),
            Self::ArrowRight => Some((1.0, 0.0)),
            Self::ArrowUp => Some((0.0, -1.0)),
            Self::ArrowDown => Some((0.0, 1.0)),
            Self::Delete | Self::Backspace => None,
        }
    }

    /// Whether this key deletes the selection.
    #[must_use]
    pub const fn is_delete(self) -> bool {
        matches!(self, Self::Delete | Self::Backspace)
    }
}

/// All input events the board can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Pointer pressed.
    PointerDown {
        /// X coordinate (any fixed frame; only deltas are used).
        x: f64,
        /// Y coordinate.
        y: f64,
        /// What was hit.
        target: PointerTarget,
    },

    /// Pointer moved.
    PointerMove {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// Pointer released.
    PointerUp,

    /// Key pressed.
    Key {
        /// The key.
        key: Key,
        /// Whether focus was inside a text-input control.
        in_text_input: bool,
    },
}

impl InputEvent {
    /// Pointer-down helper.
    #[must_use]
    pub fn pointer_down(x: f64, y: f64, target: PointerTarget) -> Self {
        Self::PointerDown { x, y, target }
    }

    /// Pointer-move helper.
    #[must_use]
    pub fn pointer_move(x: f64, y: f64) -> Self {
        Self::PointerMove { x, y }
    }

    /// Key press outside of any text input.
    #[must_use]
    pub fn key(key: Key) -> Self {
        Self::Key {
            key,
            in_text_input: false,
        }
    }
}
