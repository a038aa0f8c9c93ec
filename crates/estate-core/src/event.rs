//! Input events for widgets.
//!
//! Mouse, touch and pointer events all describe the same press/move/release
//! cycle. Widgets that only care about that cycle use [`Event::press`],
//! [`Event::motion`], [`Event::release`] and [`Event::cancellation`], which
//! fold the three families into a [`PointerKey`] plus a position.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse moved to position
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released
    MouseUp {
        /// Position of release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Touch started
    TouchStart {
        /// Touch identifier
        id: TouchId,
        /// Touch position
        position: Point,
    },
    /// Touch moved
    TouchMove {
        /// Touch identifier
        id: TouchId,
        /// New position
        position: Point,
    },
    /// Touch ended
    TouchEnd {
        /// Touch identifier
        id: TouchId,
        /// Final position
        position: Point,
    },
    /// Touch cancelled (e.g., palm rejection, scroll takeover)
    TouchCancel {
        /// Touch identifier
        id: TouchId,
    },
    /// Pointer down
    PointerDown {
        /// Pointer ID
        pointer_id: PointerId,
        /// Position
        position: Point,
        /// Button (for mouse pointers)
        button: Option<MouseButton>,
    },
    /// Pointer moved
    PointerMove {
        /// Pointer ID
        pointer_id: PointerId,
        /// Position
        position: Point,
    },
    /// Pointer up
    PointerUp {
        /// Pointer ID
        pointer_id: PointerId,
        /// Position
        position: Point,
        /// Button (for mouse pointers)
        button: Option<MouseButton>,
    },
    /// Pointer cancelled
    PointerCancel {
        /// Pointer ID
        pointer_id: PointerId,
    },
    /// Time passed on the host's timer queue.
    Tick {
        /// Milliseconds since the previous tick
        delta_ms: u32,
    },
    /// Widget gained focus
    FocusIn,
    /// Widget lost focus
    FocusOut,
}

impl Event {
    /// Interpret the event as the start of a press.
    ///
    /// Only the primary (left) button counts for mice and mouse pointers.
    #[must_use]
    pub const fn press(&self) -> Option<(PointerKey, Point)> {
        match *self {
            Self::MouseDown {
                position,
                button: MouseButton::Left,
            } => Some((PointerKey::Mouse, position)),
            Self::TouchStart { id, position } => Some((PointerKey::Touch(id), position)),
            Self::PointerDown {
                pointer_id,
                position,
                button: None | Some(MouseButton::Left),
            } => Some((PointerKey::Pointer(pointer_id), position)),
            _ => None,
        }
    }

    /// Interpret the event as movement of a (possibly pressed) pointer.
    #[must_use]
    pub const fn motion(&self) -> Option<(PointerKey, Point)> {
        match *self {
            Self::MouseMove { position } => Some((PointerKey::Mouse, position)),
            Self::TouchMove { id, position } => Some((PointerKey::Touch(id), position)),
            Self::PointerMove {
                pointer_id,
                position,
            } => Some((PointerKey::Pointer(pointer_id), position)),
            _ => None,
        }
    }

    /// Interpret the event as the end of a press.
    #[must_use]
    pub const fn release(&self) -> Option<(PointerKey, Point)> {
        match *self {
            Self::MouseUp {
                position,
                button: MouseButton::Left,
            } => Some((PointerKey::Mouse, position)),
            Self::TouchEnd { id, position } => Some((PointerKey::Touch(id), position)),
            Self::PointerUp {
                pointer_id,
                position,
                button: None | Some(MouseButton::Left),
            } => Some((PointerKey::Pointer(pointer_id), position)),
            _ => None,
        }
    }

    /// Interpret the event as the system aborting a press.
    #[must_use]
    pub const fn cancellation(&self) -> Option<PointerKey> {
        match *self {
            Self::TouchCancel { id } => Some(PointerKey::Touch(id)),
            Self::PointerCancel { pointer_id } => Some(PointerKey::Pointer(pointer_id)),
            _ => None,
        }
    }
}

/// Touch identifier for multi-touch tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TouchId(pub u32);

/// Pointer identifier for pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PointerId(pub u32);

/// Identity of whatever is pressing: the mouse, one finger, or one pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerKey {
    /// The (single) mouse
    Mouse,
    /// A touch contact
    Touch(TouchId),
    /// A unified pointer
    Pointer(PointerId),
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}
