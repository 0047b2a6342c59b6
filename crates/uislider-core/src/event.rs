//! Input events routed to the slider by the hosting page.
//!
//! Mouse, touch and pointer families all collapse onto the same three
//! gesture phases; see [`Event::gesture`].

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
    /// Touch cancelled (e.g., palm rejection)
    TouchCancel {
        /// Touch identifier
        id: TouchId,
    },
    /// Pointer down
    PointerDown {
        /// Pointer ID
        pointer_id: PointerId,
        /// Pointer type
        pointer_type: PointerType,
        /// Position
        position: Point,
        /// Is primary pointer
        is_primary: bool,
    },
    /// Pointer moved
    PointerMove {
        /// Pointer ID
        pointer_id: PointerId,
        /// Pointer type
        pointer_type: PointerType,
        /// Position
        position: Point,
    },
    /// Pointer up
    PointerUp {
        /// Pointer ID
        pointer_id: PointerId,
        /// Pointer type
        pointer_type: PointerType,
        /// Position
        position: Point,
    },
    /// Pointer cancelled
    PointerCancel {
        /// Pointer ID
        pointer_id: PointerId,
    },
    /// Host element resized
    Resize {
        /// New width
        width: f32,
        /// New height
        height: f32,
    },
}

/// Touch identifier for multi-touch tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct TouchId(pub u32);

/// Pointer identifier for pointer events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PointerId(pub u32);

/// Type of pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PointerType {
    /// Mouse pointer
    #[default]
    Mouse,
    /// Touch pointer
    Touch,
    /// Pen/stylus pointer
    Pen,
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

/// Phase of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GesturePhase {
    /// Pointer pressed / finger down
    Start,
    /// Pointer or finger moved
    Move,
    /// Released or cancelled
    End,
}

/// Input source that started a drag. Only the same source may move or end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureOwner {
    /// The mouse (there is only one)
    Mouse,
    /// A single touch point
    Touch(TouchId),
    /// A single pointer
    Pointer(PointerId),
}

/// An event reduced to what a one-dimensional drag needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureInput {
    /// Gesture phase
    pub phase: GesturePhase,
    /// Input source the event came from
    pub owner: GestureOwner,
    /// Pointer position, when the event carries one
    pub position: Option<Point>,
}

impl Event {
    /// Reduce mouse, touch and pointer events to a gesture phase.
    ///
    /// Only the left mouse button and primary pointers start a gesture.
    /// A left-button release ends one, as does any touch or pointer end or
    /// cancel. Each input carries the [`GestureOwner`] it came from so the
    /// receiver can drop moves and ends from other fingers or pointers.
    /// Returns `None` for events that take no part in dragging.
    #[must_use]
    pub fn gesture(&self) -> Option<GestureInput> {
        let (phase, owner, position) = match *self {
            Self::MouseDown {
                position,
                button: MouseButton::Left,
            } => (GesturePhase::Start, GestureOwner::Mouse, Some(position)),
            Self::TouchStart { id, position } => {
                (GesturePhase::Start, GestureOwner::Touch(id), Some(position))
            }
            Self::PointerDown {
                pointer_id,
                position,
                is_primary: true,
                ..
            } => (GesturePhase::Start, GestureOwner::Pointer(pointer_id), Some(position)),
            Self::MouseMove { position } => (GesturePhase::Move, GestureOwner::Mouse, Some(position)),
            Self::TouchMove { id, position } => {
                (GesturePhase::Move, GestureOwner::Touch(id), Some(position))
            }
            Self::PointerMove {
                pointer_id,
                position,
                ..
            } => (GesturePhase::Move, GestureOwner::Pointer(pointer_id), Some(position)),
            Self::MouseUp {
                position,
                button: MouseButton::Left,
            } => (GesturePhase::End, GestureOwner::Mouse, Some(position)),
            Self::TouchEnd { id, position } => {
                (GesturePhase::End, GestureOwner::Touch(id), Some(position))
            }
            Self::PointerUp {
                pointer_id,
                position,
                ..
            } => (GesturePhase::End, GestureOwner::Pointer(pointer_id), Some(position)),
            Self::TouchCancel { id } => (GesturePhase::End, GestureOwner::Touch(id), None),
            Self::PointerCancel { pointer_id } => {
                (GesturePhase::End, GestureOwner::Pointer(pointer_id), None)
            }
            _ => return None,
        };
        Some(GestureInput {
            phase,
            owner,
            position,
        })
    }
}
