//! Pointer and wheel events
//!
//! Platform-agnostic input events consumed by scrollbar widgets.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Event type identifier
pub type EventType = u32;

/// Common event types
pub mod event_types {
    use super::EventType;

    pub const POINTER_DOWN: EventType = 1;
    pub const POINTER_UP: EventType = 2;
    pub const POINTER_MOVE: EventType = 3;
    pub const POINTER_ENTER: EventType = 4;
    pub const POINTER_LEAVE: EventType = 5;
    /// Drag event (mouse down + move)
    pub const DRAG: EventType = 6;
    /// Drag ended (mouse up after drag)
    pub const DRAG_END: EventType = 7;
    pub const WHEEL: EventType = 30;
}

/// Pressed pointer buttons, encoded like the DOM `buttons` bitmask
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Buttons {
    bits: u8,
}

impl Buttons {
    pub const NONE: Buttons = Buttons { bits: 0 };
    pub const PRIMARY: u8 = 0b0001;
    pub const SECONDARY: u8 = 0b0010;
    pub const AUXILIARY: u8 = 0b0100;

    /// Only the primary (left) button
    pub const LEFT: Buttons = Buttons {
        bits: Self::PRIMARY,
    };

    /// Create from raw bits
    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    /// Raw bitmask
    pub const fn bits(&self) -> u8 {
        self.bits
    }

    /// Check if the primary (left) button is pressed
    pub const fn left(&self) -> bool {
        self.bits & Self::PRIMARY != 0
    }

    /// Check if the secondary (right) button is pressed
    pub const fn right(&self) -> bool {
        self.bits & Self::SECONDARY != 0
    }

    /// Check if the auxiliary (middle) button is pressed
    pub const fn middle(&self) -> bool {
        self.bits & Self::AUXILIARY != 0
    }

    /// Check if any button is pressed
    pub const fn any(&self) -> bool {
        self.bits != 0
    }
}

/// A pointer event in page coordinates
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Element the event was dispatched to
    pub target: u64,
    /// Page X position
    pub x: f32,
    /// Page Y position
    pub y: f32,
    /// Buttons held while the event fired
    pub buttons: Buttons,
    /// Position relative to the target element, when the platform reports it
    #[serde(default)]
    pub offset: Option<Point>,
    /// When the platform dispatched the event
    #[serde(skip)]
    pub time: Option<Instant>,
}

impl PointerEvent {
    /// Create an event without an element-relative offset
    pub fn new(target: u64, x: f32, y: f32, buttons: Buttons) -> Self {
        Self {
            target,
            x,
            y,
            buttons,
            offset: None,
            time: None,
        }
    }

    /// Attach the element-relative offset
    pub fn with_offset(mut self, offset_x: f32, offset_y: f32) -> Self {
        self.offset = Some(Point::new(offset_x, offset_y));
        self
    }

    /// Stamp the event with its dispatch time
    pub fn with_time(mut self, time: Instant) -> Self {
        self.time = Some(time);
        self
    }

    /// Page position as a point
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Wheel input forwarded to the scrollable host.
///
/// Positive deltas scroll toward the start of the content (up / left).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub delta_x: f32,
    pub delta_y: f32,
}

impl WheelEvent {
    pub fn new(delta_x: f32, delta_y: f32) -> Self {
        Self { delta_x, delta_y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_flags() {
        assert!(Buttons::LEFT.left());
        assert!(!Buttons::LEFT.right());
        assert!(!Buttons::NONE.any());

        let both = Buttons::from_bits(Buttons::PRIMARY | Buttons::AUXILIARY);
        assert!(both.left());
        assert!(both.middle());
        assert_eq!(both.bits(), 0b0101);
    }

    #[test]
    fn test_pointer_event_offset() {
        let event = PointerEvent::new(7, 120.0, 40.0, Buttons::LEFT);
        assert!(event.offset.is_none());

        let event = event.with_offset(4.0, 12.0);
        assert_eq!(event.offset, Some(Point::new(4.0, 12.0)));
        assert_eq!(event.position(), Point::new(120.0, 40.0));
    }
}
