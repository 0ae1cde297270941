//! Scrollbar axis strategy
//!
//! One scrollbar engine serves both orientations; everything that differs
//! between a horizontal and a vertical scrollbar is a projection supplied
//! here.

use serde::{Deserialize, Serialize};

use scrollkit_core::{Point, Rect, WheelEvent};

use crate::arrow::ArrowSide;
use crate::host::NewScrollPosition;

/// Orientation of a scrollbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Scrolls left/right; the track runs along X
    Horizontal,
    /// Scrolls up/down; the track runs along Y (default)
    #[default]
    Vertical,
}

impl Axis {
    /// Project an element-relative offset onto the track direction
    pub fn relative_offset(&self, offset_x: f32, offset_y: f32) -> f32 {
        match self {
            Axis::Horizontal => offset_x,
            Axis::Vertical => offset_y,
        }
    }

    /// Pointer position along the track direction
    pub fn primary(&self, point: Point) -> f32 {
        match self {
            Axis::Horizontal => point.x,
            Axis::Vertical => point.y,
        }
    }

    /// Pointer position across the track direction
    pub fn orthogonal(&self, point: Point) -> f32 {
        match self {
            Axis::Horizontal => point.y,
            Axis::Vertical => point.x,
        }
    }

    /// Start of the scrollbar element along the track direction
    pub fn rect_start(&self, rect: &Rect) -> f32 {
        self.primary(rect.origin())
    }

    /// Element size from its length along the track and its thickness
    pub fn track_size(&self, large_size: f32, small_size: f32) -> (f32, f32) {
        match self {
            Axis::Horizontal => (large_size, small_size),
            Axis::Vertical => (small_size, large_size),
        }
    }

    /// Rectangle of a segment of the scrollbar (slider, arrow) relative to
    /// the scrollbar element
    pub fn segment_rect(&self, start: f32, length: f32, thickness: f32) -> Rect {
        match self {
            Axis::Horizontal => Rect::new(start, 0.0, length, thickness),
            Axis::Vertical => Rect::new(0.0, start, thickness, length),
        }
    }

    /// Write `position` into the field of the partial scroll position this
    /// axis owns
    pub fn write_scroll_position(&self, target: &mut NewScrollPosition, position: f32) {
        match self {
            Axis::Horizontal => target.scroll_left = Some(position),
            Axis::Vertical => target.scroll_top = Some(position),
        }
    }

    /// Wheel event produced by activating an arrow
    pub fn arrow_wheel(&self, side: ArrowSide, amount: f32) -> WheelEvent {
        let delta = match side {
            ArrowSide::Start => amount,
            ArrowSide::End => -amount,
        };
        match self {
            Axis::Horizontal => WheelEvent::new(delta, 0.0),
            Axis::Vertical => WheelEvent::new(0.0, delta),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projections() {
        let p = Point::new(3.0, 9.0);
        assert_eq!(Axis::Vertical.primary(p), 9.0);
        assert_eq!(Axis::Vertical.orthogonal(p), 3.0);
        assert_eq!(Axis::Horizontal.primary(p), 3.0);
        assert_eq!(Axis::Horizontal.orthogonal(p), 9.0);
        assert_eq!(Axis::Vertical.relative_offset(1.0, 2.0), 2.0);
        assert_eq!(Axis::Horizontal.relative_offset(1.0, 2.0), 1.0);
    }

    #[test]
    fn test_track_and_segment_sizes() {
        assert_eq!(Axis::Vertical.track_size(200.0, 10.0), (10.0, 200.0));
        assert_eq!(Axis::Horizontal.track_size(200.0, 10.0), (200.0, 10.0));
        assert_eq!(
            Axis::Vertical.segment_rect(40.0, 20.0, 10.0),
            Rect::new(0.0, 40.0, 10.0, 20.0)
        );
    }

    #[test]
    fn test_write_scroll_position_touches_one_axis() {
        let mut target = NewScrollPosition::default();
        Axis::Vertical.write_scroll_position(&mut target, 120.0);
        assert_eq!(target.scroll_top, Some(120.0));
        assert_eq!(target.scroll_left, None);

        let mut target = NewScrollPosition::default();
        Axis::Horizontal.write_scroll_position(&mut target, 7.0);
        assert_eq!(target.scroll_left, Some(7.0));
        assert_eq!(target.scroll_top, None);
    }

    #[test]
    fn test_arrow_wheel_direction() {
        assert_eq!(
            Axis::Vertical.arrow_wheel(ArrowSide::Start, 1.0),
            WheelEvent::new(0.0, 1.0)
        );
        assert_eq!(
            Axis::Horizontal.arrow_wheel(ArrowSide::End, 1.0),
            WheelEvent::new(-1.0, 0.0)
        );
    }
}
