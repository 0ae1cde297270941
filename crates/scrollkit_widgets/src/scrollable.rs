//! Clamping scroll model
//!
//! [`Scrollable`] is a plain [`ScrollModel`]: it holds viewport and content
//! dimensions, clamps every written position into range and records a
//! [`ScrollEvent`] for each effective change. Hosts drain the events with
//! [`Scrollable::take_events`] and feed them back into their scrollbars.
//! Undrained events are bounded: past [`MAX_PENDING_EVENTS`] new changes
//! are folded into the newest pending event.

use smallvec::SmallVec;

use crate::host::{NewScrollPosition, ScrollModel};

/// Viewport and content dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollDimensions {
    pub width: f32,
    pub height: f32,
    pub scroll_width: f32,
    pub scroll_height: f32,
}

impl ScrollDimensions {
    pub fn new(width: f32, height: f32, scroll_width: f32, scroll_height: f32) -> Self {
        Self {
            width,
            height,
            scroll_width,
            scroll_height,
        }
    }
}

/// Pending events kept before changes start folding together
pub const MAX_PENDING_EVENTS: usize = 64;

/// A change to a [`Scrollable`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub dimensions: ScrollDimensions,
    pub scroll_left: f32,
    pub scroll_top: f32,
    pub scroll_left_changed: bool,
    pub scroll_top_changed: bool,
    pub dimensions_changed: bool,
}

impl ScrollEvent {
    /// Absorb a later change, keeping its values and every changed flag
    fn fold(&mut self, later: ScrollEvent) {
        self.dimensions = later.dimensions;
        self.scroll_left = later.scroll_left;
        self.scroll_top = later.scroll_top;
        self.scroll_left_changed |= later.scroll_left_changed;
        self.scroll_top_changed |= later.scroll_top_changed;
        self.dimensions_changed |= later.dimensions_changed;
    }
}

/// A scroll position register with clamping and change events
#[derive(Debug, Clone, Default)]
pub struct Scrollable {
    dimensions: ScrollDimensions,
    scroll_left: f32,
    scroll_top: f32,
    events: SmallVec<[ScrollEvent; 4]>,
}

fn clamp_position(position: f32, visible: f32, content: f32) -> f32 {
    let max = (content - visible).max(0.0);
    if position.is_finite() {
        position.clamp(0.0, max)
    } else {
        0.0
    }
}

impl Scrollable {
    pub fn new(dimensions: ScrollDimensions) -> Self {
        Self {
            dimensions,
            ..Default::default()
        }
    }

    pub fn dimensions(&self) -> ScrollDimensions {
        self.dimensions
    }

    pub fn scroll_left(&self) -> f32 {
        self.scroll_left
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    /// Replace the dimensions, re-clamping the position
    pub fn set_dimensions(&mut self, dimensions: ScrollDimensions) {
        if self.dimensions == dimensions {
            return;
        }
        self.dimensions = dimensions;
        let left = clamp_position(self.scroll_left, dimensions.width, dimensions.scroll_width);
        let top = clamp_position(self.scroll_top, dimensions.height, dimensions.scroll_height);
        self.apply(left, top, true);
    }

    /// Drain the recorded change events
    pub fn take_events(&mut self) -> SmallVec<[ScrollEvent; 4]> {
        std::mem::take(&mut self.events)
    }

    fn apply(&mut self, left: f32, top: f32, dimensions_changed: bool) {
        let scroll_left_changed = left != self.scroll_left;
        let scroll_top_changed = top != self.scroll_top;
        if !scroll_left_changed && !scroll_top_changed && !dimensions_changed {
            return;
        }

        self.scroll_left = left;
        self.scroll_top = top;
        tracing::trace!("scrollable position: left={} top={}", left, top);
        let event = ScrollEvent {
            dimensions: self.dimensions,
            scroll_left: left,
            scroll_top: top,
            scroll_left_changed,
            scroll_top_changed,
            dimensions_changed,
        };
        if self.events.len() >= MAX_PENDING_EVENTS {
            if let Some(last) = self.events.last_mut() {
                last.fold(event);
                return;
            }
        }
        self.events.push(event);
    }
}

impl ScrollModel for Scrollable {
    fn set_scroll_position_now(&mut self, position: NewScrollPosition) {
        let d = self.dimensions;
        let left = position
            .scroll_left
            .map_or(self.scroll_left, |l| clamp_position(l, d.width, d.scroll_width));
        let top = position
            .scroll_top
            .map_or(self.scroll_top, |t| clamp_position(t, d.height, d.scroll_height));
        self.apply(left, top, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrollable() -> Scrollable {
        Scrollable::new(ScrollDimensions::new(100.0, 100.0, 400.0, 1000.0))
    }

    #[test]
    fn test_partial_write_keeps_other_axis() {
        let mut s = scrollable();
        s.set_scroll_position_now(NewScrollPosition {
            scroll_left: Some(50.0),
            scroll_top: None,
        });
        s.set_scroll_position_now(NewScrollPosition {
            scroll_left: None,
            scroll_top: Some(200.0),
        });
        assert_eq!(s.scroll_left(), 50.0);
        assert_eq!(s.scroll_top(), 200.0);

        let events = s.take_events();
        assert_eq!(events.len(), 2);
        assert!(events[1].scroll_top_changed);
        assert!(!events[1].scroll_left_changed);
    }

    #[test]
    fn test_positions_are_clamped() {
        let mut s = scrollable();
        s.set_scroll_position_now(NewScrollPosition {
            scroll_left: Some(-5.0),
            scroll_top: Some(5000.0),
        });
        assert_eq!(s.scroll_left(), 0.0);
        assert_eq!(s.scroll_top(), 900.0);
    }

    #[test]
    fn test_no_event_without_change() {
        let mut s = scrollable();
        s.set_scroll_position_now(NewScrollPosition {
            scroll_left: Some(0.0),
            scroll_top: Some(0.0),
        });
        assert!(s.take_events().is_empty());
    }

    #[test]
    fn test_shrinking_content_reclamps() {
        let mut s = scrollable();
        s.set_scroll_position_now(NewScrollPosition {
            scroll_left: None,
            scroll_top: Some(900.0),
        });
        s.take_events();

        s.set_dimensions(ScrollDimensions::new(100.0, 100.0, 400.0, 300.0));
        assert_eq!(s.scroll_top(), 200.0);
        let events = s.take_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].dimensions_changed);
        assert!(events[0].scroll_top_changed);
    }

    #[test]
    fn test_undrained_events_are_bounded() {
        let mut s = scrollable();
        s.set_scroll_position_now(NewScrollPosition {
            scroll_left: Some(10.0),
            scroll_top: None,
        });
        for top in 1..=200 {
            s.set_scroll_position_now(NewScrollPosition {
                scroll_left: None,
                scroll_top: Some(top as f32),
            });
        }

        let events = s.take_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert!(events[0].scroll_left_changed);

        let last = events[MAX_PENDING_EVENTS - 1];
        assert_eq!(last.scroll_top, 200.0);
        assert!(last.scroll_top_changed);
        assert!(!last.scroll_left_changed);
        assert!(s.take_events().is_empty());
    }
}
