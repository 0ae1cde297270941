//! Scrollbar geometry model
//!
//! Pure geometry for one scrollbar axis: from the visible size, the content
//! (scroll) size, the scroll position and the track length it derives the
//! slider size and position, and maps pointer offsets and drag deltas back
//! to scroll positions.
//!
//! ```text
//!  arrow   ┌──────────────── track ────────────────┐   arrow
//! ├─────┼──────────┬██████████████┬──────────────────┼─────┤
//!                  │◄ slider_size►│
//!       │◄ slider_ ►│
//!          position
//! ```
//!
//! Content sizes and the scroll position are in content units; everything
//! else is in pixels. Every setter returns whether something changed so the
//! caller can skip redundant rendering.

/// Default lower bound for the slider length in pixels
pub const MINIMUM_SLIDER_SIZE: f32 = 20.0;

/// Replace negative, NaN and infinite input with a usable value
fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Geometry of a single scrollbar
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollbarState {
    /// Pixels reserved by each end arrow
    arrow_size: f32,
    /// Cross-axis size of the scrollbar (rendering only)
    thickness: f32,
    /// Lower bound for the slider length
    min_slider_size: f32,
    /// Viewport size (content units)
    visible_size: f32,
    /// Total content size (content units)
    scroll_size: f32,
    /// Current scroll position (content units)
    scroll_position: f32,
    /// Full length of the scrollbar in pixels, arrows included
    scrollbar_size: f32,

    // Derived values, refreshed by `refresh_computed_values`
    computed_track_size: f32,
    computed_is_needed: bool,
    computed_slider_size: f32,
    computed_slider_ratio: f32,
    computed_slider_position: f32,
}

impl Default for ScrollbarState {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl ScrollbarState {
    /// Create an empty state (no content, nothing to scroll)
    pub fn new(arrow_size: f32, scrollbar_size: f32) -> Self {
        let mut state = Self {
            arrow_size: sanitize(arrow_size),
            thickness: 0.0,
            min_slider_size: MINIMUM_SLIDER_SIZE,
            visible_size: 0.0,
            scroll_size: 0.0,
            scroll_position: 0.0,
            scrollbar_size: sanitize(scrollbar_size),
            computed_track_size: 0.0,
            computed_is_needed: false,
            computed_slider_size: 0.0,
            computed_slider_ratio: 0.0,
            computed_slider_position: 0.0,
        };
        state.refresh_computed_values();
        state
    }

    /// Set the cross-axis size used when drawing
    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = sanitize(thickness);
        self
    }

    /// Set the lower bound for the slider length
    pub fn with_min_slider_size(mut self, min_slider_size: f32) -> Self {
        self.min_slider_size = sanitize(min_slider_size);
        self.refresh_computed_values();
        self
    }

    // =========================================================================
    // Setters
    // =========================================================================

    /// Set the viewport size. Returns true if anything changed.
    pub fn set_visible_size(&mut self, visible_size: f32) -> bool {
        let visible_size = sanitize(visible_size);
        if self.visible_size == visible_size {
            return false;
        }
        self.visible_size = visible_size;
        self.refresh_computed_values();
        true
    }

    /// Set the content size. Returns true if anything changed.
    pub fn set_scroll_size(&mut self, scroll_size: f32) -> bool {
        let scroll_size = sanitize(scroll_size);
        if self.scroll_size == scroll_size {
            return false;
        }
        self.scroll_size = scroll_size;
        self.refresh_computed_values();
        true
    }

    /// Set the scroll position, clamped to the scrollable range.
    /// Returns true if the stored position changed.
    pub fn set_scroll_position(&mut self, scroll_position: f32) -> bool {
        let scroll_position = sanitize(scroll_position).min(self.max_scroll_position());
        if self.scroll_position == scroll_position {
            return false;
        }
        self.scroll_position = scroll_position;
        self.refresh_computed_values();
        true
    }

    /// Set the scrollbar length in pixels. Returns true if anything changed.
    pub fn set_scrollbar_size(&mut self, scrollbar_size: f32) -> bool {
        let scrollbar_size = sanitize(scrollbar_size);
        if self.scrollbar_size == scrollbar_size {
            return false;
        }
        self.scrollbar_size = scrollbar_size;
        self.refresh_computed_values();
        true
    }

    fn refresh_computed_values(&mut self) {
        let track = (self.scrollbar_size - 2.0 * self.arrow_size).max(0.0);
        let max_scroll = self.max_scroll_position();

        // Content may have shrunk under the current position
        self.scroll_position = self.scroll_position.min(max_scroll);
        self.computed_track_size = track;
        self.computed_is_needed = self.scroll_size > self.visible_size;

        if track <= 0.0 {
            self.computed_slider_size = 0.0;
            self.computed_slider_ratio = 0.0;
            self.computed_slider_position = 0.0;
            return;
        }

        if !self.computed_is_needed {
            // Nothing to scroll: the slider fills the track
            self.computed_slider_size = track;
            self.computed_slider_ratio = 0.0;
            self.computed_slider_position = 0.0;
            return;
        }

        // scroll_size > visible_size >= 0 here, so the divisions are safe
        let slider_size = (self.visible_size * track / self.scroll_size)
            .max(self.min_slider_size)
            .min(track);
        let slider_ratio = (track - slider_size) / (self.scroll_size - self.visible_size);

        self.computed_slider_size = slider_size;
        self.computed_slider_ratio = slider_ratio;
        self.computed_slider_position = (self.scroll_position * slider_ratio)
            .clamp(0.0, track - slider_size);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn arrow_size(&self) -> f32 {
        self.arrow_size
    }

    pub fn visible_size(&self) -> f32 {
        self.visible_size
    }

    pub fn scroll_size(&self) -> f32 {
        self.scroll_size
    }

    pub fn scroll_position(&self) -> f32 {
        self.scroll_position
    }

    pub fn scrollbar_size(&self) -> f32 {
        self.scrollbar_size
    }

    /// Usable track length (scrollbar length minus both arrows)
    pub fn track_size(&self) -> f32 {
        self.computed_track_size
    }

    /// Length of the drawn scrollbar along its axis
    pub fn rectangle_large_size(&self) -> f32 {
        self.scrollbar_size
    }

    /// Cross-axis size of the drawn scrollbar
    pub fn rectangle_small_size(&self) -> f32 {
        self.thickness
    }

    pub fn slider_size(&self) -> f32 {
        self.computed_slider_size
    }

    /// Slider offset from the start of the track (arrow excluded)
    pub fn slider_position(&self) -> f32 {
        self.computed_slider_position
    }

    /// Track pixels per content unit of scroll
    pub fn slider_ratio(&self) -> f32 {
        self.computed_slider_ratio
    }

    /// Largest valid scroll position
    pub fn max_scroll_position(&self) -> f32 {
        (self.scroll_size - self.visible_size).max(0.0)
    }

    /// Check if the content overflows the viewport
    pub fn is_needed(&self) -> bool {
        self.computed_is_needed
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Pointer offset (from the scrollbar start) moved into track coordinates
    fn track_offset(&self, offset: f32) -> f32 {
        let offset = if offset.is_finite() { offset } else { 0.0 };
        (offset - self.arrow_size).clamp(0.0, self.computed_track_size)
    }

    /// Scroll position for a click that jumps straight to `offset`.
    ///
    /// The start of the track maps to 0 and the end of the track to the
    /// maximum scroll position.
    pub fn desired_scroll_position_from_offset(&self, offset: f32) -> f32 {
        let track = self.computed_track_size;
        if track <= 0.0 {
            return self.scroll_position;
        }
        let max_scroll = self.max_scroll_position();
        (self.track_offset(offset) / track * max_scroll).clamp(0.0, max_scroll)
    }

    /// Scroll position for a click that pages toward `offset`.
    ///
    /// Before the slider start pages back one viewport, anywhere else
    /// (the slider included) pages forward.
    pub fn desired_scroll_position_from_offset_paged(&self, offset: f32) -> f32 {
        if self.computed_track_size <= 0.0 {
            return self.scroll_position;
        }
        let offset = self.track_offset(offset);

        if offset < self.computed_slider_position {
            (self.scroll_position - self.visible_size).max(0.0)
        } else {
            (self.scroll_position + self.visible_size).min(self.max_scroll_position())
        }
    }

    /// Scroll position after moving the slider by `delta` pixels from where
    /// it is in this state.
    pub fn desired_scroll_position_from_delta(&self, delta: f32) -> f32 {
        if self.computed_slider_ratio <= 0.0 || !delta.is_finite() {
            return self.scroll_position;
        }
        (self.scroll_position + delta / self.computed_slider_ratio)
            .clamp(0.0, self.max_scroll_position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(visible: f32, scroll: f32, position: f32, scrollbar: f32) -> ScrollbarState {
        let mut state = ScrollbarState::new(0.0, scrollbar);
        state.set_visible_size(visible);
        state.set_scroll_size(scroll);
        state.set_scroll_position(position);
        state
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_is_needed_tracks_overflow() {
        for (visible, scroll) in [(0.0, 0.0), (100.0, 100.0), (100.0, 99.0), (100.0, 101.0), (0.0, 1.0)] {
            let state = state(visible, scroll, 0.0, 200.0);
            assert_eq!(state.is_needed(), scroll > visible, "visible={visible} scroll={scroll}");
        }
    }

    #[test]
    fn test_scroll_position_clamped() {
        let mut state = state(100.0, 1000.0, 0.0, 200.0);

        state.set_scroll_position(5000.0);
        assert_eq!(state.scroll_position(), 900.0);

        state.set_scroll_position(-20.0);
        assert_eq!(state.scroll_position(), 0.0);

        state.set_scroll_position(f32::NAN);
        assert_eq!(state.scroll_position(), 0.0);
    }

    #[test]
    fn test_shrinking_content_reclamps_position() {
        let mut state = state(100.0, 1000.0, 900.0, 200.0);
        assert!(state.set_scroll_size(400.0));
        assert_eq!(state.scroll_position(), 300.0);

        assert!(state.set_visible_size(500.0));
        assert_eq!(state.scroll_position(), 0.0);
        assert!(!state.is_needed());
    }

    #[test]
    fn test_setters_report_changes() {
        let mut state = state(100.0, 1000.0, 0.0, 200.0);

        assert!(!state.set_visible_size(100.0));
        assert!(!state.set_scroll_size(1000.0));
        assert!(!state.set_scroll_position(0.0));
        assert!(!state.set_scrollbar_size(200.0));

        assert!(state.set_scroll_position(10.0));
        assert!(!state.set_scroll_position(10.0));
        // Clamps to the same stored value
        assert!(state.set_scroll_position(2000.0));
        assert!(!state.set_scroll_position(3000.0));
    }

    #[test]
    fn test_end_to_end_slider_geometry() {
        let state = state(100.0, 1000.0, 0.0, 200.0);

        assert_close(state.slider_size(), 20.0);
        assert_close(state.slider_position(), 0.0);
        // 10 track pixels move the content by 10 * 1000 / 200
        assert_close(state.desired_scroll_position_from_delta(10.0), 50.0);
    }

    #[test]
    fn test_slider_invariants_hold() {
        for position in [0.0, 123.0, 450.0, 900.0] {
            let state = state(100.0, 1000.0, position, 200.0);
            assert!(state.slider_size() >= 0.0);
            assert!(state.slider_size() <= state.scrollbar_size());
            assert!(state.slider_position() >= 0.0);
            assert!(state.slider_position() <= state.scrollbar_size() - state.slider_size() + 0.001);
        }
    }

    #[test]
    fn test_offset_endpoints() {
        let state = state(100.0, 1000.0, 300.0, 200.0);

        assert_close(state.desired_scroll_position_from_offset(0.0), 0.0);
        assert_close(state.desired_scroll_position_from_offset(200.0), 900.0);
        assert_close(state.desired_scroll_position_from_offset(100.0), 450.0);

        // Out of range offsets are clamped, not rejected
        assert_close(state.desired_scroll_position_from_offset(-50.0), 0.0);
        assert_close(state.desired_scroll_position_from_offset(10_000.0), 900.0);
    }

    #[test]
    fn test_offset_accounts_for_arrows() {
        let mut state = ScrollbarState::new(10.0, 220.0);
        state.set_visible_size(100.0);
        state.set_scroll_size(1000.0);

        assert_eq!(state.track_size(), 200.0);
        assert_close(state.desired_scroll_position_from_offset(10.0), 0.0);
        assert_close(state.desired_scroll_position_from_offset(210.0), 900.0);
    }

    #[test]
    fn test_paged_offset() {
        // Slider spans [60, 80) at position 300
        let state = state(100.0, 1000.0, 300.0, 200.0);
        assert_close(state.slider_position(), 60.0);

        assert_close(state.desired_scroll_position_from_offset_paged(10.0), 200.0);
        assert_close(state.desired_scroll_position_from_offset_paged(150.0), 400.0);

        // On the slider counts as after its start
        assert_close(state.desired_scroll_position_from_offset_paged(60.0), 400.0);
        assert_close(state.desired_scroll_position_from_offset_paged(70.0), 400.0);
        assert_close(state.desired_scroll_position_from_offset_paged(59.5), 200.0);
    }

    #[test]
    fn test_paged_offset_clamps() {
        let near_start = state(100.0, 1000.0, 50.0, 200.0);
        assert_close(near_start.desired_scroll_position_from_offset_paged(0.0), 0.0);

        let near_end = state(100.0, 1000.0, 850.0, 200.0);
        assert_close(near_end.desired_scroll_position_from_offset_paged(199.0), 900.0);
    }

    #[test]
    fn test_delta_is_linear_and_invertible() {
        let state = state(100.0, 1000.0, 400.0, 200.0);
        let base = state.scroll_position();

        for delta in [-30.0f32, -5.0, 1.0, 7.5, 20.0] {
            let moved = state.desired_scroll_position_from_delta(delta) - base;
            assert_close(moved, delta * 5.0);
            // Back through the slider ratio
            assert_close(moved * state.slider_ratio(), delta);
        }
    }

    #[test]
    fn test_delta_clamps_at_bounds() {
        let state = state(100.0, 1000.0, 400.0, 200.0);
        assert_eq!(state.desired_scroll_position_from_delta(-1000.0), 0.0);
        assert_eq!(state.desired_scroll_position_from_delta(1000.0), 900.0);
    }

    #[test]
    fn test_min_slider_size_keeps_delta_consistent() {
        // Proportional slider would be 2px; the minimum raises it to 20px
        let mut state = ScrollbarState::new(0.0, 200.0);
        state.set_visible_size(100.0);
        state.set_scroll_size(10_000.0);
        assert_close(state.slider_size(), 20.0);

        // Dragging across the remaining track covers the whole content
        assert_close(state.desired_scroll_position_from_delta(180.0), 9_900.0);
    }

    #[test]
    fn test_zero_length_track_is_guarded() {
        let mut state = ScrollbarState::new(10.0, 15.0);
        state.set_visible_size(100.0);
        state.set_scroll_size(1000.0);
        state.set_scroll_position(250.0);

        assert_eq!(state.track_size(), 0.0);
        assert_eq!(state.slider_size(), 0.0);
        assert_eq!(state.slider_position(), 0.0);
        assert_eq!(state.desired_scroll_position_from_offset(5.0), 250.0);
        assert_eq!(state.desired_scroll_position_from_offset_paged(5.0), 250.0);
        assert_eq!(state.desired_scroll_position_from_delta(5.0), 250.0);
        assert!(state.slider_position().is_finite());
    }

    #[test]
    fn test_not_needed_slider_fills_track() {
        let state = state(500.0, 300.0, 0.0, 200.0);
        assert!(!state.is_needed());
        assert_eq!(state.slider_size(), 200.0);
        assert_eq!(state.slider_ratio(), 0.0);
        assert_eq!(state.desired_scroll_position_from_delta(50.0), 0.0);
    }

    #[test]
    fn test_clone_is_detached() {
        let mut live = state(100.0, 1000.0, 100.0, 200.0);
        let baseline = live.clone();

        live.set_scroll_position(700.0);
        live.set_scroll_size(5000.0);

        assert_eq!(baseline.scroll_position(), 100.0);
        assert_eq!(baseline.scroll_size(), 1000.0);
        assert_close(baseline.desired_scroll_position_from_delta(10.0), 150.0);
    }
}
