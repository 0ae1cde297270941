//! Interactive scrollbar widget
//!
//! Turns pointer input on a scrollbar into scroll position commits:
//!
//! - **Track press**: jump (or page) toward the pointer, then keep dragging
//!   as if the slider had been grabbed there
//! - **Slider drag**: move the content by the pointer delta along the track,
//!   measured against the geometry captured when the drag started
//! - **Arrow press**: wheel-scroll one step, then auto-repeat while held
//!
//! The widget never reads the scroll position back from the model while a
//! gesture is running. Every sample is computed from the immutable
//! [`DragSession`] baseline, so slow relayouts cannot make the slider drift.
//!
//! # Example
//!
//! ```ignore
//! let mut scrollbar = ScrollbarWidget::new(ScrollbarOptions::vertical(), context);
//! scrollbar.attach(Box::new(surface));
//! scrollbar.update_scrollbar_size(200.0);
//! scrollbar.on_element_size(100.0);
//! scrollbar.on_element_scroll_size(1000.0);
//!
//! scrollbar.on_pointer_down(ScrollbarPart::Slider, &down)?;
//! scrollbar.on_pointer_move(&moved);
//! scrollbar.on_pointer_up(&up);
//! ```

use std::time::Instant;

use smallvec::SmallVec;

use scrollkit_core::events::event_types::*;
use scrollkit_core::{
    standard_merger, EventType, MonitorEvent, Point, PointerCapture, PointerEvent,
    PointerMonitor, PointerSample, Rect, StateTransitions,
};
use scrollkit_timer::{lock_timers, SharedTimerScheduler};

use crate::arrow::{ArrowSide, ScrollbarArrow};
use crate::axis::Axis;
use crate::config::ScrollbarOptions;
use crate::error::{Result, ScrollbarError};
use crate::host::{lock_model, NewScrollPosition, ScrollbarHost, ScrollbarSurface, SharedScrollModel};
use crate::scrollbar_state::ScrollbarState;
use crate::visibility::{Presentation, VisibilityController};

/// Orthogonal distance (px) past which a slider drag snaps back to where it
/// started, when snap-back is enabled
pub const MOUSE_DRAG_RESET_DISTANCE: f32 = 140.0;

/// Class toggled on the slider while it is dragged
const SLIDER_ACTIVE_CLASS: &str = "active";

// ============================================================================
// Drag state machine
// ============================================================================

/// Pointer interaction state of a scrollbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DragState {
    /// No gesture in progress
    #[default]
    Idle,
    /// The track was pressed and the jump is being committed
    PressedOnTrack,
    /// The slider follows the pointer
    DraggingSlider,
}

impl StateTransitions for DragState {
    fn on_event(&self, event: EventType) -> Option<Self> {
        match (self, event) {
            (DragState::Idle, POINTER_DOWN) => Some(DragState::PressedOnTrack),
            (DragState::Idle, DRAG) => Some(DragState::DraggingSlider),
            (DragState::PressedOnTrack, DRAG) => Some(DragState::DraggingSlider),
            (DragState::PressedOnTrack, POINTER_UP) => Some(DragState::Idle),
            (DragState::DraggingSlider, DRAG_END) => Some(DragState::Idle),
            _ => None,
        }
    }
}

/// Part of the scrollbar a pointer event was dispatched to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollbarPart {
    Track,
    Slider,
    Arrow(ArrowSide),
}

// ============================================================================
// Drag session
// ============================================================================

/// Result of feeding one pointer sample to a [`DragSession`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragUpdate {
    /// Scroll position to commit
    pub position: f32,
    /// The pointer strayed past [`MOUSE_DRAG_RESET_DISTANCE`] and the
    /// position is the pre-drag one
    pub snapped_back: bool,
}

/// Baseline of a slider drag, captured at drag start
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    initial_primary: f32,
    initial_orthogonal: f32,
    baseline: ScrollbarState,
}

impl DragSession {
    pub fn new(axis: Axis, pointer: Point, baseline: ScrollbarState) -> Self {
        Self {
            initial_primary: axis.primary(pointer),
            initial_orthogonal: axis.orthogonal(pointer),
            baseline,
        }
    }

    /// Geometry as it was when the drag started
    pub fn baseline(&self) -> &ScrollbarState {
        &self.baseline
    }

    pub fn initial_primary(&self) -> f32 {
        self.initial_primary
    }

    pub fn initial_orthogonal(&self) -> f32 {
        self.initial_orthogonal
    }

    /// Scroll position for the pointer at `pointer`
    pub fn desired_scroll_position(&self, axis: Axis, pointer: Point, snap_back: bool) -> DragUpdate {
        let orthogonal_delta = (axis.orthogonal(pointer) - self.initial_orthogonal).abs();
        if snap_back && orthogonal_delta > MOUSE_DRAG_RESET_DISTANCE {
            return DragUpdate {
                position: self.baseline.scroll_position(),
                snapped_back: true,
            };
        }

        let delta = axis.primary(pointer) - self.initial_primary;
        DragUpdate {
            position: self.baseline.desired_scroll_position_from_delta(delta),
            snapped_back: false,
        }
    }
}

/// Gesture owning the pointer monitor session
#[derive(Debug)]
enum Gesture {
    Drag(DragSession),
    Arrow(ArrowSide),
}

// ============================================================================
// Widget
// ============================================================================

/// Collaborators of a scrollbar, given at construction
pub struct ScrollbarContext {
    /// Id of the scrollbar element in pointer events
    pub element_id: u64,
    pub host: Box<dyn ScrollbarHost>,
    pub model: SharedScrollModel,
    pub capture: Box<dyn PointerCapture>,
    pub timers: SharedTimerScheduler,
}

/// A scrollbar for one axis of a scrollable surface
pub struct ScrollbarWidget {
    options: ScrollbarOptions,
    element_id: u64,
    state: ScrollbarState,
    visibility: VisibilityController,
    monitor: PointerMonitor,
    drag_state: DragState,
    gesture: Option<Gesture>,
    arrows: SmallVec<[ScrollbarArrow; 2]>,
    host: Box<dyn ScrollbarHost>,
    model: SharedScrollModel,
    capture: Box<dyn PointerCapture>,
    timers: SharedTimerScheduler,
    surface: Option<Box<dyn ScrollbarSurface>>,
    should_render: bool,
    applied_presentation: Option<Presentation>,
    disposed: bool,
}

impl ScrollbarWidget {
    pub fn new(options: ScrollbarOptions, context: ScrollbarContext) -> Self {
        let ScrollbarContext {
            element_id,
            host,
            model,
            capture,
            timers,
        } = context;

        let suffix = options.class_suffix();
        let mut visibility = VisibilityController::new(
            options.visibility,
            format!("visible scrollbar {suffix}"),
            format!("invisible scrollbar {suffix}"),
            &timers,
        );

        let state = options.build_state();
        visibility.set_is_needed(state.is_needed());

        let mut arrows = SmallVec::new();
        if options.has_arrows {
            let delay = options.arrow_repeat_delay();
            let interval = options.arrow_repeat_interval();
            for side in [ArrowSide::Start, ArrowSide::End] {
                arrows.push(
                    ScrollbarArrow::new(side, options.arrow_size, &timers)
                        .with_repeat(delay, interval),
                );
            }
        }

        tracing::debug!(
            "scrollbar created: element={} axis={:?} visibility={:?}",
            element_id,
            options.axis,
            options.visibility
        );

        Self {
            options,
            element_id,
            state,
            visibility,
            monitor: PointerMonitor::new(),
            drag_state: DragState::Idle,
            gesture: None,
            arrows,
            host,
            model,
            capture,
            timers,
            surface: None,
            should_render: true,
            applied_presentation: None,
            disposed: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn options(&self) -> &ScrollbarOptions {
        &self.options
    }

    pub fn axis(&self) -> Axis {
        self.options.axis
    }

    pub fn element_id(&self) -> u64 {
        self.element_id
    }

    pub fn state(&self) -> &ScrollbarState {
        &self.state
    }

    pub fn drag_state(&self) -> DragState {
        self.drag_state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.gesture, Some(Gesture::Drag(_)))
    }

    /// Baseline of the running slider drag
    pub fn drag_session(&self) -> Option<&DragSession> {
        match &self.gesture {
            Some(Gesture::Drag(session)) => Some(session),
            _ => None,
        }
    }

    pub fn visibility(&self) -> &VisibilityController {
        &self.visibility
    }

    pub fn presentation(&self) -> Option<Presentation> {
        self.visibility.presentation()
    }

    /// Whether a redraw is pending
    pub fn should_render(&self) -> bool {
        self.should_render
    }

    pub fn is_attached(&self) -> bool {
        self.surface.is_some()
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Check if the content overflows the viewport
    pub fn is_needed(&self) -> bool {
        self.state.is_needed()
    }

    // =========================================================================
    // Surface
    // =========================================================================

    /// Bind the scrollbar to its rendered element
    pub fn attach(&mut self, mut surface: Box<dyn ScrollbarSurface>) {
        surface.set_attribute("role", "presentation");
        surface.set_attribute("aria-hidden", "true");
        self.surface = Some(surface);

        self.applied_presentation = None;
        self.visibility.attach();
        self.sync_presentation();

        self.should_render = true;
        if !self.options.lazy_render {
            self.render();
        }
        tracing::debug!("scrollbar {} attached", self.element_id);
    }

    /// Unbind the rendered element and hand it back
    pub fn detach(&mut self) -> Option<Box<dyn ScrollbarSurface>> {
        let surface = self.surface.take();
        if surface.is_some() {
            self.applied_presentation = None;
            self.should_render = true;
            tracing::debug!("scrollbar {} detached", self.element_id);
        }
        surface
    }

    fn surface_rect(&self) -> Result<Rect> {
        let surface = self.surface.as_ref().ok_or(ScrollbarError::NotAttached)?;
        surface.bounding_rect().ok_or(ScrollbarError::Detached)
    }

    // =========================================================================
    // Host updates
    // =========================================================================

    /// Viewport size changed. Returns whether a redraw is pending.
    pub fn on_element_size(&mut self, visible_size: f32) -> bool {
        if self.state.set_visible_size(visible_size) {
            self.on_state_changed();
        }
        self.should_render
    }

    /// Content size changed. Returns whether a redraw is pending.
    pub fn on_element_scroll_size(&mut self, scroll_size: f32) -> bool {
        if self.state.set_scroll_size(scroll_size) {
            self.on_state_changed();
        }
        self.should_render
    }

    /// Scroll position changed. Returns whether a redraw is pending.
    pub fn on_element_scroll_position(&mut self, scroll_position: f32) -> bool {
        if self.state.set_scroll_position(scroll_position) {
            self.on_state_changed();
        }
        self.should_render
    }

    /// Track length changed
    pub fn update_scrollbar_size(&mut self, scrollbar_size: f32) {
        if self.state.set_scrollbar_size(scrollbar_size) {
            tracing::trace!("scrollbar {} size {}", self.element_id, scrollbar_size);
        }
        self.should_render = true;
        if !self.options.lazy_render {
            self.render();
        }
    }

    fn on_state_changed(&mut self) {
        tracing::trace!(
            "scrollbar {} state: position={} slider={}@{}",
            self.element_id,
            self.state.scroll_position(),
            self.state.slider_size(),
            self.state.slider_position()
        );
        self.visibility.set_is_needed(self.state.is_needed());
        self.sync_presentation();

        self.should_render = true;
        if !self.options.lazy_render {
            self.render();
        }
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    /// The host wants the scrollbar shown (pointer over the scrollable)
    pub fn begin_reveal(&mut self) {
        self.visibility.set_should_be_visible(true);
        self.sync_presentation();
    }

    /// The host no longer wants the scrollbar shown
    pub fn begin_hide(&mut self) {
        self.visibility.set_should_be_visible(false);
        self.sync_presentation();
    }

    /// Push the controller's presentation to the surface if it changed
    fn sync_presentation(&mut self) {
        let presentation = self.visibility.presentation();
        if presentation == self.applied_presentation {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        if let Some(class_name) = self.visibility.class_name() {
            surface.set_class_name(class_name);
        }
        self.applied_presentation = presentation;
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Draw the scrollbar if anything changed since the last render
    pub fn render(&mut self) {
        if !self.should_render {
            return;
        }
        // Stays dirty until a surface is attached
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        self.should_render = false;

        let axis = self.options.axis;
        let large_size = self.state.rectangle_large_size();
        let small_size = self.state.rectangle_small_size();

        let (width, height) = axis.track_size(large_size, small_size);
        surface.set_track_size(width, height);
        surface.set_slider_rect(axis.segment_rect(
            self.state.arrow_size() + self.state.slider_position(),
            self.state.slider_size(),
            small_size,
        ));
        for arrow in &self.arrows {
            surface.set_arrow_rect(arrow.side(), arrow.rect(axis, large_size, small_size));
        }
    }

    // =========================================================================
    // Pointer input
    // =========================================================================

    /// Pointer pressed on a part of the scrollbar
    pub fn on_pointer_down(&mut self, part: ScrollbarPart, event: &PointerEvent) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        match part {
            ScrollbarPart::Track => self.on_track_pointer_down(event),
            ScrollbarPart::Slider => {
                if event.buttons.left() {
                    self.start_slider_drag(event);
                }
                Ok(())
            }
            ScrollbarPart::Arrow(side) => {
                self.on_arrow_pointer_down(side, event);
                Ok(())
            }
        }
    }

    /// Pointer pressed somewhere over the scrollable surface on behalf of
    /// the scrollbar; hit-tests the slider.
    pub fn delegate_pointer_down(&mut self, event: &PointerEvent) -> Result<()> {
        if self.disposed {
            return Ok(());
        }
        let axis = self.options.axis;
        let rect = self.surface_rect()?;

        let slider_start =
            axis.rect_start(&rect) + self.state.arrow_size() + self.state.slider_position();
        let slider_stop = slider_start + self.state.slider_size();
        let pointer = axis.primary(event.position());

        if slider_start <= pointer && pointer <= slider_stop {
            if event.buttons.left() {
                self.start_slider_drag(event);
            }
            Ok(())
        } else {
            self.on_track_pointer_down(event)
        }
    }

    fn on_track_pointer_down(&mut self, event: &PointerEvent) -> Result<()> {
        // A second button pressed mid-gesture belongs to that gesture
        if self.gesture.is_some() {
            return Ok(());
        }
        let axis = self.options.axis;
        let offset = match event.offset {
            Some(offset) if event.target == self.element_id => {
                axis.relative_offset(offset.x, offset.y)
            }
            _ => {
                let rect = self.surface_rect()?;
                axis.primary(event.position()) - axis.rect_start(&rect)
            }
        };

        self.drag_state.send(POINTER_DOWN);
        let desired = if self.options.scroll_by_page {
            self.state.desired_scroll_position_from_offset_paged(offset)
        } else {
            self.state.desired_scroll_position_from_offset(offset)
        };
        tracing::debug!(
            "scrollbar {} track press at {} -> {}",
            self.element_id,
            offset,
            desired
        );
        self.set_desired_scroll_position_now(desired);

        if event.buttons.left() {
            self.start_slider_drag(event);
        } else {
            self.drag_state.send(POINTER_UP);
        }
        Ok(())
    }

    fn start_slider_drag(&mut self, event: &PointerEvent) {
        let started = self.monitor.start_monitoring(
            event.target,
            event.buttons,
            standard_merger,
            self.capture.as_mut(),
        );
        if !started {
            if self.drag_state == DragState::PressedOnTrack {
                self.drag_state.send(POINTER_UP);
            }
            return;
        }

        let session = DragSession::new(self.options.axis, event.position(), self.state.clone());
        self.gesture = Some(Gesture::Drag(session));
        self.drag_state.send(DRAG);

        if let Some(surface) = self.surface.as_mut() {
            surface.toggle_slider_class(SLIDER_ACTIVE_CLASS, true);
        }
        self.host.on_drag_start();
        tracing::debug!(
            "scrollbar {} drag start at position {}",
            self.element_id,
            self.state.scroll_position()
        );
    }

    fn on_arrow_pointer_down(&mut self, side: ArrowSide, event: &PointerEvent) {
        let Some(index) = self.arrows.iter().position(|arrow| arrow.side() == side) else {
            return;
        };
        let started = self.monitor.start_monitoring(
            event.target,
            event.buttons,
            standard_merger,
            self.capture.as_mut(),
        );
        if !started {
            return;
        }

        self.gesture = Some(Gesture::Arrow(side));
        let activations = self.arrows[index].press(event.time);
        self.activate_arrow(side, activations);
    }

    fn activate_arrow(&mut self, side: ArrowSide, activations: u32) {
        let wheel = self
            .options
            .axis
            .arrow_wheel(side, self.options.arrow_scroll_delta);
        for _ in 0..activations {
            self.host.on_mouse_wheel(wheel);
        }
    }

    /// Window-level pointer move; only acts during a gesture
    pub fn on_pointer_move(&mut self, event: &PointerEvent) {
        if self.disposed {
            return;
        }
        match self.monitor.on_pointer_move(event, self.capture.as_mut()) {
            Some(MonitorEvent::Sample(sample)) => self.on_gesture_sample(sample),
            Some(MonitorEvent::Released) => self.end_gesture(),
            None => {}
        }
    }

    /// Window-level pointer release
    pub fn on_pointer_up(&mut self, event: &PointerEvent) {
        if self.disposed {
            return;
        }
        if let Some(MonitorEvent::Released) = self.monitor.on_pointer_up(event, self.capture.as_mut()) {
            self.end_gesture();
        }
    }

    fn on_gesture_sample(&mut self, sample: PointerSample) {
        let update = match &self.gesture {
            Some(Gesture::Drag(session)) => session.desired_scroll_position(
                self.options.axis,
                sample.position(),
                self.options.snap_back,
            ),
            _ => return,
        };

        if update.snapped_back {
            tracing::debug!(
                "scrollbar {} pointer strayed, snapping back to {}",
                self.element_id,
                update.position
            );
        } else {
            tracing::trace!("scrollbar {} drag -> {}", self.element_id, update.position);
        }
        self.set_desired_scroll_position_now(update.position);
    }

    /// Tear down the running gesture. Runs at most once per gesture.
    fn end_gesture(&mut self) {
        match self.gesture.take() {
            Some(Gesture::Drag(_)) => {
                self.drag_state.send(DRAG_END);
                if let Some(surface) = self.surface.as_mut() {
                    surface.toggle_slider_class(SLIDER_ACTIVE_CLASS, false);
                }
                self.host.on_drag_end();
                tracing::debug!(
                    "scrollbar {} drag end at position {}",
                    self.element_id,
                    self.state.scroll_position()
                );
            }
            Some(Gesture::Arrow(side)) => {
                for arrow in self.arrows.iter_mut().filter(|a| a.side() == side) {
                    arrow.release();
                }
            }
            None => {}
        }
    }

    fn set_desired_scroll_position_now(&mut self, desired_scroll_position: f32) {
        let mut position = NewScrollPosition::default();
        self.options
            .axis
            .write_scroll_position(&mut position, desired_scroll_position);
        lock_model(&self.model).set_scroll_position_now(position);

        // Mirror the commit; the model's change notification repeats it
        self.on_element_scroll_position(desired_scroll_position);
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Advance the shared timer scheduler to `now` and apply what fired.
    ///
    /// Returns true if anything visible happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        lock_timers(&self.timers).tick(now);
        self.poll_timers()
    }

    /// Apply timers that already fired on the shared scheduler (when
    /// another owner ticks it)
    pub fn poll_timers(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let mut changed = false;

        if self.visibility.poll() {
            self.sync_presentation();
            changed = true;
        }

        let mut activations: SmallVec<[(ArrowSide, u32); 2]> = SmallVec::new();
        for arrow in self.arrows.iter_mut() {
            let fired = arrow.poll();
            if fired > 0 {
                activations.push((arrow.side(), fired));
            }
        }
        for (side, fired) in activations {
            self.activate_arrow(side, fired);
            changed = true;
        }

        changed
    }

    // =========================================================================
    // Disposal
    // =========================================================================

    /// End any gesture, release the capture and cancel timers. Input is
    /// ignored afterwards. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        self.monitor.stop_monitoring(self.capture.as_mut());
        self.end_gesture();
        self.visibility.dispose();
        for arrow in self.arrows.iter_mut() {
            arrow.dispose();
        }
        tracing::debug!("scrollbar {} disposed", self.element_id);
    }
}

impl Drop for ScrollbarWidget {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ScrollbarWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollbarWidget")
            .field("element_id", &self.element_id)
            .field("axis", &self.options.axis)
            .field("state", &self.state)
            .field("drag_state", &self.drag_state)
            .field("gesture", &self.gesture)
            .field("visibility", &self.visibility)
            .field("attached", &self.surface.is_some())
            .field("disposed", &self.disposed)
            .finish()
    }
}
