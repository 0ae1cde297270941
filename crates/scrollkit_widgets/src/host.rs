//! Collaborator interfaces
//!
//! The scrollbar does no layout or painting of its own. It talks to the
//! embedding application through these traits:
//!
//! - [`ScrollModel`]: the scroll position register the scrollbar commits to
//! - [`ScrollbarSurface`]: the element the scrollbar is drawn into
//! - [`ScrollbarHost`]: notifications for the embedding scrollable surface
//!
//! Pointer capture is [`scrollkit_core::PointerCapture`].

use std::sync::{Arc, Mutex, MutexGuard};

use scrollkit_core::{Rect, WheelEvent};

use crate::arrow::ArrowSide;

/// Partial scroll position: only the axes that are `Some` are written
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NewScrollPosition {
    pub scroll_left: Option<f32>,
    pub scroll_top: Option<f32>,
}

/// The scroll position register shared by every writer (scrollbars,
/// keyboard, programmatic scrolling)
pub trait ScrollModel {
    /// Commit a new position immediately
    fn set_scroll_position_now(&mut self, position: NewScrollPosition);
}

/// Shared handle to a scroll model
pub type SharedScrollModel = Arc<Mutex<dyn ScrollModel + Send>>;

/// Lock a shared model, recovering the data if a previous holder panicked
pub(crate) fn lock_model(model: &SharedScrollModel) -> MutexGuard<'_, dyn ScrollModel + Send + 'static> {
    model.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Notifications sent to the embedding scrollable surface
pub trait ScrollbarHost {
    /// Wheel input produced by the scrollbar (arrow activation)
    fn on_mouse_wheel(&mut self, event: WheelEvent);

    /// A slider drag started; competing interactions (text selection)
    /// should be suppressed until [`ScrollbarHost::on_drag_end`]
    fn on_drag_start(&mut self);

    /// The slider drag ended
    fn on_drag_end(&mut self);
}

/// Host rendering primitives for one scrollbar element
pub trait ScrollbarSurface {
    /// Page-space rectangle of the scrollbar element, `None` when it has no
    /// layout (e.g. detached)
    fn bounding_rect(&self) -> Option<Rect>;

    /// Set a presentational attribute on the scrollbar element
    fn set_attribute(&mut self, name: &str, value: &str);

    /// Replace the scrollbar element's class name
    fn set_class_name(&mut self, class_name: &str);

    /// Size of the scrollbar element
    fn set_track_size(&mut self, width: f32, height: f32);

    /// Slider rectangle, relative to the scrollbar element
    fn set_slider_rect(&mut self, rect: Rect);

    /// Toggle a class on the slider (e.g. `active` while dragging)
    fn toggle_slider_class(&mut self, class_name: &str, enabled: bool);

    /// Arrow rectangle, relative to the scrollbar element
    fn set_arrow_rect(&mut self, _side: ArrowSide, _rect: Rect) {}
}
