//! scrollkit widgets
//!
//! An interactive scrollbar engine for hosts that do their own layout and
//! painting:
//!
//! - **Geometry**: [`ScrollbarState`] derives slider size/position from the
//!   viewport, content and track sizes and maps pointer offsets back to
//!   scroll positions
//! - **Interaction**: [`ScrollbarWidget`] runs track presses, slider drags
//!   and arrow auto-repeat, and commits positions to a [`ScrollModel`]
//! - **Visibility**: [`VisibilityController`] shows the scrollbar only when
//!   the content overflows, with a debounced reveal and a fade-out
//!
//! Rendering goes through [`ScrollbarSurface`]; timers are driven by a
//! shared [`scrollkit_timer::TimerScheduler`] the host ticks from its event
//! loop.

pub mod arrow;
pub mod axis;
pub mod config;
pub mod error;
pub mod host;
pub mod scrollable;
pub mod scrollbar;
pub mod scrollbar_state;
pub mod visibility;

pub use arrow::{ArrowSide, ScrollbarArrow, ARROW_REPEAT_DELAY, ARROW_REPEAT_INTERVAL};
pub use axis::Axis;
pub use config::ScrollbarOptions;
pub use error::{Result, ScrollbarError};
pub use host::{
    NewScrollPosition, ScrollModel, ScrollbarHost, ScrollbarSurface, SharedScrollModel,
};
pub use scrollable::{ScrollDimensions, ScrollEvent, Scrollable, MAX_PENDING_EVENTS};
pub use scrollbar::{
    DragSession, DragState, DragUpdate, ScrollbarContext, ScrollbarPart, ScrollbarWidget,
    MOUSE_DRAG_RESET_DISTANCE,
};
pub use scrollbar_state::{ScrollbarState, MINIMUM_SLIDER_SIZE};
pub use visibility::{Presentation, ScrollbarVisibility, VisibilityController};
