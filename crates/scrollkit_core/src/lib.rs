//! scrollkit core
//!
//! Foundational primitives shared by the scrollkit widgets:
//!
//! - **Events**: platform-agnostic pointer and wheel events
//! - **Geometry**: pixel points and rectangles
//! - **Pointer monitoring**: global move/up delivery for drag gestures
//! - **State transitions**: small enum state machines for interaction states

pub mod events;
pub mod fsm;
pub mod geometry;
pub mod monitor;

pub use events::{Buttons, EventType, PointerEvent, WheelEvent};
pub use fsm::StateTransitions;
pub use geometry::{Point, Rect};
pub use monitor::{
    standard_merger, MonitorEvent, NoopCapture, PointerCapture, PointerMonitor, PointerSample,
    SampleMerger,
};
