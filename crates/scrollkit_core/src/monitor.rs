//! Global pointer monitoring
//!
//! Once a gesture starts (slider grab, arrow press), the widget keeps
//! receiving pointer samples even when the pointer leaves its bounds, until
//! the buttons are released. The host forwards every window-level pointer
//! move/up to the monitor; the monitor filters, merges and normalizes them
//! and reports the end of the session exactly once.

use crate::events::{Buttons, PointerEvent};
use crate::geometry::Point;

/// Host-side pointer capture registration.
///
/// Implementations route window pointer events to the capturing element
/// while a session is active (e.g. `set_pointer_capture` on a DOM node or an
/// OS-level mouse grab).
pub trait PointerCapture {
    /// Start capturing pointer input for `target`
    fn capture(&mut self, target: u64, buttons: Buttons);

    /// Stop capturing pointer input for `target`
    fn release(&mut self, target: u64);
}

/// Capture implementation for hosts that already deliver global events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCapture;

impl PointerCapture for NoopCapture {
    fn capture(&mut self, _target: u64, _buttons: Buttons) {}

    fn release(&mut self, _target: u64) {}
}

/// A normalized pointer sample delivered during a monitoring session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
    pub buttons: Buttons,
}

impl PointerSample {
    /// Page position as a point
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Merges the previous sample (if any) with a new raw event
pub type SampleMerger = fn(Option<&PointerSample>, &PointerEvent) -> PointerSample;

/// Default merger: every raw move replaces the previous sample
pub fn standard_merger(_last: Option<&PointerSample>, event: &PointerEvent) -> PointerSample {
    PointerSample {
        x: event.x,
        y: event.y,
        buttons: event.buttons,
    }
}

/// What the monitor produced for a raw event
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MonitorEvent {
    /// A new merged sample
    Sample(PointerSample),
    /// The session ended; delivered once per session
    Released,
}

struct MonitorSession {
    target: u64,
    initial_buttons: Buttons,
    merger: SampleMerger,
    last_sample: Option<PointerSample>,
}

/// Tracks a single pointer monitoring session
#[derive(Default)]
pub struct PointerMonitor {
    session: Option<MonitorSession>,
}

impl std::fmt::Debug for PointerMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointerMonitor")
            .field("target", &self.target())
            .field(
                "initial_buttons",
                &self.session.as_ref().map(|s| s.initial_buttons),
            )
            .finish()
    }
}

impl PointerMonitor {
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Whether a session is currently active
    pub fn is_monitoring(&self) -> bool {
        self.session.is_some()
    }

    /// Target of the active session
    pub fn target(&self) -> Option<u64> {
        self.session.as_ref().map(|s| s.target)
    }

    /// Begin a session for `target`.
    ///
    /// Returns false (and does nothing) if a session is already active.
    pub fn start_monitoring(
        &mut self,
        target: u64,
        initial_buttons: Buttons,
        merger: SampleMerger,
        capture: &mut dyn PointerCapture,
    ) -> bool {
        if self.session.is_some() {
            tracing::trace!("pointer monitor already active, ignoring start for {}", target);
            return false;
        }

        capture.capture(target, initial_buttons);
        self.session = Some(MonitorSession {
            target,
            initial_buttons,
            merger,
            last_sample: None,
        });
        tracing::trace!(
            "pointer monitor started: target={} buttons={:#06b}",
            target,
            initial_buttons.bits()
        );
        true
    }

    /// Feed a raw pointer move
    pub fn on_pointer_move(
        &mut self,
        event: &PointerEvent,
        capture: &mut dyn PointerCapture,
    ) -> Option<MonitorEvent> {
        let session = self.session.as_mut()?;

        // Buttons changed behind our back (release outside the window, or an
        // extra button pressed): the gesture is over.
        if event.buttons != session.initial_buttons {
            self.stop_monitoring(capture);
            return Some(MonitorEvent::Released);
        }

        let sample = (session.merger)(session.last_sample.as_ref(), event);
        session.last_sample = Some(sample);
        Some(MonitorEvent::Sample(sample))
    }

    /// Feed a raw pointer up
    pub fn on_pointer_up(
        &mut self,
        _event: &PointerEvent,
        capture: &mut dyn PointerCapture,
    ) -> Option<MonitorEvent> {
        if self.stop_monitoring(capture) {
            Some(MonitorEvent::Released)
        } else {
            None
        }
    }

    /// End the active session, releasing the capture registration.
    ///
    /// Returns true if a session was active, in which case the caller owns
    /// the (single) release notification.
    pub fn stop_monitoring(&mut self, capture: &mut dyn PointerCapture) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        capture.release(session.target);
        tracing::trace!("pointer monitor stopped: target={}", session.target);
        true
    }
}
