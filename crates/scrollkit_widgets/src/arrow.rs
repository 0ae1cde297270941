//! Scrollbar arrow buttons
//!
//! An arrow activates once on press and then auto-repeats while held:
//! after [`ARROW_REPEAT_DELAY`] it fires every [`ARROW_REPEAT_INTERVAL`].
//! Repeats are driven by the shared timer scheduler.

use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use scrollkit_core::Rect;
use scrollkit_timer::{lock_timers, SharedTimerScheduler, TimerId, TimerScheduler};

use crate::axis::Axis;

/// Delay before a held arrow starts repeating
pub const ARROW_REPEAT_DELAY: Duration = Duration::from_millis(200);

/// Repeat period of a held arrow (24 times per second)
pub const ARROW_REPEAT_INTERVAL: Duration = Duration::from_nanos(1_000_000_000 / 24);

/// Which end of the track an arrow sits at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowSide {
    /// Top / left; scrolls toward the start
    Start,
    /// Bottom / right; scrolls toward the end
    End,
}

/// One arrow control
pub struct ScrollbarArrow {
    side: ArrowSide,
    size: f32,
    repeat_delay: Duration,
    repeat_interval: Duration,
    timers: Weak<Mutex<TimerScheduler>>,
    repeat_timer: Option<TimerId>,
}

impl ScrollbarArrow {
    pub fn new(side: ArrowSide, size: f32, timers: &SharedTimerScheduler) -> Self {
        Self {
            side,
            size,
            repeat_delay: ARROW_REPEAT_DELAY,
            repeat_interval: ARROW_REPEAT_INTERVAL,
            timers: Arc::downgrade(timers),
            repeat_timer: None,
        }
    }

    pub fn with_repeat(mut self, delay: Duration, interval: Duration) -> Self {
        self.repeat_delay = delay;
        self.repeat_interval = interval;
        self
    }

    pub fn side(&self) -> ArrowSide {
        self.side
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_pressed(&self) -> bool {
        self.repeat_timer.is_some()
    }

    /// Rectangle relative to the scrollbar element
    pub fn rect(&self, axis: Axis, large_size: f32, thickness: f32) -> Rect {
        let start = match self.side {
            ArrowSide::Start => 0.0,
            ArrowSide::End => (large_size - self.size).max(0.0),
        };
        axis.segment_rect(start, self.size, thickness)
    }

    /// Press the arrow at `pressed_at` (the wall clock when unknown).
    /// Returns the number of activations to apply now.
    pub fn press(&mut self, pressed_at: Option<Instant>) -> u32 {
        self.cancel_repeat();
        if let Some(timers) = self.timers.upgrade() {
            let pressed_at = pressed_at.unwrap_or_else(Instant::now);
            let id = lock_timers(&timers).set_interval_at(
                pressed_at,
                self.repeat_delay,
                self.repeat_interval,
            );
            self.repeat_timer = Some(id);
        }
        tracing::debug!("scrollbar arrow {:?} pressed", self.side);
        1
    }

    /// Activations that came due since the last poll
    pub fn poll(&mut self) -> u32 {
        let Some(id) = self.repeat_timer else {
            return 0;
        };
        match self.timers.upgrade() {
            Some(timers) => lock_timers(&timers).take_fired(id),
            None => {
                self.repeat_timer = None;
                0
            }
        }
    }

    /// Stop repeating. Returns true if the arrow was held.
    pub fn release(&mut self) -> bool {
        let was_pressed = self.repeat_timer.is_some();
        self.cancel_repeat();
        if was_pressed {
            tracing::debug!("scrollbar arrow {:?} released", self.side);
        }
        was_pressed
    }

    fn cancel_repeat(&mut self) {
        if let Some(id) = self.repeat_timer.take() {
            if let Some(timers) = self.timers.upgrade() {
                lock_timers(&timers).cancel(id);
            }
        }
    }

    pub fn dispose(&mut self) {
        self.cancel_repeat();
    }
}

impl Drop for ScrollbarArrow {
    fn drop(&mut self) {
        self.cancel_repeat();
    }
}

impl std::fmt::Debug for ScrollbarArrow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollbarArrow")
            .field("side", &self.side)
            .field("size", &self.size)
            .field("pressed", &self.is_pressed())
            .finish()
    }
}
