//! scrollkit timers
//!
//! Deterministic, host-driven timers for widget effects:
//!
//! - **Timeouts**: debounced one-shot effects (a zero delay fires on the next tick)
//! - **Intervals**: auto-repeat with catch-up when ticks arrive late
//! - **Cancellation**: dropping a pending effect before it fires
//!
//! Nothing runs on its own thread; the host loop calls
//! [`TimerScheduler::tick`] and widgets collect their firings.

pub mod scheduler;

pub use scheduler::{lock_timers, SharedTimerScheduler, TimerId, TimerScheduler};
