//! Timer scheduler
//!
//! Holds every pending timeout/interval of a window and fires them when the
//! host loop ticks. Widgets keep a weak handle plus the [`TimerId`]s they
//! own and collect their firings with [`TimerScheduler::take_fired`].

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    pub struct TimerId;
}

/// Shared handle to a timer scheduler
pub type SharedTimerScheduler = Arc<Mutex<TimerScheduler>>;

/// Lock a shared scheduler, recovering the data if a previous holder panicked
pub fn lock_timers(timers: &Mutex<TimerScheduler>) -> MutexGuard<'_, TimerScheduler> {
    timers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug)]
struct Timer {
    deadline: Instant,
    /// Repeat period for intervals; `None` for one-shot timeouts
    period: Option<Duration>,
    /// Firings not yet collected by the owner
    fired: u32,
    /// One-shot timer that already fired
    done: bool,
}

/// The scheduler that fires all pending timers
pub struct TimerScheduler {
    timers: SlotMap<TimerId, Timer>,
    now: Instant,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a scheduler whose clock starts at `now`
    pub fn starting_at(now: Instant) -> Self {
        Self {
            timers: SlotMap::with_key(),
            now,
        }
    }

    /// Create a shared scheduler
    pub fn shared() -> SharedTimerScheduler {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Time of the last tick (or creation)
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Schedule a one-shot timer `delay` from now.
    ///
    /// A zero delay fires on the next tick. Other delays run from the wall
    /// clock, since the tick clock may be stale while the host is idle.
    pub fn set_timeout(&mut self, delay: Duration) -> TimerId {
        let start = if delay.is_zero() {
            self.now
        } else {
            self.anchor(Instant::now())
        };
        self.insert(start + delay, None)
    }

    /// Schedule a one-shot timer `delay` after `start`
    pub fn set_timeout_at(&mut self, start: Instant, delay: Duration) -> TimerId {
        let start = self.anchor(start);
        self.insert(start + delay, None)
    }

    /// Schedule a repeating timer from now: first firing after `delay`,
    /// then every `period`
    pub fn set_interval(&mut self, delay: Duration, period: Duration) -> TimerId {
        self.set_interval_at(Instant::now(), delay, period)
    }

    /// Schedule a repeating timer whose first firing is `delay` after `start`
    pub fn set_interval_at(
        &mut self,
        start: Instant,
        delay: Duration,
        period: Duration,
    ) -> TimerId {
        // A zero period would fire unboundedly in a single tick
        let period = period.max(Duration::from_millis(1));
        let start = self.anchor(start);
        self.insert(start + delay, Some(period))
    }

    /// Timers never start before the last tick
    fn anchor(&self, start: Instant) -> Instant {
        start.max(self.now)
    }

    fn insert(&mut self, deadline: Instant, period: Option<Duration>) -> TimerId {
        self.timers.insert(Timer {
            deadline,
            period,
            fired: 0,
            done: false,
        })
    }

    /// Cancel a timer, dropping any uncollected firings
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Check if a timer still exists and has not fired yet (intervals stay pending)
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.get(id).is_some_and(|t| !t.done)
    }

    /// Earliest deadline among pending timers, for hosts that sleep between ticks
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers
            .values()
            .filter(|t| !t.done)
            .map(|t| t.deadline)
            .min()
    }

    /// Advance the clock to `now` and fire every due timer.
    ///
    /// Returns the timers that fired during this tick.
    pub fn tick(&mut self, now: Instant) -> SmallVec<[TimerId; 4]> {
        // The clock never runs backwards
        if now > self.now {
            self.now = now;
        }
        let now = self.now;

        let mut fired = SmallVec::new();
        for (id, timer) in self.timers.iter_mut() {
            if timer.done || timer.deadline > now {
                continue;
            }

            match timer.period {
                Some(period) => {
                    let overdue = now - timer.deadline;
                    let extra = u32::try_from(overdue.as_nanos() / period.as_nanos())
                        .map_or(u32::MAX - 1, |n| n.min(u32::MAX - 1));
                    timer.fired = timer.fired.saturating_add(extra + 1);
                    timer.deadline += period.saturating_mul(extra + 1);
                }
                None => {
                    timer.fired += 1;
                    timer.done = true;
                }
            }
            fired.push(id);
        }

        if !fired.is_empty() {
            tracing::trace!("timer tick fired {} timer(s)", fired.len());
        }
        fired
    }

    /// Collect the firings of a timer since the last call.
    ///
    /// Finished one-shot timers are removed once collected.
    pub fn take_fired(&mut self, id: TimerId) -> u32 {
        let Some(timer) = self.timers.get_mut(id) else {
            return 0;
        };
        let fired = std::mem::take(&mut timer.fired);
        if timer.done {
            self.timers.remove(id);
        }
        fired
    }

    /// Get the number of live timers
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    /// Check if there are no live timers
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TimerScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerScheduler")
            .field("timers", &self.timers.len())
            .field("now", &self.now)
            .finish()
    }
}
