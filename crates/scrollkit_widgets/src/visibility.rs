//! Scrollbar visibility controller
//!
//! Decides whether a scrollbar is shown from two independent signals:
//!
//! - **needed**: the content overflows the viewport
//! - **should be visible**: the host's preference (pointer over the
//!   scrollable area, recent scrolling), filtered by the visibility policy
//!
//! Revealing is debounced through a zero-delay timer so rapid toggles
//! collapse into one transition and the host's show transition restarts
//! cleanly. Hiding is immediate; it fades only when the scrollbar is still
//! needed and the preference alone turned it off.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use scrollkit_timer::{lock_timers, SharedTimerScheduler, TimerId, TimerScheduler};

/// Scrollbar visibility policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollbarVisibility {
    /// Never show the scrollbar (content still scrollable)
    Hidden,
    /// Show whenever the content overflows
    Visible,
    /// Show when the host asks for it and the content overflows (default)
    #[default]
    Auto,
}

/// Rendered presentation state of the scrollbar element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presentation {
    Visible,
    /// Hidden without transition (nothing to scroll)
    Invisible,
    /// Hidden with a fade-out transition
    InvisibleFade,
}

/// Show/hide hysteresis for one scrollbar
pub struct VisibilityController {
    visibility: ScrollbarVisibility,
    visible_class_name: String,
    invisible_class_name: String,
    fade_class_name: String,
    /// `None` until attached to a surface
    presentation: Option<Presentation>,
    should_be_visible: bool,
    is_needed: bool,
    is_visible: bool,
    timers: Weak<Mutex<TimerScheduler>>,
    reveal_timer: Option<TimerId>,
}

impl VisibilityController {
    pub fn new(
        visibility: ScrollbarVisibility,
        visible_class_name: impl Into<String>,
        invisible_class_name: impl Into<String>,
        timers: &SharedTimerScheduler,
    ) -> Self {
        let invisible_class_name = invisible_class_name.into();
        Self {
            visibility,
            visible_class_name: visible_class_name.into(),
            fade_class_name: format!("{invisible_class_name} fade"),
            invisible_class_name,
            presentation: None,
            should_be_visible: false,
            is_needed: false,
            is_visible: false,
            timers: Arc::downgrade(timers),
            reveal_timer: None,
        }
    }

    pub fn visibility(&self) -> ScrollbarVisibility {
        self.visibility
    }

    /// Whether the scrollbar is (or is about to be) shown
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn is_needed(&self) -> bool {
        self.is_needed
    }

    /// Current presentation, `None` before [`VisibilityController::attach`]
    pub fn presentation(&self) -> Option<Presentation> {
        self.presentation
    }

    /// Class name for the current presentation
    pub fn class_name(&self) -> Option<&str> {
        self.presentation.map(|p| self.class_name_for(p))
    }

    pub fn class_name_for(&self, presentation: Presentation) -> &str {
        match presentation {
            Presentation::Visible => &self.visible_class_name,
            Presentation::Invisible => &self.invisible_class_name,
            Presentation::InvisibleFade => &self.fade_class_name,
        }
    }

    /// Whether a reveal is waiting for its timer
    pub fn has_pending_reveal(&self) -> bool {
        self.reveal_timer.is_some()
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    fn apply_visibility_setting(&self, should_be_visible: bool) -> bool {
        match self.visibility {
            ScrollbarVisibility::Hidden => false,
            ScrollbarVisibility::Visible => true,
            ScrollbarVisibility::Auto => should_be_visible,
        }
    }

    /// Host preference (hover, recent scroll activity)
    pub fn set_should_be_visible(&mut self, raw_should_be_visible: bool) {
        let should_be_visible = self.apply_visibility_setting(raw_should_be_visible);

        if self.should_be_visible != should_be_visible {
            self.should_be_visible = should_be_visible;
            self.ensure_visibility();
        }
    }

    /// Whether the content overflows
    pub fn set_is_needed(&mut self, is_needed: bool) {
        if self.is_needed != is_needed {
            self.is_needed = is_needed;
            self.ensure_visibility();
        }
    }

    /// Bind to the rendered element: start hidden, then settle the policy
    pub fn attach(&mut self) {
        self.presentation = Some(Presentation::Invisible);

        // Flags and presentation are consistent now; apply the policy
        self.set_should_be_visible(false);
    }

    /// Re-evaluate the presentation from the current signals
    pub fn ensure_visibility(&mut self) {
        if !self.is_needed {
            // Nothing to be rendered
            self.hide(false);
            return;
        }

        if self.should_be_visible {
            self.reveal();
        } else {
            self.hide(true);
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn reveal(&mut self) {
        if self.is_visible {
            return;
        }
        self.is_visible = true;

        if self.reveal_timer.is_some() {
            return;
        }

        match self.timers.upgrade() {
            Some(timers) => {
                let id = lock_timers(&timers).set_timeout(Duration::ZERO);
                self.reveal_timer = Some(id);
                tracing::debug!("scrollbar reveal scheduled");
            }
            None => {
                // No scheduler - instant transition
                self.apply_reveal();
            }
        }
    }

    fn hide(&mut self, with_fade: bool) {
        self.cancel_reveal_timer();
        if !self.is_visible {
            return;
        }
        self.is_visible = false;

        if self.presentation.is_some() {
            let presentation = if with_fade {
                Presentation::InvisibleFade
            } else {
                Presentation::Invisible
            };
            self.presentation = Some(presentation);
            tracing::debug!("scrollbar hidden: {:?}", presentation);
        }
    }

    fn apply_reveal(&mut self) {
        if self.presentation.is_some() {
            self.presentation = Some(Presentation::Visible);
            tracing::debug!("scrollbar revealed");
        }
    }

    fn cancel_reveal_timer(&mut self) {
        if let Some(id) = self.reveal_timer.take() {
            if let Some(timers) = self.timers.upgrade() {
                lock_timers(&timers).cancel(id);
            }
        }
    }

    /// Collect the reveal timer. Returns true if the presentation changed.
    ///
    /// Call after the shared scheduler ticked.
    pub fn poll(&mut self) -> bool {
        let Some(id) = self.reveal_timer else {
            return false;
        };

        let fired = match self.timers.upgrade() {
            Some(timers) => lock_timers(&timers).take_fired(id) > 0,
            // Scheduler is gone; nothing will ever fire the timer
            None => true,
        };
        if !fired {
            return false;
        }

        self.reveal_timer = None;
        let before = self.presentation;
        self.apply_reveal();
        before != self.presentation
    }

    /// Cancel the pending reveal. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.cancel_reveal_timer();
    }
}

impl Drop for VisibilityController {
    fn drop(&mut self) {
        self.cancel_reveal_timer();
    }
}

impl std::fmt::Debug for VisibilityController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityController")
            .field("visibility", &self.visibility)
            .field("presentation", &self.presentation)
            .field("should_be_visible", &self.should_be_visible)
            .field("is_needed", &self.is_needed)
            .field("is_visible", &self.is_visible)
            .field("reveal_pending", &self.reveal_timer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn controller(visibility: ScrollbarVisibility) -> (VisibilityController, SharedTimerScheduler) {
        let timers = Arc::new(Mutex::new(TimerScheduler::starting_at(Instant::now())));
        let mut controller = VisibilityController::new(
            visibility,
            "visible scrollbar vertical",
            "invisible scrollbar vertical",
            &timers,
        );
        controller.attach();
        (controller, timers)
    }

    fn fire(controller: &mut VisibilityController, timers: &SharedTimerScheduler) -> bool {
        let now = lock_timers(timers).now();
        lock_timers(timers).tick(now);
        controller.poll()
    }

    #[test]
    fn test_attach_starts_invisible() {
        let (controller, _timers) = controller(ScrollbarVisibility::Auto);
        assert_eq!(controller.presentation(), Some(Presentation::Invisible));
        assert_eq!(controller.class_name(), Some("invisible scrollbar vertical"));
    }

    #[test]
    fn test_reveal_is_debounced() {
        let (mut controller, timers) = controller(ScrollbarVisibility::Auto);
        controller.set_is_needed(true);
        controller.set_should_be_visible(true);

        // Not applied at the call site
        assert!(controller.is_visible());
        assert!(controller.has_pending_reveal());
        assert_eq!(controller.presentation(), Some(Presentation::Invisible));

        assert!(fire(&mut controller, &timers));
        assert_eq!(controller.presentation(), Some(Presentation::Visible));
        assert_eq!(controller.class_name(), Some("visible scrollbar vertical"));
        assert!(!controller.has_pending_reveal());
    }

    #[test]
    fn test_rapid_toggle_coalesces() {
        let (mut controller, timers) = controller(ScrollbarVisibility::Auto);
        controller.set_is_needed(true);

        controller.set_should_be_visible(true);
        controller.set_should_be_visible(false);
        controller.set_should_be_visible(true);

        assert_eq!(lock_timers(&timers).len(), 1);
        assert!(fire(&mut controller, &timers));
        assert_eq!(controller.presentation(), Some(Presentation::Visible));
    }

    #[test]
    fn test_hide_before_timer_cancels_reveal() {
        let (mut controller, timers) = controller(ScrollbarVisibility::Auto);
        controller.set_is_needed(true);
        controller.set_should_be_visible(true);
        controller.set_should_be_visible(false);

        assert!(!controller.has_pending_reveal());
        assert!(lock_timers(&timers).is_empty());
        assert!(!fire(&mut controller, &timers));
        assert_eq!(controller.presentation(), Some(Presentation::InvisibleFade));
    }

    #[test]
    fn test_hide_by_preference_fades() {
        let (mut controller, timers) = controller(ScrollbarVisibility::Auto);
        controller.set_is_needed(true);
        controller.set_should_be_visible(true);
        fire(&mut controller, &timers);

        controller.set_should_be_visible(false);
        assert_eq!(controller.presentation(), Some(Presentation::InvisibleFade));
        assert_eq!(
            controller.class_name(),
            Some("invisible scrollbar vertical fade")
        );
    }

    #[test]
    fn test_hide_by_not_needed_snaps() {
        let (mut controller, timers) = controller(ScrollbarVisibility::Auto);
        controller.set_is_needed(true);
        controller.set_should_be_visible(true);
        fire(&mut controller, &timers);

        controller.set_is_needed(false);
        assert_eq!(controller.presentation(), Some(Presentation::Invisible));
    }

    #[test]
    fn test_not_needed_wins_over_always_visible() {
        let (mut controller, timers) = controller(ScrollbarVisibility::Visible);
        controller.set_should_be_visible(true);
        assert!(!controller.is_visible());
        assert!(!fire(&mut controller, &timers));
        assert_eq!(controller.presentation(), Some(Presentation::Invisible));

        controller.set_is_needed(true);
        assert!(fire(&mut controller, &timers));
        assert_eq!(controller.presentation(), Some(Presentation::Visible));
    }

    #[test]
    fn test_always_visible_ignores_preference() {
        let (mut controller, timers) = controller(ScrollbarVisibility::Visible);
        controller.set_is_needed(true);
        fire(&mut controller, &timers);

        controller.set_should_be_visible(false);
        assert_eq!(controller.presentation(), Some(Presentation::Visible));
    }

    #[test]
    fn test_hidden_policy_never_shows() {
        let (mut controller, timers) = controller(ScrollbarVisibility::Hidden);
        controller.set_is_needed(true);
        controller.set_should_be_visible(true);

        assert!(!controller.is_visible());
        assert!(!fire(&mut controller, &timers));
        assert_eq!(controller.presentation(), Some(Presentation::Invisible));
    }

    #[test]
    fn test_dispose_cancels_pending_reveal() {
        let (mut controller, timers) = controller(ScrollbarVisibility::Auto);
        controller.set_is_needed(true);
        controller.set_should_be_visible(true);

        controller.dispose();
        assert!(lock_timers(&timers).is_empty());
        assert!(!fire(&mut controller, &timers));
        assert_eq!(controller.presentation(), Some(Presentation::Invisible));
    }

    #[test]
    fn test_without_scheduler_reveal_is_immediate() {
        let timers = TimerScheduler::shared();
        let mut controller = VisibilityController::new(
            ScrollbarVisibility::Auto,
            "visible",
            "invisible",
            &timers,
        );
        controller.attach();
        drop(timers);

        controller.set_is_needed(true);
        controller.set_should_be_visible(true);
        assert_eq!(controller.presentation(), Some(Presentation::Visible));
    }
}
