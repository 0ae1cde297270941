//! State transitions for widget interaction states
//!
//! Widgets model their interaction states as small enums and map events
//! (see [`crate::events::event_types`]) to transitions:
//!
//! ```rust
//! use scrollkit_core::events::event_types::*;
//! use scrollkit_core::fsm::StateTransitions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
//! enum PressState {
//!     #[default]
//!     Idle,
//!     Pressed,
//! }
//!
//! impl StateTransitions for PressState {
//!     fn on_event(&self, event: u32) -> Option<Self> {
//!         match (self, event) {
//!             (PressState::Idle, POINTER_DOWN) => Some(PressState::Pressed),
//!             (PressState::Pressed, POINTER_UP) => Some(PressState::Idle),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let mut state = PressState::Idle;
//! assert!(state.send(POINTER_DOWN));
//! assert_eq!(state, PressState::Pressed);
//! assert!(!state.send(POINTER_DOWN));
//! ```

use std::hash::Hash;

use crate::events::EventType;

/// Trait for state enums that handle event transitions
pub trait StateTransitions:
    Clone + Copy + PartialEq + Eq + Hash + Send + Sync + std::fmt::Debug + 'static
{
    /// Handle an event and return the new state, or None if no transition
    fn on_event(&self, event: EventType) -> Option<Self>;

    /// Apply an event in place, returning whether a transition happened
    fn send(&mut self, event: EventType) -> bool {
        match self.on_event(event) {
            Some(next) => {
                tracing::trace!("{:?} --{}--> {:?}", self, event, next);
                *self = next;
                true
            }
            None => false,
        }
    }
}
