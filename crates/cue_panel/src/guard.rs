//! Run-once guard for entrance sequences
//!
//! `Eligible -> Consumed`, exactly once, and never back. The guard belongs to
//! one mounted panel; deferred work only ever holds a [`WeakRunGuard`], so a
//! torn-down panel's guard cannot be flipped after the fact.

use std::cell::Cell;
use std::rc::{Rc, Weak};

/// State of a [`RunGuard`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GuardState {
    /// The entrance may still run
    #[default]
    Eligible,
    /// The entrance has made its first commit
    Consumed,
}

/// Flip-once flag shared between a controller and the sequence it started
#[derive(Clone, Debug, Default)]
pub struct RunGuard {
    state: Rc<Cell<GuardState>>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GuardState {
        self.state.get()
    }

    pub fn is_eligible(&self) -> bool {
        self.state.get() == GuardState::Eligible
    }

    /// Move to `Consumed`
    ///
    /// Returns true only for the call that performed the transition.
    pub fn consume(&self) -> bool {
        if self.state.get() == GuardState::Consumed {
            return false;
        }
        self.state.set(GuardState::Consumed);
        true
    }

    pub fn downgrade(&self) -> WeakRunGuard {
        WeakRunGuard {
            state: Rc::downgrade(&self.state),
        }
    }
}

/// Non-owning handle to a [`RunGuard`]
#[derive(Clone, Debug)]
pub struct WeakRunGuard {
    state: Weak<Cell<GuardState>>,
}

impl WeakRunGuard {
    pub fn upgrade(&self) -> Option<RunGuard> {
        self.state.upgrade().map(|state| RunGuard { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_once() {
        let guard = RunGuard::new();
        assert_eq!(guard.state(), GuardState::Eligible);

        assert!(guard.consume());
        assert!(!guard.consume());
        assert_eq!(guard.state(), GuardState::Consumed);
        assert!(!guard.is_eligible());
    }

    #[test]
    fn test_clones_share_state() {
        let guard = RunGuard::new();
        let other = guard.clone();
        other.consume();
        assert!(!guard.is_eligible());
    }

    #[test]
    fn test_weak_guard() {
        let guard = RunGuard::new();
        let weak = guard.downgrade();
        let upgraded = weak.upgrade().expect("guard alive");
        assert!(upgraded.consume());
        drop(upgraded);
        assert!(!guard.is_eligible());

        drop(guard);
        assert!(weak.upgrade().is_none());
    }
}
