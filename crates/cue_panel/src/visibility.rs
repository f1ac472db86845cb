//! Initial visibility policy
//!
//! Panels that will animate in render their groups hidden until the entrance
//! makes its first commit. A panel that will never animate (nothing
//! configured, or the controller gave up for this mount) must not inherit
//! that default, or its content would stay hidden for good.

use crate::guard::GuardState;

/// Inputs to the hidden-by-default decision at render time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitialVisibility {
    pub animation_configured: bool,
    pub guard: GuardState,
    pub bypassed: bool,
}

impl InitialVisibility {
    /// Whether groups (and their CTA children) should render hidden
    pub fn should_hide_initially(&self) -> bool {
        self.animation_configured && !self.bypassed && self.guard == GuardState::Eligible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(configured: bool, guard: GuardState, bypassed: bool) -> InitialVisibility {
        InitialVisibility {
            animation_configured: configured,
            guard,
            bypassed,
        }
    }

    #[test]
    fn test_hidden_until_consumed() {
        assert!(policy(true, GuardState::Eligible, false).should_hide_initially());
        assert!(!policy(true, GuardState::Consumed, false).should_hide_initially());
    }

    #[test]
    fn test_nothing_to_play_shows() {
        assert!(!policy(false, GuardState::Eligible, false).should_hide_initially());
        assert!(!policy(true, GuardState::Eligible, true).should_hide_initially());
    }
}
