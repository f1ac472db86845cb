//! Entrance animation handlers
//!
//! A handler turns the three element groups into a staggered sequence of
//! steps on a fresh [`Timeline`] and arms its first-commit hook. Handlers never
//! play the timeline themselves and never hold on to the refs: everything they
//! capture lives inside the timeline, which drops it when the sequence ends.

mod fade_up;
mod mask_reveal;
mod slide_in;

pub use fade_up::FadeUp;
pub use mask_reveal::MaskReveal;
pub use slide_in::SlideIn;

use std::rc::Rc;

use cue_animation::{AnimationTarget, Timeline};

use crate::config::HandlerTiming;
use crate::direction::Direction;
use crate::element::{ElementGroup, ElementGroupRefs};
use crate::registry::AnimationName;

/// Callback fired when a sequence makes its first visible change
pub type FirstCommit = Box<dyn FnOnce()>;

/// One named entrance strategy
pub trait AnimationHandler {
    fn name(&self) -> AnimationName;

    /// Build the sequence for `refs` into `timeline`
    ///
    /// `on_first_commit` must end up armed on the timeline so that it fires
    /// when playback commits the first change, not when this returns. A
    /// missing `actions` group is skipped.
    fn run(
        &self,
        refs: &ElementGroupRefs,
        timeline: &mut Timeline,
        direction: Direction,
        timing: &HandlerTiming,
        on_first_commit: FirstCommit,
    );
}

/// Resolved timeline targets of every bound group, in entrance order
fn group_targets(refs: &ElementGroupRefs) -> Vec<(ElementGroup, Rc<dyn AnimationTarget>)> {
    ElementGroup::ALL
        .into_iter()
        .filter_map(|group| refs.target(group).map(|target| (group, target)))
        .collect()
}
