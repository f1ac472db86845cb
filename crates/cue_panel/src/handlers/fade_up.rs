use cue_animation::{Position, Timeline, VisualState};

use super::{group_targets, AnimationHandler, FirstCommit};
use crate::config::HandlerTiming;
use crate::direction::Direction;
use crate::element::ElementGroupRefs;
use crate::registry::AnimationName;

/// Fade each group in while it rises into place
pub struct FadeUp;

impl AnimationHandler for FadeUp {
    fn name(&self) -> AnimationName {
        AnimationName::FadeUp
    }

    fn run(
        &self,
        refs: &ElementGroupRefs,
        timeline: &mut Timeline,
        _direction: Direction,
        timing: &HandlerTiming,
        on_first_commit: FirstCommit,
    ) {
        let hidden = VisualState::SHOWN
            .with_opacity(0.0)
            .with_translate_y(timing.distance);

        timeline.stagger(
            group_targets(refs).into_iter().map(|(_, target)| target),
            hidden,
            VisualState::SHOWN,
            timing.duration_ms,
            timing.easing,
            timing.stagger_ms,
            Position::At(0.0),
        );
        timeline.on_first_commit(on_first_commit);
    }
}
