use cue_animation::{Position, Timeline, VisualState};

use super::{group_targets, AnimationHandler, FirstCommit};
use crate::config::HandlerTiming;
use crate::direction::Direction;
use crate::element::{ElementGroup, ElementGroupRefs};
use crate::registry::AnimationName;

/// Unmask the heading, then fade the remaining groups up behind it
pub struct MaskReveal;

impl AnimationHandler for MaskReveal {
    fn name(&self) -> AnimationName {
        AnimationName::MaskReveal
    }

    fn run(
        &self,
        refs: &ElementGroupRefs,
        timeline: &mut Timeline,
        _direction: Direction,
        timing: &HandlerTiming,
        on_first_commit: FirstCommit,
    ) {
        let masked = VisualState::SHOWN
            .with_clip(0.0)
            .with_translate_y(timing.distance * 0.5);
        let faded = VisualState::SHOWN
            .with_opacity(0.0)
            .with_translate_y(timing.distance);

        // The rest follows once the heading is half revealed
        let mut next = Position::At(timing.duration_ms * 0.5);
        for (group, target) in group_targets(refs) {
            if group == ElementGroup::Heading {
                timeline.from_to(
                    target,
                    masked,
                    VisualState::SHOWN,
                    timing.duration_ms,
                    timing.easing,
                    Position::At(0.0),
                );
                continue;
            }
            timeline.from_to(
                target,
                faded,
                VisualState::SHOWN,
                timing.duration_ms,
                timing.easing,
                next,
            );
            next = Position::WithPrevious(timing.stagger_ms);
        }
        timeline.on_first_commit(on_first_commit);
    }
}
