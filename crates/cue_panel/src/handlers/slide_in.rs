use cue_animation::{Position, Timeline, VisualState};

use super::{group_targets, AnimationHandler, FirstCommit};
use crate::config::HandlerTiming;
use crate::direction::Direction;
use crate::element::ElementGroupRefs;
use crate::registry::AnimationName;

/// Slide each group in from the inline start edge
///
/// The start edge is mirrored for right-to-left documents unless the panel
/// forces LTR.
pub struct SlideIn;

impl AnimationHandler for SlideIn {
    fn name(&self) -> AnimationName {
        AnimationName::SlideIn
    }

    fn run(
        &self,
        refs: &ElementGroupRefs,
        timeline: &mut Timeline,
        direction: Direction,
        timing: &HandlerTiming,
        on_first_commit: FirstCommit,
    ) {
        let offset = -timing.distance * direction.inline_sign();
        let hidden = VisualState::SHOWN.with_opacity(0.0).with_translate_x(offset);

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::TextDirection;
    use crate::element::{ElementGroup, RenderTarget};

    fn primed_offset(direction: Direction) -> f32 {
        let heading = RenderTarget::new(ElementGroup::Heading);
        let content = RenderTarget::new(ElementGroup::Content);
        let mut refs = ElementGroupRefs::new();
        refs.bind(&heading);
        refs.bind(&content);

        let mut timeline = Timeline::new();
        SlideIn.run(
            &refs,
            &mut timeline,
            direction,
            &HandlerTiming::default(),
            Box::new(|| {}),
        );
        timeline.play().unwrap();
        timeline.tick(0.0);
        heading.visual().translate_x
    }

    #[test]
    fn test_offset_follows_direction() {
        let ltr = primed_offset(Direction::new(false, TextDirection::Ltr));
        let rtl = primed_offset(Direction::new(false, TextDirection::Rtl));
        let forced = primed_offset(Direction::new(true, TextDirection::Rtl));

        assert!(ltr < 0.0);
        assert_eq!(rtl, -ltr);
        assert_eq!(forced, ltr);
    }
}
