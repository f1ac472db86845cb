//! Element groups and references to their render targets
//!
//! A mounted panel owns one [`RenderTarget`] per rendered group. Everything
//! else (the controller, handlers, timelines) only ever sees an
//! [`ElementRef`], a weak handle that stops accepting writes once the panel
//! has torn its targets down.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use cue_animation::{AnimationTarget, VisualState};

/// One of the three animatable regions of a panel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementGroup {
    Heading,
    Content,
    Actions,
}

impl ElementGroup {
    /// All groups, in entrance order
    pub const ALL: [ElementGroup; 3] = [
        ElementGroup::Heading,
        ElementGroup::Content,
        ElementGroup::Actions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementGroup::Heading => "heading",
            ElementGroup::Content => "content",
            ElementGroup::Actions => "actions",
        }
    }

    /// Whether dispatch requires this group to be bound
    pub fn is_required(&self) -> bool {
        !matches!(self, ElementGroup::Actions)
    }
}

impl fmt::Display for ElementGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The live render target of one element group
pub struct RenderTarget {
    group: ElementGroup,
    visual: Cell<VisualState>,
    writes: Cell<u32>,
}

impl RenderTarget {
    pub fn new(group: ElementGroup) -> Rc<Self> {
        Rc::new(Self {
            group,
            visual: Cell::new(VisualState::SHOWN),
            writes: Cell::new(0),
        })
    }

    pub fn group(&self) -> ElementGroup {
        self.group
    }

    /// Inline visual state last written by an animation
    pub fn visual(&self) -> VisualState {
        self.visual.get()
    }

    /// Number of animation writes received
    pub fn write_count(&self) -> u32 {
        self.writes.get()
    }

    /// Whether an animation has taken over this target's presentation
    pub fn is_animated(&self) -> bool {
        self.writes.get() > 0
    }

    fn write(&self, state: &VisualState) {
        self.visual.set(*state);
        self.writes.set(self.writes.get().saturating_add(1));
    }
}

impl fmt::Debug for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderTarget")
            .field("group", &self.group)
            .field("visual", &self.visual.get())
            .field("writes", &self.writes.get())
            .finish()
    }
}

/// Weak reference to a group's render target
#[derive(Clone)]
pub struct ElementRef {
    group: ElementGroup,
    target: Weak<RenderTarget>,
}

impl ElementRef {
    pub fn new(target: &Rc<RenderTarget>) -> Self {
        Self {
            group: target.group,
            target: Rc::downgrade(target),
        }
    }

    pub fn group(&self) -> ElementGroup {
        self.group
    }

    /// Whether the render target is still attached
    pub fn is_live(&self) -> bool {
        self.target.strong_count() > 0
    }
}

impl AnimationTarget for ElementRef {
    fn apply(&self, state: &VisualState) -> bool {
        match self.target.upgrade() {
            Some(target) => {
                target.write(state);
                true
            }
            None => false,
        }
    }

    fn label(&self) -> &str {
        self.group.as_str()
    }
}

impl fmt::Debug for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("group", &self.group)
            .field("live", &self.is_live())
            .finish()
    }
}

/// References to the heading, content and actions groups
///
/// Any of them may be unbound; `actions` is absent whenever the panel renders
/// no call-to-action buttons.
#[derive(Clone, Debug, Default)]
pub struct ElementGroupRefs {
    pub heading: Option<ElementRef>,
    pub content: Option<ElementRef>,
    pub actions: Option<ElementRef>,
}

impl ElementGroupRefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a render target into the slot of its group
    pub fn bind(&mut self, target: &Rc<RenderTarget>) {
        let slot = match target.group() {
            ElementGroup::Heading => &mut self.heading,
            ElementGroup::Content => &mut self.content,
            ElementGroup::Actions => &mut self.actions,
        };
        *slot = Some(ElementRef::new(target));
    }

    pub fn get(&self, group: ElementGroup) -> Option<&ElementRef> {
        match group {
            ElementGroup::Heading => self.heading.as_ref(),
            ElementGroup::Content => self.content.as_ref(),
            ElementGroup::Actions => self.actions.as_ref(),
        }
    }

    /// Whether `group` is bound to a live target
    pub fn is_resolved(&self, group: ElementGroup) -> bool {
        self.get(group).is_some_and(ElementRef::is_live)
    }

    /// First required group that is not resolved
    pub fn missing_required(&self) -> Option<ElementGroup> {
        ElementGroup::ALL
            .into_iter()
            .filter(ElementGroup::is_required)
            .find(|g| !self.is_resolved(*g))
    }

    /// A timeline target for `group`, if it is resolved
    ///
    /// Call once per group and reuse the result: steps sharing the same
    /// `Rc` are primed together.
    pub fn target(&self, group: ElementGroup) -> Option<Rc<dyn AnimationTarget>> {
        self.get(group)
            .filter(|r| r.is_live())
            .map(|r| Rc::new(r.clone()) as Rc<dyn AnimationTarget>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_writes_through() {
        let target = RenderTarget::new(ElementGroup::Heading);
        let element = ElementRef::new(&target);
        let hidden = VisualState::SHOWN.with_opacity(0.0);

        assert!(element.apply(&hidden));
        assert_eq!(target.visual(), hidden);
        assert_eq!(target.write_count(), 1);
        assert!(target.is_animated());
    }

    #[test]
    fn test_ref_does_not_keep_target_alive() {
        let target = RenderTarget::new(ElementGroup::Content);
        let element = ElementRef::new(&target);
        assert!(element.is_live());

        drop(target);
        assert!(!element.is_live());
        assert!(!element.apply(&VisualState::SHOWN));
    }

    #[test]
    fn test_missing_required() {
        let heading = RenderTarget::new(ElementGroup::Heading);
        let content = RenderTarget::new(ElementGroup::Content);
        let mut refs = ElementGroupRefs::new();
        assert_eq!(refs.missing_required(), Some(ElementGroup::Heading));

        refs.bind(&heading);
        assert_eq!(refs.missing_required(), Some(ElementGroup::Content));

        refs.bind(&content);
        assert_eq!(refs.missing_required(), None);
        assert!(refs.actions.is_none());
        assert!(refs.target(ElementGroup::Actions).is_none());

        drop(content);
        assert_eq!(refs.missing_required(), Some(ElementGroup::Content));
    }
}
