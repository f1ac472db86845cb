//! Content panel component
//!
//! Ties content, layout and entrance orchestration together across the
//! component lifecycle:
//!
//! - `render()` produces the layout plus a presentation hint per group
//! - `mount()` attaches render targets, binds refs and runs the entrance check
//! - `unmount()` tears the controller down and detaches every target
//!
//! Each mount gets its own controller and run guard; nothing carries over
//! from one mount to the next.
//!
//! ```ignore
//! let mut panel = ContentPanel::new(Some(content), scheduler.handle(), EntranceConfig::default());
//! let first = panel.render();      // hidden-by-default if an entrance will play
//! panel.mount();                    // entrance dispatches after the delay
//! ```

use std::rc::Rc;

use cue_animation::{SchedulerHandle, VisualState};

use crate::config::EntranceConfig;
use crate::content::PanelContent;
use crate::controller::{EntranceController, EntranceRequest, MountOutcome};
use crate::direction::{Direction, TextDirection};
use crate::element::{ElementGroup, ElementGroupRefs, RenderTarget};
use crate::layout::PanelLayout;
use crate::registry::AnimationName;

/// Presentation of one element group for the current render
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupPresentation {
    pub group: ElementGroup,
    /// Hidden-by-default styling is in force
    pub hidden: bool,
    /// Inline state written by the entrance, `SHOWN` if none
    pub visual: VisualState,
}

impl GroupPresentation {
    pub fn effective_opacity(&self) -> f32 {
        if self.hidden {
            0.0
        } else {
            self.visual.opacity
        }
    }
}

/// Output of one render pass
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedPanel {
    pub layout: PanelLayout,
    /// Styling hint for the groups and every CTA inside them
    pub hide_initially: bool,
    pub groups: Vec<GroupPresentation>,
}

impl RenderedPanel {
    pub fn group(&self, group: ElementGroup) -> Option<&GroupPresentation> {
        self.groups.iter().find(|g| g.group == group)
    }
}

/// A content panel with a one-shot entrance
pub struct ContentPanel {
    content: Option<PanelContent>,
    document_direction: TextDirection,
    scheduler: SchedulerHandle,
    config: EntranceConfig,
    controller: EntranceController,
    targets: Vec<Rc<RenderTarget>>,
    mounted: bool,
}

impl ContentPanel {
    pub fn new(
        content: Option<PanelContent>,
        scheduler: SchedulerHandle,
        config: EntranceConfig,
    ) -> Self {
        let controller = EntranceController::new(scheduler.clone(), config.clone());
        Self {
            content,
            document_direction: TextDirection::Ltr,
            scheduler,
            config,
            controller,
            targets: Vec::new(),
            mounted: false,
        }
    }

    pub fn with_document_direction(mut self, direction: TextDirection) -> Self {
        self.document_direction = direction;
        self
    }

    pub fn content(&self) -> Option<&PanelContent> {
        self.content.as_ref()
    }

    pub fn animation(&self) -> Option<AnimationName> {
        self.content.as_ref().and_then(PanelContent::animation_name)
    }

    pub fn layout(&self) -> Option<PanelLayout> {
        self.content.as_ref().map(PanelLayout::compose)
    }

    pub fn controller(&self) -> &EntranceController {
        &self.controller
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Render target of `group` while mounted
    pub fn target(&self, group: ElementGroup) -> Option<&Rc<RenderTarget>> {
        self.targets.iter().find(|t| t.group() == group)
    }

    /// Render the panel; `None` when there is no content
    pub fn render(&self) -> Option<RenderedPanel> {
        let layout = self.layout()?;
        let hide_initially = self
            .controller
            .visibility(self.animation())
            .should_hide_initially();

        let groups = layout
            .groups()
            .into_iter()
            .map(|group| GroupPresentation {
                group,
                hidden: hide_initially,
                visual: self
                    .target(group)
                    .map(|t| t.visual())
                    .unwrap_or(VisualState::SHOWN),
            })
            .collect();

        Some(RenderedPanel {
            layout,
            hide_initially,
            groups,
        })
    }

    /// Attach render targets and run the entrance check
    ///
    /// Only the first check of a mount decides. Calling it again while
    /// mounted re-syncs targets and skips the entrance, whether the first
    /// check scheduled it, played it, or gave up on it.
    pub fn mount(&mut self) -> MountOutcome {
        if !self.mounted {
            if self.controller.is_torn_down() {
                self.controller =
                    EntranceController::new(self.scheduler.clone(), self.config.clone());
            }
            self.mounted = true;
            tracing::debug!("ContentPanel mounted");
        }
        self.sync_targets();

        let mut refs = ElementGroupRefs::new();
        for target in &self.targets {
            refs.bind(target);
        }
        let force_ltr = self.content.as_ref().is_some_and(|c| c.force_ltr);
        self.controller.mount(EntranceRequest {
            animation: self.animation(),
            direction: Direction::new(force_ltr, self.document_direction),
            refs,
        })
    }

    /// Replace the content and re-render
    ///
    /// While mounted, targets follow the new layout: groups that appear get a
    /// target, groups that disappear lose theirs. A pending dispatch sees the
    /// change when it fires and aborts if a required group went away. New
    /// content never earns the mount a second entrance attempt.
    pub fn set_content(&mut self, content: Option<PanelContent>) -> Option<RenderedPanel> {
        self.content = content;
        if self.mounted {
            self.sync_targets();
        }
        self.render()
    }

    /// Tear down the entrance and detach every render target
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.controller.teardown();
        self.targets.clear();
        self.mounted = false;
        tracing::debug!("ContentPanel unmounted");
    }

    fn sync_targets(&mut self) {
        let groups = self.layout().map(|l| l.groups()).unwrap_or_default();
        self.targets.retain(|t| groups.contains(&t.group()));
        for group in groups {
            if self.target(group).is_none() {
                self.targets.push(RenderTarget::new(group));
            }
        }
    }
}

impl Drop for ContentPanel {
    fn drop(&mut self) {
        self.unmount();
    }
}
