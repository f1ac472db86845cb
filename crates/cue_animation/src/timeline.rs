//! Single-use timelines
//!
//! A timeline is an ordered list of steps, each interpolating one target from
//! a `from` to a `to` visual state over a window of time. Steps are kept sorted
//! by start time, so within a tick targets are written in sequence order.
//!
//! Playback happens in two phases:
//!
//! 1. **Prime**: on the first tick after [`Timeline::play`], every target is set
//!    to the `from` state of its earliest step. This is the first observable
//!    change the timeline makes, and it fires the first-commit hook.
//! 2. **Advance**: later ticks move the play cursor and interpolate every
//!    step whose window has opened.
//!
//! Once every step has settled the timeline is finished. A finished or killed
//! timeline drops every target it referenced and cannot be played again.
//!
//! ```ignore
//! let mut timeline = Timeline::new();
//! timeline.from_to(heading, hidden, VisualState::SHOWN, 600.0, Easing::Power3Out, Position::At(0.0));
//! timeline.from_to(body, hidden, VisualState::SHOWN, 600.0, Easing::Power3Out, Position::WithPrevious(150.0));
//! timeline.on_first_commit(|| tracing::debug!("entrance committed"));
//! timeline.play()?;
//! ```

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::values::{Interpolate, VisualState};

/// Something a timeline can write visual state into
pub trait AnimationTarget {
    /// Write `state` to the target
    ///
    /// Returns `false` when the target is detached and the write was dropped.
    fn apply(&self, state: &VisualState) -> bool;

    /// Short label used in logs
    fn label(&self) -> &str {
        "target"
    }
}

/// Identifies a step within one timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimelineEntryId(usize);

/// Where a new step starts, in milliseconds
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    /// Absolute offset from the start of the timeline
    At(f32),
    /// Offset from the end of the previously added step (negative overlaps)
    AfterPrevious(f32),
    /// Offset from the start of the previously added step
    WithPrevious(f32),
}

impl Default for Position {
    fn default() -> Self {
        Position::AfterPrevious(0.0)
    }
}

/// Playback state of a timeline
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayState {
    Idle,
    Playing,
    Finished,
    Killed,
}

struct Step {
    id: TimelineEntryId,
    target: Option<Rc<dyn AnimationTarget>>,
    start_ms: f32,
    duration_ms: f32,
    from: VisualState,
    to: VisualState,
    easing: Easing,
    settled: bool,
}

impl Step {
    fn progress_at(&self, cursor_ms: f32) -> f32 {
        if cursor_ms < self.start_ms {
            return 0.0;
        }
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((cursor_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0)
    }
}

type Hook = Box<dyn FnOnce()>;

/// An ordered, single-use sequence of timed visual-state changes
pub struct Timeline {
    steps: SmallVec<[Step; 4]>,
    /// (start, end) of the most recently added step
    last_added: Option<(f32, f32)>,
    next_id: usize,
    cursor_ms: f32,
    state: PlayState,
    primed: bool,
    committed: bool,
    on_first_commit: Option<Hook>,
    on_complete: Option<Hook>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            steps: SmallVec::new(),
            last_added: None,
            next_id: 0,
            cursor_ms: 0.0,
            state: PlayState::Idle,
            primed: false,
            committed: false,
            on_first_commit: None,
            on_complete: None,
        }
    }

    fn resolve(&self, position: Position) -> f32 {
        let start = match (position, self.last_added) {
            (Position::At(ms), _) => ms,
            (Position::AfterPrevious(gap), Some((_, end))) => end + gap,
            (Position::WithPrevious(gap), Some((start, _))) => start + gap,
            (Position::AfterPrevious(gap), None) | (Position::WithPrevious(gap), None) => gap,
        };
        start.max(0.0)
    }

    /// Add a step animating `target` from `from` to `to`
    pub fn from_to(
        &mut self,
        target: Rc<dyn AnimationTarget>,
        from: VisualState,
        to: VisualState,
        duration_ms: f32,
        easing: Easing,
        position: Position,
    ) -> TimelineEntryId {
        let start_ms = self.resolve(position);
        let duration_ms = duration_ms.max(0.0);
        let id = TimelineEntryId(self.next_id);
        self.next_id += 1;

        // Stable insert: equal start times keep insertion order
        let index = self
            .steps
            .iter()
            .position(|s| s.start_ms > start_ms)
            .unwrap_or(self.steps.len());
        self.steps.insert(
            index,
            Step {
                id,
                target: Some(target),
                start_ms,
                duration_ms,
                from,
                to,
                easing,
                settled: false,
            },
        );
        self.last_added = Some((start_ms, start_ms + duration_ms));
        id
    }

    /// Add the same step for several targets, each starting `interval_ms`
    /// after the previous one
    pub fn stagger<I>(
        &mut self,
        targets: I,
        from: VisualState,
        to: VisualState,
        duration_ms: f32,
        easing: Easing,
        interval_ms: f32,
        position: Position,
    ) -> SmallVec<[TimelineEntryId; 4]>
    where
        I: IntoIterator<Item = Rc<dyn AnimationTarget>>,
    {
        let mut ids = SmallVec::new();
        for (i, target) in targets.into_iter().enumerate() {
            let at = if i == 0 {
                position
            } else {
                Position::WithPrevious(interval_ms)
            };
            ids.push(self.from_to(target, from, to, duration_ms, easing, at));
        }
        ids
    }

    /// Run `f` once, right after playback makes its first write
    pub fn on_first_commit<F>(&mut self, f: F)
    where
        F: FnOnce() + 'static,
    {
        self.on_first_commit = Some(Box::new(f));
    }

    /// Run `f` once, when every step has settled
    pub fn on_complete<F>(&mut self, f: F)
    where
        F: FnOnce() + 'static,
    {
        self.on_complete = Some(Box::new(f));
    }

    /// Start playback
    ///
    /// Playing an already playing timeline is a no-op. A finished or killed
    /// timeline is spent.
    pub fn play(&mut self) -> Result<()> {
        match self.state {
            PlayState::Idle => {
                self.state = PlayState::Playing;
                Ok(())
            }
            PlayState::Playing => Ok(()),
            PlayState::Finished | PlayState::Killed => Err(AnimationError::TimelineSpent),
        }
    }

    /// Stop playback for good and release every target
    ///
    /// Hooks that have not fired yet never will.
    pub fn kill(&mut self) {
        if matches!(self.state, PlayState::Finished | PlayState::Killed) {
            return;
        }
        tracing::debug!(
            "Timeline killed at {:.1}ms (committed={})",
            self.cursor_ms,
            self.committed
        );
        self.state = PlayState::Killed;
        self.release();
    }

    /// Advance playback by `dt_ms`
    ///
    /// The first tick after `play()` primes the targets and does not move the
    /// cursor. Returns true while the timeline is still playing.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if self.state != PlayState::Playing {
            return false;
        }

        let mut wrote = false;
        if self.primed {
            self.cursor_ms += dt_ms.max(0.0);
        } else {
            self.primed = true;
            wrote |= self.prime();
        }
        wrote |= self.apply_at_cursor();

        if wrote && !self.committed {
            self.committed = true;
            tracing::trace!("Timeline first commit at {:.1}ms", self.cursor_ms);
            if let Some(hook) = self.on_first_commit.take() {
                hook();
            }
        }

        if self.steps.iter().all(|s| s.settled) {
            self.finish();
            return false;
        }
        true
    }

    fn prime(&mut self) -> bool {
        let mut seen: SmallVec<[*const (); 4]> = SmallVec::new();
        let mut wrote = false;
        for step in &self.steps {
            let Some(target) = &step.target else {
                continue;
            };
            let key = Rc::as_ptr(target) as *const ();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            if target.apply(&step.from) {
                wrote = true;
            } else {
                tracing::trace!("Timeline prime skipped detached {}", target.label());
            }
        }
        wrote
    }

    fn apply_at_cursor(&mut self) -> bool {
        let cursor = self.cursor_ms;
        let mut wrote = false;
        for step in self.steps.iter_mut() {
            if step.settled || cursor < step.start_ms {
                continue;
            }
            let progress = step.progress_at(cursor);
            let state = step.from.lerp(&step.to, step.easing.apply(progress));
            if let Some(target) = &step.target {
                wrote |= target.apply(&state);
            }
            if progress >= 1.0 {
                step.settled = true;
            }
        }
        wrote
    }

    fn finish(&mut self) {
        self.state = PlayState::Finished;
        tracing::debug!(
            "Timeline finished: {} steps over {:.1}ms",
            self.steps.len(),
            self.cursor_ms
        );
        let on_complete = self.on_complete.take();
        self.release();
        if let Some(hook) = on_complete {
            hook();
        }
    }

    fn release(&mut self) {
        for step in self.steps.iter_mut() {
            step.target = None;
        }
        self.on_first_commit = None;
        self.on_complete = None;
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    /// Whether playback has made its first write
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Whether any step still references a target
    pub fn holds_targets(&self) -> bool {
        self.steps.iter().any(|s| s.target.is_some())
    }

    pub fn cursor_ms(&self) -> f32 {
        self.cursor_ms
    }

    /// Total length: the latest step end
    pub fn duration_ms(&self) -> f32 {
        self.steps
            .iter()
            .map(|s| s.start_ms + s.duration_ms)
            .fold(0.0, f32::max)
    }

    /// Overall progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        match self.state {
            PlayState::Finished => 1.0,
            _ => {
                let duration = self.duration_ms();
                if duration <= 0.0 {
                    0.0
                } else {
                    (self.cursor_ms / duration).clamp(0.0, 1.0)
                }
            }
        }
    }

    /// Start time of a step, if it belongs to this timeline
    pub fn entry_start(&self, id: TimelineEntryId) -> Option<f32> {
        self.steps.iter().find(|s| s.id == id).map(|s| s.start_ms)
    }

    /// Progress of a single step (0.0 to 1.0)
    pub fn entry_progress(&self, id: TimelineEntryId) -> Option<f32> {
        self.steps
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.progress_at(self.cursor_ms))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("steps", &self.steps.len())
            .field("cursor_ms", &self.cursor_ms)
            .field("state", &self.state)
            .field("committed", &self.committed)
            .finish()
    }
}
