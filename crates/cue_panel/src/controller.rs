//! Entrance orchestration
//!
//! The [`EntranceController`] belongs to one mounted panel. On mount it checks
//! whether an entrance should run, and if so schedules a dispatch after the
//! configured delay. When the dispatch fires it re-checks the run guard,
//! resolves the handler, builds a fresh timeline and hands it to the
//! scheduler. The handler's first commit consumes the guard.
//!
//! A mount gets one attempt. Once the check has scheduled a dispatch or given
//! up, later checks on the same controller skip; a dispatch that aborts is
//! never retried, and content revealed by a bypass stays revealed.
//!
//! Every reason not to animate is a silent skip. The one condition that is
//! logged as an error is a dispatch firing for a controller that has already
//! been torn down, which means a cancellation went missing.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use cue_animation::{ScheduledTask, SchedulerHandle, Timeline, TimelineId};

use crate::config::{EntranceConfig, HandlerTiming};
use crate::direction::Direction;
use crate::element::{ElementGroup, ElementGroupRefs};
use crate::guard::{GuardState, RunGuard, WeakRunGuard};
use crate::registry::{AnimationName, AnimationRegistry};
use crate::visibility::InitialVisibility;

/// Inputs for one mount check
#[derive(Clone, Debug, Default)]
pub struct EntranceRequest {
    pub animation: Option<AnimationName>,
    pub direction: Direction,
    pub refs: ElementGroupRefs,
}

/// Why a mount check did not schedule anything
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// No animation configured, or the configured name is not registered
    NoAnimation,
    /// A required group is not bound to a live target
    Unresolved(ElementGroup),
    /// The run guard has already been consumed
    AlreadyPlayed,
    /// A dispatch is already pending or its sequence is playing
    AlreadyScheduled,
    /// This mount already scheduled or gave up on its one attempt
    AlreadyAttempted,
    /// The controller has been torn down
    TornDown,
    /// The scheduler behind the handle is gone
    SchedulerGone,
}

/// Result of a mount check
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MountOutcome {
    Scheduled { due_ms: f64 },
    Skipped(SkipReason),
}

impl MountOutcome {
    pub fn is_scheduled(&self) -> bool {
        matches!(self, MountOutcome::Scheduled { .. })
    }
}

/// What a deferred dispatch did when it fired
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler ran and its timeline is playing
    Started,
    /// The guard was consumed in the meantime
    GuardConsumed,
    /// A required group detached during the delay
    Unresolved(ElementGroup),
    /// The timeline could not be handed to the scheduler
    SchedulerGone,
}

/// State shared between the controller and its deferred dispatch
#[derive(Debug, Default)]
struct EntranceState {
    torn_down: Cell<bool>,
    /// Set once the mount check has decided; never cleared
    attempted: Cell<bool>,
    bypassed: Cell<bool>,
    invocations: Cell<u32>,
    running: Cell<Option<TimelineId>>,
    last_dispatch: Cell<Option<DispatchOutcome>>,
}

impl EntranceState {
    fn record(&self, outcome: DispatchOutcome) {
        self.last_dispatch.set(Some(outcome));
    }

    fn bypass(&self) {
        self.attempted.set(true);
        self.bypassed.set(true);
    }
}

/// Everything a deferred dispatch needs, held weakly where it points back
/// into the panel
struct Dispatch {
    name: AnimationName,
    direction: Direction,
    timing: HandlerTiming,
    refs: ElementGroupRefs,
    guard: WeakRunGuard,
    state: Weak<EntranceState>,
    scheduler: SchedulerHandle,
}

impl Dispatch {
    fn fire(self) {
        let Some(state) = self.state.upgrade() else {
            tracing::error!(
                "Entrance '{}' dispatched after its controller was dropped; the pending task was not cancelled",
                self.name
            );
            return;
        };
        if state.torn_down.get() {
            tracing::error!(
                "Entrance '{}' dispatched after teardown; the pending task was not cancelled",
                self.name
            );
            return;
        }
        let Some(guard) = self.guard.upgrade() else {
            tracing::error!("Entrance '{}' dispatched without a run guard", self.name);
            return;
        };

        // Re-check right before invoking the handler: no suspension point
        // separates this check from the guard flip below
        if !guard.is_eligible() {
            tracing::debug!("Entrance '{}' skipped at dispatch: already played", self.name);
            state.record(DispatchOutcome::GuardConsumed);
            return;
        }
        if let Some(group) = self.refs.missing_required() {
            tracing::debug!(
                "Entrance '{}' skipped at dispatch: {} detached",
                self.name,
                group
            );
            state.bypass();
            state.record(DispatchOutcome::Unresolved(group));
            return;
        }

        let handler = AnimationRegistry::lookup(self.name);
        let mut timeline = Timeline::new();
        let commit_guard = guard.downgrade();
        let name = self.name;
        handler.run(
            &self.refs,
            &mut timeline,
            self.direction,
            &self.timing,
            Box::new(move || {
                if let Some(guard) = commit_guard.upgrade() {
                    if guard.consume() {
                        tracing::debug!("Entrance '{}' committed; run guard consumed", name);
                    }
                }
            }),
        );
        state.invocations.set(state.invocations.get() + 1);

        let finished = Rc::downgrade(&state);
        timeline.on_complete(move || {
            if let Some(state) = finished.upgrade() {
                state.running.set(None);
            }
        });

        match self.scheduler.play_timeline(timeline) {
            Ok(id) => {
                tracing::debug!("Entrance '{}' started", self.name);
                state.running.set(Some(id));
                state.record(DispatchOutcome::Started);
            }
            Err(err) => {
                tracing::warn!("Entrance '{}' could not start: {}", self.name, err);
                state.bypass();
                state.record(DispatchOutcome::SchedulerGone);
            }
        }
    }
}

/// One-shot entrance orchestration for a mounted panel
pub struct EntranceController {
    guard: RunGuard,
    scheduler: SchedulerHandle,
    config: EntranceConfig,
    state: Rc<EntranceState>,
    pending: Option<ScheduledTask>,
}

impl EntranceController {
    pub fn new(scheduler: SchedulerHandle, config: EntranceConfig) -> Self {
        Self {
            guard: RunGuard::new(),
            scheduler,
            config,
            state: Rc::new(EntranceState::default()),
            pending: None,
        }
    }

    /// Run the mount check and, if it passes, schedule the dispatch
    ///
    /// Safe to call on every render: only the first call that gets past the
    /// guard decides anything. Later calls skip, whether that first call
    /// scheduled a dispatch or gave up.
    pub fn mount(&mut self, request: EntranceRequest) -> MountOutcome {
        let outcome = self.check_and_schedule(request);
        if let MountOutcome::Skipped(reason) = outcome {
            tracing::debug!("Entrance skipped on mount: {:?}", reason);
        }
        outcome
    }

    fn check_and_schedule(&mut self, request: EntranceRequest) -> MountOutcome {
        if self.state.torn_down.get() {
            return MountOutcome::Skipped(SkipReason::TornDown);
        }
        if !self.guard.is_eligible() {
            return MountOutcome::Skipped(SkipReason::AlreadyPlayed);
        }
        if self.is_pending() || self.is_running() {
            return MountOutcome::Skipped(SkipReason::AlreadyScheduled);
        }
        if self.state.attempted.get() {
            return MountOutcome::Skipped(SkipReason::AlreadyAttempted);
        }
        let Some(name) = request.animation else {
            self.state.bypass();
            return MountOutcome::Skipped(SkipReason::NoAnimation);
        };
        if let Some(group) = request.refs.missing_required() {
            self.state.bypass();
            return MountOutcome::Skipped(SkipReason::Unresolved(group));
        }

        let dispatch = Dispatch {
            name,
            direction: request.direction,
            timing: self.config.timing_for(name).clone(),
            refs: request.refs,
            guard: self.guard.downgrade(),
            state: Rc::downgrade(&self.state),
            scheduler: self.scheduler.clone(),
        };
        match self
            .scheduler
            .schedule_after(self.config.delay_ms, "entrance", move || dispatch.fire())
        {
            Ok(task) => {
                let due_ms = task.due_ms();
                self.pending = Some(task);
                self.state.attempted.set(true);
                MountOutcome::Scheduled { due_ms }
            }
            Err(_) => {
                self.state.bypass();
                MountOutcome::Skipped(SkipReason::SchedulerGone)
            }
        }
    }

    /// Cancel any pending dispatch and kill a playing sequence
    ///
    /// After teardown the controller never acts again.
    pub fn teardown(&mut self) {
        if self.state.torn_down.replace(true) {
            return;
        }
        if let Some(mut task) = self.pending.take() {
            if task.cancel() {
                tracing::debug!("Entrance dispatch cancelled before it fired");
            }
        }
        if let Some(id) = self.state.running.take() {
            self.scheduler.kill_timeline(id);
        }
    }

    pub fn guard_state(&self) -> GuardState {
        self.guard.state()
    }

    /// Whether the entrance has made its first commit
    pub fn has_played(&self) -> bool {
        self.guard.state() == GuardState::Consumed
    }

    /// Whether a dispatch is waiting for its delay
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(ScheduledTask::is_pending)
    }

    /// Whether a dispatched sequence is still playing
    pub fn is_running(&self) -> bool {
        self.state
            .running
            .get()
            .is_some_and(|id| self.scheduler.is_timeline_playing(id))
    }

    /// Whether this mount gave up on animating
    pub fn is_bypassed(&self) -> bool {
        self.state.bypassed.get()
    }

    /// Whether this mount has used its one attempt
    pub fn is_attempted(&self) -> bool {
        self.state.attempted.get()
    }

    pub fn is_torn_down(&self) -> bool {
        self.state.torn_down.get()
    }

    /// Number of handler invocations so far
    pub fn invocations(&self) -> u32 {
        self.state.invocations.get()
    }

    pub fn last_dispatch(&self) -> Option<DispatchOutcome> {
        self.state.last_dispatch.get()
    }

    pub fn config(&self) -> &EntranceConfig {
        &self.config
    }

    /// Visibility hint for a panel configured with `animation`
    pub fn visibility(&self, animation: Option<AnimationName>) -> InitialVisibility {
        InitialVisibility {
            animation_configured: animation.is_some(),
            guard: self.guard.state(),
            bypassed: self.is_bypassed(),
        }
    }
}

impl Drop for EntranceController {
    fn drop(&mut self) {
        self.teardown();
    }
}
