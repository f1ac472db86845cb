//! Animation scheduler
//!
//! The cooperative event loop the entrance machinery runs on. A scheduler
//! owns a virtual clock, a queue of deferred tasks and the set of playing
//! timelines; every `tick(dt_ms)` advances the clock, runs the tasks that came
//! due (in due-time order), then advances every timeline.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`). Components hold a
//! [`SchedulerHandle`], a weak reference that no-ops once the scheduler is gone.
//!
//! Deferred work is represented by a [`ScheduledTask`] handle. Dropping the
//! handle cancels the task, so an owner that goes away can never be called
//! back by work it scheduled.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};

use crate::error::{AnimationError, Result};
use crate::timeline::Timeline;

new_key_type! {
    /// Handle to a timeline owned by the scheduler
    pub struct TimelineId;
    /// Handle to a deferred task
    pub struct TaskId;
}

struct DeferredTask {
    due_ms: f64,
    seq: u64,
    label: &'static str,
    run: Box<dyn FnOnce()>,
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    /// `None` while the timeline is being ticked outside the borrow
    timelines: SlotMap<TimelineId, Option<Timeline>>,
    tasks: SlotMap<TaskId, DeferredTask>,
    now_ms: f64,
    next_seq: u64,
}

/// The scheduler that runs deferred tasks and ticks timelines
///
/// ```ignore
/// let scheduler = AnimationScheduler::new();
/// let handle = scheduler.handle();
///
/// let task = handle.schedule_after(500, "entrance", || start_entrance())?;
/// scheduler.tick(16.0); // called once per frame by the host loop
/// ```
pub struct AnimationScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(SchedulerInner {
                timelines: SlotMap::with_key(),
                tasks: SlotMap::with_key(),
                now_ms: 0.0,
                next_seq: 0,
            })),
        }
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current scheduler clock in milliseconds
    pub fn now_ms(&self) -> f64 {
        self.inner.borrow().now_ms
    }

    /// Advance the clock by `dt_ms`, run due tasks, then tick timelines
    ///
    /// Returns true if there is still work (pending tasks or playing timelines).
    pub fn tick(&self, dt_ms: f32) -> bool {
        let now = {
            let mut inner = self.inner.borrow_mut();
            inner.now_ms += f64::from(dt_ms.max(0.0));
            inner.now_ms
        };

        self.run_due_tasks(now);
        self.tick_timelines(dt_ms.max(0.0));

        self.has_active_work()
    }

    /// Tick in `frame_ms` steps until `total_ms` has elapsed
    ///
    /// The last frame is shortened so the clock lands exactly on
    /// `now + total_ms`.
    pub fn advance(&self, total_ms: f32, frame_ms: f32) {
        let frame_ms = if frame_ms > 0.0 { frame_ms } else { total_ms };
        let mut remaining = total_ms.max(0.0);
        while remaining > 0.0 {
            let dt = frame_ms.min(remaining);
            self.tick(dt);
            remaining -= dt;
        }
    }

    fn run_due_tasks(&self, now: f64) {
        loop {
            // Pop one task at a time: a task may schedule or cancel others
            let next = {
                let mut inner = self.inner.borrow_mut();
                let due = inner
                    .tasks
                    .iter()
                    .filter(|(_, t)| t.due_ms <= now)
                    .min_by(|(_, a), (_, b)| {
                        a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq))
                    })
                    .map(|(id, _)| id);
                due.and_then(|id| inner.tasks.remove(id))
            };

            let Some(task) = next else {
                break;
            };
            tracing::trace!(
                "AnimationScheduler: running task '{}' (due {:.1}ms, now {:.1}ms)",
                task.label,
                task.due_ms,
                now
            );
            (task.run)();
        }
    }

    fn tick_timelines(&self, dt_ms: f32) {
        let ids: Vec<TimelineId> = self.inner.borrow().timelines.keys().collect();

        for id in ids {
            let taken = self
                .inner
                .borrow_mut()
                .timelines
                .get_mut(id)
                .and_then(Option::take);
            let Some(mut timeline) = taken else {
                continue;
            };

            // No borrow is held here: hooks may call back into the scheduler
            let playing = timeline.tick(dt_ms);

            let mut inner = self.inner.borrow_mut();
            if !inner.timelines.contains_key(id) {
                // Killed from one of its own hooks
                drop(inner);
                timeline.kill();
            } else if playing {
                if let Some(slot) = inner.timelines.get_mut(id) {
                    *slot = Some(timeline);
                }
            } else {
                inner.timelines.remove(id);
            }
        }
    }

    fn schedule(
        &self,
        delay_ms: u32,
        label: &'static str,
        run: Box<dyn FnOnce()>,
    ) -> ScheduledTask {
        let mut inner = self.inner.borrow_mut();
        let due_ms = inner.now_ms + f64::from(delay_ms);
        let seq = inner.next_seq;
        inner.next_seq += 1;
        let id = inner.tasks.insert(DeferredTask {
            due_ms,
            seq,
            label,
            run,
        });
        tracing::debug!(
            "AnimationScheduler: scheduled '{}' for {:.1}ms",
            label,
            due_ms
        );
        ScheduledTask {
            id: Some(id),
            due_ms,
            handle: self.handle(),
        }
    }

    /// Run `f` once the clock reaches `now + delay_ms`
    pub fn schedule_after<F>(&self, delay_ms: u32, label: &'static str, f: F) -> ScheduledTask
    where
        F: FnOnce() + 'static,
    {
        self.schedule(delay_ms, label, Box::new(f))
    }

    /// Start playing a timeline; it is ticked from the next `tick()` on
    pub fn play_timeline(&self, mut timeline: Timeline) -> Result<TimelineId> {
        timeline.play()?;
        Ok(self.inner.borrow_mut().timelines.insert(Some(timeline)))
    }

    /// Kill a timeline and release its targets
    pub fn kill_timeline(&self, id: TimelineId) {
        let removed = self.inner.borrow_mut().timelines.remove(id);
        if let Some(Some(mut timeline)) = removed {
            timeline.kill();
        }
    }

    pub fn is_timeline_playing(&self, id: TimelineId) -> bool {
        self.inner.borrow().timelines.contains_key(id)
    }

    fn cancel_task(&self, id: TaskId) -> bool {
        let removed = self.inner.borrow_mut().tasks.remove(id);
        if let Some(task) = &removed {
            tracing::debug!("AnimationScheduler: cancelled '{}'", task.label);
        }
        removed.is_some()
    }

    fn is_task_pending(&self, id: TaskId) -> bool {
        self.inner.borrow().tasks.contains_key(id)
    }

    /// Check if any timelines are playing or tasks are pending
    pub fn has_active_work(&self) -> bool {
        let inner = self.inner.borrow();
        !inner.timelines.is_empty() || !inner.tasks.is_empty()
    }

    /// Get the number of playing timelines
    pub fn timeline_count(&self) -> usize {
        self.inner.borrow().timelines.len()
    }

    /// Get the number of pending deferred tasks
    pub fn pending_task_count(&self) -> usize {
        self.inner.borrow().tasks.len()
    }

    /// Due time of the earliest pending task
    pub fn next_due_ms(&self) -> Option<f64> {
        self.inner
            .borrow()
            .tasks
            .values()
            .map(|t| t.due_ms)
            .min_by(f64::total_cmp)
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("AnimationScheduler")
            .field("now_ms", &inner.now_ms)
            .field("timelines", &inner.timelines.len())
            .field("tasks", &inner.tasks.len())
            .finish()
    }
}

/// Weak handle to an [`AnimationScheduler`]
///
/// Cheap to clone. Every operation fails with [`AnimationError::SchedulerGone`]
/// or quietly no-ops once the scheduler has been dropped.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<RefCell<SchedulerInner>>,
}

impl SchedulerHandle {
    fn upgrade(&self) -> Option<AnimationScheduler> {
        self.inner
            .upgrade()
            .map(|inner| AnimationScheduler { inner })
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn now_ms(&self) -> Option<f64> {
        self.upgrade().map(|s| s.now_ms())
    }

    /// Run `f` once the scheduler clock reaches `now + delay_ms`
    pub fn schedule_after<F>(
        &self,
        delay_ms: u32,
        label: &'static str,
        f: F,
    ) -> Result<ScheduledTask>
    where
        F: FnOnce() + 'static,
    {
        let scheduler = self.upgrade().ok_or(AnimationError::SchedulerGone)?;
        Ok(scheduler.schedule_after(delay_ms, label, f))
    }

    /// Start playing a timeline on the scheduler
    pub fn play_timeline(&self, timeline: Timeline) -> Result<TimelineId> {
        let scheduler = self.upgrade().ok_or(AnimationError::SchedulerGone)?;
        scheduler.play_timeline(timeline)
    }

    /// Kill a timeline (no-op if it already finished or the scheduler is gone)
    pub fn kill_timeline(&self, id: TimelineId) {
        if let Some(scheduler) = self.upgrade() {
            scheduler.kill_timeline(id);
        }
    }

    pub fn is_timeline_playing(&self, id: TimelineId) -> bool {
        self.upgrade()
            .map(|s| s.is_timeline_playing(id))
            .unwrap_or(false)
    }
}

impl fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Owner of a deferred task; cancels the task when dropped
#[must_use = "dropping a ScheduledTask cancels it"]
pub struct ScheduledTask {
    id: Option<TaskId>,
    due_ms: f64,
    handle: SchedulerHandle,
}

impl ScheduledTask {
    /// Scheduler time at which the task runs
    pub fn due_ms(&self) -> f64 {
        self.due_ms
    }

    /// Whether the task is still waiting to run
    pub fn is_pending(&self) -> bool {
        match (self.id, self.handle.upgrade()) {
            (Some(id), Some(scheduler)) => scheduler.is_task_pending(id),
            _ => false,
        }
    }

    /// Cancel the task; returns true if it had not run yet
    pub fn cancel(&mut self) -> bool {
        match (self.id.take(), self.handle.upgrade()) {
            (Some(id), Some(scheduler)) => scheduler.cancel_task(id),
            _ => false,
        }
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for ScheduledTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledTask")
            .field("due_ms", &self.due_ms)
            .field("pending", &self.is_pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::timeline::{AnimationTarget, Position};
    use crate::values::VisualState;
    use std::cell::Cell;

    struct Counter(Cell<u32>);

    impl AnimationTarget for Counter {
        fn apply(&self, _state: &VisualState) -> bool {
            self.0.set(self.0.get() + 1);
            true
        }
    }

    fn short_timeline(target: Rc<Counter>) -> Timeline {
        let mut timeline = Timeline::new();
        timeline.from_to(
            target,
            VisualState::SHOWN.with_opacity(0.0),
            VisualState::SHOWN,
            100.0,
            Easing::Linear,
            Position::At(0.0),
        );
        timeline
    }

    #[test]
    fn test_task_runs_when_due() {
        let scheduler = AnimationScheduler::new();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let task = scheduler.schedule_after(500, "test", move || flag.set(true));
        assert_eq!(task.due_ms(), 500.0);
        assert!(task.is_pending());

        scheduler.advance(499.0, 16.0);
        assert!(!ran.get());
        assert!(task.is_pending());

        scheduler.tick(1.0);
        assert!(ran.get());
        assert!(!task.is_pending());
        assert_eq!(scheduler.pending_task_count(), 0);
    }

    #[test]
    fn test_tasks_run_in_due_order() {
        let scheduler = AnimationScheduler::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        let _late = scheduler.schedule_after(30, "late", move || o.borrow_mut().push("late"));
        let o = order.clone();
        let _early = scheduler.schedule_after(10, "early", move || o.borrow_mut().push("early"));
        let o = order.clone();
        let _tie = scheduler.schedule_after(10, "tie", move || o.borrow_mut().push("tie"));

        scheduler.tick(50.0);
        assert_eq!(*order.borrow(), vec!["early", "tie", "late"]);
    }

    #[test]
    fn test_dropping_handle_cancels() {
        let scheduler = AnimationScheduler::new();
        let ran = Rc::new(Cell::new(false));
        let flag = ran.clone();
        let task = scheduler.schedule_after(100, "test", move || flag.set(true));
        assert_eq!(scheduler.pending_task_count(), 1);

        drop(task);
        assert_eq!(scheduler.pending_task_count(), 0);
        scheduler.advance(200.0, 16.0);
        assert!(!ran.get());
    }

    #[test]
    fn test_cancel_after_run_is_noop() {
        let scheduler = AnimationScheduler::new();
        let mut task = scheduler.schedule_after(0, "test", || {});
        scheduler.tick(0.0);
        assert!(!task.cancel());
    }

    #[test]
    fn test_task_can_play_timeline() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let target = Rc::new(Counter(Cell::new(0)));
        let played = Rc::new(Cell::new(None));

        let t = target.clone();
        let slot = played.clone();
        let _task = scheduler.schedule_after(10, "play", move || {
            slot.set(handle.play_timeline(short_timeline(t)).ok());
        });

        scheduler.tick(10.0);
        let id = played.get().expect("timeline started");
        // Started and primed within the same tick
        assert!(target.0.get() > 0);
        assert!(scheduler.is_timeline_playing(id));

        scheduler.advance(200.0, 16.0);
        assert!(!scheduler.is_timeline_playing(id));
        assert_eq!(scheduler.timeline_count(), 0);
        assert!(!scheduler.has_active_work());
    }

    #[test]
    fn test_kill_timeline_from_its_own_hook() {
        let scheduler = AnimationScheduler::new();
        let handle = scheduler.handle();
        let target = Rc::new(Counter(Cell::new(0)));
        let id_slot: Rc<Cell<Option<TimelineId>>> = Rc::new(Cell::new(None));

        let mut timeline = short_timeline(target.clone());
        let slot = id_slot.clone();
        timeline.on_first_commit(move || {
            if let Some(id) = slot.get() {
                handle.kill_timeline(id);
            }
        });
        let id = scheduler.play_timeline(timeline).unwrap();
        id_slot.set(Some(id));

        scheduler.tick(16.0);
        assert!(!scheduler.is_timeline_playing(id));
        assert_eq!(Rc::strong_count(&target), 1);
    }

    #[test]
    fn test_handle_weak_reference() {
        let handle = {
            let scheduler = AnimationScheduler::new();
            scheduler.handle()
        };

        // Scheduler is dropped, handle should not be alive
        assert!(!handle.is_alive());
        assert!(handle.now_ms().is_none());

        // Operations should fail or no-op safely
        assert_eq!(
            handle.schedule_after(10, "test", || {}).err(),
            Some(AnimationError::SchedulerGone)
        );
        assert_eq!(
            handle.play_timeline(Timeline::new()).err(),
            Some(AnimationError::SchedulerGone)
        );
    }

    #[test]
    fn test_task_outlives_scheduler() {
        let scheduler = AnimationScheduler::new();
        let mut task = scheduler.schedule_after(10, "test", || {});
        drop(scheduler);
        assert!(!task.is_pending());
        assert!(!task.cancel());
    }

    #[test]
    fn test_scheduler_counts() {
        let scheduler = AnimationScheduler::new();

        assert_eq!(scheduler.timeline_count(), 0);
        assert_eq!(scheduler.pending_task_count(), 0);
        assert_eq!(scheduler.next_due_ms(), None);

        let _task = scheduler.schedule_after(250, "test", || {});
        scheduler
            .play_timeline(short_timeline(Rc::new(Counter(Cell::new(0)))))
            .unwrap();

        assert_eq!(scheduler.timeline_count(), 1);
        assert_eq!(scheduler.pending_task_count(), 1);
        assert_eq!(scheduler.next_due_ms(), Some(250.0));
        assert!(scheduler.has_active_work());
    }
}
