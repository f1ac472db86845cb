//! Cue Animation System
//!
//! Timed visual-state sequences and the cooperative scheduler that plays them.
//!
//! # Features
//!
//! - **Easing**: Named easing curves plus cubic-bezier
//! - **Visual State**: Opacity, translation, scale and clip, interpolated as one value
//! - **Timelines**: Single-use, time-ordered step sequences with a first-commit hook
//! - **Scheduler**: Virtual-clock task queue with cancellable deferred tasks
//! - **Frame Driver**: Async loop that ticks a scheduler on tokio time

pub mod driver;
pub mod easing;
pub mod error;
pub mod scheduler;
pub mod timeline;
pub mod values;

pub use driver::FrameDriver;
pub use easing::Easing;
pub use error::{AnimationError, Result};
pub use scheduler::{AnimationScheduler, ScheduledTask, SchedulerHandle, TaskId, TimelineId};
pub use timeline::{AnimationTarget, PlayState, Position, Timeline, TimelineEntryId};
pub use values::{Interpolate, VisualState};
