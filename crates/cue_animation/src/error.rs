//! Error types for cue_animation

use thiserror::Error;

/// Errors raised by timeline and scheduler misuse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError {
    /// The scheduler behind a handle has been dropped
    #[error("animation scheduler is no longer alive")]
    SchedulerGone,

    /// A timeline was asked to play after it finished or was killed
    #[error("timeline has already been played to completion or killed")]
    TimelineSpent,

    /// A frame driver was configured with a zero frame rate
    #[error("invalid frame rate: {0}")]
    InvalidFrameRate(u32),
}

/// Result type for cue_animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
