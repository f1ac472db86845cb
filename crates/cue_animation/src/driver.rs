//! Async frame driver
//!
//! Ticks an [`AnimationScheduler`] on a fixed frame interval using tokio
//! time. The driver runs on the current task and borrows the scheduler, so it
//! is meant for a current-thread runtime (or a `LocalSet`) owned by the UI
//! thread.
//!
//! ```ignore
//! let driver = FrameDriver::with_frame_rate(120)?;
//! let frames = driver.run_until_idle(&scheduler).await;
//! ```

use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{AnimationError, Result};
use crate::scheduler::AnimationScheduler;

/// Drives a scheduler from tokio's clock
#[derive(Clone, Copy, Debug)]
pub struct FrameDriver {
    frame_interval: Duration,
}

impl FrameDriver {
    pub fn new(frame_interval: Duration) -> Self {
        Self { frame_interval }
    }

    /// Create a driver ticking `fps` times per second
    pub fn with_frame_rate(fps: u32) -> Result<Self> {
        if fps == 0 {
            return Err(AnimationError::InvalidFrameRate(fps));
        }
        Ok(Self::new(Duration::from_micros(1_000_000 / u64::from(fps))))
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Tick the scheduler until it has no pending tasks or playing timelines
    ///
    /// Each tick receives the real elapsed time since the previous one.
    /// Returns the number of frames ticked.
    pub async fn run_until_idle(&self, scheduler: &AnimationScheduler) -> u64 {
        self.run(scheduler, None).await
    }

    /// Tick the scheduler for `duration`, even while it is idle
    pub async fn run_for(&self, scheduler: &AnimationScheduler, duration: Duration) -> u64 {
        self.run(scheduler, Some(Instant::now() + duration)).await
    }

    async fn run(&self, scheduler: &AnimationScheduler, deadline: Option<Instant>) -> u64 {
        let mut interval = time::interval(self.frame_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first interval tick completes immediately
        interval.tick().await;
        let mut last = Instant::now();
        let mut frames = 0u64;

        loop {
            if deadline.is_none() && !scheduler.has_active_work() {
                break;
            }
            if deadline.is_some_and(|d| last >= d) {
                break;
            }

            interval.tick().await;
            let now = match deadline {
                Some(d) if Instant::now() > d => d,
                _ => Instant::now(),
            };
            let dt_ms = (now - last).as_secs_f32() * 1000.0;
            last = now;

            scheduler.tick(dt_ms);
            frames += 1;
        }

        tracing::debug!(
            "FrameDriver: stopped after {} frames at {:.1}ms",
            frames,
            scheduler.now_ms()
        );
        frames
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(Duration::from_micros(1_000_000 / 120))
    }
}
