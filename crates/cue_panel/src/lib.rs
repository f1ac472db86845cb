//! Cue Content Panel
//!
//! A content panel (heading, body copy with pricing, call-to-action buttons)
//! that can play a one-shot entrance animation when it first appears.
//!
//! # Features
//!
//! - **Layout**: Grid placement of the heading, content and actions groups
//! - **Entrance Controller**: Delayed, guarded, cancellable entrance dispatch
//! - **Handler Registry**: `fadeUp`, `slideIn` and `maskReveal` strategies
//! - **Visibility Policy**: Hidden-by-default rendering that can never strand content
//! - **Configuration**: TOML entrance timings with serde defaults
//!
//! # Example
//!
//! ```ignore
//! use cue_animation::{AnimationScheduler, FrameDriver};
//! use cue_panel::{ContentPanel, EntranceConfig, PanelContent};
//!
//! let scheduler = AnimationScheduler::new();
//! let content = PanelContent::from_toml_str(source)?;
//! let mut panel = ContentPanel::new(Some(content), scheduler.handle(), EntranceConfig::default());
//!
//! panel.render();
//! panel.mount();
//! FrameDriver::with_frame_rate(120)?.run_until_idle(&scheduler).await;
//! ```

pub mod config;
pub mod content;
pub mod controller;
pub mod direction;
pub mod element;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod layout;
pub mod panel;
pub mod registry;
pub mod visibility;


pub use config::{AnimationTimings, EntranceConfig, HandlerTiming};
pub use content::{Badge, ContentSize, Cta, Heading, PanelContent, VariantPrice};
pub use controller::{
    DispatchOutcome, EntranceController, EntranceRequest, MountOutcome, SkipReason,
};
pub use direction::{Direction, TextDirection};
pub use element::{ElementGroup, ElementGroupRefs, ElementRef, RenderTarget};
pub use error::{PanelError, Result};
pub use guard::{GuardState, RunGuard, WeakRunGuard};
pub use handlers::{AnimationHandler, FirstCommit};
pub use layout::{Alignment, ElementSize, PanelLayout};
pub use panel::{ContentPanel, GroupPresentation, RenderedPanel};
pub use registry::{AnimationName, AnimationRegistry};
pub use visibility::InitialVisibility;
