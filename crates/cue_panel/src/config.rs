//! Entrance configuration
//!
//! Loaded from TOML. Every key is optional:
//!
//! ```toml
//! delay_ms = 500
//! frame_rate = 120
//!
//! [animations.fade_up]
//! duration_ms = 800
//! stagger_ms = 150
//! distance = 40
//! easing = "power3_out"
//! ```

use std::fs;
use std::path::Path;

use cue_animation::Easing;
use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};
use crate::registry::AnimationName;

/// Timing parameters shared by every entrance handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerTiming {
    /// Length of each group's transition
    pub duration_ms: f32,
    /// Offset between consecutive groups
    pub stagger_ms: f32,
    /// Travel distance in logical pixels
    pub distance: f32,
    pub easing: Easing,
}

impl HandlerTiming {
    pub fn new(duration_ms: f32, stagger_ms: f32, distance: f32, easing: Easing) -> Self {
        Self {
            duration_ms,
            stagger_ms,
            distance,
            easing,
        }
    }

    fn validate(&self, field: &'static str) -> Result<()> {
        let fields = [self.duration_ms, self.stagger_ms, self.distance];
        if fields.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PanelError::InvalidValue {
                field,
                reason: format!("timings must be finite and non-negative, got {self:?}"),
            });
        }
        Ok(())
    }
}

impl Default for HandlerTiming {
    fn default() -> Self {
        Self::new(800.0, 150.0, 40.0, Easing::Power3Out)
    }
}

fn default_fade_up() -> HandlerTiming {
    HandlerTiming::default()
}

fn default_slide_in() -> HandlerTiming {
    HandlerTiming::new(700.0, 120.0, 60.0, Easing::Power3Out)
}

fn default_mask_reveal() -> HandlerTiming {
    HandlerTiming::new(900.0, 200.0, 24.0, Easing::Power4Out)
}

/// Per-animation timing overrides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationTimings {
    #[serde(default = "default_fade_up")]
    pub fade_up: HandlerTiming,
    #[serde(default = "default_slide_in")]
    pub slide_in: HandlerTiming,
    #[serde(default = "default_mask_reveal")]
    pub mask_reveal: HandlerTiming,
}

impl Default for AnimationTimings {
    fn default() -> Self {
        Self {
            fade_up: default_fade_up(),
            slide_in: default_slide_in(),
            mask_reveal: default_mask_reveal(),
        }
    }
}

fn default_delay_ms() -> u32 {
    500
}

fn default_frame_rate() -> u32 {
    120
}

/// Configuration for entrance orchestration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntranceConfig {
    /// Time between the mount check passing and handler dispatch
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u32,
    /// Frames per second for the async frame driver
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    #[serde(default)]
    pub animations: AnimationTimings,
}

impl EntranceConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: EntranceConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| PanelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("Loaded entrance config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(PanelError::InvalidValue {
                field: "frame_rate",
                reason: "must be at least 1".to_string(),
            });
        }
        self.animations.fade_up.validate("animations.fade_up")?;
        self.animations.slide_in.validate("animations.slide_in")?;
        self.animations.mask_reveal.validate("animations.mask_reveal")?;
        Ok(())
    }

    /// Builder-style override of the dispatch delay
    pub fn with_delay_ms(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn timing_for(&self, name: AnimationName) -> &HandlerTiming {
        match name {
            AnimationName::FadeUp => &self.animations.fade_up,
            AnimationName::SlideIn => &self.animations.slide_in,
            AnimationName::MaskReveal => &self.animations.mask_reveal,
        }
    }
}

impl Default for EntranceConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            frame_rate: default_frame_rate(),
            animations: AnimationTimings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = EntranceConfig::from_toml_str("").unwrap();
        assert_eq!(config, EntranceConfig::default());
        assert_eq!(config.delay_ms, 500);
        assert_eq!(config.timing_for(AnimationName::SlideIn).distance, 60.0);
    }

    #[test]
    fn test_partial_override() {
        let config = EntranceConfig::from_toml_str(
            r#"
            delay_ms = 250

            [animations.fade_up]
            stagger_ms = 90
            easing = "expo_out"
            "#,
        )
        .unwrap();

        assert_eq!(config.delay_ms, 250);
        let fade_up = config.timing_for(AnimationName::FadeUp);
        assert_eq!(fade_up.stagger_ms, 90.0);
        assert_eq!(fade_up.easing, Easing::ExpoOut);
        assert_eq!(fade_up.duration_ms, 800.0);
        assert_eq!(
            config.timing_for(AnimationName::MaskReveal),
            &default_mask_reveal()
        );
    }

    #[test]
    fn test_rejects_negative_timing() {
        let err = EntranceConfig::from_toml_str(
            r#"
            [animations.slide_in]
            duration_ms = -5
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PanelError::InvalidValue {
                field: "animations.slide_in",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_frame_rate() {
        let err = EntranceConfig::from_toml_str("frame_rate = 0").unwrap_err();
        assert!(err.to_string().contains("frame_rate"));
    }

    #[test]
    fn test_parse_error() {
        let err = EntranceConfig::from_toml_str("delay_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, PanelError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EntranceConfig::load("/definitely/not/here/cue.toml").unwrap_err();
        assert!(matches!(err, PanelError::Io { .. }));
        assert!(err.to_string().contains("cue.toml"));
    }
}
