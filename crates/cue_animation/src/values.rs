//! Animatable value types
//!
//! Provides the interpolation trait and the visual state a timeline writes
//! into its targets.

/// Trait for values that can be linearly interpolated
pub trait Interpolate: Clone {
    /// Linearly interpolate between self and other by factor t (0.0 to 1.0)
    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Check if two values are approximately equal (for settling detection)
    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool;
}

// ============================================================================
// f32 Implementation
// ============================================================================

impl Interpolate for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self - other).abs() < epsilon
    }
}

// ============================================================================
// Visual State
// ============================================================================

/// The presentational state of one element group
///
/// `VisualState::default()` is the natural, fully shown state. Translation is
/// in logical pixels, `clip` is the revealed fraction of the element (1.0 is
/// fully revealed).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualState {
    pub opacity: f32,
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    pub clip: f32,
}

impl VisualState {
    /// Natural state: opaque, untransformed, fully revealed
    pub const SHOWN: VisualState = VisualState {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        clip: 1.0,
    };

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_translate(mut self, x: f32, y: f32) -> Self {
        self.translate_x = x;
        self.translate_y = y;
        self
    }

    pub fn with_translate_x(mut self, x: f32) -> Self {
        self.translate_x = x;
        self
    }

    pub fn with_translate_y(mut self, y: f32) -> Self {
        self.translate_y = y;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_clip(mut self, clip: f32) -> Self {
        self.clip = clip;
        self
    }

    /// Whether any part of the element is perceptible
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.001 && self.clip > 0.001 && self.scale > 0.001
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::SHOWN
    }
}

impl Interpolate for VisualState {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        VisualState {
            opacity: self.opacity.lerp(&other.opacity, t),
            translate_x: self.translate_x.lerp(&other.translate_x, t),
            translate_y: self.translate_y.lerp(&other.translate_y, t),
            scale: self.scale.lerp(&other.scale, t),
            clip: self.clip.lerp(&other.clip, t),
        }
    }

    fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.opacity.approx_eq(&other.opacity, epsilon)
            && self.translate_x.approx_eq(&other.translate_x, epsilon)
            && self.translate_y.approx_eq(&other.translate_y, epsilon)
            && self.scale.approx_eq(&other.scale, epsilon)
            && self.clip.approx_eq(&other.clip, epsilon)
    }
}
