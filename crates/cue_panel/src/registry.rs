//! Named entrance animations
//!
//! The set of animations is closed: [`AnimationName`] enumerates it and
//! [`AnimationRegistry::lookup`] matches it exhaustively. Free-form names
//! coming from content are resolved with [`AnimationName::from_key`]; anything
//! unrecognized resolves to `None` and the panel simply does not animate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::handlers::{AnimationHandler, FadeUp, MaskReveal, SlideIn};

/// Key of a registered entrance animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationName {
    FadeUp,
    SlideIn,
    MaskReveal,
}

impl AnimationName {
    pub const ALL: [AnimationName; 3] = [
        AnimationName::FadeUp,
        AnimationName::SlideIn,
        AnimationName::MaskReveal,
    ];

    /// Content key of this animation
    pub fn key(&self) -> &'static str {
        match self {
            AnimationName::FadeUp => "fadeUp",
            AnimationName::SlideIn => "slideIn",
            AnimationName::MaskReveal => "maskReveal",
        }
    }

    /// Resolve a content key; unknown keys are `None`
    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        Self::ALL.into_iter().find(|name| name.key() == key)
    }
}

impl fmt::Display for AnimationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Static mapping from animation names to their handlers
pub struct AnimationRegistry;

impl AnimationRegistry {
    pub fn lookup(name: AnimationName) -> &'static dyn AnimationHandler {
        match name {
            AnimationName::FadeUp => &FadeUp,
            AnimationName::SlideIn => &SlideIn,
            AnimationName::MaskReveal => &MaskReveal,
        }
    }

    /// Look up a handler by content key
    pub fn lookup_key(key: &str) -> Option<&'static dyn AnimationHandler> {
        AnimationName::from_key(key).map(Self::lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip() {
        for name in AnimationName::ALL {
            assert_eq!(AnimationName::from_key(name.key()), Some(name));
            assert_eq!(AnimationRegistry::lookup(name).name(), name);
        }
    }

    #[test]
    fn test_unknown_key_is_absent() {
        assert_eq!(AnimationName::from_key("spinAround"), None);
        assert_eq!(AnimationName::from_key("FadeUp"), None);
        assert_eq!(AnimationName::from_key(""), None);
        assert!(AnimationRegistry::lookup_key("spinAround").is_none());
        assert!(AnimationRegistry::lookup_key(" fadeUp ").is_some());
    }

    #[test]
    fn test_serde_names_match_keys() {
        #[derive(Deserialize)]
        struct Holder {
            animation: AnimationName,
        }
        let holder: Holder = toml::from_str("animation = \"maskReveal\"").unwrap();
        assert_eq!(holder.animation, AnimationName::MaskReveal);
    }
}
