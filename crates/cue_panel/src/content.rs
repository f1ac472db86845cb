//! Panel content
//!
//! The already-resolved data a panel renders: heading, body copy, badges,
//! variant pricing and calls to action, plus the presentation switches that
//! come with it. Field names follow the camelCase keys content arrives with.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::AnimationName;

/// Panel heading
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Heading {
    pub text: String,
    /// Semantic level (1-6); defaults to 2
    pub semantic_level: Option<u8>,
    /// Display size override, e.g. `"h3"`
    pub size: Option<String>,
}

/// Small label rendered above the body copy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Badge {
    pub label: String,
    pub pill: bool,
    pub kind: Option<String>,
}

/// Resolved price of one product variant, in minor currency units
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VariantPrice {
    pub sku: Option<String>,
    pub sale_price: u64,
    pub base_price: Option<u64>,
}

/// Call-to-action button
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Cta {
    pub label: String,
    pub href: Option<String>,
    pub variant: Option<String>,
    /// Hidden when explicitly `false`
    pub show: Option<bool>,
}

impl Cta {
    pub fn is_shown(&self) -> bool {
        self.show.unwrap_or(true)
    }
}

/// Body copy size
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSize {
    Base,
    #[default]
    Large,
    Xlarge,
}

/// Everything one panel renders
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelContent {
    pub heading: Option<Heading>,
    pub body: Vec<String>,
    pub badges: Vec<Badge>,
    pub variants: Vec<VariantPrice>,
    pub ctas: Vec<Cta>,
    /// `"start"`, `"center"` or `"end"`
    pub position: Option<String>,
    pub content_size: Option<ContentSize>,
    pub inverse_colors: bool,
    /// Entrance animation key, e.g. `"fadeUp"`
    pub animation: Option<String>,
    pub force_ltr: bool,
}

impl PanelContent {
    /// Parse content from TOML
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Heading text, unless it is empty
    pub fn heading_text(&self) -> Option<&str> {
        self.heading
            .as_ref()
            .map(|h| h.text.as_str())
            .filter(|text| !text.is_empty())
    }

    /// Registered entrance animation, if any
    pub fn animation_name(&self) -> Option<AnimationName> {
        let key = self.animation.as_deref()?;
        let name = AnimationName::from_key(key);
        if name.is_none() {
            tracing::debug!("Unknown entrance animation '{}', panel will not animate", key);
        }
        name
    }

    pub fn visible_ctas(&self) -> impl Iterator<Item = &Cta> {
        self.ctas.iter().filter(|cta| cta.is_shown())
    }

    pub fn content_size(&self) -> ContentSize {
        self.content_size.unwrap_or_default()
    }
}

/// Variant with the lowest sale price
pub fn lowest_priced_variant(variants: &[VariantPrice]) -> Option<&VariantPrice> {
    variants.iter().min_by_key(|v| v.sale_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_content() {
        let content = PanelContent::from_toml_str(
            r#"
            animation = "fadeUp"
            position = "center"
            contentSize = "xlarge"
            forceLtr = true
            body = ["First paragraph"]

            [heading]
            text = "Meet the new lineup"
            semanticLevel = 1

            [[ctas]]
            label = "Shop now"
            href = "/shop"
            variant = "primary"

            [[ctas]]
            label = "Hidden"
            show = false

            [[variants]]
            sku = "A-1"
            salePrice = 49900
            basePrice = 59900
            "#,
        )
        .unwrap();

        assert_eq!(content.animation_name(), Some(AnimationName::FadeUp));
        assert_eq!(content.heading_text(), Some("Meet the new lineup"));
        assert_eq!(content.content_size(), ContentSize::Xlarge);
        assert!(content.force_ltr);
        assert_eq!(content.visible_ctas().count(), 1);
        assert_eq!(content.variants[0].base_price, Some(59900));
    }

    #[test]
    fn test_empty_heading_and_unknown_animation() {
        let mut content = PanelContent {
            heading: Some(Heading {
                text: String::new(),
                ..Default::default()
            }),
            animation: Some("spinAround".to_string()),
            ..Default::default()
        };
        assert_eq!(content.heading_text(), None);

        // Only an empty string drops the heading
        if let Some(heading) = content.heading.as_mut() {
            heading.text = " ".to_string();
        }
        assert_eq!(content.heading_text(), Some(" "));
        content.heading = None;
        assert_eq!(content.heading_text(), None);
        assert_eq!(content.animation_name(), None);
        assert_eq!(content.content_size(), ContentSize::Large);
    }

    #[test]
    fn test_lowest_priced_variant() {
        let variants = vec![
            VariantPrice {
                sku: Some("B".into()),
                sale_price: 700,
                base_price: None,
            },
            VariantPrice {
                sku: Some("A".into()),
                sale_price: 500,
                base_price: Some(800),
            },
        ];
        assert_eq!(
            lowest_priced_variant(&variants).and_then(|v| v.sku.as_deref()),
            Some("A")
        );
        assert!(lowest_priced_variant(&[]).is_none());
    }
}
