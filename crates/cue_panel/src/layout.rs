//! Declarative panel layout
//!
//! Turns [`PanelContent`] into grid placements for the three element groups.
//! Grid composition itself belongs to the host; this only decides spans,
//! offsets and which groups exist.

use crate::content::{lowest_priced_variant, Badge, ContentSize, PanelContent};
use crate::element::ElementGroup;

/// Horizontal placement of the panel in the grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

impl Alignment {
    /// Parse a position key; anything unrecognized aligns to the start
    pub fn from_key(key: Option<&str>) -> Self {
        match key.map(str::trim) {
            Some("center") => Alignment::Center,
            Some("end") => Alignment::End,
            _ => Alignment::Start,
        }
    }

    /// Medium-breakpoint column offset
    pub fn column_offset(&self) -> u8 {
        match self {
            Alignment::Start => 0,
            Alignment::Center => 2,
            Alignment::End => 5,
        }
    }
}

/// Column span per breakpoint
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub xs: Option<u8>,
    pub md: Option<u8>,
    pub lg: Option<u8>,
    pub xl: Option<u8>,
}

/// Grid cell placement
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub cols: Span,
    pub offset_md: u8,
}

/// Size of pricing and CTA elements
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementSize {
    Base,
    Large,
}

#[derive(Clone, Debug, PartialEq)]
pub struct HeadingBlock {
    pub text: String,
    pub semantic_level: u8,
    /// Display style, `"h1"` unless overridden
    pub display: String,
    pub cell: GridCell,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PricingBlock {
    pub sku: Option<String>,
    pub current_price: u64,
    pub old_price: Option<u64>,
    pub show_trade_in_text: bool,
    pub size: ElementSize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BodyBlock {
    pub badges: Vec<Badge>,
    pub paragraphs: Vec<String>,
    pub size: ContentSize,
    pub pricing: Option<PricingBlock>,
    pub cell: GridCell,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CtaBlock {
    pub label: String,
    pub href: Option<String>,
    pub variant: Option<String>,
    pub size: ElementSize,
    /// Variant buttons follow the cursor on hover
    pub tracks_cursor: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionsBlock {
    pub ctas: Vec<CtaBlock>,
    pub cell: GridCell,
}

/// Layout of one panel
#[derive(Clone, Debug, PartialEq)]
pub struct PanelLayout {
    pub alignment: Alignment,
    pub element_size: ElementSize,
    pub inverse_colors: bool,
    pub heading: Option<HeadingBlock>,
    pub body: BodyBlock,
    pub actions: Option<ActionsBlock>,
}

impl PanelLayout {
    pub fn compose(content: &PanelContent) -> Self {
        let alignment = Alignment::from_key(content.position.as_deref());
        let offset = alignment.column_offset();
        let element_size = match content.content_size() {
            ContentSize::Xlarge => ElementSize::Large,
            _ => ElementSize::Base,
        };

        let heading = content.heading_text().map(|text| {
            let heading = content.heading.as_ref();
            HeadingBlock {
                text: text.to_string(),
                semantic_level: heading
                    .and_then(|h| h.semantic_level)
                    .filter(|level| *level != 0)
                    .unwrap_or(2)
                    .clamp(1, 6),
                display: heading
                    .and_then(|h| h.size.clone())
                    .unwrap_or_else(|| "h1".to_string()),
                cell: GridCell {
                    cols: Span {
                        xs: Some(12),
                        md: Some(12),
                        lg: Some(9),
                        xl: Some(7),
                    },
                    offset_md: offset,
                },
            }
        });

        let pricing = lowest_priced_variant(&content.variants).map(|variant| PricingBlock {
            sku: variant.sku.clone(),
            current_price: variant.sale_price,
            old_price: variant.base_price,
            show_trade_in_text: true,
            size: element_size,
        });

        let body = BodyBlock {
            badges: content.badges.clone(),
            paragraphs: content.body.clone(),
            size: content.content_size(),
            pricing,
            cell: GridCell {
                cols: Span {
                    xs: Some(12),
                    md: Some(if alignment == Alignment::Center { 7 } else { 6 }),
                    ..Default::default()
                },
                offset_md: offset + 1,
            },
        };

        let ctas: Vec<CtaBlock> = content
            .visible_ctas()
            .map(|cta| CtaBlock {
                label: cta.label.clone(),
                href: cta.href.clone(),
                variant: cta.variant.clone(),
                size: element_size,
                tracks_cursor: cta.variant.is_some(),
            })
            .collect();
        let actions = (!ctas.is_empty()).then(|| ActionsBlock {
            ctas,
            cell: GridCell {
                cols: Span {
                    xs: Some(12),
                    md: Some(7),
                    ..Default::default()
                },
                offset_md: offset,
            },
        });

        Self {
            alignment,
            element_size,
            inverse_colors: content.inverse_colors,
            heading,
            body,
            actions,
        }
    }

    /// Element groups this layout renders, in entrance order
    pub fn groups(&self) -> Vec<ElementGroup> {
        let mut groups = Vec::with_capacity(3);
        if self.heading.is_some() {
            groups.push(ElementGroup::Heading);
        }
        groups.push(ElementGroup::Content);
        if self.actions.is_some() {
            groups.push(ElementGroup::Actions);
        }
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Cta, Heading, VariantPrice};

    fn content() -> PanelContent {
        PanelContent {
            heading: Some(Heading {
                text: "Title".to_string(),
                semantic_level: Some(9),
                size: None,
            }),
            body: vec!["Body".to_string()],
            ctas: vec![Cta {
                label: "Go".to_string(),
                variant: Some("primary".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_offsets_follow_alignment() {
        let mut content = content();
        for (key, offset, body_md) in [
            (None, 0, 6),
            (Some("center"), 2, 7),
            (Some("end"), 5, 6),
            (Some("sideways"), 0, 6),
        ] {
            content.position = key.map(str::to_string);
            let layout = PanelLayout::compose(&content);
            assert_eq!(layout.heading.as_ref().unwrap().cell.offset_md, offset);
            assert_eq!(layout.body.cell.offset_md, offset + 1);
            assert_eq!(layout.body.cell.cols.md, Some(body_md));
            assert_eq!(layout.actions.as_ref().unwrap().cell.offset_md, offset);
        }
    }

    #[test]
    fn test_heading_defaults() {
        let layout = PanelLayout::compose(&content());
        let heading = layout.heading.unwrap();
        assert_eq!(heading.semantic_level, 6);
        assert_eq!(heading.display, "h1");
        assert_eq!(heading.cell.cols.xl, Some(7));
    }

    #[test]
    fn test_unset_heading_level_falls_back() {
        for (level, expected) in [(None, 2), (Some(0), 2), (Some(1), 1), (Some(4), 4)] {
            let mut content = content();
            if let Some(heading) = content.heading.as_mut() {
                heading.semantic_level = level;
            }
            let layout = PanelLayout::compose(&content);
            assert_eq!(layout.heading.unwrap().semantic_level, expected, "{level:?}");
        }
    }

    #[test]
    fn test_groups_depend_on_content() {
        let layout = PanelLayout::compose(&content());
        assert_eq!(layout.groups(), ElementGroup::ALL.to_vec());
        assert!(layout.actions.unwrap().ctas[0].tracks_cursor);

        let mut bare = content();
        bare.heading = None;
        bare.ctas[0].show = Some(false);
        let layout = PanelLayout::compose(&bare);
        assert_eq!(layout.groups(), vec![ElementGroup::Content]);
    }

    #[test]
    fn test_pricing_uses_lowest_variant() {
        let mut content = content();
        content.content_size = Some(ContentSize::Xlarge);
        content.variants = vec![
            VariantPrice {
                sku: Some("hi".into()),
                sale_price: 900,
                base_price: None,
            },
            VariantPrice {
                sku: Some("lo".into()),
                sale_price: 400,
                base_price: Some(500),
            },
        ];
        let layout = PanelLayout::compose(&content);
        let pricing = layout.body.pricing.unwrap();
        assert_eq!(pricing.sku.as_deref(), Some("lo"));
        assert_eq!(pricing.old_price, Some(500));
        assert_eq!(pricing.size, ElementSize::Large);
        assert_eq!(layout.element_size, ElementSize::Large);
    }
}
