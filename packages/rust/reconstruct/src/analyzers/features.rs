//! Feature and benefit lists.

use blockbuilder_shared::{Block, BlockContent, BlockType, FeatureItem, Result, create_block};
use scraper::ElementRef;
use uuid::Uuid;

use super::{heading_outside, title_for};
use crate::dom::{Section, element_text, outermost};
use crate::patterns::{FEATURE_DESCRIPTION, FEATURE_ITEMS, FEATURE_TITLE, mentions_benefits};

/// Placeholder icon; icons are not inferred from markup.
const ITEM_ICON: &str = "check";

pub(super) fn analyze(section: &Section<'_>, benefits: Option<bool>) -> Result<Block> {
    let benefits = benefits.unwrap_or_else(|| {
        mentions_benefits(&section.text()) || section.classes().iter().any(|c| mentions_benefits(c))
    });
    let block_type = if benefits { BlockType::Benefits } else { BlockType::Features };

    let mut elements = outermost(section.select(&FEATURE_ITEMS));
    if elements.is_empty() {
        elements = titled_children(section);
    }
    let heading_text = heading_outside(section, &elements).unwrap_or_default();
    let items: Vec<FeatureItem> = elements.into_iter().map(feature_item).collect();

    let mut block = create_block(block_type, 1);
    block.title = title_for(block_type, &heading_text);
    block.content = if benefits {
        BlockContent::Benefits {
            heading: heading_text,
            items,
        }
    } else {
        BlockContent::Features {
            heading: heading_text,
            items,
        }
    };
    Ok(block)
}

/// Top-level children holding a title of their own, for item cards without
/// a feature class.
fn titled_children<'a>(section: &Section<'a>) -> Vec<ElementRef<'a>> {
    section
        .child_elements()
        .filter(|child| child.select(&FEATURE_TITLE).next().is_some())
        .collect()
}

fn feature_item(element: ElementRef<'_>) -> FeatureItem {
    let title = element.select(&FEATURE_TITLE).next().map(element_text).unwrap_or_default();
    let description = element
        .select(&FEATURE_DESCRIPTION)
        .next()
        .map(element_text)
        .unwrap_or_else(|| element_text(element));
    FeatureItem {
        id: Uuid::now_v7(),
        title,
        description,
        icon: ITEM_ICON.to_string(),
    }
}
