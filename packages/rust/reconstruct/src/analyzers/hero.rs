//! Hero banner: headline, subheading, call-to-action button and backdrop.

use blockbuilder_shared::{Block, BlockContent, BlockType, Result, create_block};

use super::{find_button, heading, title_for};
use crate::dom::{Section, element_text};
use crate::patterns::{H1, HEADINGS, IMAGE, PARAGRAPH};

pub(super) fn analyze(section: &Section<'_>) -> Result<Block> {
    let headline = section.first(&H1).filter(|h| !element_text(*h).is_empty());
    let heading_text = match headline {
        Some(h1) => element_text(h1),
        None => heading(section).unwrap_or_default(),
    };

    let headings: Vec<_> = section.select(&HEADINGS).collect();
    let subheading = if headings.len() >= 2 {
        headings
            .iter()
            .map(|h| element_text(*h))
            .find(|text| !text.is_empty() && *text != heading_text)
            .unwrap_or_default()
    } else {
        section.first(&PARAGRAPH).map(element_text).unwrap_or_default()
    };

    let button = find_button(section);
    let background_image = section
        .first(&IMAGE)
        .and_then(|img| super::attr(img, "src"))
        .map(str::to_string);

    let mut block = create_block(BlockType::Hero, 1);
    block.title = title_for(BlockType::Hero, &heading_text);
    block.content = BlockContent::Hero {
        heading: heading_text,
        subheading,
        button_text: button.text,
        button_url: button.url,
        background_image,
    };
    Ok(block)
}
