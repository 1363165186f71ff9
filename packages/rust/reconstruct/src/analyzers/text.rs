//! Generic rich-text block: a heading and the remaining sanitized HTML.

use blockbuilder_shared::{Block, BlockContent, BlockType, Result, create_block};

use super::title_for;
use crate::dom::{Section, element_text};
use crate::patterns::CONTENT_HEADING;
use crate::sanitize::sanitize;

pub(super) fn analyze(section: &Section<'_>) -> Result<Block> {
    let html = section.inner_html();
    let (heading_text, content) = match section.first(&CONTENT_HEADING) {
        Some(h) => (element_text(h), html.replacen(&h.html(), "", 1)),
        None => (String::new(), html),
    };

    let mut block = create_block(BlockType::Text, 1);
    block.title = title_for(BlockType::Text, &heading_text);
    block.content = BlockContent::Text {
        heading: heading_text,
        content: sanitize(&content),
    };
    Ok(block)
}
