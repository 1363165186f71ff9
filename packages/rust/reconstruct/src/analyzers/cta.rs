//! Call to action: a short pitch with one button.

use blockbuilder_shared::{Block, BlockContent, BlockType, Result, create_block};

use super::{find_button, heading, title_for};
use crate::dom::{Section, element_text};
use crate::patterns::PARAGRAPH;

pub(super) fn analyze(section: &Section<'_>) -> Result<Block> {
    let heading_text = heading(section).unwrap_or_default();
    let content = section.first(&PARAGRAPH).map(element_text).unwrap_or_default();
    let button = find_button(section);

    let mut block = create_block(BlockType::Cta, 1);
    block.title = title_for(BlockType::Cta, &heading_text);
    block.content = BlockContent::Cta {
        heading: heading_text,
        content,
        button_text: button.text,
        button_url: button.url,
    };
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::test_support::with_section;

    #[test]
    fn reads_heading_pitch_and_button() {
        let block = with_section(
            r#"<div class="cta"><h2>Ready?</h2><p>Ships  tomorrow.</p><p>Second.</p><a class="btn" href="/cart">Add to cart</a></div>"#,
            analyze,
        )
        .unwrap();
        assert_eq!(block.title, "Ready?");
        match block.content {
            BlockContent::Cta { heading, content, button_text, button_url } => {
                assert_eq!(heading, "Ready?");
                assert_eq!(content, "Ships tomorrow.");
                assert_eq!(button_text, "Add to cart");
                assert_eq!(button_url, "/cart");
            }
            other => panic!("expected cta, got {other:?}"),
        }
    }
}
