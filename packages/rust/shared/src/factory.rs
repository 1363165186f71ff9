//! Block factory: correctly-shaped, empty block records per type.
//!
//! Analyzers call [`create_block`] and then fill in the variant fields, so
//! every block that leaves the importer starts from the same defaults the
//! editor uses for a freshly inserted block.

use crate::types::{Block, BlockContent, BlockId, BlockType, MAX_COLUMNS, MIN_COLUMNS};

/// Placeholder link target for buttons without an `href`.
pub const DEFAULT_BUTTON_URL: &str = "#";

/// Create an empty block of `block_type` laid out in `columns` columns.
///
/// `columns` is clamped into `1..=4`.
pub fn create_block(block_type: BlockType, columns: u8) -> Block {
    Block {
        id: BlockId::new(),
        title: block_type.default_title().to_string(),
        columns: columns.clamp(MIN_COLUMNS, MAX_COLUMNS),
        visible: true,
        style: None,
        content: empty_content(block_type),
    }
}

/// Build a text block in one step. Used for fallbacks and split runs.
pub fn text_block(title: impl Into<String>, heading: impl Into<String>, content: impl Into<String>) -> Block {
    let mut block = create_block(BlockType::Text, 1);
    block.title = title.into();
    block.content = BlockContent::Text {
        heading: heading.into(),
        content: content.into(),
    };
    block
}

fn empty_content(block_type: BlockType) -> BlockContent {
    match block_type {
        BlockType::Hero => BlockContent::Hero {
            heading: String::new(),
            subheading: String::new(),
            button_text: String::new(),
            button_url: DEFAULT_BUTTON_URL.to_string(),
            background_image: None,
        },
        BlockType::Text => BlockContent::Text {
            heading: String::new(),
            content: String::new(),
        },
        BlockType::Features => BlockContent::Features {
            heading: String::new(),
            items: Vec::new(),
        },
        BlockType::Benefits => BlockContent::Benefits {
            heading: String::new(),
            items: Vec::new(),
        },
        BlockType::Specifications => BlockContent::Specifications {
            heading: String::new(),
            specs: Vec::new(),
        },
        BlockType::Image => BlockContent::Image {
            src: String::new(),
            alt: String::new(),
            caption: String::new(),
        },
        BlockType::Gallery => BlockContent::Gallery {
            heading: String::new(),
            images: Vec::new(),
        },
        BlockType::ImageText => BlockContent::ImageText {
            heading: String::new(),
            content: String::new(),
            image_src: String::new(),
            image_alt: String::new(),
        },
        BlockType::TextImage => BlockContent::TextImage {
            heading: String::new(),
            content: String::new(),
            image_src: String::new(),
            image_alt: String::new(),
        },
        BlockType::Faq => BlockContent::Faq {
            heading: String::new(),
            questions: Vec::new(),
        },
        BlockType::Cta => BlockContent::Cta {
            heading: String::new(),
            content: String::new(),
            button_text: String::new(),
            button_url: DEFAULT_BUTTON_URL.to_string(),
        },
        BlockType::Video => BlockContent::Video {
            video_url: String::new(),
            caption: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_produces_matching_content() {
        for t in BlockType::ALL {
            let block = create_block(t, 2);
            assert_eq!(block.block_type(), t);
            assert_eq!(block.title, t.default_title());
            assert!(block.visible);
            assert!(block.validate().is_ok());
        }
    }

    #[test]
    fn columns_are_clamped() {
        assert_eq!(create_block(BlockType::Gallery, 0).columns, 1);
        assert_eq!(create_block(BlockType::Gallery, 9).columns, 4);
    }

    #[test]
    fn ids_are_unique() {
        let a = create_block(BlockType::Text, 1);
        let b = create_block(BlockType::Text, 1);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn text_block_sets_fields() {
        let block = text_block("Imported Content", "", "<p>Hi</p>");
        assert_eq!(block.title, "Imported Content");
        match block.content {
            BlockContent::Text { content, .. } => assert_eq!(content, "<p>Hi</p>"),
            other => panic!("expected text block, got {other:?}"),
        }
    }
}
