//! Media blocks: image beside text, standalone image, embedded video.

use blockbuilder_shared::{Block, BlockBuilderError, BlockContent, BlockType, Result, create_block};

use super::{attr, figure_caption, heading, title_for};
use crate::dom::{Section, element_text, is_descendant_of};
use crate::patterns::{FIGCAPTION, IMAGE, PARAGRAPH, VIDEO_SOURCE};
use crate::sanitize::sanitize;

const DEFAULT_IMAGE_ALT: &str = "Product image";

/// Image and text side by side. `text_first` puts the text on the left.
pub(super) fn analyze_image_text(section: &Section<'_>, text_first: bool) -> Result<Block> {
    let image = section
        .first(&IMAGE)
        .ok_or_else(|| BlockBuilderError::classification("image-text", "section has no image"))?;

    let paragraphs: String = section
        .select(&PARAGRAPH)
        .filter(|p| !is_descendant_of(image, *p))
        .map(|p| p.html())
        .collect();

    let heading_text = heading(section).unwrap_or_default();
    let content = sanitize(&paragraphs);
    let image_src = image.value().attr("src").unwrap_or_default().to_string();
    let image_alt = attr(image, "alt").unwrap_or(DEFAULT_IMAGE_ALT).to_string();

    let block_type = if text_first { BlockType::TextImage } else { BlockType::ImageText };
    let mut block = create_block(block_type, 2);
    block.title = title_for(block_type, &heading_text);
    block.content = if text_first {
        BlockContent::TextImage {
            heading: heading_text,
            content,
            image_src,
            image_alt,
        }
    } else {
        BlockContent::ImageText {
            heading: heading_text,
            content,
            image_src,
            image_alt,
        }
    };
    Ok(block)
}

/// A single image with an optional caption.
pub(super) fn analyze_image(section: &Section<'_>) -> Result<Block> {
    let image = section
        .first(&IMAGE)
        .ok_or_else(|| BlockBuilderError::classification("image", "section has no image"))?;

    let caption = figure_caption(image)
        .or_else(|| section.first(&FIGCAPTION).map(element_text))
        .unwrap_or_default();

    let mut block = create_block(BlockType::Image, 1);
    block.content = BlockContent::Image {
        src: image.value().attr("src").unwrap_or_default().to_string(),
        alt: attr(image, "alt").unwrap_or(DEFAULT_IMAGE_ALT).to_string(),
        caption,
    };
    Ok(block)
}

/// An embedded or hosted video.
pub(super) fn analyze_video(section: &Section<'_>) -> Result<Block> {
    let player = section
        .first(&VIDEO_SOURCE)
        .ok_or_else(|| BlockBuilderError::classification("video", "section has no video source"))?;

    let caption = section
        .first(&FIGCAPTION)
        .or_else(|| section.first(&PARAGRAPH))
        .map(element_text)
        .unwrap_or_default();

    let heading_text = heading(section).unwrap_or_default();
    let mut block = create_block(BlockType::Video, 1);
    block.title = title_for(BlockType::Video, &heading_text);
    block.content = BlockContent::Video {
        video_url: player.value().attr("src").unwrap_or_default().to_string(),
        caption,
    };
    Ok(block)
}
