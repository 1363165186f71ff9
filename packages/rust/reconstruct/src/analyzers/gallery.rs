//! Image gallery: one entry per `<img>`, laid out in up to four columns.

use blockbuilder_shared::{Block, BlockContent, BlockType, GalleryImage, Result, Thresholds, create_block};
use uuid::Uuid;

use super::{attr, figure_caption, heading, title_for};
use crate::dom::Section;
use crate::patterns::IMAGE;

pub(super) fn analyze(section: &Section<'_>, thresholds: &Thresholds) -> Result<Block> {
    let images: Vec<GalleryImage> = section
        .select(&IMAGE)
        .enumerate()
        .map(|(index, img)| GalleryImage {
            id: Uuid::now_v7(),
            src: img.value().attr("src").unwrap_or_default().to_string(),
            alt: attr(img, "alt")
                .map(str::to_string)
                .unwrap_or_else(|| format!("Image {}", index + 1)),
            caption: figure_caption(img).unwrap_or_default(),
        })
        .collect();

    let columns = images.len().min(usize::from(thresholds.max_columns)).max(1);
    let heading_text = heading(section).unwrap_or_default();

    let mut block = create_block(BlockType::Gallery, u8::try_from(columns).unwrap_or(u8::MAX));
    block.title = title_for(BlockType::Gallery, &heading_text);
    block.content = BlockContent::Gallery {
        heading: heading_text,
        images,
    };
    Ok(block)
}
