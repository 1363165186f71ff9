//! Specification tables: name/value rows from tables, definition lists or
//! `Name: value` list items.

use blockbuilder_shared::{Block, BlockContent, BlockType, Result, SpecItem, create_block};
use uuid::Uuid;

use super::{heading, title_for};
use crate::dom::{Section, element_text, next_element_sibling};
use crate::patterns::{LIST_ITEM, TABLE_CELL, TABLE_ROW, TERM};

pub(super) fn analyze(section: &Section<'_>) -> Result<Block> {
    let mut rows = table_rows(section);
    if rows.is_empty() {
        rows = definition_rows(section);
    }
    if rows.is_empty() {
        rows = list_rows(section);
    }

    let specs = rows
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| SpecItem {
            id: Uuid::now_v7(),
            name,
            value,
        })
        .collect();

    let heading_text = heading(section).unwrap_or_default();
    let mut block = create_block(BlockType::Specifications, 1);
    block.title = title_for(BlockType::Specifications, &heading_text);
    block.content = BlockContent::Specifications {
        heading: heading_text,
        specs,
    };
    Ok(block)
}

fn table_rows(section: &Section<'_>) -> Vec<(String, String)> {
    section
        .select(&TABLE_ROW)
        .filter_map(|row| {
            let mut cells = row.select(&TABLE_CELL).map(element_text);
            Some((cells.next()?, cells.next()?))
        })
        .collect()
}

fn definition_rows(section: &Section<'_>) -> Vec<(String, String)> {
    section
        .select(&TERM)
        .map(|dt| {
            let value = next_element_sibling(dt)
                .filter(|el| el.value().name() == "dd")
                .map(element_text)
                .unwrap_or_default();
            (element_text(dt), value)
        })
        .collect()
}

fn list_rows(section: &Section<'_>) -> Vec<(String, String)> {
    section
        .select(&LIST_ITEM)
        .filter_map(|li| {
            let text = element_text(li);
            let (name, value) = text.split_once(':')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
