//! Frequently asked questions.
//!
//! Question/answer extraction depends on the item's shape: `<details>` uses
//! its `<summary>`, `<dt>` pairs with the following `<dd>`, a bare
//! `.question` pairs with a following answer element, and anything else is
//! searched for question and answer children.

use blockbuilder_shared::{Block, BlockContent, BlockType, FaqItem, Result, create_block};
use scraper::ElementRef;
use uuid::Uuid;

use super::{heading_outside, title_for};
use crate::dom::{Section, element_text, next_element_sibling, outermost};
use crate::patterns::{FAQ_ANSWER, FAQ_ITEMS, FAQ_QUESTION, SUMMARY, SUMMARY_MARKUP_RE};
use crate::sanitize::sanitize;

pub(super) fn analyze(section: &Section<'_>) -> Result<Block> {
    let elements = outermost(section.select(&FAQ_ITEMS));
    let heading_text = heading_outside(section, &elements).unwrap_or_default();
    let questions: Vec<FaqItem> = elements
        .into_iter()
        .filter_map(question_pair)
        .filter(|(question, _)| !question.is_empty())
        .map(|(question, answer)| FaqItem {
            id: Uuid::now_v7(),
            question,
            answer,
        })
        .collect();

    let mut block = create_block(BlockType::Faq, 1);
    block.title = title_for(BlockType::Faq, &heading_text);
    block.content = BlockContent::Faq {
        heading: heading_text,
        questions,
    };
    Ok(block)
}

fn question_pair(item: ElementRef<'_>) -> Option<(String, String)> {
    match item.value().name() {
        "details" => {
            let question = item.select(&SUMMARY).next().map(element_text)?;
            let inner = item.inner_html();
            let answer = SUMMARY_MARKUP_RE.replace_all(&inner, "");
            Some((question, sanitize(&answer)))
        }
        "dt" => {
            let answer = next_element_sibling(item)
                .filter(|sibling| sibling.value().name() == "dd")
                .map(|dd| sanitize(&dd.inner_html()))
                .unwrap_or_default();
            Some((element_text(item), answer))
        }
        _ if item.value().classes().any(|c| c == "question") => {
            let answer = next_element_sibling(item)
                .filter(|sibling| FAQ_ANSWER.matches(sibling))
                .map(|el| sanitize(&el.inner_html()))
                .unwrap_or_default();
            Some((element_text(item), answer))
        }
        _ => {
            let question = item.select(&FAQ_QUESTION).next()?;
            let answer = item
                .select(&FAQ_ANSWER)
                .find(|el| el.id() != question.id())
                .map(|el| sanitize(&el.inner_html()))
                .unwrap_or_default();
            Some((element_text(question), answer))
        }
    }
}
