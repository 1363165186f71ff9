//! Content splitter for sections without a clear single classification.
//!
//! Sub-sections are always built from the section's own top-level nodes, so
//! every recursion works on a strictly smaller set; `max_split_depth` bounds
//! it regardless.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};
use tracing::debug;

use crate::document::DocumentAnalyzer;
use crate::dom::{Section, is_meaningful};
use crate::patterns::{HEADINGS, IMAGE, PARAGRAPH};
use crate::rules::Route;

/// Break `section` into smaller pieces and analyze each.
pub(crate) fn split_section(doc: &mut DocumentAnalyzer<'_>, section: &Section<'_>, depth: u32) {
    if depth >= doc.config().max_split_depth {
        debug!(section = %section.label(), depth, "split depth reached");
        doc.analyze_content(section);
        return;
    }

    let nodes: Vec<NodeRef<'_, Node>> = section.nodes().iter().copied().filter(is_meaningful).collect();

    if let [only] = nodes.as_slice() {
        match ElementRef::wrap(*only) {
            Some(wrapper) if wrapper.children().any(|c| c.value().is_element()) => {
                doc.analyze_section(&Section::of_element(wrapper), depth + 1);
            }
            _ => doc.analyze_content(section),
        }
        return;
    }

    if section.first(&IMAGE).is_some() {
        split_by_images(doc, section, &nodes, depth);
    } else if section.count(&PARAGRAPH) > 2 {
        split_paragraph_runs(doc, section, &nodes);
    } else {
        doc.analyze_content(section);
    }
}

/// One sub-section per image holder, with an adjacent heading before it and
/// paragraph after it. Nodes no group claims are analyzed as plain content.
fn split_by_images<'a>(
    doc: &mut DocumentAnalyzer<'_>,
    section: &Section<'a>,
    nodes: &[NodeRef<'a, Node>],
    depth: u32,
) {
    let mut claimed = vec![false; nodes.len()];
    let mut groups: Vec<(usize, usize)> = Vec::new();

    for i in 0..nodes.len() {
        if claimed[i] || !holds_image(&nodes[i]) {
            continue;
        }
        let mut start = i;
        let mut end = i;
        if i > 0 && !claimed[i - 1] && is_heading(&nodes[i - 1]) {
            start = i - 1;
        }
        if i + 1 < nodes.len() && is_paragraph(&nodes[i + 1]) && !holds_image(&nodes[i + 1]) {
            end = i + 1;
        }
        claimed[start..=end].iter_mut().for_each(|c| *c = true);
        groups.push((start, end));
    }

    if let [(0, end)] = groups.as_slice() {
        if *end + 1 == nodes.len() {
            doc.analyze_content(section);
            return;
        }
    }

    debug!(section = %section.label(), groups = groups.len(), "splitting by images");
    let mut loose: Vec<NodeRef<'a, Node>> = Vec::new();
    let mut next_group = groups.iter().peekable();
    let mut i = 0;
    while i < nodes.len() {
        if let Some(&&(start, end)) = next_group.peek() {
            if start == i {
                flush_loose(doc, &mut loose);
                doc.analyze_section(&Section::span(nodes[start..=end].to_vec()), depth + 1);
                next_group.next();
                i = end + 1;
                continue;
            }
        }
        loose.push(nodes[i]);
        i += 1;
    }
    flush_loose(doc, &mut loose);
}

/// One text block per run of paragraphs. Other nodes stay with the run they fall in.
fn split_paragraph_runs<'a>(doc: &mut DocumentAnalyzer<'_>, section: &Section<'a>, nodes: &[NodeRef<'a, Node>]) {
    let run_length = doc.config().thresholds.paragraph_run.max(1);
    let mut runs: Vec<Vec<NodeRef<'a, Node>>> = Vec::new();
    let mut current = Vec::new();
    let mut paragraphs = 0;

    for node in nodes {
        current.push(*node);
        paragraphs += paragraph_count(node);
        if paragraphs >= run_length {
            runs.push(std::mem::take(&mut current));
            paragraphs = 0;
        }
    }
    if !current.is_empty() {
        match runs.last_mut() {
            Some(last) if paragraphs == 0 => last.append(&mut current),
            _ => runs.push(current),
        }
    }

    debug!(section = %section.label(), runs = runs.len(), "splitting paragraph runs");
    for run in runs {
        doc.run(Route::Text, &Section::span(run));
    }
}

fn flush_loose<'a>(doc: &mut DocumentAnalyzer<'_>, loose: &mut Vec<NodeRef<'a, Node>>) {
    if !loose.is_empty() {
        doc.analyze_content(&Section::span(std::mem::take(loose)));
    }
}

fn holds_image(node: &NodeRef<'_, Node>) -> bool {
    ElementRef::wrap(*node).is_some_and(|el| IMAGE.matches(&el) || el.select(&IMAGE).next().is_some())
}

fn is_heading(node: &NodeRef<'_, Node>) -> bool {
    ElementRef::wrap(*node).is_some_and(|el| HEADINGS.matches(&el))
}

fn is_paragraph(node: &NodeRef<'_, Node>) -> bool {
    ElementRef::wrap(*node).is_some_and(|el| el.value().name() == "p")
}

fn paragraph_count(node: &NodeRef<'_, Node>) -> usize {
    ElementRef::wrap(*node).map_or(0, |el| {
        usize::from(PARAGRAPH.matches(&el)) + el.select(&PARAGRAPH).count()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockbuilder_shared::{Block, BlockContent, BlockType, ReconstructConfig};
    use scraper::{Html, Selector};

    fn split(html: &str, config: &ReconstructConfig) -> Vec<Block> {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("body > *").unwrap();
        let root = doc.select(&sel).next().expect("top-level element");
        let mut analyzer = DocumentAnalyzer::new(config);
        split_section(&mut analyzer, &Section::of_element(root), 0);
        analyzer.into_blocks()
    }

    fn types(blocks: &[Block]) -> Vec<BlockType> {
        blocks.iter().map(Block::block_type).collect()
    }

    #[test]
    fn images_split_into_media_groups() {
        let text = "A sentence long enough to count as real descriptive product copy.";
        let html = format!(
            r#"<div>
                <h3>Frame</h3><figure><img src="/frame.jpg"></figure><p>{text}</p>
                <h3>Wheels</h3><figure><img src="/wheel.jpg"></figure><p>{text}</p>
                <p>Closing words.</p>
            </div>"#
        );
        let blocks = split(&html, &ReconstructConfig::default());
        assert_eq!(types(&blocks), vec![BlockType::ImageText, BlockType::ImageText, BlockType::Text]);
        assert_eq!(blocks[0].title, "Frame");
        assert_eq!(blocks[1].title, "Wheels");
    }

    #[test]
    fn paragraph_runs_of_three() {
        let paragraphs: String = (1..=7).map(|i| format!("<p>Paragraph {i}.</p>")).collect();
        let blocks = split(&format!("<div><h2>Story</h2>{paragraphs}</div>"), &ReconstructConfig::default());
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].title, "Story");
        match &blocks[2].content {
            BlockContent::Text { content, .. } => assert_eq!(content, "<p>Paragraph 7.</p>"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn trailing_non_paragraphs_join_last_run() {
        let blocks = split(
            "<div><p>1</p><p>2</p><p>3</p><ul><li>tail</li></ul></div>",
            &ReconstructConfig::default(),
        );
        assert_eq!(blocks.len(), 1);
        match &blocks[0].content {
            BlockContent::Text { content, .. } => assert!(content.ends_with("<ul><li>tail</li></ul>")),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn single_wrapper_is_unwrapped() {
        let blocks = split(
            r#"<div><div><p>Quality</p><p>Craft</p></div></div>"#,
            &ReconstructConfig::default(),
        );
        assert_eq!(types(&blocks), vec![BlockType::Text]);
    }

    #[test]
    fn depth_limit_goes_straight_to_content() {
        let mut config = ReconstructConfig::default();
        config.max_split_depth = 0;
        let blocks = split("<div><p>a</p><p>b</p><p>c</p><p>d</p></div>", &config);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].block_type(), BlockType::Text);
    }

    #[test]
    fn deep_nesting_terminates() {
        let depth = 200;
        let html = format!("{}<p>deep</p>{}", "<div><span>".repeat(depth), "</span></div>".repeat(depth));
        let blocks = split(&html, &ReconstructConfig::default());
        assert_eq!(types(&blocks), vec![BlockType::Text]);
    }
}
