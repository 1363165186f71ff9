//! Document walk: finds candidate sections and turns each into a block.
//!
//! Sections come from explicit containers when the document has any, from
//! top-level `h1`/`h2` headings otherwise, and failing both the whole content
//! root is analyzed as one blob.

use blockbuilder_shared::{Block, ReconstructConfig, text_block};
use ego_tree::NodeRef;
use scraper::{ElementRef, Node};
use tracing::{debug, warn};

use crate::analyzers;
use crate::dom::{Section, is_meaningful};
use crate::metadata::{self, TYPE_ATTRIBUTES, image_leads};
use crate::patterns::{IMAGE, LIST_ITEM, best_class_match, block_type_synonym};
use crate::rules::{self, Route, route_for};
use crate::sanitize::sanitize;
use crate::splitter;

/// Title of blocks produced when analysis fails.
pub const FALLBACK_TITLE: &str = "Imported Content";

/// Wrapper elements the content root may descend through.
const ROOT_WRAPPERS: &[&str] = &["div", "main", "article", "center"];

/// The single text block that stands in for content that could not be analyzed.
pub(crate) fn fallback_block(html: &str) -> Block {
    text_block(FALLBACK_TITLE, "", sanitize(html))
}

/// Accumulates the blocks of one document, in source order.
pub(crate) struct DocumentAnalyzer<'c> {
    config: &'c ReconstructConfig,
    blocks: Vec<Block>,
}

impl<'c> DocumentAnalyzer<'c> {
    pub fn new(config: &'c ReconstructConfig) -> Self {
        Self {
            config,
            blocks: Vec::new(),
        }
    }

    pub fn config(&self) -> &ReconstructConfig {
        self.config
    }

    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Walk the document below `body`.
    pub fn analyze_document(&mut self, body: ElementRef<'_>) {
        let root = content_root(body);

        if contains_container(root) {
            let sections = collect_sections(root);
            debug!(sections = sections.len(), "explicit section containers");
            for section in &sections {
                self.analyze_section(section, 0);
            }
            return;
        }

        let sections = heading_sections(root);
        if !sections.is_empty() {
            debug!(sections = sections.len(), "heading-delimited sections");
            for section in &sections {
                self.analyze_section(section, 0);
            }
            return;
        }

        debug!("no sections found, analyzing content root");
        self.analyze_content(&Section::of_element(root));
    }

    /// Classify a section and emit its block, falling back to the rule chain
    /// and then to the content splitter.
    pub fn analyze_section(&mut self, section: &Section<'_>, depth: u32) {
        let thresholds = &self.config.thresholds;

        if let Some(classification) = metadata::extract(section, thresholds) {
            if classification.confidence > thresholds.dispatch {
                debug!(
                    section = %section.label(),
                    block_type = %classification.block_type,
                    confidence = classification.confidence,
                    source = ?classification.source,
                    "dispatching classified section"
                );
                self.run(route_for(&classification), section);
                return;
            }
        }

        if let Some((rule, route)) = rules::fallback_route(section, thresholds) {
            debug!(section = %section.label(), rule, "fallback rule matched");
            self.run(route, section);
            return;
        }

        splitter::split_section(self, section, depth);
    }

    /// Last-resort classification by image count, list length and text.
    pub fn analyze_content(&mut self, section: &Section<'_>) {
        let thresholds = &self.config.thresholds;
        let images = section.count(&IMAGE);
        let has_text = section.has_text();

        let route = if !has_text && images == 0 {
            return;
        } else if images >= thresholds.gallery_min_images {
            Route::Gallery
        } else if images == 1 && has_text {
            Route::Media {
                text_first: !image_leads(section),
            }
        } else if images == 1 {
            Route::Image
        } else if images == 0 && section.count(&LIST_ITEM) >= thresholds.content_list_min_items {
            Route::Features { benefits: None }
        } else if !has_text {
            Route::Gallery
        } else {
            Route::Text
        };

        debug!(section = %section.label(), ?route, images, "content analyzed");
        self.run(route, section);
    }

    /// Run one analyzer. An analyzer error becomes the fallback block here.
    pub fn run(&mut self, route: Route, section: &Section<'_>) {
        match analyzers::analyze(route, section, &self.config.thresholds) {
            Ok(block) => self.blocks.push(block),
            Err(e) => {
                warn!(section = %section.label(), ?route, error = %e, "analyzer failed, using fallback block");
                self.blocks.push(fallback_block(&section.outer_html()));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Section discovery
// ---------------------------------------------------------------------------

/// Descend from `body` through single-child wrappers that hold no text of their own.
fn content_root(body: ElementRef<'_>) -> ElementRef<'_> {
    let mut root = body;
    loop {
        let mut children = root.children().filter(is_meaningful);
        let (Some(only), None) = (children.next(), children.next()) else {
            return root;
        };
        match ElementRef::wrap(only) {
            Some(el) if ROOT_WRAPPERS.contains(&el.value().name()) && !is_container(el) => root = el,
            _ => return root,
        }
    }
}

/// Explicit container: `<section>`, a `div` with a section/block class, or
/// any element naming a known block type.
fn is_container(element: ElementRef<'_>) -> bool {
    let el = element.value();
    match el.name() {
        "section" => return true,
        "div" => {
            let class = el.attr("class").unwrap_or_default();
            if class.contains("section") || class.contains("block") {
                return true;
            }
        }
        _ => {}
    }
    has_type_attribute(element)
}

fn has_type_attribute(element: ElementRef<'_>) -> bool {
    TYPE_ATTRIBUTES
        .iter()
        .filter_map(|name| element.value().attr(name))
        .any(|value| block_type_synonym(value).is_some())
}

/// A container whose only content is other containers and that does not name
/// a block type itself. A wrapper whose classes name a type is still descended
/// into when every child names its own type.
fn is_pure_wrapper(element: ElementRef<'_>) -> bool {
    if has_type_attribute(element) {
        return false;
    }
    let mut children = Vec::new();
    for child in element.children().filter(is_meaningful) {
        match ElementRef::wrap(child) {
            Some(el) if is_container(el) => children.push(el),
            _ => return false,
        }
    }
    if children.is_empty() {
        return false;
    }
    let classes: Vec<&str> = element.value().classes().collect();
    best_class_match(&classes).is_none() || children.into_iter().all(has_type_attribute)
}

fn contains_container(element: ElementRef<'_>) -> bool {
    element.descendants().skip(1).filter_map(ElementRef::wrap).any(is_container)
}

/// Containers below `root`, outermost first, plus spans of loose content between them.
fn collect_sections(root: ElementRef<'_>) -> Vec<Section<'_>> {
    let mut sections = Vec::new();
    walk_containers(root, &mut sections);
    sections
}

fn walk_containers<'a>(parent: ElementRef<'a>, sections: &mut Vec<Section<'a>>) {
    let mut loose: Vec<NodeRef<'a, Node>> = Vec::new();
    for child in parent.children() {
        let Some(el) = ElementRef::wrap(child) else {
            loose.push(child);
            continue;
        };
        if is_container(el) {
            flush_loose(&mut loose, sections);
            if is_pure_wrapper(el) {
                walk_containers(el, sections);
            } else {
                sections.push(Section::of_element(el));
            }
        } else if contains_container(el) {
            flush_loose(&mut loose, sections);
            walk_containers(el, sections);
        } else {
            loose.push(child);
        }
    }
    flush_loose(&mut loose, sections);
}

/// Turn accumulated loose nodes into a span if they carry any content.
fn flush_loose<'a>(loose: &mut Vec<NodeRef<'a, Node>>, sections: &mut Vec<Section<'a>>) {
    if loose.is_empty() {
        return;
    }
    let span = Section::span(std::mem::take(loose));
    if span.has_text() || span.count(&IMAGE) > 0 {
        sections.push(span);
    }
}

fn is_section_heading(node: &NodeRef<'_, Node>) -> bool {
    node.value()
        .as_element()
        .is_some_and(|el| matches!(el.name(), "h1" | "h2"))
}

/// Spans from each top-level `h1`/`h2` up to the next one. Content before the
/// first heading becomes a leading span of its own.
fn heading_sections(root: ElementRef<'_>) -> Vec<Section<'_>> {
    let children: Vec<_> = root.children().collect();
    if !children.iter().any(is_section_heading) {
        return Vec::new();
    }

    let mut sections = Vec::new();
    let mut current = Vec::new();
    for child in children {
        if is_section_heading(&child) {
            flush_loose(&mut current, &mut sections);
        }
        current.push(child);
    }
    flush_loose(&mut current, &mut sections);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn body(doc: &Html) -> ElementRef<'_> {
        let sel = Selector::parse("body").unwrap();
        doc.select(&sel).next().expect("body")
    }

    fn labels(sections: &[Section<'_>]) -> Vec<String> {
        sections.iter().map(Section::label).collect()
    }

    #[test]
    fn content_root_skips_plain_wrappers() {
        let doc = Html::parse_document(
            r#"<div id="app"><main><article><h2>A</h2><p>x</p></article></main></div>"#,
        );
        let root = content_root(body(&doc));
        assert_eq!(root.value().name(), "article");
    }

    #[test]
    fn content_root_stops_at_containers_and_text() {
        let doc = Html::parse_document(r#"<div class="section"><p>x</p></div>"#);
        assert_eq!(content_root(body(&doc)).value().name(), "body");

        let doc = Html::parse_document("<div>loose text<div><p>x</p></div></div>");
        assert_eq!(content_root(body(&doc)).value().name(), "div");
    }

    #[test]
    fn containers_are_outermost_with_loose_spans_between() {
        let doc = Html::parse_document(
            r#"<section class="a"><h2>A</h2><section class="inner"><p>x</p></section></section>
               <p>loose</p>
               <div class="content-block"><p>y</p></div>
               <aside data-block-type="cta"><a class="btn">Go</a></aside>"#,
        );
        let sections = collect_sections(body(&doc));
        assert_eq!(
            labels(&sections),
            vec!["section.a", "span(3 nodes)", "div.content-block", "aside"]
        );
    }

    #[test]
    fn pure_wrappers_are_descended_into() {
        let doc = Html::parse_document(
            r#"<div class="sections"><section><p>1</p></section><section><p>2</p></section></div>"#,
        );
        let sections = collect_sections(body(&doc));
        assert_eq!(sections.len(), 2);
        assert!(sections.iter().all(|s| s.host().is_some()));
    }

    #[test]
    fn wrappers_naming_a_type_stay_whole() {
        let doc = Html::parse_document(
            r#"<section class="features"><div class="feature-block"><h3>A</h3></div><div class="feature-block"><h3>B</h3></div></section>"#,
        );
        assert_eq!(labels(&collect_sections(body(&doc))), vec!["section.features"]);

        let doc = Html::parse_document(
            r#"<div class="gallery-wrap"><section data-block-type="hero"><h1>A</h1></section><section data-block-type="cta"><a class="btn">Go</a></section></div>"#,
        );
        assert_eq!(collect_sections(body(&doc)).len(), 2);

        let doc = Html::parse_document(
            r#"<section data-block-type="features"><div class="block"><p>1</p></div><div class="block"><p>2</p></div></section>"#,
        );
        assert_eq!(collect_sections(body(&doc)).len(), 1);
    }

    #[test]
    fn only_known_type_values_mark_containers() {
        let doc = Html::parse_document(r#"<p>Price: <span data-type="price">$10</span></p>"#);
        assert!(!contains_container(body(&doc)));

        let doc = Html::parse_document(r#"<aside data-type=" FAQ "><p>x</p></aside>"#);
        assert!(contains_container(body(&doc)));
    }

    #[test]
    fn non_container_wrappers_are_walked() {
        let doc = Html::parse_document(
            r#"<header><p>intro</p></header><main><section><p>1</p></section></main>"#,
        );
        let sections = collect_sections(body(&doc));
        assert_eq!(labels(&sections), vec!["span(1 nodes)", "section"]);
    }

    #[test]
    fn headings_delimit_spans_with_leading_content() {
        let doc = Html::parse_document(
            "<p>Intro</p><h2>One</h2><p>a</p><p>b</p><h1>Two</h1><p>c</p>",
        );
        let sections = heading_sections(body(&doc));
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].text(), "Intro");
        assert_eq!(sections[1].text(), "Oneab");
        assert_eq!(sections[2].text(), "Twoc");
    }

    #[test]
    fn blank_leading_content_is_dropped() {
        let doc = Html::parse_document("  <br>  <h2>One</h2><p>a</p>");
        let sections = heading_sections(body(&doc));
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn no_headings_no_sections() {
        let doc = Html::parse_document("<p>a</p><h3>minor</h3>");
        assert!(heading_sections(body(&doc)).is_empty());
    }

    #[test]
    fn analyzer_errors_become_fallback_blocks() {
        let doc = Html::parse_document(r#"<section data-block-type="video"><p>no source <script>x</script></p></section>"#);
        let config = ReconstructConfig::default();
        let mut analyzer = DocumentAnalyzer::new(&config);
        analyzer.analyze_document(body(&doc));
        let blocks = analyzer.into_blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, FALLBACK_TITLE);
        match &blocks[0].content {
            blockbuilder_shared::BlockContent::Text { content, .. } => {
                assert_eq!(content, r#"<section data-block-type="video"><p>no source </p></section>"#);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }
}
