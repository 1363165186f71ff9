//! HTML-to-block reconstruction.
//!
//! Takes an arbitrary HTML fragment (an exported product description, or
//! markup from elsewhere) and rebuilds it as an ordered list of typed
//! [`Block`]s using explicit data attributes, class names and DOM structure.
//!
//! Reconstruction is total: every input yields a block list, and anything
//! that cannot be analyzed becomes an "Imported Content" text block carrying
//! the sanitized HTML.

mod analyzers;
mod document;
pub mod dom;
pub mod metadata;
mod patterns;
mod rules;
pub mod sanitize;
mod splitter;

use std::panic::{self, AssertUnwindSafe};

use scraper::Html;
use tracing::{debug, instrument, warn};

use blockbuilder_shared::{Block, BlockBuilderError, ReconstructConfig, Result};

use crate::document::{DocumentAnalyzer, fallback_block};
use crate::patterns::BODY;

pub use crate::document::FALLBACK_TITLE;
pub use crate::metadata::{Classification, Source};
pub use crate::sanitize::sanitize;

/// Reconstruct blocks from `html` with the default configuration.
pub fn reconstruct_blocks(html: &str) -> Vec<Block> {
    Reconstructor::default().reconstruct(html)
}

/// Reconstruction with a specific configuration.
#[derive(Debug, Clone, Default)]
pub struct Reconstructor {
    config: ReconstructConfig,
}

impl Reconstructor {
    pub fn new(config: ReconstructConfig) -> Self {
        Self { config }
    }

    /// Reconstruct the block list for one HTML document.
    ///
    /// Empty or whitespace-only input gives an empty list. Documents over the
    /// node budget, and any panic raised while analyzing, give a single
    /// fallback block.
    #[instrument(skip_all, fields(input_len = html.len()))]
    pub fn reconstruct(&self, html: &str) -> Vec<Block> {
        if html.trim().is_empty() {
            return Vec::new();
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.reconstruct_document(html))) {
            Ok(Ok(blocks)) => {
                debug!(blocks = blocks.len(), "reconstruction complete");
                blocks
            }
            Ok(Err(e)) => {
                warn!(error = %e, "reconstruction failed, using fallback block");
                vec![fallback_block(html)]
            }
            Err(_) => {
                warn!("reconstruction panicked, using fallback block");
                vec![fallback_block(html)]
            }
        }
    }

    fn reconstruct_document(&self, html: &str) -> Result<Vec<Block>> {
        let document = Html::parse_document(html);

        let nodes = document.tree.nodes().count();
        if nodes > self.config.max_nodes {
            return Err(BlockBuilderError::validation(format!(
                "document has {nodes} nodes, budget is {}",
                self.config.max_nodes
            )));
        }

        let body = document
            .select(&BODY)
            .next()
            .ok_or_else(|| BlockBuilderError::parse("document has no body"))?;

        let mut analyzer = DocumentAnalyzer::new(&self.config);
        analyzer.analyze_document(body);
        Ok(analyzer.into_blocks())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::{Path, PathBuf};

    use blockbuilder_shared::{BlockContent, BlockType};
    use proptest::prelude::*;

    use super::*;

    fn types(blocks: &[Block]) -> Vec<BlockType> {
        blocks.iter().map(Block::block_type).collect()
    }

    fn fixture_path(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/html")
            .join(name)
    }

    fn fixture(name: &str) -> String {
        std::fs::read_to_string(fixture_path(name))
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    /// A CTA-shaped section whose visible text is exactly `len` characters.
    fn cta_with_text_len(len: usize) -> String {
        // "Buy" + "Buy now" = 10 characters before the filler.
        let filler = "a".repeat(len - 10);
        format!(r#"<div><h2>Buy</h2><p>{filler}</p><a class="button" href="/buy">Buy now</a></div>"#)
    }

    #[test]
    fn empty_input_gives_no_blocks() {
        assert!(reconstruct_blocks("").is_empty());
        assert!(reconstruct_blocks("  \n\t ").is_empty());
    }

    #[test]
    fn attribute_wins_over_hero_classes() {
        let blocks = reconstruct_blocks(
            r#"<section data-section-type="faq" class="hero-banner"><h1>Help</h1><dl><dt>Q</dt><dd>A</dd></dl></section>"#,
        );
        assert_eq!(types(&blocks), vec![BlockType::Faq]);
    }

    #[test]
    fn seven_images_clamp_columns() {
        let imgs: String = (0..7).map(|i| format!(r#"<img src="/{i}.jpg">"#)).collect();
        let blocks = reconstruct_blocks(&format!(r#"<section>{imgs}</section>"#));
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].columns, 4);
        match &blocks[0].content {
            BlockContent::Gallery { images, .. } => assert_eq!(images.len(), 7),
            other => panic!("expected gallery, got {other:?}"),
        }
    }

    #[test]
    fn faq_pairs_dt_and_dd() {
        let blocks = reconstruct_blocks("<section><dl><dt>Q1</dt><dd>A1</dd><dt>Q2</dt><dd>A2</dd></dl></section>");
        assert_eq!(blocks.len(), 1);
        match &blocks[0].content {
            BlockContent::Faq { questions, .. } => {
                let pairs: Vec<_> = questions.iter().map(|q| (q.question.as_str(), q.answer.as_str())).collect();
                assert_eq!(pairs, vec![("Q1", "A1"), ("Q2", "A2")]);
            }
            other => panic!("expected faq, got {other:?}"),
        }
    }

    #[test]
    fn plain_text_falls_back_to_one_text_block() {
        let blocks = reconstruct_blocks("<div><p>Hand-stitched   leather.</p>\n<p>Made to last.</p></div>");
        assert_eq!(blocks.len(), 1);
        match &blocks[0].content {
            BlockContent::Text { content, .. } => {
                assert_eq!(content, "<p>Hand-stitched leather.</p> <p>Made to last.</p>");
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn bare_text_becomes_text_block() {
        let blocks = reconstruct_blocks("just some words");
        assert_eq!(types(&blocks), vec![BlockType::Text]);
    }

    #[test]
    fn cta_text_length_boundary() {
        let blocks = reconstruct_blocks(&cta_with_text_len(299));
        assert_eq!(types(&blocks), vec![BlockType::Cta]);

        let blocks = reconstruct_blocks(&cta_with_text_len(301));
        assert_eq!(blocks.len(), 1);
        assert_ne!(blocks[0].block_type(), BlockType::Cta);
    }

    #[test]
    fn sections_keep_source_order() {
        let html = r#"
            <section data-block-type="hero"><h1>Trail Runner</h1></section>
            <section data-block-type="gallery"><img src="/a.jpg"><img src="/b.jpg"></section>
            <section data-block-type="text"><p>Story</p></section>
            <section data-block-type="cta"><a class="btn" href="/buy">Buy</a></section>
        "#;
        let blocks = reconstruct_blocks(html);
        assert_eq!(
            types(&blocks),
            vec![BlockType::Hero, BlockType::Gallery, BlockType::Text, BlockType::Cta]
        );
        let ids: HashSet<_> = blocks.iter().map(|b| b.id).collect();
        assert_eq!(ids.len(), blocks.len());
    }

    #[test]
    fn heading_sections_without_containers() {
        let html = "<h1>Trail Runner</h1><p>Light.</p><h2>Details</h2><p>Mesh upper.</p><p>Rubber sole.</p>";
        let blocks = reconstruct_blocks(html);
        assert_eq!(types(&blocks), vec![BlockType::Hero, BlockType::Text]);
        assert_eq!(blocks[1].title, "Details");
    }

    #[test]
    fn image_pair_without_text_is_gallery() {
        let blocks = reconstruct_blocks(r#"<img src="/a.jpg" alt="Front"> <img src="/b.jpg" alt="Back">"#);
        assert_eq!(types(&blocks), vec![BlockType::Gallery]);
        assert_eq!(blocks[0].columns, 2);
    }

    #[test]
    fn unknown_type_values_do_not_mark_containers() {
        let html = r#"<div><h2>Trail Runner</h2><p>Price: <span data-type="price">$10</span> only today, while stock lasts.</p></div>"#;
        let blocks = reconstruct_blocks(html);
        assert_eq!(types(&blocks), vec![BlockType::Text]);
        assert_eq!(blocks[0].title, "Trail Runner");
    }

    #[test]
    fn classified_wrapper_stays_one_block() {
        let html = r#"<section class="features">
            <div class="feature-block"><h3>Light</h3><p>Only 200 g.</p></div>
            <div class="feature-block"><h3>Warm</h3><p>Fleece lined.</p></div>
            <div class="feature-block"><h3>Dry</h3><p>Sealed seams.</p></div>
        </section>"#;
        let blocks = reconstruct_blocks(html);
        assert_eq!(types(&blocks), vec![BlockType::Features]);
        match &blocks[0].content {
            BlockContent::Features { items, .. } => {
                let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
                assert_eq!(titles, vec!["Light", "Warm", "Dry"]);
            }
            other => panic!("expected features, got {other:?}"),
        }
    }

    #[test]
    fn markup_in_attributes_keeps_following_content() {
        let html = r#"<section data-block-type="text"><p title="how to use <style> tags">Hello</p><p>World</p></section>"#;
        let blocks = reconstruct_blocks(html);
        assert_eq!(blocks.len(), 1);
        match &blocks[0].content {
            BlockContent::Text { content, .. } => {
                assert!(content.contains("Hello"), "{content}");
                assert!(content.contains("<p>World</p>"), "{content}");
                assert!(!content.contains("<style"), "{content}");
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn node_budget_yields_fallback() {
        let mut config = ReconstructConfig::default();
        config.max_nodes = 5;
        let html = "<p>one</p><p>two</p><p>three</p><script>x</script>";
        let blocks = Reconstructor::new(config).reconstruct(html);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].title, FALLBACK_TITLE);
        match &blocks[0].content {
            BlockContent::Text { content, .. } => assert_eq!(content, "<p>one</p><p>two</p><p>three</p>"),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn every_block_is_valid() {
        let html = fixture("product_full.html");
        let blocks = reconstruct_blocks(&html);
        assert!(!blocks.is_empty());
        for block in &blocks {
            block.validate().expect("valid block");
        }
    }

    #[test]
    fn exported_fixture_round_trips_types() {
        let blocks = reconstruct_blocks(&fixture("product_full.html"));
        assert_eq!(
            types(&blocks),
            vec![
                BlockType::Hero,
                BlockType::Features,
                BlockType::Gallery,
                BlockType::ImageText,
                BlockType::Specifications,
                BlockType::Faq,
                BlockType::Cta,
            ]
        );
    }

    #[test]
    fn unsectioned_fixture_is_split() {
        let blocks = reconstruct_blocks(&fixture("unsectioned.html"));
        assert_eq!(
            types(&blocks),
            vec![BlockType::Hero, BlockType::Benefits, BlockType::TextImage, BlockType::Faq]
        );
    }

    #[test]
    fn class_based_fixture() {
        let blocks = reconstruct_blocks(&fixture("legacy_theme.html"));
        assert_eq!(
            types(&blocks),
            vec![
                BlockType::Hero,
                BlockType::Gallery,
                BlockType::Benefits,
                BlockType::Cta,
                BlockType::Text,
            ]
        );
        assert_eq!(blocks[0].title, "Ceramic Pour-Over");
    }

    #[test]
    fn hostile_fixture_is_sanitized() {
        let blocks = reconstruct_blocks(&fixture("hostile.html"));
        assert_eq!(
            types(&blocks),
            vec![BlockType::Hero, BlockType::Text, BlockType::Faq, BlockType::Text]
        );
        assert_eq!(blocks[3].title, FALLBACK_TITLE);
        let json = serde_json::to_string(&blocks).expect("serialize");
        let lower = json.to_lowercase();
        assert!(!lower.contains("<script"));
        assert!(!lower.contains("<style"));
        assert!(!lower.contains("<!--"));
    }

    proptest! {
        #[test]
        fn reconstruction_is_total(s in ".{0,300}") {
            let blocks = reconstruct_blocks(&s);
            for block in &blocks {
                prop_assert!(block.validate().is_ok());
            }
        }

        #[test]
        fn reconstruction_is_total_on_tag_soup(
            s in "(<section>|</section>|<div class=\"block\">|</div>|<h1>|<h2>|<p>|</p>|<img src=x>|<li>|<dt>|<dd>|<a class=btn>|text| ){0,60}"
        ) {
            let blocks = reconstruct_blocks(&s);
            for block in &blocks {
                prop_assert!(block.validate().is_ok());
            }
        }
    }
}
