//! Selector, class-name and vocabulary tables shared by the classifier and analyzers.

use std::sync::LazyLock;

use blockbuilder_shared::BlockType;
use regex::Regex;
use scraper::Selector;

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("hardcoded selector is valid")
}

fn ci(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("hardcoded regex is valid")
}

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

pub(crate) static BODY: LazyLock<Selector> = LazyLock::new(|| css("body"));
pub(crate) static IMAGE: LazyLock<Selector> = LazyLock::new(|| css("img"));
pub(crate) static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| css("p"));
pub(crate) static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| css("li"));
pub(crate) static H1: LazyLock<Selector> = LazyLock::new(|| css("h1"));
pub(crate) static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| css("h1, h2, h3, h4, h5, h6"));
pub(crate) static CONTENT_HEADING: LazyLock<Selector> = LazyLock::new(|| css("h1, h2, h3"));
pub(crate) static FIGCAPTION: LazyLock<Selector> = LazyLock::new(|| css("figcaption"));

/// Anything that looks like a call-to-action button.
pub(crate) static BUTTON: LazyLock<Selector> = LazyLock::new(|| {
    css(r#"a.button, .btn, button, [class*="button"], [class*="btn"]"#)
});
pub(crate) static LINK: LazyLock<Selector> = LazyLock::new(|| css("a[href]"));

/// Headline shapes that mark a hero.
pub(crate) static HERO_HEADLINE: LazyLock<Selector> = LazyLock::new(|| css("h1, h2.hero-title"));
pub(crate) static HERO_IMAGE: LazyLock<Selector> = LazyLock::new(|| {
    css(r#"img[class*="hero"], img[class*="banner"], .hero img, .banner img"#)
});

pub(crate) static FAQ_MARKERS: LazyLock<Selector> = LazyLock::new(|| {
    css(r#"details, summary, dt, .question, .accordion-header, [data-toggle="collapse"]"#)
});
pub(crate) static FAQ_ITEMS: LazyLock<Selector> =
    LazyLock::new(|| css("details, .faq-item, .accordion-item, dt, .question"));
pub(crate) static FAQ_QUESTION: LazyLock<Selector> =
    LazyLock::new(|| css(".question, h3, h4, strong"));
pub(crate) static FAQ_ANSWER: LazyLock<Selector> = LazyLock::new(|| css(".answer, p"));
pub(crate) static QUESTION_CLASS: LazyLock<Selector> = LazyLock::new(|| css(".question"));
pub(crate) static SUMMARY: LazyLock<Selector> = LazyLock::new(|| css("summary"));

/// List-like elements counted by the features/benefits structure check.
pub(crate) static LIST_LIKE: LazyLock<Selector> =
    LazyLock::new(|| css("li, .card, .feature, .item"));
pub(crate) static FEATURE_ITEMS: LazyLock<Selector> =
    LazyLock::new(|| css(".feature, .benefit, .item, .card, li"));
pub(crate) static FEATURE_TITLE: LazyLock<Selector> =
    LazyLock::new(|| css("h1, h2, h3, h4, h5, h6, strong, .title"));
pub(crate) static FEATURE_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| css("p, .description"));

pub(crate) static TABLE_ROW: LazyLock<Selector> = LazyLock::new(|| css("tr"));
pub(crate) static TABLE_CELL: LazyLock<Selector> = LazyLock::new(|| css("th, td"));
pub(crate) static TERM: LazyLock<Selector> = LazyLock::new(|| css("dt"));

pub(crate) static VIDEO_SOURCE: LazyLock<Selector> =
    LazyLock::new(|| css("iframe[src], video[src], video source[src]"));

/// `<summary>` markup stripped out of a `<details>` answer.
pub(crate) static SUMMARY_MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<summary[^>]*>.*?</summary\s*>").expect("valid regex"));

// ---------------------------------------------------------------------------
// Class-name patterns
// ---------------------------------------------------------------------------

/// Class-name regexes per block type, in tie-break order.
pub(crate) static CLASS_PATTERNS: LazyLock<Vec<(BlockType, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (BlockType::Hero, vec![ci("hero"), ci("banner"), ci("jumbotron")]),
        (
            BlockType::Gallery,
            vec![ci("gallery"), ci("carousel"), ci("slider"), ci("slideshow")],
        ),
        (BlockType::Features, vec![ci("feature")]),
        (BlockType::Benefits, vec![ci("benefit"), ci("advantage")]),
        (BlockType::Faq, vec![ci("faq"), ci("accordion"), ci("question")]),
        (BlockType::Cta, vec![ci("cta"), ci("call-?to-?action")]),
        (
            BlockType::ImageText,
            vec![ci("image-text"), ci("img-text"), ci("media-left")],
        ),
        (
            BlockType::TextImage,
            vec![ci("text-image"), ci("text-img"), ci("media-right")],
        ),
        (BlockType::Specifications, vec![ci("spec"), ci("technical")]),
        (BlockType::Video, vec![ci("video")]),
        (BlockType::Text, vec![ci("^text(-block)?$"), ci("rich-?text")]),
    ]
});

/// Number of `classes` matching any pattern registered for `block_type`.
pub(crate) fn class_matches(block_type: BlockType, classes: &[&str]) -> usize {
    CLASS_PATTERNS
        .iter()
        .find(|(t, _)| *t == block_type)
        .map(|(_, patterns)| {
            classes
                .iter()
                .filter(|class| patterns.iter().any(|re| re.is_match(class)))
                .count()
        })
        .unwrap_or(0)
}

/// Block type with the most matching `classes`, first registered on ties.
pub(crate) fn best_class_match(classes: &[&str]) -> Option<(BlockType, usize)> {
    let mut best: Option<(BlockType, usize)> = None;
    for (block_type, _) in CLASS_PATTERNS.iter() {
        let matches = class_matches(*block_type, classes);
        if matches > best.map_or(0, |(_, n)| n) {
            best = Some((*block_type, matches));
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Map a `data-*-type` value onto the block vocabulary.
pub(crate) fn block_type_synonym(raw: &str) -> Option<BlockType> {
    let normalized = raw.trim().to_lowercase();
    let block_type = match normalized.as_str() {
        "hero" | "banner" | "jumbotron" | "intro" => BlockType::Hero,
        "text" | "content" | "richtext" | "rich-text" | "paragraph" => BlockType::Text,
        "features" | "feature" | "feature-list" => BlockType::Features,
        "benefits" | "benefit" | "advantages" => BlockType::Benefits,
        "specifications" | "specification" | "specs" | "spec" => BlockType::Specifications,
        "image" | "picture" | "photo" => BlockType::Image,
        "gallery" | "slideshow" | "carousel" | "slider" | "images" => BlockType::Gallery,
        "imagetext" | "image-text" | "image_text" => BlockType::ImageText,
        "textimage" | "text-image" | "text_image" => BlockType::TextImage,
        "faq" | "faqs" | "accordion" | "questions" => BlockType::Faq,
        "cta" | "call-to-action" | "calltoaction" => BlockType::Cta,
        "video" | "embed" => BlockType::Video,
        _ => return None,
    };
    Some(block_type)
}

/// Whether lowercased section text reads as a list of benefits rather than features.
pub(crate) fn mentions_benefits(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("benefit") || lower.contains("advantage")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_normalize_case_and_whitespace() {
        assert_eq!(block_type_synonym("  Banner "), Some(BlockType::Hero));
        assert_eq!(block_type_synonym("SLIDESHOW"), Some(BlockType::Gallery));
        assert_eq!(block_type_synonym("accordion"), Some(BlockType::Faq));
        assert_eq!(block_type_synonym("imageText"), Some(BlockType::ImageText));
        assert_eq!(block_type_synonym("text-image"), Some(BlockType::TextImage));
        assert_eq!(block_type_synonym("newsletter"), None);
    }

    #[test]
    fn every_block_type_has_its_own_name_as_synonym() {
        for t in BlockType::ALL {
            assert_eq!(block_type_synonym(t.as_str()), Some(t), "{t}");
        }
    }

    #[test]
    fn best_class_match_prefers_more_matches_then_order() {
        assert_eq!(best_class_match(&["features", "hero"]), Some((BlockType::Hero, 1)));
        assert_eq!(
            best_class_match(&["gallery", "slider", "hero"]),
            Some((BlockType::Gallery, 2))
        );
        assert_eq!(best_class_match(&["sections", "wrapper"]), None);
        assert_eq!(best_class_match(&[]), None);
    }

    #[test]
    fn class_matches_counts_matching_classes() {
        assert_eq!(class_matches(BlockType::Hero, &["hero-banner", "container"]), 1);
        assert_eq!(class_matches(BlockType::Hero, &["hero", "Banner", "jumbotron"]), 3);
        assert_eq!(class_matches(BlockType::Text, &["text", "context"]), 1);
        assert_eq!(class_matches(BlockType::Cta, &["call-to-action"]), 1);
    }

    #[test]
    fn benefits_wording() {
        assert!(mentions_benefits("Key Benefits of owning"));
        assert!(mentions_benefits("ADVANTAGES"));
        assert!(!mentions_benefits("Features"));
    }
}
