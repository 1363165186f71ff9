//! Routing: which analyzer handles a section.
//!
//! A confident classification maps straight to a [`Route`]. Otherwise the
//! [`FALLBACK_RULES`] are tried in order and the first one that matches wins.

use blockbuilder_shared::{BlockType, Thresholds};

use crate::dom::Section;
use crate::metadata::{Classification, Source, image_leads};
use crate::patterns::{BUTTON, FAQ_ITEMS, FAQ_MARKERS, H1, IMAGE, class_matches};

/// Analyzer selected for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Hero,
    Gallery,
    /// `benefits` is decided by the caller when known, otherwise by the section's wording.
    Features { benefits: Option<bool> },
    Faq,
    Cta,
    /// Image beside text; `text_first` puts the image on the right.
    Media { text_first: bool },
    Image,
    Video,
    Specifications,
    Text,
}

/// Route for a classification that cleared the dispatch threshold.
pub(crate) fn route_for(classification: &Classification) -> Route {
    let explicit = classification.source == Source::Attribute;
    match classification.block_type {
        BlockType::Hero => Route::Hero,
        BlockType::Gallery => Route::Gallery,
        BlockType::Features => Route::Features {
            benefits: explicit.then_some(false),
        },
        BlockType::Benefits => Route::Features {
            benefits: explicit.then_some(true),
        },
        BlockType::Faq => Route::Faq,
        BlockType::Cta => Route::Cta,
        BlockType::ImageText => Route::Media {
            text_first: classification.text_first().unwrap_or(false),
        },
        BlockType::TextImage => Route::Media {
            text_first: classification.text_first().unwrap_or(true),
        },
        BlockType::Image => Route::Image,
        BlockType::Video => Route::Video,
        BlockType::Specifications => Route::Specifications,
        BlockType::Text => Route::Text,
    }
}

/// One step of the fallback chain.
pub(crate) struct Rule {
    pub name: &'static str,
    pub apply: fn(&Section<'_>, &Thresholds) -> Option<Route>,
}

/// Fallback chain for sections without a confident classification, in priority order.
pub(crate) const FALLBACK_RULES: &[Rule] = &[
    Rule {
        name: "hero",
        apply: hero_rule,
    },
    Rule {
        name: "gallery",
        apply: gallery_rule,
    },
    Rule {
        name: "features",
        apply: features_rule,
    },
    Rule {
        name: "faq",
        apply: faq_rule,
    },
    Rule {
        name: "cta",
        apply: cta_rule,
    },
    Rule {
        name: "image-text",
        apply: image_text_rule,
    },
];

/// First matching fallback rule, with its name for logging.
pub(crate) fn fallback_route(section: &Section<'_>, thresholds: &Thresholds) -> Option<(&'static str, Route)> {
    FALLBACK_RULES
        .iter()
        .find_map(|rule| (rule.apply)(section, thresholds).map(|route| (rule.name, route)))
}

fn hero_rule(section: &Section<'_>, _: &Thresholds) -> Option<Route> {
    let by_class = class_matches(BlockType::Hero, &section.classes()) > 0;
    (by_class || section.first(&H1).is_some()).then_some(Route::Hero)
}

fn gallery_rule(section: &Section<'_>, t: &Thresholds) -> Option<Route> {
    (section.count(&IMAGE) >= t.gallery_min_images).then_some(Route::Gallery)
}

fn features_rule(section: &Section<'_>, _: &Thresholds) -> Option<Route> {
    let classes = section.classes();
    if class_matches(BlockType::Benefits, &classes) > 0 {
        Some(Route::Features { benefits: Some(true) })
    } else if class_matches(BlockType::Features, &classes) > 0 {
        Some(Route::Features { benefits: None })
    } else {
        None
    }
}

fn faq_rule(section: &Section<'_>, _: &Thresholds) -> Option<Route> {
    let present = section.first(&FAQ_ITEMS).is_some() || section.first(&FAQ_MARKERS).is_some();
    present.then_some(Route::Faq)
}

fn cta_rule(section: &Section<'_>, t: &Thresholds) -> Option<Route> {
    let short = section.text_len() < t.cta_max_text;
    (section.first(&BUTTON).is_some() && short).then_some(Route::Cta)
}

fn image_text_rule(section: &Section<'_>, t: &Thresholds) -> Option<Route> {
    if section.count(&IMAGE) != 1 || section.text_len() <= t.image_text_min_text {
        return None;
    }
    Some(Route::Media {
        text_first: !image_leads(section),
    })
}
