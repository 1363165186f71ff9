//! Section classification: explicit attributes, class names and structure.
//!
//! All three heuristics run on every section and the winner is picked by
//! [`Classification::rank`]: an attribute-sourced result always outranks the
//! others, then the higher confidence wins, then class beats structure.

use std::collections::BTreeMap;

use blockbuilder_shared::{BlockType, Thresholds};
use tracing::trace;

use crate::dom::Section;
use crate::patterns::{
    BUTTON, FAQ_MARKERS, HERO_HEADLINE, HERO_IMAGE, IMAGE, LIST_LIKE, best_class_match,
    block_type_synonym, mentions_benefits,
};

/// Attributes that name a block type explicitly, in lookup order.
pub(crate) const TYPE_ATTRIBUTES: &[&str] = &["data-section-type", "data-block-type", "data-type"];

/// Which heuristic produced a classification. Later variants win ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    Structure,
    Class,
    Attribute,
}

/// Best guess at a section's block type.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub block_type: BlockType,
    /// 0 to 100.
    pub confidence: u8,
    pub source: Source,
    /// Extra hints: non-type `data-*` attributes, gallery `columns`, `textFirst`.
    pub properties: BTreeMap<String, String>,
}

impl Classification {
    fn new(block_type: BlockType, confidence: u8, source: Source) -> Self {
        Self {
            block_type,
            confidence,
            source,
            properties: BTreeMap::new(),
        }
    }

    fn with_property(mut self, key: &str, value: impl ToString) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// Ordering key: attribute first, then confidence, then source.
    pub fn rank(&self) -> (bool, u8, Source) {
        (self.source == Source::Attribute, self.confidence, self.source)
    }

    /// Whether this classification beats `other`.
    pub fn outranks(&self, other: &Classification) -> bool {
        self.rank() > other.rank()
    }

    /// The `textFirst` hint left by the structure check for image/text sections.
    pub fn text_first(&self) -> Option<bool> {
        self.properties.get("textFirst").map(|v| v == "true")
    }
}

/// Classify a section. `None` when no heuristic recognises it.
pub fn extract(section: &Section<'_>, thresholds: &Thresholds) -> Option<Classification> {
    let candidates = [
        from_attributes(section, thresholds),
        from_classes(section, thresholds),
        from_structure(section, thresholds),
    ];
    let best = candidates
        .into_iter()
        .flatten()
        .reduce(|best, next| if next.outranks(&best) { next } else { best });

    trace!(section = %section.label(), ?best, "classified");
    best
}

fn from_attributes(section: &Section<'_>, t: &Thresholds) -> Option<Classification> {
    let block_type = TYPE_ATTRIBUTES
        .iter()
        .filter_map(|name| section.attr(name))
        .find_map(block_type_synonym)?;

    let mut classification = Classification::new(block_type, t.attribute, Source::Attribute);
    for (name, value) in section.data_attributes() {
        let full = format!("data-{name}");
        if !TYPE_ATTRIBUTES.contains(&full.as_str()) {
            classification.properties.insert(name.to_string(), value.to_string());
        }
    }
    Some(classification)
}

fn from_classes(section: &Section<'_>, t: &Thresholds) -> Option<Classification> {
    let classes = section.classes();
    if classes.is_empty() {
        return None;
    }

    best_class_match(&classes).map(|(block_type, matches)| {
        Classification::new(block_type, t.class_confidence(matches), Source::Class)
    })
}

fn from_structure(section: &Section<'_>, t: &Thresholds) -> Option<Classification> {
    let images = section.count(&IMAGE);
    let has_button = section.first(&BUTTON).is_some();

    if section.first(&HERO_HEADLINE).is_some() && (has_button || section.first(&HERO_IMAGE).is_some()) {
        return Some(Classification::new(BlockType::Hero, t.hero_structure, Source::Structure));
    }

    if images >= t.gallery_min_images {
        let columns = images.min(usize::from(t.max_columns));
        return Some(
            Classification::new(BlockType::Gallery, t.gallery_structure, Source::Structure)
                .with_property("columns", columns),
        );
    }

    if section.count(&FAQ_MARKERS) >= t.faq_min_markers {
        return Some(Classification::new(BlockType::Faq, t.faq_structure, Source::Structure));
    }

    let text_len = section.text_len();
    if has_button && text_len < t.cta_max_text {
        return Some(Classification::new(BlockType::Cta, t.cta_structure, Source::Structure));
    }

    if images == 1 && text_len > t.image_text_min_text {
        let text_first = !image_leads(section);
        let block_type = if text_first { BlockType::TextImage } else { BlockType::ImageText };
        return Some(
            Classification::new(block_type, t.image_text_structure, Source::Structure)
                .with_property("textFirst", text_first),
        );
    }

    if section.count(&LIST_LIKE) >= t.list_min_items {
        let classification = if mentions_benefits(&section.text()) {
            Classification::new(BlockType::Benefits, t.benefits_structure, Source::Structure)
        } else {
            Classification::new(BlockType::Features, t.features_structure, Source::Structure)
        };
        return Some(classification);
    }

    None
}

/// Whether the section's first image sits in the first half of its top-level children.
pub(crate) fn image_leads(section: &Section<'_>) -> bool {
    let Some(image) = section.first(&IMAGE) else {
        return false;
    };
    let children = section.child_elements().count();
    section
        .child_index_of(image)
        .is_some_and(|index| 2 * index < children)
}
