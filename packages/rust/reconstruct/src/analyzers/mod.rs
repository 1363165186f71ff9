//! Section analyzers: one per target block type.
//!
//! Each analyzer reads a [`Section`] and builds exactly one [`Block`]. An
//! analyzer returns `Err` only when the section lacks something the block
//! cannot exist without (an image for an image block, a source for a video);
//! degenerate input otherwise yields a valid block with empty fields.

mod cta;
mod faq;
mod features;
mod gallery;
mod hero;
mod media;
mod specs;
mod text;

use blockbuilder_shared::{Block, BlockType, DEFAULT_BUTTON_URL, Result, Thresholds};
use scraper::ElementRef;

use crate::dom::{Section, element_text, is_descendant_of};
use crate::patterns::{BUTTON, FIGCAPTION, HEADINGS, LINK};
use crate::rules::Route;

/// Build the block for `section` along `route`.
pub(crate) fn analyze(route: Route, section: &Section<'_>, thresholds: &Thresholds) -> Result<Block> {
    match route {
        Route::Hero => hero::analyze(section),
        Route::Gallery => gallery::analyze(section, thresholds),
        Route::Features { benefits } => features::analyze(section, benefits),
        Route::Faq => faq::analyze(section),
        Route::Cta => cta::analyze(section),
        Route::Media { text_first } => media::analyze_image_text(section, text_first),
        Route::Image => media::analyze_image(section),
        Route::Video => media::analyze_video(section),
        Route::Specifications => specs::analyze(section),
        Route::Text => text::analyze(section),
    }
}

// ---------------------------------------------------------------------------
// Shared extraction helpers
// ---------------------------------------------------------------------------

/// Text of the first non-empty heading in the section.
pub(crate) fn heading(section: &Section<'_>) -> Option<String> {
    heading_outside(section, &[])
}

/// First non-empty heading that is not part of any of `items`.
fn heading_outside(section: &Section<'_>, items: &[ElementRef<'_>]) -> Option<String> {
    section
        .select(&HEADINGS)
        .filter(|h| !items.iter().any(|item| h.id() == item.id() || is_descendant_of(*h, *item)))
        .map(element_text)
        .find(|text| !text.is_empty())
}

/// Block title: the section heading, or the type's default title.
fn title_for(block_type: BlockType, heading: &str) -> String {
    if heading.is_empty() {
        block_type.default_title().to_string()
    } else {
        heading.to_string()
    }
}

/// A button-like element's label and target.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Button {
    text: String,
    url: String,
}

impl Default for Button {
    fn default() -> Self {
        Self {
            text: String::new(),
            url: DEFAULT_BUTTON_URL.to_string(),
        }
    }
}

/// The first button-like element. The URL comes from its own `href`, or a
/// link nested inside it, or defaults to `#`.
fn find_button(section: &Section<'_>) -> Button {
    let Some(element) = section.first(&BUTTON) else {
        return Button::default();
    };
    let url = element
        .value()
        .attr("href")
        .or_else(|| element.select(&LINK).next().and_then(|a| a.value().attr("href")))
        .filter(|href| !href.trim().is_empty())
        .unwrap_or(DEFAULT_BUTTON_URL);
    Button {
        text: element_text(element),
        url: url.to_string(),
    }
}

/// Caption of the `figure` enclosing `image`, if any.
fn figure_caption(image: ElementRef<'_>) -> Option<String> {
    image
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "figure")
        .and_then(|figure| figure.select(&FIGCAPTION).next())
        .map(element_text)
}

/// Non-empty attribute value.
fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name).filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use scraper::{Html, Selector};

    use crate::dom::Section;

    /// Parse `html` and run `f` on the first top-level body element as a section.
    pub fn with_section<R>(html: &str, f: impl FnOnce(&Section<'_>) -> R) -> R {
        let doc = Html::parse_document(html);
        let sel = Selector::parse("body > *").unwrap();
        let root = doc.select(&sel).next().expect("top-level element");
        f(&Section::of_element(root))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::with_section;
    use super::*;

    #[test]
    fn heading_skips_empty_headings() {
        let h = with_section("<div><h2> </h2><h3>Real  title</h3></div>", heading);
        assert_eq!(h.as_deref(), Some("Real title"));
    }

    #[test]
    fn button_prefers_own_href() {
        let b = with_section(r#"<div><a class="btn" href="/buy">Buy now</a></div>"#, find_button);
        assert_eq!(b.text, "Buy now");
        assert_eq!(b.url, "/buy");
    }

    #[test]
    fn button_uses_nested_link() {
        let b = with_section(
            r#"<div><div class="cta-button"><a href="/shop">Shop</a></div></div>"#,
            find_button,
        );
        assert_eq!(b.url, "/shop");
        assert_eq!(b.text, "Shop");
    }

    #[test]
    fn button_without_href_defaults() {
        let b = with_section("<div><button>Order</button></div>", find_button);
        assert_eq!(b.url, "#");
        assert_eq!(b.text, "Order");
        assert_eq!(with_section("<div><p>x</p></div>", find_button), Button::default());
    }

    #[test]
    fn title_falls_back_to_default() {
        assert_eq!(title_for(BlockType::Faq, ""), "FAQ");
        assert_eq!(title_for(BlockType::Faq, "Questions"), "Questions");
    }
}
