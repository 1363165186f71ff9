//! Block list to HTML export.
//!
//! Every block becomes one `<section class="pdb-block pdb-{type}">` carrying
//! its type in `data-block-type`, so exported descriptions import back into
//! the same sequence of block types. Fields holding sanitized HTML (text
//! content, FAQ answers) are emitted as-is; everything else is escaped.

use std::borrow::Cow;

use tracing::{debug, instrument};

use blockbuilder_shared::{
    Block, BlockContent, BlockStyle, DEFAULT_BUTTON_URL, FaqItem, FeatureItem, GalleryImage, SpecItem,
};

/// Render a whole description, one section per line.
#[instrument(skip_all, fields(blocks = blocks.len()))]
pub fn render_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    for block in blocks {
        html.push_str(&render_block(block));
        html.push('\n');
    }
    debug!(bytes = html.len(), "rendered description");
    html
}

/// Render a single block as a tagged `<section>`.
pub fn render_block(block: &Block) -> String {
    let block_type = block.block_type();
    let mut html = format!(
        r#"<section class="pdb-block pdb-{block_type}" data-block-type="{block_type}" data-block-id="{}" data-columns="{}""#,
        block.id, block.columns
    );
    if let Some(style) = block.style.as_ref().map(style_attribute).filter(|s| !s.is_empty()) {
        html.push_str(&format!(r#" style="{}""#, escape_attr(&style)));
    }
    if !block.visible {
        html.push_str(" hidden");
    }
    html.push('>');
    html.push_str(&render_content(&block.content));
    html.push_str("</section>");
    html
}

fn render_content(content: &BlockContent) -> String {
    let mut html = String::new();
    match content {
        BlockContent::Hero {
            heading,
            subheading,
            button_text,
            button_url,
            background_image,
        } => {
            if let Some(src) = background_image {
                html.push_str(&format!(
                    r#"<img class="pdb-hero-background" src="{}" alt="">"#,
                    escape_attr(src)
                ));
            }
            html.push_str(&heading_tag("h1", heading));
            if !subheading.is_empty() {
                html.push_str(&format!(r#"<p class="pdb-subheading">{}</p>"#, escape_text(subheading)));
            }
            html.push_str(&button(button_text, button_url));
        }
        BlockContent::Text { heading, content } => {
            html.push_str(&heading_tag("h2", heading));
            html.push_str(content);
        }
        BlockContent::Features { heading, items } => {
            html.push_str(&heading_tag("h2", heading));
            html.push_str(&feature_items("feature", items));
        }
        BlockContent::Benefits { heading, items } => {
            html.push_str(&heading_tag("h2", heading));
            html.push_str(&feature_items("benefit", items));
        }
        BlockContent::Specifications { heading, specs } => {
            html.push_str(&heading_tag("h2", heading));
            html.push_str(&spec_table(specs));
        }
        BlockContent::Image { src, alt, caption } => {
            html.push_str(&figure(src, alt, caption));
        }
        BlockContent::Gallery { heading, images } => {
            html.push_str(&heading_tag("h2", heading));
            html.push_str(r#"<div class="pdb-gallery">"#);
            for GalleryImage { src, alt, caption, .. } in images {
                html.push_str(&figure(src, alt, caption));
            }
            html.push_str("</div>");
        }
        BlockContent::ImageText {
            heading,
            content,
            image_src,
            image_alt,
        } => {
            html.push_str(&media_image(image_src, image_alt));
            html.push_str(&media_body(heading, content));
        }
        BlockContent::TextImage {
            heading,
            content,
            image_src,
            image_alt,
        } => {
            html.push_str(&media_body(heading, content));
            html.push_str(&media_image(image_src, image_alt));
        }
        BlockContent::Faq { heading, questions } => {
            html.push_str(&heading_tag("h2", heading));
            html.push_str("<dl>");
            for FaqItem { question, answer, .. } in questions {
                html.push_str(&format!("<dt>{}</dt><dd>{answer}</dd>", escape_text(question)));
            }
            html.push_str("</dl>");
        }
        BlockContent::Cta {
            heading,
            content,
            button_text,
            button_url,
        } => {
            html.push_str(&heading_tag("h2", heading));
            if !content.is_empty() {
                html.push_str(&format!("<p>{}</p>", escape_text(content)));
            }
            html.push_str(&button(button_text, button_url));
        }
        BlockContent::Video { video_url, caption } => {
            html.push_str(&format!(
                r#"<figure class="pdb-video"><iframe src="{}" allowfullscreen></iframe>"#,
                escape_attr(video_url)
            ));
            if !caption.is_empty() {
                html.push_str(&format!("<figcaption>{}</figcaption>", escape_text(caption)));
            }
            html.push_str("</figure>");
        }
    }
    html
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

fn heading_tag(tag: &str, text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("<{tag}>{}</{tag}>", escape_text(text))
    }
}

fn button(text: &str, url: &str) -> String {
    if text.is_empty() && url == DEFAULT_BUTTON_URL {
        return String::new();
    }
    format!(
        r#"<a class="button" href="{}">{}</a>"#,
        escape_attr(url),
        escape_text(text)
    )
}

fn feature_items(class: &str, items: &[FeatureItem]) -> String {
    let mut html = String::from(r#"<div class="pdb-items">"#);
    for item in items {
        html.push_str(&format!(
            r#"<div class="{class}" data-icon="{}">"#,
            escape_attr(&item.icon)
        ));
        html.push_str(&heading_tag("h3", &item.title));
        html.push_str(&format!("<p>{}</p>", escape_text(&item.description)));
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

fn spec_table(specs: &[SpecItem]) -> String {
    let mut html = String::from("<table><tbody>");
    for SpecItem { name, value, .. } in specs {
        html.push_str(&format!(
            "<tr><th>{}</th><td>{}</td></tr>",
            escape_text(name),
            escape_text(value)
        ));
    }
    html.push_str("</tbody></table>");
    html
}

fn figure(src: &str, alt: &str, caption: &str) -> String {
    let mut html = format!(
        r#"<figure><img src="{}" alt="{}">"#,
        escape_attr(src),
        escape_attr(alt)
    );
    if !caption.is_empty() {
        html.push_str(&format!("<figcaption>{}</figcaption>", escape_text(caption)));
    }
    html.push_str("</figure>");
    html
}

fn media_image(src: &str, alt: &str) -> String {
    format!(
        r#"<div class="pdb-media"><img src="{}" alt="{}"></div>"#,
        escape_attr(src),
        escape_attr(alt)
    )
}

fn media_body(heading: &str, content: &str) -> String {
    format!(r#"<div class="pdb-body">{}{content}</div>"#, heading_tag("h2", heading))
}

fn style_attribute(style: &BlockStyle) -> String {
    let declarations = [
        ("background-color", &style.background_color),
        ("color", &style.text_color),
        ("padding", &style.padding),
        ("text-align", &style.alignment),
    ];
    declarations
        .iter()
        .filter_map(|(property, value)| value.as_ref().map(|v| format!("{property}: {v}")))
        .collect::<Vec<_>>()
        .join("; ")
}

fn escape_text(s: &str) -> Cow<'_, str> {
    html_escape::encode_text(s)
}

fn escape_attr(s: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(s)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
