//! HTML fragment sanitizer for stored block content.
//!
//! The fragment is parsed and written back out without `<script>` and
//! `<style>` elements or comments, then whitespace runs are collapsed.
//! Cleaning happens on the parsed tree, so markup-like text inside attribute
//! values or text nodes is escaped instead of being mistaken for a tag, and
//! unterminated scripts, styles and comments swallow the rest of the input
//! the way a browser would read them.

use std::sync::LazyLock;

use ego_tree::NodeRef;
use regex::Regex;
use scraper::{ElementRef, Html, Node};

/// Elements dropped together with their contents.
const DROPPED_ELEMENTS: &[&str] = &["script", "style"];

/// Raw-text elements. Their text is dropped since it would not read back the same.
const RAW_TEXT_ELEMENTS: &[&str] = &["iframe", "noembed", "noframes", "noscript", "plaintext", "xmp"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_RE: hardcoded regex is valid"));

/// Sanitize an HTML fragment before it is stored as block content.
///
/// Idempotent: `sanitize(&sanitize(x)) == sanitize(x)`.
pub fn sanitize(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    for child in fragment.root_element().children() {
        write_node(child, &mut out);
    }
    WHITESPACE_RE.replace_all(&out, " ").trim().to_string()
}

fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => {
            let raw_parent = node
                .parent()
                .and_then(ElementRef::wrap)
                .is_some_and(|parent| RAW_TEXT_ELEMENTS.contains(&parent.value().name()));
            if !raw_parent {
                out.push_str(&escape_text(text));
            }
        }
        Node::Element(element) => {
            let name = element.name();
            if DROPPED_ELEMENTS.contains(&name) {
                return;
            }
            // Tag soup such as `<p<b>` yields names no tag can carry; keep the contents only.
            if !is_plain_name(name) {
                node.children().for_each(|child| write_node(child, out));
                return;
            }

            out.push('<');
            out.push_str(name);
            for (attr, value) in element.attrs().filter(|(attr, _)| is_plain_name(attr)) {
                out.push_str(&format!(r#" {attr}="{}""#, html_escape::encode_quoted_attribute(value)));
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&name) {
                return;
            }
            node.children().for_each(|child| write_node(child, out));
            out.push_str(&format!("</{name}>"));
        }
        // Comments, doctypes and template contents.
        _ => {}
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['<', '>', '"', '\'', '/', '='])
}

/// Escape a text node; non-breaking spaces stay as entities so whitespace
/// collapsing leaves them alone.
pub(crate) fn escape_text(text: &str) -> String {
    html_escape::encode_text(text).replace('\u{a0}', "&nbsp;")
}
