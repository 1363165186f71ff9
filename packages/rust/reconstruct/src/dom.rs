//! Read-only section views over a parsed document.
//!
//! A [`Section`] is either an explicit container element or a span of sibling
//! nodes (a heading and everything up to the next heading). Both are borrowed
//! views into the one parsed tree; nothing is cloned or re-parsed, so several
//! sections of the same document never alias each other's state.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node, Selector};

use crate::sanitize::escape_text;

/// Elements whose text is never part of a section's visible text.
const INVISIBLE_TEXT_PARENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A borrowed view of the nodes that make up one candidate block.
#[derive(Clone)]
pub struct Section<'a> {
    /// The container element, when the section is an explicit one.
    host: Option<ElementRef<'a>>,
    /// Top-level nodes of the section, in document order.
    nodes: Vec<NodeRef<'a, Node>>,
}

impl<'a> Section<'a> {
    /// A section backed by a container element; its children are the top-level nodes.
    pub fn of_element(element: ElementRef<'a>) -> Self {
        Self {
            host: Some(element),
            nodes: element.children().collect(),
        }
    }

    /// An implicit section made of sibling nodes, with no container of its own.
    pub fn span(nodes: Vec<NodeRef<'a, Node>>) -> Self {
        Self { host: None, nodes }
    }

    /// The container element for explicit sections.
    pub fn host(&self) -> Option<ElementRef<'a>> {
        self.host
    }

    /// Top-level nodes, including text and comment nodes.
    pub fn nodes(&self) -> &[NodeRef<'a, Node>] {
        &self.nodes
    }

    /// Top-level element nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = ElementRef<'a>> {
        self.nodes.iter().copied().filter_map(ElementRef::wrap)
    }

    /// Every element inside the section (top-level elements included), in document order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'a>> {
        self.nodes
            .iter()
            .flat_map(|node| node.descendants())
            .filter_map(ElementRef::wrap)
    }

    /// Elements inside the section matching `selector`.
    pub fn select<'s>(&'s self, selector: &'s Selector) -> impl Iterator<Item = ElementRef<'a>> + 's {
        self.elements().filter(move |el| selector.matches(el))
    }

    /// First element matching `selector`.
    pub fn first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.select(selector).next()
    }

    /// Number of elements matching `selector`.
    pub fn count(&self, selector: &Selector) -> usize {
        self.select(selector).count()
    }

    /// Visible text of the section, concatenated without normalization.
    pub fn text(&self) -> String {
        self.nodes
            .iter()
            .flat_map(|node| node.descendants())
            .filter_map(visible_text)
            .collect()
    }

    /// Character count of the trimmed visible text.
    pub fn text_len(&self) -> usize {
        self.text().trim().chars().count()
    }

    /// Whether the section has any non-whitespace visible text.
    pub fn has_text(&self) -> bool {
        self.nodes
            .iter()
            .flat_map(|node| node.descendants())
            .filter_map(visible_text)
            .any(|t| !t.trim().is_empty())
    }

    /// Serialized HTML of the top-level nodes.
    pub fn inner_html(&self) -> String {
        self.nodes.iter().map(|node| node_html(*node)).collect()
    }

    /// Serialized HTML of the container, or of the span's nodes.
    pub fn outer_html(&self) -> String {
        match self.host {
            Some(host) => host.html(),
            None => self.inner_html(),
        }
    }

    /// Class names of the container. Implicit sections have none.
    pub fn classes(&self) -> Vec<&'a str> {
        self.host
            .map(|host| host.value().classes().collect())
            .unwrap_or_default()
    }

    /// An attribute of the container.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.host.and_then(|host| host.value().attr(name))
    }

    /// `data-*` attributes of the container, with the `data-` prefix stripped.
    pub fn data_attributes(&self) -> Vec<(&'a str, &'a str)> {
        self.host
            .map(|host| {
                host.value()
                    .attrs()
                    .filter_map(|(name, value)| name.strip_prefix("data-").map(|n| (n, value)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Index among [`Self::child_elements`] of the child that is or contains `element`.
    pub fn child_index_of(&self, element: ElementRef<'a>) -> Option<usize> {
        self.child_elements()
            .position(|child| child.id() == element.id() || is_descendant_of(element, child))
    }

    /// Short description for log fields.
    pub fn label(&self) -> String {
        match self.host {
            Some(host) => {
                let classes: Vec<&str> = host.value().classes().collect();
                if classes.is_empty() {
                    host.value().name().to_string()
                } else {
                    format!("{}.{}", host.value().name(), classes.join("."))
                }
            }
            None => format!("span({} nodes)", self.nodes.len()),
        }
    }
}

impl std::fmt::Debug for Section<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Section")
            .field("label", &self.label())
            .field("nodes", &self.nodes.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Node helpers
// ---------------------------------------------------------------------------

/// Collapsed, trimmed visible text of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    let text: String = element.descendants().filter_map(visible_text).collect();
    collapse_whitespace(&text)
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `element` sits somewhere below `ancestor`.
pub fn is_descendant_of(element: ElementRef<'_>, ancestor: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| node.id() == ancestor.id())
}

/// The next element sibling, skipping text and comments.
pub fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.next_siblings().find_map(ElementRef::wrap)
}

/// Keep only elements that are not nested inside an earlier kept element.
///
/// Input must be in document order, which puts ancestors before descendants.
pub fn outermost<'a>(elements: impl IntoIterator<Item = ElementRef<'a>>) -> Vec<ElementRef<'a>> {
    let mut kept: Vec<ElementRef<'a>> = Vec::new();
    for element in elements {
        if !kept.iter().any(|k| is_descendant_of(element, *k)) {
            kept.push(element);
        }
    }
    kept
}

/// Whether a node carries content: an element, or text that is not blank.
pub fn is_meaningful(node: &NodeRef<'_, Node>) -> bool {
    match node.value() {
        Node::Element(_) => true,
        Node::Text(text) => !text.trim().is_empty(),
        _ => false,
    }
}

fn visible_text<'a>(node: NodeRef<'a, Node>) -> Option<&'a str> {
    let text = node.value().as_text()?;
    let hidden = node
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| INVISIBLE_TEXT_PARENTS.contains(&parent.value().name()));
    if hidden { None } else { Some(&**text) }
}

fn node_html(node: NodeRef<'_, Node>) -> String {
    match node.value() {
        Node::Element(_) => ElementRef::wrap(node).map(|el| el.html()).unwrap_or_default(),
        Node::Text(text) => escape_text(text),
        Node::Comment(comment) => format!("<!--{}-->", &**comment),
        _ => String::new(),
    }
}
