//! Markup parsing on top of html5ever (through `scraper`) and the preserve-set sanitizer.
//!
//! Parsing never fails. Recovery from malformed markup is whatever the HTML tree builder does,
//! so `<b>a <i>b</b> c</i>` keeps `c` italic the way a browser would.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::content::document::TagName;

static SCROLL_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".scroll-text").expect("valid selector"));

/// Owned element tree handed to the sanitizer and tokenizer. Attributes are never carried over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Node {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub(crate) name: String,
    pub(crate) children: Vec<Node>,
}

/// Parse a markup fragment in a `<body>` context.
pub(crate) fn parse_fragment(input: &str) -> Html {
    Html::parse_fragment(input)
}

/// Children of the fragment root. Comments, doctypes and processing instructions are dropped.
pub(crate) fn fragment_nodes(doc: &Html) -> Vec<Node> {
    collect_children(doc.root_element())
}

/// If some element carries class `scroll-text`, return its children.
pub(crate) fn find_scroll_text(doc: &Html) -> Option<Vec<Node>> {
    doc.select(&SCROLL_TEXT).next().map(collect_children)
}

fn collect_children(el: ElementRef<'_>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::new();
    for child in el.children() {
        match child.value() {
            scraper::Node::Text(text) => push_text(&mut out, text),
            scraper::Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    out.push(Node::Element(Element {
                        name: child_el.value().name().to_ascii_lowercase(),
                        children: collect_children(child_el),
                    }));
                }
            }
            _ => {}
        }
    }
    out
}

fn push_text(out: &mut Vec<Node>, text: &str) {
    match out.last_mut() {
        Some(Node::Text(prev)) => prev.push_str(text),
        _ => out.push(Node::Text(text.to_string())),
    }
}

/// Keep preserve-set elements and unwrap every other element, depth-first.
pub(crate) fn sanitize(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Text(t) => push_text(&mut out, &t),
            Node::Element(el) => {
                let children = sanitize(el.children);
                if TagName::from_name(&el.name).is_some() {
                    out.push(Node::Element(Element {
                        name: el.name,
                        children,
                    }));
                } else {
                    for child in children {
                        match child {
                            Node::Text(t) => push_text(&mut out, &t),
                            child => out.push(child),
                        }
                    }
                }
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/content/html.rs"]
mod tests;
