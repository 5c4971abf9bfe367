use crate::error::{MailforgeError, MailforgeResult};
use crate::style::StyleMap;
use indexmap::IndexMap;
use scraper::{ElementRef, Html};
use std::ops::Deref;
use tracing::warn;

/// Elements that never carry content and are written without an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements the HTML5 parser reads as raw text; their content is written
/// verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

/// Parser diagnostics about the spelling of tokens, not the shape of the tree.
/// The parser recovers from them with the obvious reading.
const RECOVERABLE_DIAGNOSTICS: &[&str] = &[
    "character reference",
    "duplicate attribute",
    "bad character",
    "invalid character",
];

/// A node of an owned HTML fragment tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element with its attributes in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Parsed inline style; empty when the attribute is absent.
    pub fn style(&self) -> StyleMap {
        self.attr("style").map(StyleMap::parse).unwrap_or_default()
    }

    /// Write `style` back, dropping the attribute when nothing is left.
    pub fn set_style(&mut self, style: &StyleMap) {
        if style.is_empty() {
            self.remove_attr("style");
        } else {
            self.set_attr("style", style.serialize());
        }
    }

    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First descendant (depth-first, document order) matching `pred`.
    pub fn find_descendant(&self, pred: &impl Fn(&Element) -> bool) -> Option<&Element> {
        for child in self.element_children() {
            if pred(child) {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(pred) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_descendant_mut(
        &mut self,
        pred: &impl Fn(&Element) -> bool,
    ) -> Option<&mut Element> {
        find_element_mut(&mut self.children, pred)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(&self.children, &mut text);
        text
    }
}

/// First element in `nodes` or below them (depth-first) matching `pred`.
pub fn find_element_mut<'a>(
    nodes: &'a mut [Node],
    pred: &impl Fn(&Element) -> bool,
) -> Option<&'a mut Element> {
    for node in nodes.iter_mut() {
        if let Node::Element(element) = node {
            if pred(element) {
                return Some(element);
            }
            if let Some(found) = find_element_mut(&mut element.children, pred) {
                return Some(found);
            }
        }
    }
    None
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.children, out),
            Node::Comment(_) => {}
        }
    }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse an HTML fragment (body context) into an owned tree.
///
/// Structural problems (unclosed or misnested tags, stray end tags) make the
/// whole fragment invalid. Token-level slips such as an entity without its
/// `;` are recovered from and logged.
pub fn parse_fragment(html: &str) -> MailforgeResult<Vec<Node>> {
    let fragment = Html::parse_fragment(html);
    let (recovered, fatal): (Vec<_>, Vec<_>) = fragment
        .errors
        .iter()
        .partition(|error| is_recoverable(error));

    for error in &recovered {
        warn!(diagnostic = %error, "recovered from markup problem");
    }
    if let Some(first) = fatal.first() {
        return Err(MailforgeError::ParseError {
            message: first.to_string(),
            count: fatal.len(),
        });
    }
    Ok(convert_children(fragment.root_element()))
}

fn is_recoverable(diagnostic: &str) -> bool {
    let diagnostic = diagnostic.to_ascii_lowercase();
    RECOVERABLE_DIAGNOSTICS
        .iter()
        .any(|marker| diagnostic.contains(marker))
}

fn convert_children(parent: ElementRef<'_>) -> Vec<Node> {
    let mut nodes = Vec::new();
    for child in parent.children() {
        match child.value() {
            scraper::Node::Text(text) => nodes.push(Node::Text(text.deref().to_string())),
            scraper::Node::Comment(comment) => {
                nodes.push(Node::Comment(comment.deref().to_string()))
            }
            scraper::Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    nodes.push(Node::Element(convert_element(element)));
                }
            }
            _ => {}
        }
    }
    nodes
}

fn convert_element(element: ElementRef<'_>) -> Element {
    let value = element.value();
    let mut converted = Element::new(value.name());
    for (name, attr_value) in value.attrs() {
        converted.set_attr(name, attr_value);
    }
    converted.children = convert_children(element);
    converted
}

// ─── Serialization ───────────────────────────────────────────────────────────

/// Serialize a list of nodes back to HTML markup.
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, false, &mut out);
    }
    out
}

fn write_node(node: &Node, raw_text: bool, out: &mut String) {
    match node {
        Node::Text(text) if raw_text => out.push_str(text),
        Node::Text(text) => out.push_str(&html_escape::encode_text(text)),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for (name, value) in &element.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&html_escape::encode_double_quoted_attribute(value));
                out.push('"');
            }
            out.push('>');

            let name = element.name.to_ascii_lowercase();
            if VOID_ELEMENTS.contains(&name.as_str()) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&name.as_str());
            for child in &element.children {
                write_node(child, raw, out);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
    }
}
