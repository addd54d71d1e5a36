//! HTML Rendering
//!
//! Serializes documents, elements and fragments back to markup.

use crate::attr::Attrs;
use crate::node::{Document, Element, Node};
use crate::parse::is_void_element;

// =============================================================================
// RenderConfig
// =============================================================================

/// Configuration for HTML rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderConfig {
    /// Write void elements as `<br />` instead of `<br>`.
    ///
    /// Required for XHTML output, which is parsed as XML by browsers.
    pub self_close_void: bool,
}

impl RenderConfig {
    /// HTML serialization (`<br>`).
    pub const HTML: Self = Self { self_close_void: false };

    /// XHTML serialization (`<br />`).
    pub const XHTML: Self = Self { self_close_void: true };
}

// =============================================================================
// Document Rendering
// =============================================================================

/// Render a document to HTML string.
pub fn render_document(doc: &Document, config: &RenderConfig) -> String {
    render_nodes(&doc.children, config)
}

/// Render a node list (fragment) to HTML string.
pub fn render_nodes(nodes: &[Node], config: &RenderConfig) -> String {
    let mut output = String::new();
    for node in nodes {
        render_node(node, config, &mut output);
    }
    output
}

/// Render a single element to HTML string.
pub fn render_element_to_string(elem: &Element, config: &RenderConfig) -> String {
    let mut output = String::new();
    render_element(elem, config, &mut output);
    output
}

/// Render an element to HTML.
fn render_element(elem: &Element, config: &RenderConfig, output: &mut String) {
    output.push('<');
    output.push_str(&elem.tag);

    render_attrs(&elem.attrs, output);

    // Void elements
    if is_void_element(&elem.tag) {
        output.push_str(if config.self_close_void { " />" } else { ">" });
        return;
    }

    output.push('>');

    for child in &elem.children {
        render_node(child, config, output);
    }

    output.push_str("</");
    output.push_str(&elem.tag);
    output.push('>');
}

/// Render a node to HTML.
fn render_node(node: &Node, config: &RenderConfig, output: &mut String) {
    match node {
        Node::Element(elem) => render_element(elem, config, output),
        Node::Text(text) => {
            if text.is_raw() {
                output.push_str(&text.content);
            } else {
                output.push_str(&escape_html(&text.content));
            }
        }
    }
}

/// Render attributes to HTML.
fn render_attrs(attrs: &Attrs, output: &mut String) {
    for (name, value) in attrs.iter() {
        output.push(' ');
        output.push_str(name);
        output.push_str("=\"");
        output.push_str(&escape_attr(value));
        output.push('"');
    }
}

/// Escape text content.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape an attribute value. Values are held decoded, so every `&` is
/// written as `&amp;`.
pub fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '\u{a0}' => result.push_str("&nbsp;"),
            _ => result.push(c),
        }
    }
    result
}

// =============================================================================
// Tests
// =============================================================================
