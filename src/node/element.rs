//! Element type - HTML elements
//!
//! The core building block of the tree.

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::{Attrs, AttrsExt};

use super::{Children, Node, Text};

// =============================================================================
// Element
// =============================================================================

/// HTML element with children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lowercased by the parser
    pub tag: CompactString,
    /// Element attributes
    pub attrs: Attrs,
    /// Child nodes
    pub children: Children,
}

impl Element {
    /// Create an empty element
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: SmallVec::new(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder API
    // ─────────────────────────────────────────────────────────────────────────

    /// Set the `class` attribute
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Set an attribute
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Append a child element
    pub fn child(mut self, child: Element) -> Self {
        self.push_elem(child);
        self
    }

    /// Append an escaped text child
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.push_text(text);
        self
    }

    /// Append a verbatim text child
    pub fn raw(mut self, raw: impl Into<String>) -> Self {
        self.children.push(Node::Text(Text::raw(raw)));
        self
    }

    /// Append a child element
    pub fn push_elem(&mut self, child: Element) {
        self.children.push(Node::Element(Box::new(child)));
    }

    /// Append an escaped text child
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(Text::new(text)));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Attribute access
    // ─────────────────────────────────────────────────────────────────────────

    /// Get attribute value by name
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attr(name)
    }

    /// Set attribute value (update if exists, add if not)
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.set_attr(name, value);
    }

    /// Remove attribute by name, returning the old value if it existed
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove_attr(name)
    }

    /// Check if attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.has_attr(name)
    }

    /// The `id` attribute
    pub fn id(&self) -> Option<&str> {
        self.get_attr("id")
    }

    /// The `class` attribute
    pub fn class(&self) -> Option<&str> {
        self.get_attr("class")
    }

    /// Check the class list for `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.attrs.has_class(class)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Other helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Check the tag name
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Check if element has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of direct children (all node types)
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Iterate over child element references
    pub fn children_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| n.as_element())
    }

    /// Iterate over child element mutable references
    pub fn children_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|n| n.as_element_mut())
    }

    /// Take all children, leaving the element empty
    pub fn take_children(&mut self) -> Children {
        std::mem::take(&mut self.children)
    }

    /// Get text content of this element (concatenated from all text nodes)
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, buf: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(t) => buf.push_str(&t.content),
                Node::Element(e) => e.collect_text(buf),
            }
        }
    }

    /// Remove every descendant element matching `predicate`, returning how
    /// many were removed. Matching elements are removed with their subtree.
    pub fn remove_descendants<F>(&mut self, predicate: &F) -> usize
    where
        F: Fn(&Element) -> bool,
    {
        let before = self.children.len();
        self.children
            .retain(|node| !node.as_element().is_some_and(|e| predicate(e)));
        let mut removed = before - self.children.len();
        for child in self.children_elements_mut() {
            removed += child.remove_descendants(predicate);
        }
        removed
    }
}
