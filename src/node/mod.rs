//! Node types for the HTML tree.
//!
//! This module provides `Element`, `Node`, `Text`, and `Document`.
//! The tree is built by [`crate::parse`], mutated by composition
//! transforms, and serialized by [`crate::render`].

mod element;
mod text;
mod document;

pub use element::Element;
pub use text::{Text, TextKind};
pub use document::{Document, ElementIterator};

use smallvec::SmallVec;

/// Node in an HTML tree - either Element or Text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Box<Element>),
    Text(Text),
}

impl Node {
    /// Check if this is an element node.
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    /// Check if this is a text node.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Get as element reference.
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get as mutable element reference.
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get as text reference.
    #[inline]
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Whitespace-only text node
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.as_text().is_some_and(Text::is_whitespace)
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Node::Element(Box::new(elem))
    }
}

impl From<Text> for Node {
    fn from(text: Text) -> Self {
        Node::Text(text)
    }
}

/// Type alias for children collection.
pub type Children = SmallVec<[Node; 8]>;
