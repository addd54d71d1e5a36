//! Document type and related utilities
//!
//! The root container for HTML trees, with query and traversal APIs.

use super::{Children, Element, Node};

// =============================================================================
// Document
// =============================================================================

/// Root document container
///
/// Holds the top-level nodes in source order: XML declaration, doctype,
/// comments, and the `<html>` element (or whatever the input had instead).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level nodes
    pub children: Children,
}

impl Document {
    /// Create a document from top-level nodes
    pub fn new(children: Children) -> Self {
        Self { children }
    }

    /// Create a document with a single root element
    pub fn from_root(root: Element) -> Self {
        let mut children = Children::new();
        children.push(Node::from(root));
        Self { children }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Structural anchors
    // ─────────────────────────────────────────────────────────────────────────

    /// The first `<head>` element
    pub fn head(&self) -> Option<&Element> {
        self.find_element(|e| e.is("head"))
    }

    /// The first `<body>` element
    pub fn body(&self) -> Option<&Element> {
        self.find_element(|e| e.is("body"))
    }

    /// The first `<head>` element (mutable)
    pub fn head_mut(&mut self) -> Option<&mut Element> {
        self.find_element_mut(|e| e.is("head"))
    }

    /// The first `<body>` element (mutable)
    pub fn body_mut(&mut self) -> Option<&mut Element> {
        self.find_element_mut(|e| e.is("body"))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Find first element matching predicate (depth-first search)
    pub fn find_element<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.children
            .iter()
            .filter_map(Node::as_element)
            .find_map(|elem| Self::find_in_element(elem, &predicate))
    }

    fn find_in_element<'a, F>(elem: &'a Element, predicate: &F) -> Option<&'a Element>
    where
        F: Fn(&Element) -> bool,
    {
        if predicate(elem) {
            return Some(elem);
        }
        for child in &elem.children {
            if let Some(child_elem) = child.as_element()
                && let Some(found) = Self::find_in_element(child_elem, predicate)
            {
                return Some(found);
            }
        }
        None
    }

    /// Find all elements matching predicate
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut results = Vec::new();
        for elem in self.children.iter().filter_map(Node::as_element) {
            Self::collect_elements(elem, &predicate, &mut results);
        }
        results
    }

    fn collect_elements<'a, F>(elem: &'a Element, predicate: &F, results: &mut Vec<&'a Element>)
    where
        F: Fn(&Element) -> bool,
    {
        if predicate(elem) {
            results.push(elem);
        }
        for child in &elem.children {
            if let Some(child_elem) = child.as_element() {
                Self::collect_elements(child_elem, predicate, results);
            }
        }
    }

    /// Check if any element matches predicate
    pub fn has_element<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Element) -> bool,
    {
        self.find_element(predicate).is_some()
    }

    /// Count total elements in document
    pub fn element_count(&self) -> usize {
        self.iter_elements().count()
    }

    /// Iterate over all elements (depth-first)
    pub fn iter_elements(&self) -> ElementIterator<'_> {
        ElementIterator::new(&self.children)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutable query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Find first element matching predicate (mutable)
    pub fn find_element_mut<F>(&mut self, predicate: F) -> Option<&mut Element>
    where
        F: Fn(&Element) -> bool + Copy,
    {
        for child in &mut self.children {
            if let Some(elem) = child.as_element_mut()
                && let Some(found) = Self::find_in_element_mut(elem, predicate)
            {
                return Some(found);
            }
        }
        None
    }

    fn find_in_element_mut<F>(elem: &mut Element, predicate: F) -> Option<&mut Element>
    where
        F: Fn(&Element) -> bool + Copy,
    {
        if predicate(elem) {
            return Some(elem);
        }
        for child in &mut elem.children {
            if let Some(child_elem) = child.as_element_mut()
                && let Some(found) = Self::find_in_element_mut(child_elem, predicate)
            {
                return Some(found);
            }
        }
        None
    }

    /// Remove every element matching predicate, with its subtree.
    pub fn remove_elements<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&Element) -> bool,
    {
        let before = self.children.len();
        self.children
            .retain(|node| !node.as_element().is_some_and(|e| predicate(e)));
        let mut removed = before - self.children.len();
        for elem in self.children.iter_mut().filter_map(Node::as_element_mut) {
            removed += elem.remove_descendants(&predicate);
        }
        removed
    }
}

// =============================================================================
// ElementIterator - depth-first element traversal
// =============================================================================

/// Depth-first iterator over elements
pub struct ElementIterator<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> ElementIterator<'a> {
    fn new(nodes: &'a [Node]) -> Self {
        let stack = nodes.iter().rev().filter_map(Node::as_element).collect();
        Self { stack }
    }
}

impl<'a> Iterator for ElementIterator<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let elem = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        for child in elem.children.iter().rev() {
            if let Some(child_elem) = child.as_element() {
                self.stack.push(child_elem);
            }
        }
        Some(elem)
    }
}
