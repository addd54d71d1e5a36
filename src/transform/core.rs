//! Core transform trait.

use crate::node::Document;

/// One step of document processing.
///
/// Transforms take the document by value and hand it back, so a chain of
/// steps reads top to bottom in a [`Pipeline`](super::Pipeline).
pub trait Transform: Sized {
    /// Transform the document.
    fn transform(self, doc: Document) -> Document;
}

// =============================================================================
// IdentityTransform
// =============================================================================

/// Identity transform that returns the document unchanged.
///
/// Useful for conditional transforms where one branch doesn't need to modify
/// the document.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl Transform for IdentityTransform {
    #[inline]
    fn transform(self, doc: Document) -> Document {
        doc
    }
}
