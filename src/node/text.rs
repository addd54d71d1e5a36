//! Text node type
//!
//! Text content nodes in the HTML tree.

// =============================================================================
// TextKind
// =============================================================================

/// How a text node is written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextKind {
    /// Plain text: escaped on render
    #[default]
    Normal,
    /// Markup kept verbatim: comments, the doctype, and the bodies of
    /// raw-text elements such as `<script>` and `<style>`
    Raw,
}

// =============================================================================
// Text
// =============================================================================

/// Text content node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    /// Text content
    pub content: String,
    /// Escaping mode
    pub kind: TextKind,
}

impl Text {
    /// Create a new text node that is escaped on render
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: TextKind::Normal,
        }
    }

    /// Create a text node rendered verbatim
    pub fn raw(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: TextKind::Raw,
        }
    }

    /// Check whether this node is rendered verbatim
    pub fn is_raw(&self) -> bool {
        self.kind == TextKind::Raw
    }

    /// Check if text content is empty
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Get text length in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Check if text is only whitespace
    pub fn is_whitespace(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Get trimmed content
    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }
}
