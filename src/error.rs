//! Error types for texweave.
//!
//! Composition distinguishes three outcomes for anything that goes wrong:
//!
//! - [`ConfigurationError`]: the user asked for something that does not
//!   exist. Fatal for the document, reported with the valid alternatives.
//! - [`ResourceMissing`]: a registered theme or component has no backing
//!   file. The single injection is skipped and a [`Warning`] is recorded.
//! - [`ComposeError::MalformedInput`]: the input has no `<head>` or no
//!   `<body>`. Fatal for the document; the caller picks the fallback.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::format::OutputFormat;
use crate::resource::ResourceKind;

// =============================================================================
// ConfigurationError
// =============================================================================

/// What kind of catalog entry was looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Theme,
    Component,
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CatalogKind::Theme => "theme",
            CatalogKind::Component => "component",
        })
    }
}

/// Unknown theme or component identifier supplied by the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {id}\navailable {kind}s: {}", .available.join(", "))]
pub struct ConfigurationError {
    /// Which catalog was searched
    pub kind: CatalogKind,
    /// The offending identifier
    pub id: String,
    /// Valid identifiers, in catalog order
    pub available: Vec<String>,
}

impl ConfigurationError {
    /// Create an unknown-identifier error.
    pub fn unknown(kind: CatalogKind, id: impl Into<String>, available: Vec<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            available,
        }
    }
}

// =============================================================================
// ResourceMissing
// =============================================================================

/// A registered entry whose backing resource could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} resource not found: {id}.{}", .kind.extension())]
pub struct ResourceMissing {
    /// Kind of resource
    pub kind: ResourceKind,
    /// Theme or component identifier
    pub id: String,
}

impl ResourceMissing {
    /// Create a missing-resource error.
    pub fn new(kind: ResourceKind, id: impl Into<String>) -> Self {
        Self { kind, id: id.into() }
    }
}

// =============================================================================
// ComposeError
// =============================================================================

/// Errors that abort composition of one document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// Unknown theme or component
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Input lacks the structural anchors composition needs
    #[error("malformed input: {0}")]
    MalformedInput(String),
}

impl ComposeError {
    /// Create a malformed-input error with a message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }
}

/// Result type alias for composition.
pub type ComposeResult<T> = Result<T, ComposeError>;

// =============================================================================
// Warning
// =============================================================================

/// Non-fatal conditions recorded while filtering and composing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A resource was missing and its injection skipped
    ResourceMissing(ResourceMissing),
    /// A component is not valid for the target format and has no substitute
    FormatIncompatibility {
        /// Dropped component
        component: String,
        /// Target format
        format: OutputFormat,
    },
    /// A component was replaced by its declared substitute for the format
    Substituted {
        /// Requested component
        component: String,
        /// Substitute used instead
        substitute: String,
        /// Target format
        format: OutputFormat,
    },
    /// Tool output had no `<head>` or `<body>`; the file was kept as written
    CompositionSkipped {
        /// The uncomposed file
        path: PathBuf,
        /// Why composition was refused
        reason: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::ResourceMissing(missing) => write!(f, "{missing}; injection skipped"),
            Warning::FormatIncompatibility { component, format } => {
                write!(f, "component '{component}' is not supported for {format}; dropped")
            }
            Warning::Substituted {
                component,
                substitute,
                format,
            } => write!(f, "component '{component}' replaced by '{substitute}' for {format}"),
            Warning::CompositionSkipped { path, reason } => {
                write!(f, "{}: {reason}; composition skipped", path.display())
            }
        }
    }
}

impl From<ResourceMissing> for Warning {
    fn from(missing: ResourceMissing) -> Self {
        Warning::ResourceMissing(missing)
    }
}
