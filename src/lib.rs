//! texweave - LaTeX conversion with composable HTML themes and components
//!
//! ## Core Concepts
//!
//! **Catalog**: a fixed set of [`Theme`]s and [`Component`]s, each backed by
//! style, script and markup resources that are bundled with the crate or
//! loaded from a resource directory.
//!
//! **Composition**: an HTML document is parsed into a tree, previous
//! injections are stripped, and the chosen theme plus components are
//! injected in a fixed order. Composing the same document twice with the
//! same request yields byte-identical output.
//!
//! **Driver**: LaTeXML (and pandoc for converted formats) produce the
//! HTML; the [`driver::Converter`] orchestrates both around composition.
//!
//! ## Modules
//! - `catalog`: themes, components, format filtering
//! - `compose`: the injection transforms and [`Composer`]
//! - `resource`: resource sources and the shared cache
//! - `node` / `parse` / `render`: the HTML tree
//! - `transform`: [`Transform`] trait and [`Pipeline`]
//! - `driver`: external tool invocation
//! - `config`: user configuration file
//!
//! ## Usage
//!
//! ```ignore
//! use texweave::prelude::*;
//!
//! let composer = Composer::new(Catalog::builtin());
//! let request = CompositionRequest::new("academic", OutputFormat::Html5)
//!     .with_components(["toc", "search"]);
//! let composed = composer.compose(&html, &request)?;
//! std::fs::write("index.html", composed.html)?;
//! ```

// =============================================================================
// HTML tree
// =============================================================================

/// Attribute helpers
pub mod attr;

/// Node types: Document, Element, Node, Text
pub mod node;

/// HTML parsing
pub mod parse;

/// HTML rendering
pub mod render;

/// Document transforms: Transform, Pipeline
pub mod transform;

// =============================================================================
// Composition
// =============================================================================

/// Themes, components and format filtering
pub mod catalog;

/// Theme and component injection
pub mod compose;

/// Resource loading and caching
pub mod resource;

mod bundled;

/// Output formats
pub mod format;

// =============================================================================
// Outer surfaces
// =============================================================================

/// User configuration
pub mod config;

/// LaTeXML and pandoc invocation
pub mod driver;

/// Error types
pub mod error;

/// Prelude for common imports
pub mod prelude;

// =============================================================================
// Re-exports
// =============================================================================

// Node types
pub use node::{Children, Document, Element, Node, Text, TextKind};

// Transform
pub use transform::{Pipeline, Transform};

// Catalog
pub use catalog::{Catalog, Component, LayoutPosition, Theme, filter_for_format};

// Composition
pub use compose::{Composed, Composer, CompositionRequest};

// Formats
pub use format::{FormatFamily, OutputFormat};

// Error types
pub use error::{ComposeError, ComposeResult, ConfigurationError, ResourceMissing, Warning};
