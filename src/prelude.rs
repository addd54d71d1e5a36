//! Prelude module for common imports.
//!
//! ```ignore
//! use texweave::prelude::*;
//! ```

// Node types
pub use crate::node::{Children, Document, Element, Node, Text, TextKind};
pub use crate::attr::AttrsExt;

// Transform
pub use crate::transform::{IdentityTransform, Pipeline, Transform};

// Catalog
pub use crate::catalog::{
    Catalog, Component, ComponentRegistry, Filtered, LayoutPosition, Theme, ThemeRegistry,
    filter_for_format,
};

// Resources
pub use crate::resource::{
    DirSource, LayeredSource, MemorySource, ResourceCache, ResourceKey, ResourceKind,
    ResourceSource,
};

// Composition
pub use crate::compose::{Composed, Composer, CompositionRequest};

// Formats
pub use crate::format::{FormatFamily, OutputFormat};

// Configuration
pub use crate::config::{Config, FooterData};

// Driver
pub use crate::driver::{Conversion, ConvertOptions, Converter, DriverError, ToolRunner};

// Render
pub use crate::parse::{parse_document, parse_fragment};
pub use crate::render::{RenderConfig, render_document};

// Error
pub use crate::error::{
    CatalogKind, ComposeError, ComposeResult, ConfigurationError, ResourceMissing, Warning,
};
