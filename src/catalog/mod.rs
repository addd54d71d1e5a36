//! Theme and component catalogs.
//!
//! - [`ThemeRegistry`] - theme id to stylesheet
//! - [`ComponentRegistry`] - component id to metadata and substitution rules
//! - [`filter_for_format`] - requested components to effective components
//! - [`Catalog`] - both registries plus the resource cache, the single
//!   configuration value handed to the composer

mod component;
mod filter;
mod theme;

pub use component::{Component, ComponentRegistry, LayoutPosition, Substitution};
pub use filter::{Filtered, filter_for_format};
pub use theme::{Theme, ThemeRegistry};

use std::path::PathBuf;

use crate::error::ResourceMissing;
use crate::resource::{DirSource, LayeredSource, ResourceCache, ResourceSource, bundled};

/// Registries and resources, constructed once and shared read-only.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub themes: ThemeRegistry,
    pub components: ComponentRegistry,
    pub resources: ResourceCache,
}

impl Catalog {
    /// Create a catalog from explicit parts.
    pub fn new(themes: ThemeRegistry, components: ComponentRegistry, resources: ResourceCache) -> Self {
        Self {
            themes,
            components,
            resources,
        }
    }

    /// Built-in registries over the bundled resources.
    pub fn builtin() -> Self {
        Self::with_source(bundled())
    }

    /// Built-in registries over a custom resource source.
    pub fn with_source(source: impl ResourceSource + 'static) -> Self {
        Self::new(
            ThemeRegistry::builtin(),
            ComponentRegistry::builtin(),
            ResourceCache::new(source),
        )
    }

    /// Built-in registries, with files in `dir` taking priority over the
    /// bundled resources.
    pub fn with_resources_dir(dir: impl Into<PathBuf>) -> Self {
        Self::with_source(LayeredSource::new().then(DirSource::new(dir)).then(bundled()))
    }

    /// Every missing theme and component resource.
    pub fn validate(&self) -> Vec<ResourceMissing> {
        let mut missing = self.themes.validate(&self.resources);
        missing.extend(self.components.validate(&self.resources));
        missing
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
