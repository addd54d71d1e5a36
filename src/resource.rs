//! Stylesheet, script and markup resources for themes and components.
//!
//! Resources live at conventional paths under a resources root:
//!
//! ```text
//! themes/<id>.css
//! components/<id>.css
//! components/<id>.js
//! components/<id>.html   (optional markup template)
//! ```
//!
//! A [`ResourceSource`] answers lookups for those paths. The built-in
//! resources are compiled into the binary ([`bundled`]); a directory on disk
//! can be layered on top to override or extend them.
//!
//! [`ResourceCache`] memoizes lookups process-wide. The catalog is immutable
//! for the lifetime of the process, so every key is loaded at most once and
//! misses are remembered as well.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::catalog::{Component, Theme};
use crate::error::{CatalogKind, ResourceMissing};

// =============================================================================
// Resource Key
// =============================================================================

/// Kind of resource text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// CSS stylesheet
    Style,
    /// JavaScript
    Script,
    /// HTML markup template
    Markup,
}

impl ResourceKind {
    /// File extension used on disk.
    pub fn extension(self) -> &'static str {
        match self {
            ResourceKind::Style => "css",
            ResourceKind::Script => "js",
            ResourceKind::Markup => "html",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceKind::Style => "style",
            ResourceKind::Script => "script",
            ResourceKind::Markup => "markup",
        })
    }
}

/// Identifies one resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKey {
    /// Owning catalog
    pub owner: CatalogKind,
    /// Kind of text
    pub kind: ResourceKind,
    /// Theme or component identifier
    pub id: Arc<str>,
}

impl ResourceKey {
    /// Create a key.
    pub fn new(owner: CatalogKind, kind: ResourceKind, id: &str) -> Self {
        Self {
            owner,
            kind,
            id: Arc::from(id),
        }
    }

    /// Relative path under a resources root, always `/`-separated.
    pub fn path(&self) -> String {
        let dir = match self.owner {
            CatalogKind::Theme => "themes",
            CatalogKind::Component => "components",
        };
        format!("{dir}/{}.{}", self.id, self.kind.extension())
    }

    fn missing(&self) -> ResourceMissing {
        ResourceMissing::new(self.kind, self.id.as_ref())
    }
}

// =============================================================================
// Sources
// =============================================================================

/// Something that can produce resource text.
pub trait ResourceSource: Send + Sync {
    /// Load the resource, or `None` if this source does not have it.
    fn load(&self, key: &ResourceKey) -> Option<String>;
}

/// Resources read from a directory on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Create a source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The resources root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceSource for DirSource {
    fn load(&self, key: &ResourceKey) -> Option<String> {
        let path = self.root.join(key.path());
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("cannot read {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Resources held in memory, keyed by relative path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: FxHashMap<String, Arc<str>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file (builder style).
    pub fn with(mut self, path: impl Into<String>, text: impl AsRef<str>) -> Self {
        self.insert(path, text);
        self
    }

    /// Add a file.
    pub fn insert(&mut self, path: impl Into<String>, text: impl AsRef<str>) {
        self.files.insert(path.into(), Arc::from(text.as_ref()));
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if the source has no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ResourceSource for MemorySource {
    fn load(&self, key: &ResourceKey) -> Option<String> {
        self.files.get(&key.path()).map(|text| text.to_string())
    }
}

/// Several sources searched in order; the first hit wins.
#[derive(Default)]
pub struct LayeredSource {
    layers: Vec<Box<dyn ResourceSource>>,
}

impl LayeredSource {
    /// Create an empty stack of sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lower-priority layer.
    pub fn then(mut self, source: impl ResourceSource + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }
}

impl ResourceSource for LayeredSource {
    fn load(&self, key: &ResourceKey) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.load(key))
    }
}

/// The resources compiled into the binary.
pub fn bundled() -> MemorySource {
    crate::bundled::FILES
        .iter()
        .fold(MemorySource::new(), |source, (path, text)| source.with(*path, text))
}

// =============================================================================
// Resource Cache
// =============================================================================

/// Thread-safe, process-wide resource cache.
///
/// Uses `parking_lot::RwLock`; concurrent readers of populated entries never
/// block each other. A key is inserted once: if two threads race on a miss,
/// both read the same immutable source and the first insert is kept.
#[derive(Clone)]
pub struct ResourceCache {
    source: Arc<dyn ResourceSource>,
    entries: Arc<RwLock<FxHashMap<ResourceKey, Option<Arc<str>>>>>,
}

impl fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCache")
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}

impl ResourceCache {
    /// Create an empty cache over `source`.
    pub fn new(source: impl ResourceSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            entries: Arc::new(RwLock::new(FxHashMap::default())),
        }
    }

    /// Look up a resource, loading it on first use.
    pub fn get(&self, key: &ResourceKey) -> Option<Arc<str>> {
        if let Some(entry) = self.entries.read().get(key) {
            return entry.clone();
        }

        let loaded = self.source.load(key).map(Arc::from);
        self.entries
            .write()
            .entry(key.clone())
            .or_insert(loaded)
            .clone()
    }

    /// Look up a resource that is expected to exist.
    pub fn require(&self, key: &ResourceKey) -> Result<Arc<str>, ResourceMissing> {
        self.get(key).ok_or_else(|| key.missing())
    }

    /// Number of cached entries (hits and misses).
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog-aware loading
    // ─────────────────────────────────────────────────────────────────────────

    /// A theme's stylesheet.
    pub fn theme_style(&self, theme: &Theme) -> Result<Arc<str>, ResourceMissing> {
        self.require(&ResourceKey::new(CatalogKind::Theme, ResourceKind::Style, theme.id()))
    }

    /// A component's stylesheet.
    pub fn component_style(&self, component: &Component) -> Result<Arc<str>, ResourceMissing> {
        self.require(&component.key(ResourceKind::Style))
    }

    /// A component's script. Components that declare no script have none.
    pub fn component_script(&self, component: &Component) -> Result<Option<Arc<str>>, ResourceMissing> {
        if !component.requires_script() {
            return Ok(None);
        }
        self.require(&component.key(ResourceKind::Script)).map(Some)
    }

    /// A component's optional markup template.
    pub fn component_markup(&self, component: &Component) -> Option<Arc<str>> {
        self.get(&component.key(ResourceKind::Markup))
    }
}

// =============================================================================
// Tests
// =============================================================================
