//! Theme registry.

use rustc_hash::FxHashMap;

use crate::error::{CatalogKind, ConfigurationError, ResourceMissing};
use crate::resource::ResourceCache;

/// A visual theme: color scheme, typography and page layout.
///
/// The stylesheet lives at `themes/<id>.css`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    id: &'static str,
    description: &'static str,
}

impl Theme {
    /// Create a theme entry.
    pub const fn new(id: &'static str, description: &'static str) -> Self {
        Self { id, description }
    }

    #[inline]
    pub fn id(&self) -> &'static str {
        self.id
    }

    #[inline]
    pub fn description(&self) -> &'static str {
        self.description
    }
}

const BUILTIN_THEMES: [Theme; 6] = [
    Theme::new(
        "academic",
        "Beautiful, minimalistic academic theme with excellent readability",
    ),
    Theme::new("clean", "Clean minimal theme with good readability"),
    Theme::new("dark", "Dark mode theme"),
    Theme::new("minimal", "Ultra-minimal theme with maximum focus on content"),
    Theme::new(
        "serif",
        "Classic serif typography for traditional academic papers",
    ),
    Theme::new("modern", "Modern, bold design with generous whitespace"),
];

/// Immutable theme catalog.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: Vec<Theme>,
    index: FxHashMap<&'static str, usize>,
}

impl ThemeRegistry {
    /// Build a registry from themes in listing order. Later duplicates are ignored.
    pub fn new(themes: impl IntoIterator<Item = Theme>) -> Self {
        let mut list = Vec::new();
        let mut index = FxHashMap::default();
        for theme in themes {
            if !index.contains_key(theme.id) {
                index.insert(theme.id, list.len());
                list.push(theme);
            }
        }
        Self { themes: list, index }
    }

    /// The themes shipped with texweave.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_THEMES)
    }

    /// Look up a theme by id.
    pub fn get(&self, id: &str) -> Result<&Theme, ConfigurationError> {
        self.index
            .get(id)
            .map(|&i| &self.themes[i])
            .ok_or_else(|| ConfigurationError::unknown(CatalogKind::Theme, id, self.ids()))
    }

    /// All themes, in catalog order.
    pub fn list(&self) -> &[Theme] {
        &self.themes
    }

    /// Theme ids, in catalog order.
    pub fn ids(&self) -> Vec<String> {
        self.themes.iter().map(|t| t.id.to_string()).collect()
    }

    /// Themes whose stylesheet cannot be loaded.
    pub fn validate(&self, resources: &ResourceCache) -> Vec<ResourceMissing> {
        self.themes
            .iter()
            .filter_map(|theme| resources.theme_style(theme).err())
            .collect()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
