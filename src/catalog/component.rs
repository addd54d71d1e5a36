//! Component registry.
//!
//! Components are independent browser widgets: a stylesheet, an optional
//! script, an optional markup template, and a declared layout position.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{CatalogKind, ConfigurationError, ResourceMissing};
use crate::format::FormatFamily;
use crate::resource::{ResourceCache, ResourceKey, ResourceKind};

// =============================================================================
// LayoutPosition
// =============================================================================

/// Where a component's visible part is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayoutPosition {
    Header,
    Left,
    Right,
    Footer,
    /// No region; the component works on the document in place
    Inline,
}

impl LayoutPosition {
    /// Positions that own a layout region, in document order.
    ///
    /// The main content column sits between `Left` and `Right`.
    pub const REGIONS: [LayoutPosition; 4] = [
        LayoutPosition::Header,
        LayoutPosition::Left,
        LayoutPosition::Right,
        LayoutPosition::Footer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutPosition::Header => "header",
            LayoutPosition::Left => "left",
            LayoutPosition::Right => "right",
            LayoutPosition::Footer => "footer",
            LayoutPosition::Inline => "inline",
        }
    }

    /// Element used for the region container, `None` for inline.
    pub fn region_tag(self) -> Option<&'static str> {
        match self {
            LayoutPosition::Header => Some("header"),
            LayoutPosition::Left | LayoutPosition::Right => Some("aside"),
            LayoutPosition::Footer => Some("footer"),
            LayoutPosition::Inline => None,
        }
    }

    #[inline]
    pub fn is_region(self) -> bool {
        self != LayoutPosition::Inline
    }
}

impl fmt::Display for LayoutPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Component
// =============================================================================

const ALL: &[FormatFamily] = &FormatFamily::RENDERED;
const HTML: &[FormatFamily] = &[FormatFamily::Html];

/// Component metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    id: &'static str,
    description: &'static str,
    requires_script: bool,
    position: LayoutPosition,
    families: &'static [FormatFamily],
}

impl Component {
    /// An inline, script-driven component valid in every rendered family.
    pub const fn new(id: &'static str, description: &'static str) -> Self {
        Self {
            id,
            description,
            requires_script: true,
            position: LayoutPosition::Inline,
            families: ALL,
        }
    }

    pub const fn at(mut self, position: LayoutPosition) -> Self {
        self.position = position;
        self
    }

    /// Style-only component.
    pub const fn without_script(mut self) -> Self {
        self.requires_script = false;
        self
    }

    /// Restrict to live HTML output.
    pub const fn html_only(mut self) -> Self {
        self.families = HTML;
        self
    }

    pub const fn families(mut self, families: &'static [FormatFamily]) -> Self {
        self.families = families;
        self
    }

    #[inline]
    pub fn id(&self) -> &'static str {
        self.id
    }

    #[inline]
    pub fn description(&self) -> &'static str {
        self.description
    }

    #[inline]
    pub fn requires_script(&self) -> bool {
        self.requires_script
    }

    #[inline]
    pub fn position(&self) -> LayoutPosition {
        self.position
    }

    pub fn supported_families(&self) -> &'static [FormatFamily] {
        self.families
    }

    pub fn supports(&self, family: FormatFamily) -> bool {
        self.families.contains(&family)
    }

    /// Resource key for one of this component's files.
    pub fn key(&self, kind: ResourceKind) -> ResourceKey {
        ResourceKey::new(CatalogKind::Component, kind, self.id)
    }
}

use LayoutPosition::{Footer, Header, Left, Right};

const BUILTIN_COMPONENTS: [Component; 23] = [
    Component::new("toc", "Inline table of contents").without_script(),
    Component::new("floating-toc", "Floating sidebar table of contents (left)")
        .at(Left)
        .html_only(),
    Component::new("search", "Full-text search functionality")
        .at(Header)
        .html_only(),
    Component::new("footer", "Document footer with navigation and info").at(Footer),
    Component::new(
        "sidebar-right",
        "Right sidebar for notes, annotations, or quick links",
    )
    .at(Right)
    .html_only(),
    Component::new("theme-toggle", "Light/dark mode toggle button").html_only(),
    Component::new("reading-progress", "Progress bar showing scroll position")
        .at(Header)
        .html_only(),
    Component::new("back-to-top", "Floating button to scroll to top").html_only(),
    Component::new("sidenotes", "Convert footnotes to margin notes").html_only(),
    Component::new("equation-numbers", "Automatic numbering for equations").html_only(),
    Component::new("copy-code", "Add copy button to code blocks").html_only(),
    Component::new("share-buttons", "Floating share menu (Twitter, email, link)").html_only(),
    Component::new(
        "citation-generator",
        "Generate BibTeX/APA citation from document metadata",
    )
    .html_only(),
    Component::new("reading-time", "Display estimated reading time")
        .at(Header)
        .html_only(),
    Component::new("document-stats", "Show word count and section count")
        .at(Footer)
        .html_only(),
    Component::new(
        "hugo-frontmatter",
        "Generate YAML front matter from LaTeX metadata for Hugo",
    ),
    Component::new(
        "hugo-shortcodes",
        "Wrap LaTeX elements in Hugo shortcode syntax",
    ),
    Component::new(
        "annotations",
        "Personal highlights and notes with localStorage",
    )
    .html_only(),
    Component::new(
        "bookmark-progress",
        "Remember reading position with localStorage",
    )
    .html_only(),
    Component::new(
        "collapsible-proofs",
        "Toggle visibility of theorem proofs and derivations",
    )
    .html_only(),
    Component::new(
        "cross-references",
        "Enhanced equation/theorem/figure cross-references with previews",
    )
    .html_only(),
    Component::new(
        "seo-meta",
        "Comprehensive SEO meta tags (Open Graph, Twitter Card, JSON-LD)",
    )
    .html_only(),
    Component::new(
        "glossary-tooltips",
        "Hover tooltips for technical terms with definitions",
    )
    .html_only(),
];

// =============================================================================
// Substitutions
// =============================================================================

/// A component replaced by another when its family is unsupported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub component: &'static str,
    pub family: FormatFamily,
    pub substitute: &'static str,
}

const BUILTIN_SUBSTITUTIONS: [Substitution; 1] = [Substitution {
    component: "floating-toc",
    family: FormatFamily::Converted,
    substitute: "toc",
}];

// =============================================================================
// ComponentRegistry
// =============================================================================

/// Immutable component catalog plus its substitution table.
#[derive(Debug, Clone)]
pub struct ComponentRegistry {
    components: Vec<Component>,
    index: FxHashMap<&'static str, usize>,
    substitutions: Vec<Substitution>,
}

impl ComponentRegistry {
    /// Build a registry from components in listing order. Later duplicates are ignored.
    pub fn new(components: impl IntoIterator<Item = Component>) -> Self {
        let mut list = Vec::new();
        let mut index = FxHashMap::default();
        for component in components {
            if !index.contains_key(component.id) {
                index.insert(component.id, list.len());
                list.push(component);
            }
        }
        Self {
            components: list,
            index,
            substitutions: Vec::new(),
        }
    }

    /// The components and substitutions shipped with texweave.
    pub fn builtin() -> Self {
        BUILTIN_SUBSTITUTIONS
            .into_iter()
            .fold(Self::new(BUILTIN_COMPONENTS), Self::with_substitution)
    }

    /// Add a substitution rule (builder style).
    pub fn with_substitution(mut self, rule: Substitution) -> Self {
        self.substitutions.push(rule);
        self
    }

    /// Look up a component by id.
    pub fn get(&self, id: &str) -> Result<&Component, ConfigurationError> {
        self.index
            .get(id)
            .map(|&i| &self.components[i])
            .ok_or_else(|| ConfigurationError::unknown(CatalogKind::Component, id, self.ids()))
    }

    /// All components, in catalog order.
    pub fn list(&self) -> &[Component] {
        &self.components
    }

    /// Component ids, in catalog order.
    pub fn ids(&self) -> Vec<String> {
        self.components.iter().map(|c| c.id.to_string()).collect()
    }

    pub fn substitutions(&self) -> &[Substitution] {
        &self.substitutions
    }

    /// The registered replacement for `id` in `family`, if any.
    pub fn substitute_for(&self, id: &str, family: FormatFamily) -> Option<&Component> {
        self.substitutions
            .iter()
            .find(|rule| rule.component == id && rule.family == family)
            .and_then(|rule| self.get(rule.substitute).ok())
    }

    /// Missing resources: every stylesheet, plus the script of each
    /// script-requiring component.
    pub fn validate(&self, resources: &ResourceCache) -> Vec<ResourceMissing> {
        let mut missing = Vec::new();
        for component in &self.components {
            if let Err(e) = resources.component_style(component) {
                missing.push(e);
            }
            if let Err(e) = resources.component_script(component) {
                missing.push(e);
            }
        }
        missing
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
