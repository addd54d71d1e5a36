//! Theme and component composition.
//!
//! [`Composer::compose`] turns a converted HTML document into the final one:
//!
//! 1. Resolve the theme and the effective components for the format.
//! 2. Parse the input; a document without `<head>` or `<body>` is rejected.
//! 3. Strip anything a previous composition injected.
//! 4. Append the footer configuration, theme style and component styles to
//!    `<head>`.
//! 5. Wrap the body in the layout grid when a positioned component is present.
//! 6. Append component scripts to `<body>`.
//! 7. Serialize (XHTML keeps XML syntax).
//!
//! # Example
//!
//! ```ignore
//! let composer = Composer::new(Catalog::builtin());
//! let request = CompositionRequest::new("academic", OutputFormat::Html5)
//!     .with_components(["toc", "search"]);
//! let composed = composer.compose(&html, &request)?;
//! for warning in &composed.warnings {
//!     log::warn!("{warning}");
//! }
//! ```

mod inject;
mod plan;

pub use inject::{
    AppendScripts, BuildLayout, COMPONENT_ATTR, CONFIG_ATTR, FOOTER_CONFIG_META, InjectHead,
    LAYOUT_ATTR, LAYOUT_CLASS, MAIN_CLASS, MARKER_PREFIX, REGION_ATTR, StripInjections, THEME_ATTR,
};

use crate::catalog::Catalog;
use crate::config::FooterData;
use crate::error::{ComposeError, ComposeResult, Warning};
use crate::format::OutputFormat;
use crate::parse::{has_start_tag, parse_document};
use crate::render::{RenderConfig, render_document};
use crate::transform::Pipeline;

use plan::Plan;

// =============================================================================
// Request / Result
// =============================================================================

/// What to compose into a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionRequest {
    pub theme: String,
    /// Requested component ids; request order is injection order
    pub components: Vec<String>,
    pub format: OutputFormat,
    /// Data for the footer configuration tag
    pub footer: FooterData,
}

impl CompositionRequest {
    pub fn new(theme: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            theme: theme.into(),
            components: Vec::new(),
            format,
            footer: FooterData::default(),
        }
    }

    pub fn with_components<I, S>(mut self, components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = components.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_footer(mut self, footer: FooterData) -> Self {
        self.footer = footer;
        self
    }
}

/// A composed document and the warnings recorded while producing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    pub html: String,
    pub warnings: Vec<Warning>,
}

// =============================================================================
// Composer
// =============================================================================

/// Composes themes and components into HTML documents.
///
/// Holds an explicitly constructed [`Catalog`]; nothing is global, so tests
/// can supply isolated catalogs.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    catalog: Catalog,
}

impl Composer {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Compose one document.
    pub fn compose(&self, html: &str, request: &CompositionRequest) -> ComposeResult<Composed> {
        let plan = Plan::resolve(&self.catalog, request)?;

        if !has_start_tag(html, "head") {
            return Err(ComposeError::malformed("no <head> element"));
        }
        if !has_start_tag(html, "body") {
            return Err(ComposeError::malformed("no <body> element"));
        }
        let doc = parse_document(html);

        let doc = Pipeline::new(doc)
            .pipe(StripInjections)
            .pipe(InjectHead::new(&plan))
            .pipe_if(plan.has_regions(), BuildLayout::new(&plan))
            .pipe(AppendScripts::new(&plan))
            .into_inner();

        let config = if plan.xml_syntax {
            RenderConfig::XHTML
        } else {
            RenderConfig::HTML
        };

        log::debug!(
            "composed theme '{}' with {} component(s) for {}",
            plan.theme_id,
            plan.components.len(),
            request.format
        );

        Ok(Composed {
            html: render_document(&doc, &config),
            warnings: plan.warnings,
        })
    }

    /// Compose independent documents. Each result stands alone.
    pub fn compose_batch(&self, items: &[(&str, &CompositionRequest)]) -> Vec<ComposeResult<Composed>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            items
                .par_iter()
                .map(|(html, request)| self.compose(html, request))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            items
                .iter()
                .map(|(html, request)| self.compose(html, request))
                .collect()
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Component, ComponentRegistry, LayoutPosition, ThemeRegistry};
    use crate::error::{CatalogKind, ResourceMissing};
    use crate::resource::{MemorySource, ResourceCache, ResourceKind};
    use pretty_assertions::assert_eq;

    const PAGE: &str = "<!DOCTYPE html>\n<html><head><title>Paper</title></head>\
                        <body><div class=\"ltx_page_main\"><p>Hello</p></div></body></html>\n";

    fn composer() -> Composer {
        Composer::new(Catalog::builtin())
    }

    fn request(components: &[&str], format: OutputFormat) -> CompositionRequest {
        CompositionRequest::new("academic", format).with_components(components.iter().copied())
    }

    fn positions(html: &str, needles: &[&str]) -> Vec<usize> {
        needles
            .iter()
            .map(|n| html.find(n).unwrap_or_else(|| panic!("missing {n}")))
            .collect()
    }

    #[test]
    fn test_styles_in_order_and_script_before_body_end() {
        let out = composer()
            .compose(PAGE, &request(&["toc", "search"], OutputFormat::Html5))
            .unwrap();
        let html = &out.html;

        let at = positions(
            html,
            &[
                r#"<style data-texweave-theme="academic">"#,
                r#"<style data-texweave-component="toc">"#,
                r#"<style data-texweave-component="search">"#,
                "</head>",
                r#"<script data-texweave-component="search">"#,
                "</body>",
            ],
        );
        assert!(at.windows(2).all(|w| w[0] < w[1]), "{at:?}");
        assert!(!html.contains(r#"<script data-texweave-component="toc">"#));
        assert!(html.contains("/* theme: academic */"));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_markdown_substitutes_floating_toc() {
        let out = composer()
            .compose(PAGE, &request(&["floating-toc"], OutputFormat::Markdown))
            .unwrap();
        assert!(out.html.contains(r#"data-texweave-component="toc""#));
        assert!(!out.html.contains("floating-toc\""));
        assert_eq!(
            out.warnings,
            vec![Warning::Substituted {
                component: "floating-toc".into(),
                substitute: "toc".into(),
                format: OutputFormat::Markdown,
            }]
        );
    }

    #[test]
    fn test_unknown_component_is_reported() {
        let err = composer()
            .compose(PAGE, &request(&["does-not-exist"], OutputFormat::Html5))
            .unwrap_err();
        assert!(err.to_string().contains("does-not-exist"));
        assert!(matches!(err, ComposeError::Configuration(ref e) if e.kind == CatalogKind::Component));
    }

    #[test]
    fn test_unknown_theme_is_reported() {
        let req = CompositionRequest::new("neon", OutputFormat::Html5);
        let err = composer().compose(PAGE, &req).unwrap_err();
        let ComposeError::Configuration(e) = err else {
            panic!("expected configuration error");
        };
        assert_eq!(e.kind, CatalogKind::Theme);
        assert_eq!(e.id, "neon");
    }

    #[test]
    fn test_malformed_input() {
        let composer = composer();
        let req = request(&[], OutputFormat::Html5);
        assert!(matches!(
            composer.compose("<html><body><p>x</p></body></html>", &req),
            Err(ComposeError::MalformedInput(_))
        ));
        assert!(matches!(
            composer.compose("<html><head></head></html>", &req),
            Err(ComposeError::MalformedInput(_))
        ));
        assert!(matches!(composer.compose("just text", &req), Err(ComposeError::MalformedInput(_))));
    }

    #[test]
    fn test_deterministic() {
        let composer = composer();
        let req = request(&["floating-toc", "search", "footer", "copy-code"], OutputFormat::Html5);
        let a = composer.compose(PAGE, &req).unwrap();
        let b = composer.compose(PAGE, &req).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_idempotent() {
        let composer = composer();
        let req = request(&["floating-toc", "sidebar-right", "footer", "back-to-top"], OutputFormat::Html5);
        let once = composer.compose(PAGE, &req).unwrap().html;
        let twice = composer.compose(&once, &req).unwrap().html;
        assert_eq!(once, twice);
        assert_eq!(twice.matches(r#"data-texweave-theme="academic""#).count(), 1);
        assert_eq!(twice.matches(r#"data-texweave-layout="""#).count(), 1);
    }

    #[test]
    fn test_recompose_with_other_request_replaces_everything() {
        let composer = composer();
        let first = composer
            .compose(PAGE, &request(&["floating-toc", "search"], OutputFormat::Html5))
            .unwrap()
            .html;
        let second = composer
            .compose(&first, &CompositionRequest::new("dark", OutputFormat::Html5))
            .unwrap()
            .html;
        let direct = composer
            .compose(PAGE, &CompositionRequest::new("dark", OutputFormat::Html5))
            .unwrap()
            .html;
        assert_eq!(second, direct);
        assert!(!second.contains(r#"<div class="texweave-layout""#));
    }

    #[test]
    fn test_layout_regions_in_order() {
        let out = composer()
            .compose(
                PAGE,
                &request(&["footer", "sidebar-right", "floating-toc", "search"], OutputFormat::Html5),
            )
            .unwrap();
        let at = positions(
            &out.html,
            &[
                r#"<div class="texweave-layout" data-texweave-layout="">"#,
                r#"<header data-texweave-region="header">"#,
                r#"<aside data-texweave-region="left">"#,
                r#"<main class="texweave-main"><div class="ltx_page_main">"#,
                r#"<aside data-texweave-region="right">"#,
                r#"<footer data-texweave-region="footer">"#,
            ],
        );
        assert!(at.windows(2).all(|w| w[0] < w[1]), "{at:?}");
        assert!(out.html.contains("<h3>Quick Links</h3>"));
    }

    #[test]
    fn test_no_layout_for_inline_components() {
        let out = composer()
            .compose(PAGE, &request(&["toc", "copy-code"], OutputFormat::Html5))
            .unwrap();
        assert!(!out.html.contains(r#"<div class="texweave-layout""#));
        for tag in ["header", "aside", "footer"] {
            assert!(!out.html.contains(&format!("<{tag} data-texweave-region")));
        }
        assert!(out.html.contains("<body><div class=\"ltx_page_main\">"));
    }

    #[test]
    fn test_shared_position_single_container() {
        let themes = ThemeRegistry::builtin();
        let components = ComponentRegistry::new([
            Component::new("notes", "right notes").at(LayoutPosition::Right).without_script(),
            Component::new("links", "right links").at(LayoutPosition::Right).without_script(),
        ]);
        let resources = ResourceCache::new(
            MemorySource::new()
                .with("themes/academic.css", "body{}")
                .with("components/notes.css", ".n{}")
                .with("components/notes.html", "<p>N</p>")
                .with("components/links.css", ".l{}")
                .with("components/links.html", "<p>L</p>"),
        );
        let composer = Composer::new(Catalog::new(themes, components, resources));

        let out = composer
            .compose(PAGE, &request(&["links", "notes"], OutputFormat::Html))
            .unwrap();
        assert_eq!(out.html.matches(r#"data-texweave-region="right""#).count(), 1);
        assert!(out.html.contains(
            r#"<aside data-texweave-region="right"><div class="texweave-links" data-texweave-component="links"><p>L</p></div><div class="texweave-notes" data-texweave-component="notes"><p>N</p></div></aside>"#
        ));
    }

    #[test]
    fn test_missing_resources_warn_and_continue() {
        let components = ComponentRegistry::new([
            Component::new("a", "style missing"),
            Component::new("b", "script missing"),
        ]);
        let resources = ResourceCache::new(
            MemorySource::new()
                .with("components/a.js", "a()")
                .with("components/b.css", ".b{}"),
        );
        let composer = Composer::new(Catalog::new(ThemeRegistry::builtin(), components, resources));

        let out = composer.compose(PAGE, &request(&["a", "b"], OutputFormat::Html5)).unwrap();
        assert_eq!(
            out.warnings,
            vec![
                Warning::ResourceMissing(ResourceMissing::new(ResourceKind::Style, "academic")),
                Warning::ResourceMissing(ResourceMissing::new(ResourceKind::Style, "a")),
                Warning::ResourceMissing(ResourceMissing::new(ResourceKind::Script, "b")),
            ]
        );
        assert!(!out.html.contains("data-texweave-theme"));
        assert!(out.html.contains(r#"<script data-texweave-component="a">"#));
        assert!(out.html.contains(r#"<style data-texweave-component="b">"#));
    }

    #[test]
    fn test_footer_config_meta() {
        let footer = FooterData {
            author_name: "Ada & Co".into(),
            copyright_year: "2025".into(),
            ..Default::default()
        };
        let req = request(&["footer"], OutputFormat::Html5).with_footer(footer);
        let out = composer().compose(PAGE, &req).unwrap();

        assert!(out.html.contains(
            r#"<meta name="texweave-footer-config" content="{&quot;author_name&quot;:&quot;Ada \u0026 Co&quot;,"#
        ));
        let meta = out.html.find("texweave-footer-config").unwrap();
        let theme = out.html.find("data-texweave-theme").unwrap();
        assert!(meta < theme);

        let without = composer().compose(PAGE, &request(&["toc"], OutputFormat::Html5)).unwrap();
        assert!(!without.html.contains("texweave-footer-config"));
    }

    #[test]
    fn test_attribute_references_survive_composition() {
        let page = "<html><head></head><body>\
                    <a title=\"write &amp;copy; for the sign\">x</a></body></html>";
        let once = composer().compose(page, &request(&[], OutputFormat::Html5)).unwrap().html;
        assert!(once.contains(r#"<a title="write &amp;copy; for the sign">x</a>"#));

        let twice = composer().compose(&once, &request(&[], OutputFormat::Html5)).unwrap().html;
        assert_eq!(once, twice);
    }

    #[test]
    fn test_xhtml_self_closes() {
        let page = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                    <html xmlns=\"http://www.w3.org/1999/xhtml\"><head><meta charset=\"UTF-8\" /></head>\
                    <body><p>a<br/>b</p></body></html>";
        let out = composer()
            .compose(page, &request(&["footer"], OutputFormat::Xhtml))
            .unwrap();
        assert!(out.html.contains(r#"<meta charset="UTF-8" />"#));
        assert!(out.html.contains("<br />"));
        assert!(out.html.contains("<![CDATA["));
        assert!(out.html.starts_with("<?xml"));
    }

    #[test]
    fn test_xhtml_theme_cannot_close_cdata_early() {
        let resources = ResourceCache::new(
            MemorySource::new().with("themes/academic.css", r#"a[title="]]>"]{color:red}"#),
        );
        let composer = Composer::new(Catalog::new(
            ThemeRegistry::builtin(),
            ComponentRegistry::new([]),
            resources,
        ));
        let page = "<html><head></head><body><p>x</p></body></html>";
        let html = composer.compose(page, &request(&[], OutputFormat::Xhtml)).unwrap().html;

        let first_end = html.find("]]>").unwrap();
        assert_eq!(html[first_end - 2..].find("]]]]><![CDATA[>"), Some(0));
        assert_eq!(html.matches("/*]]>*/").count(), 1);
        assert!(html.find("/*]]>*/").unwrap() > first_end);
    }

    #[test]
    fn test_duplicate_request_injects_once() {
        let out = composer()
            .compose(PAGE, &request(&["search", "search"], OutputFormat::Html5))
            .unwrap();
        assert_eq!(out.html.matches(r#"<style data-texweave-component="search">"#).count(), 1);
        assert_eq!(out.html.matches(r#"<script data-texweave-component="search">"#).count(), 1);
    }

    #[test]
    fn test_batch_results_are_independent() {
        let composer = composer();
        let good = request(&["toc"], OutputFormat::Html5);
        let bad = request(&["nope"], OutputFormat::Html5);
        let results = composer.compose_batch(&[(PAGE, &good), (PAGE, &bad), ("<p>", &good)]);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ComposeError::Configuration(_))));
        assert!(matches!(results[2], Err(ComposeError::MalformedInput(_))));
    }

    #[test]
    fn test_composer_is_send_sync() {
        static_assertions::assert_impl_all!(Composer: Send, Sync);
    }
}
