//! End-to-end composition through the public API.

use pretty_assertions::assert_eq;
use texweave::prelude::*;

const LATEXML_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>On Sorting</title>
<link rel="stylesheet" href="LaTeXML.css" type="text/css">
</head>
<body>
<div class="ltx_page_main">
<article class="ltx_document">
<h1 class="ltx_title ltx_title_document">On Sorting</h1>
<section id="S1" class="ltx_section"><h2 class="ltx_title">1 Introduction</h2>
<p class="ltx_p">Sorting is <em>old</em> &amp; well studied.</p>
</section>
</article>
</div>
</body>
</html>
"#;

fn composer() -> Composer {
    Composer::new(Catalog::builtin())
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found"))
}

#[test]
fn test_builtin_catalog_is_complete() {
    let catalog = Catalog::builtin();
    assert!(catalog.validate().is_empty());
    assert_eq!(catalog.themes.list().len(), 6);
    assert_eq!(catalog.components.list().len(), 23);
}

#[test]
fn test_full_page_composition() {
    let request = CompositionRequest::new("serif", OutputFormat::Html5)
        .with_components(["floating-toc", "search", "footer", "back-to-top"]);
    let composed = composer().compose(LATEXML_PAGE, &request).unwrap();
    let html = &composed.html;

    assert!(composed.warnings.is_empty());
    assert!(html.starts_with("<!DOCTYPE html>"));

    // Head: footer config, theme, then component styles in request order.
    let meta = position(html, r#"name="texweave-footer-config""#);
    let theme = position(html, r#"<style data-texweave-theme="serif">"#);
    let toc_css = position(html, r#"<style data-texweave-component="floating-toc">"#);
    let search_css = position(html, r#"<style data-texweave-component="search">"#);
    let head_end = position(html, "</head>");
    assert!(position(html, "LaTeXML.css") < meta);
    assert!(meta < theme && theme < toc_css && toc_css < search_css && search_css < head_end);

    // Layout: header, left aside, main, footer.
    let header = position(html, r#"<header data-texweave-region="header">"#);
    let aside = position(html, r#"<aside data-texweave-region="left">"#);
    let main = position(html, r#"<main class="texweave-main">"#);
    let footer = position(html, r#"<footer data-texweave-region="footer">"#);
    assert!(header < aside && aside < main && main < footer);
    assert!(!html.contains(r#"<aside data-texweave-region="right">"#));

    // Original content survives inside main.
    let title = position(html, "On Sorting</h1>");
    assert!(main < title && title < footer);
    assert!(html.contains("<em>old</em> &amp; well studied."));

    // Scripts close the body, in request order.
    let scripts: Vec<usize> = ["floating-toc", "search", "footer", "back-to-top"]
        .iter()
        .map(|id| position(html, &format!(r#"<script data-texweave-component="{id}">"#)))
        .collect();
    assert!(scripts.windows(2).all(|w| w[0] < w[1]));
    assert!(footer < scripts[0]);
    assert!(*scripts.last().unwrap() < position(html, "</body>"));
}

#[test]
fn test_recompose_with_new_request_replaces_everything() {
    let composer = composer();
    let first = CompositionRequest::new("dark", OutputFormat::Html5)
        .with_components(["sidebar-right", "reading-progress"]);
    let second = CompositionRequest::new("minimal", OutputFormat::Html5).with_components(["toc"]);

    let once = composer.compose(LATEXML_PAGE, &first).unwrap();
    let twice = composer.compose(&once.html, &second).unwrap();
    let direct = composer.compose(LATEXML_PAGE, &second).unwrap();

    assert_eq!(twice.html, direct.html);
    assert!(!twice.html.contains("sidebar-right"));
    assert!(!twice.html.contains(r#"<div class="texweave-layout""#));
}

#[test]
fn test_compose_is_idempotent() {
    let composer = composer();
    let request = CompositionRequest::new("academic", OutputFormat::Html5)
        .with_components(["floating-toc", "sidebar-right", "footer"]);

    let once = composer.compose(LATEXML_PAGE, &request).unwrap();
    let twice = composer.compose(&once.html, &request).unwrap();
    assert_eq!(once.html, twice.html);
}

#[test]
fn test_converted_family_keeps_static_components() {
    let request = CompositionRequest::new("clean", OutputFormat::Epub)
        .with_components(["floating-toc", "search", "footer"]);
    let composed = composer().compose(LATEXML_PAGE, &request).unwrap();

    assert!(composed.html.contains(r#"data-texweave-component="toc""#));
    assert!(composed.html.contains(r#"data-texweave-component="footer""#));
    assert!(!composed.html.contains(r#"data-texweave-component="search""#));
    assert!(composed.warnings.iter().any(|w| matches!(
        w,
        Warning::Substituted { component, substitute, .. }
            if component == "floating-toc" && substitute == "toc"
    )));
    assert!(composed.warnings.iter().any(|w| matches!(
        w,
        Warning::FormatIncompatibility { component, .. } if component == "search"
    )));
}

#[test]
fn test_resource_dir_overrides_bundled_theme() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("themes")).unwrap();
    std::fs::write(dir.path().join("themes/modern.css"), "body { color: teal; }").unwrap();

    let composer = Composer::new(Catalog::with_resources_dir(dir.path()));
    let request = CompositionRequest::new("modern", OutputFormat::Html5);
    let composed = composer.compose(LATEXML_PAGE, &request).unwrap();

    assert!(composed.html.contains("/* theme: modern */\nbody { color: teal; }\n"));
}

#[test]
fn test_unknown_ids_are_configuration_errors() {
    let composer = composer();

    let err = composer
        .compose(LATEXML_PAGE, &CompositionRequest::new("neon", OutputFormat::Html5))
        .unwrap_err();
    let ComposeError::Configuration(err) = err else {
        panic!("expected configuration error, got {err:?}");
    };
    assert_eq!(err.kind, CatalogKind::Theme);
    assert!(err.available.iter().any(|id| id == "academic"));

    let request = CompositionRequest::new("academic", OutputFormat::Html5)
        .with_components(["does-not-exist"]);
    assert!(matches!(
        composer.compose(LATEXML_PAGE, &request),
        Err(ComposeError::Configuration(ConfigurationError { kind: CatalogKind::Component, .. }))
    ));
}

#[test]
fn test_fragment_is_malformed() {
    let request = CompositionRequest::new("academic", OutputFormat::Html5);
    let err = composer()
        .compose("<p>just a paragraph</p>", &request)
        .unwrap_err();
    assert!(matches!(err, ComposeError::MalformedInput(_)));
}

#[test]
fn test_filter_then_compose_matches_direct_compose() {
    let catalog = Catalog::builtin();
    let requested = ["search", "toc", "search", "hugo-frontmatter"];
    let filtered = filter_for_format(&catalog.components, &requested[..], OutputFormat::Markdown).unwrap();
    assert_eq!(filtered.components, ["toc", "hugo-frontmatter"]);

    let composer = Composer::new(catalog);
    let prefiltered = CompositionRequest::new("academic", OutputFormat::Markdown)
        .with_components(filtered.components.clone());
    let raw = CompositionRequest::new("academic", OutputFormat::Markdown).with_components(requested);

    assert_eq!(
        composer.compose(LATEXML_PAGE, &prefiltered).unwrap().html,
        composer.compose(LATEXML_PAGE, &raw).unwrap().html
    );
}
