//! Resources compiled into the binary.

macro_rules! bundle {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/", $path)))),*]
    };
}

/// `(relative path, contents)` for every bundled resource file.
pub(crate) static FILES: &[(&str, &str)] = bundle![
    "themes/academic.css",
    "themes/clean.css",
    "themes/dark.css",
    "themes/minimal.css",
    "themes/modern.css",
    "themes/serif.css",
    "components/annotations.css",
    "components/annotations.js",
    "components/back-to-top.css",
    "components/back-to-top.js",
    "components/bookmark-progress.css",
    "components/bookmark-progress.js",
    "components/citation-generator.css",
    "components/citation-generator.js",
    "components/collapsible-proofs.css",
    "components/collapsible-proofs.js",
    "components/copy-code.css",
    "components/copy-code.js",
    "components/cross-references.css",
    "components/cross-references.js",
    "components/document-stats.css",
    "components/document-stats.js",
    "components/equation-numbers.css",
    "components/equation-numbers.js",
    "components/floating-toc.css",
    "components/floating-toc.js",
    "components/footer.css",
    "components/footer.js",
    "components/glossary-tooltips.css",
    "components/glossary-tooltips.js",
    "components/hugo-frontmatter.css",
    "components/hugo-frontmatter.js",
    "components/hugo-shortcodes.css",
    "components/hugo-shortcodes.js",
    "components/reading-progress.css",
    "components/reading-progress.js",
    "components/reading-time.css",
    "components/reading-time.js",
    "components/search.css",
    "components/search.js",
    "components/seo-meta.css",
    "components/seo-meta.js",
    "components/share-buttons.css",
    "components/share-buttons.js",
    "components/sidebar-right.css",
    "components/sidebar-right.html",
    "components/sidebar-right.js",
    "components/sidenotes.css",
    "components/sidenotes.js",
    "components/theme-toggle.css",
    "components/theme-toggle.js",
    "components/toc.css",
];
