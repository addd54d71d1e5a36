//! Injection transforms.
//!
//! Every element texweave adds carries a `data-texweave-*` marker attribute.
//! [`StripInjections`] removes them again, which makes composition
//! idempotent: composing composed output starts from the original document.

use std::borrow::Cow;

use memchr::memmem;

use crate::catalog::LayoutPosition;
use crate::node::{Document, Element, Node};
use crate::parse::parse_fragment;
use crate::transform::Transform;

use super::plan::{Injection, Plan};

// =============================================================================
// Markers
// =============================================================================

/// Prefix shared by all marker attributes.
pub const MARKER_PREFIX: &str = "data-texweave-";
/// Theme `<style>` block, value is the theme id.
pub const THEME_ATTR: &str = "data-texweave-theme";
/// Component `<style>`, `<script>` and mount elements, value is the component id.
pub const COMPONENT_ATTR: &str = "data-texweave-component";
/// Layout region container, value is the position name.
pub const REGION_ATTR: &str = "data-texweave-region";
/// Layout wrapper around the body content.
pub const LAYOUT_ATTR: &str = "data-texweave-layout";
/// Configuration `<meta>` tags, value is the owning component.
pub const CONFIG_ATTR: &str = "data-texweave-config";

/// `name` of the footer configuration `<meta>` tag.
pub const FOOTER_CONFIG_META: &str = "texweave-footer-config";

pub const LAYOUT_CLASS: &str = "texweave-layout";
pub const MAIN_CLASS: &str = "texweave-main";

fn is_injected(elem: &Element) -> bool {
    elem.attrs.iter().any(|(name, _)| name.starts_with(MARKER_PREFIX))
}

// =============================================================================
// StripInjections
// =============================================================================

/// Remove a previous composition: unwrap the layout, drop marked elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct StripInjections;

impl Transform for StripInjections {
    fn transform(self, mut doc: Document) -> Document {
        if let Some(body) = doc.body_mut() {
            while unwrap_layout(body) {}
        }
        let removed = doc.remove_elements(is_injected);
        if removed > 0 {
            log::debug!("removed {removed} previously injected elements");
        }
        doc
    }
}

/// Replace the first layout wrapper under `elem` by its main content.
fn unwrap_layout(elem: &mut Element) -> bool {
    let found = elem
        .children
        .iter()
        .position(|n| n.as_element().is_some_and(|e| e.has_attr(LAYOUT_ATTR)));

    let Some(i) = found else {
        return elem.children_elements_mut().any(unwrap_layout);
    };

    let content = match elem.children.remove(i) {
        Node::Element(mut layout) => layout
            .children_elements_mut()
            .find(|e| e.has_class(MAIN_CLASS))
            .map(Element::take_children)
            .unwrap_or_default(),
        Node::Text(_) => Default::default(),
    };
    elem.children.insert_many(i, content);
    true
}

// =============================================================================
// InjectHead
// =============================================================================

/// Append configuration, theme and component styles to `<head>`.
pub struct InjectHead<'a> {
    plan: &'a Plan,
}

impl<'a> InjectHead<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        Self { plan }
    }
}

impl Transform for InjectHead<'_> {
    fn transform(self, mut doc: Document) -> Document {
        let plan = self.plan;
        let Some(head) = doc.head_mut() else {
            return doc;
        };

        if let Some(json) = &plan.footer_config {
            head.push_elem(
                Element::new("meta")
                    .attr("name", FOOTER_CONFIG_META)
                    .attr("content", json.as_str())
                    .attr(CONFIG_ATTR, "footer"),
            );
        }

        if let Some(css) = &plan.theme_style {
            let body = block("theme", plan.theme_id, css, "style", plan.xml_syntax);
            head.push_elem(Element::new("style").attr(THEME_ATTR, plan.theme_id).raw(body));
        }

        for component in &plan.components {
            if let Some(css) = &component.style {
                let body = block("component", component.id, css, "style", plan.xml_syntax);
                head.push_elem(Element::new("style").attr(COMPONENT_ATTR, component.id).raw(body));
            }
        }

        doc
    }
}

// =============================================================================
// BuildLayout
// =============================================================================

/// Wrap the body content in the layout grid and mount positioned components.
///
/// ```text
/// <div class="texweave-layout">
///   <header>   <aside left>   <main>   <aside right>   <footer>
/// </div>
/// ```
pub struct BuildLayout<'a> {
    plan: &'a Plan,
}

impl<'a> BuildLayout<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        Self { plan }
    }

    fn region(&self, position: LayoutPosition) -> Option<Element> {
        let tag = position.region_tag()?;
        let mut region = None;
        for component in self.plan.at(position) {
            region
                .get_or_insert_with(|| Element::new(tag).attr(REGION_ATTR, position.name()))
                .push_elem(mount(component));
        }
        region
    }
}

impl Transform for BuildLayout<'_> {
    fn transform(self, mut doc: Document) -> Document {
        let [header, left, right, footer] = LayoutPosition::REGIONS.map(|p| self.region(p));

        let Some(body) = doc.body_mut() else {
            return doc;
        };

        let mut main = Element::new("main").with_class(MAIN_CLASS);
        main.children = body.take_children();

        let mut layout = Element::new("div").with_class(LAYOUT_CLASS).attr(LAYOUT_ATTR, "");
        layout.children.extend(
            [header, left, Some(main), right, footer]
                .into_iter()
                .flatten()
                .map(Node::from),
        );
        body.push_elem(layout);
        doc
    }
}

fn mount(component: &Injection) -> Element {
    let mut elem = Element::new("div")
        .with_class(format!("texweave-{}", component.id))
        .attr(COMPONENT_ATTR, component.id);
    if let Some(markup) = &component.markup {
        elem.children = parse_fragment(markup);
    }
    elem
}

// =============================================================================
// AppendScripts
// =============================================================================

/// Append component scripts as the last children of `<body>`, in request order.
pub struct AppendScripts<'a> {
    plan: &'a Plan,
}

impl<'a> AppendScripts<'a> {
    pub fn new(plan: &'a Plan) -> Self {
        Self { plan }
    }
}

impl Transform for AppendScripts<'_> {
    fn transform(self, mut doc: Document) -> Document {
        let plan = self.plan;
        let Some(body) = doc.body_mut() else {
            return doc;
        };

        for component in &plan.components {
            if let Some(js) = &component.script {
                let text = block("component", component.id, js, "script", plan.xml_syntax);
                body.push_elem(Element::new("script").attr(COMPONENT_ATTR, component.id).raw(text));
            }
        }
        doc
    }
}

// =============================================================================
// Raw text blocks
// =============================================================================

/// Contents of a `<style>` or `<script>` block, labelled with its origin.
fn block(kind: &str, id: &str, source: &str, tag: &str, xml_syntax: bool) -> String {
    let source = guard_end_tag(source, tag);
    if xml_syntax {
        let source = guard_cdata_end(&source);
        format!("\n/*<![CDATA[*/\n/* {kind}: {id} */\n{source}\n/*]]>*/\n")
    } else {
        format!("\n/* {kind}: {id} */\n{source}\n")
    }
}

/// Escape `</tag` (any case) so raw text cannot close its element early.
fn guard_end_tag<'s>(source: &'s str, tag: &str) -> Cow<'s, str> {
    let bytes = source.as_bytes();
    let closes = |at: usize| {
        bytes
            .get(at + 2..at + 2 + tag.len())
            .is_some_and(|name| name.eq_ignore_ascii_case(tag.as_bytes()))
    };

    let mut hits = memmem::find_iter(bytes, b"</").filter(|&at| closes(at)).peekable();
    if hits.peek().is_none() {
        return Cow::Borrowed(source);
    }

    let mut out = String::with_capacity(source.len() + 8);
    let mut last = 0;
    for at in hits {
        out.push_str(&source[last..at]);
        out.push_str("<\\/");
        last = at + 2;
    }
    out.push_str(&source[last..]);
    Cow::Owned(out)
}

/// Split every `]]>` across two CDATA sections so raw text cannot end the
/// wrapper early.
fn guard_cdata_end(source: &str) -> Cow<'_, str> {
    if memmem::find(source.as_bytes(), b"]]>").is_none() {
        return Cow::Borrowed(source);
    }
    Cow::Owned(source.replace("]]>", "]]]]><![CDATA[>"))
}
