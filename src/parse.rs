//! HTML/XHTML source to tree conversion
//!
//! Parsing is done by html5ever (through `kuchikikiki`); the resulting DOM
//! is converted into the owned [`Document`] tree the composition transforms
//! work on.
//!
//! # Conversion rules
//!
//! - Character data and attribute values arrive decoded and are escaped
//!   again on render.
//! - Bodies of raw-text elements (`<script>`, `<style>`, ...) become
//!   [`TextKind::Raw`] nodes and are written back verbatim.
//! - Comments and the doctype become raw text nodes at their position. An
//!   XML declaration, which the HTML tokenizer reads as a bogus comment, is
//!   written back as a declaration.
//!
//! The parser always synthesizes `<head>` and `<body>`. Whether the source
//! actually declared them is answered by [`has_start_tag`].
//!
//! [`TextKind::Raw`]: crate::node::TextKind::Raw

use kuchikikiki::traits::TendrilSink;
use kuchikikiki::{Doctype, ElementData, NodeData, NodeRef};
use memchr::memchr_iter;

use crate::node::{Children, Document, Element, Node, Text};

/// Parse a complete document.
pub fn parse_document(input: &str) -> Document {
    let dom = kuchikikiki::parse_html().one(input);
    Document::new(convert_children(&dom, false))
}

/// Parse a markup fragment (e.g. a component template) in body context.
pub fn parse_fragment(input: &str) -> Children {
    let dom = kuchikikiki::parse_html().one(format!("<!DOCTYPE html><body>{input}"));
    dom.descendants()
        .find(|node| node.as_element().is_some_and(|e| &*e.name.local == "body"))
        .map(|body| convert_children(&body, false))
        .unwrap_or_default()
}

/// Whether `source` contains a `<tag ...>` start tag (ASCII case-insensitive).
pub fn has_start_tag(source: &str, tag: &str) -> bool {
    let bytes = source.as_bytes();
    memchr_iter(b'<', bytes).any(|at| {
        let end = at + 1 + tag.len();
        bytes
            .get(at + 1..end)
            .is_some_and(|name| name.eq_ignore_ascii_case(tag.as_bytes()))
            && bytes
                .get(end)
                .is_some_and(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
    })
}

/// Elements that never have children or an end tag.
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "basefont"
            | "bgsound"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Elements whose text content is written without escaping.
pub fn is_raw_text_element(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" | "plaintext"
    )
}

// =============================================================================
// DOM conversion
// =============================================================================

fn convert_children(parent: &NodeRef, raw: bool) -> Children {
    parent
        .children()
        .filter_map(|child| convert_node(&child, raw))
        .collect()
}

fn convert_node(node: &NodeRef, raw: bool) -> Option<Node> {
    match node.data() {
        NodeData::Element(data) => Some(Node::from(convert_element(node, data))),
        NodeData::Text(text) => {
            let text = text.borrow();
            Some(Node::Text(if raw {
                Text::raw(text.as_str())
            } else {
                Text::new(text.as_str())
            }))
        }
        NodeData::Comment(comment) => Some(Node::Text(Text::raw(comment_markup(&comment.borrow())))),
        NodeData::Doctype(doctype) => Some(Node::Text(Text::raw(doctype_markup(doctype)))),
        NodeData::ProcessingInstruction(pi) => {
            let pi = pi.borrow();
            let (target, data) = &*pi;
            Some(Node::Text(Text::raw(format!("<?{target} {data}?>"))))
        }
        NodeData::Document(_) | NodeData::DocumentFragment => None,
    }
}

fn convert_element(node: &NodeRef, data: &ElementData) -> Element {
    let mut elem = Element::new(&*data.name.local);
    elem.attrs = data
        .attributes
        .borrow()
        .map
        .iter()
        .map(|(name, attr)| {
            let key = match &attr.prefix {
                Some(prefix) => format!("{prefix}:{}", name.local),
                None => name.local.to_string(),
            };
            (key, attr.value.clone())
        })
        .collect();
    elem.children = convert_children(node, is_raw_text_element(&elem.tag));
    elem
}

fn comment_markup(data: &str) -> String {
    // `<?xml ...?>` is tokenized as a bogus comment holding `?xml ...?`
    if data.starts_with('?') && data.ends_with('?') {
        format!("<{data}>")
    } else {
        format!("<!--{data}-->")
    }
}

fn doctype_markup(doctype: &Doctype) -> String {
    let name = &doctype.name;
    match (doctype.public_id.as_str(), doctype.system_id.as_str()) {
        ("", "") => format!("<!DOCTYPE {name}>"),
        (public, "") => format!("<!DOCTYPE {name} PUBLIC \"{public}\">"),
        ("", system) => format!("<!DOCTYPE {name} SYSTEM \"{system}\">"),
        (public, system) => format!("<!DOCTYPE {name} PUBLIC \"{public}\" \"{system}\">"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(children: &Children) -> &Element {
        children.iter().find_map(Node::as_element).unwrap()
    }

    #[test]
    fn test_parse_basic_document() {
        let doc = parse_document(
            "<!DOCTYPE html>\n<html><head><title>T</title></head><body><p>Hi</p></body></html>",
        );
        let doctype = doc.children[0].as_text().unwrap();
        assert!(doctype.is_raw());
        assert_eq!(doctype.content, "<!DOCTYPE html>");
        assert_eq!(doc.head().unwrap().text_content(), "T");
        assert_eq!(doc.body().unwrap().text_content(), "Hi");
    }

    #[test]
    fn test_legacy_doctype() {
        let doc = parse_document(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \
             \"http://www.w3.org/TR/html4/strict.dtd\"><html><head></head><body></body></html>",
        );
        assert_eq!(
            doc.children[0].as_text().unwrap().content,
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">"
        );
    }

    #[test]
    fn test_uppercase_tags_are_lowercased() {
        let doc = parse_document("<HTML><HEAD></HEAD><BODY class=\"x\">y</BODY></HTML>");
        let body = doc.body().unwrap();
        assert_eq!(body.class(), Some("x"));
        assert_eq!(body.text_content(), "y");
    }

    #[test]
    fn test_attribute_values_are_decoded() {
        let nodes = parse_fragment(
            r#"<input type=text disabled value='a &amp; b' title="write &amp;copy; here" data-x="&copy;">"#,
        );
        let input = first_element(&nodes);
        assert_eq!(input.get_attr("type"), Some("text"));
        assert_eq!(input.get_attr("disabled"), Some(""));
        assert_eq!(input.get_attr("value"), Some("a & b"));
        assert_eq!(input.get_attr("title"), Some("write &copy; here"));
        assert_eq!(input.get_attr("data-x"), Some("\u{a9}"));
        assert!(input.is_empty());
    }

    #[test]
    fn test_void_elements() {
        let nodes = parse_fragment("<div><br><img src=\"a.png\"/>text</div>");
        let div = first_element(&nodes);
        let tags: Vec<_> = div.children_elements().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["br", "img"]);
        assert_eq!(div.text_content(), "text");
    }

    #[test]
    fn test_script_body_is_raw() {
        let nodes = parse_fragment("<script>if (a < b && c > d) { x = 1; }</SCRIPT><p>after</p>");
        let script = first_element(&nodes);
        let body = script.children[0].as_text().unwrap();
        assert!(body.is_raw());
        assert_eq!(body.content, "if (a < b && c > d) { x = 1; }");
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_text_decoded_and_comments_raw() {
        let nodes = parse_fragment("<p>a &lt; b<!-- <p>hidden</p> --></p>");
        let p = first_element(&nodes);
        assert_eq!(p.child_count(), 2);
        let text = p.children[0].as_text().unwrap();
        assert!(!text.is_raw());
        assert_eq!(text.content, "a < b");
        assert_eq!(p.children[1].as_text().unwrap().content, "<!-- <p>hidden</p> -->");
    }

    #[test]
    fn test_xml_declaration_kept() {
        let doc = parse_document(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<html xmlns=\"http://www.w3.org/1999/xhtml\">\
             <head></head><body></body></html>",
        );
        assert_eq!(
            doc.children[0].as_text().unwrap().content,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>"
        );
    }

    #[test]
    fn test_implied_end_tags() {
        let nodes = parse_fragment("<ul><li>a<li>b</ul><p>one<p>two");
        let ul = first_element(&nodes);
        assert_eq!(ul.children_elements().count(), 2);
        let paragraphs = nodes.iter().filter(|n| n.as_element().is_some_and(|e| e.is("p")));
        assert_eq!(paragraphs.count(), 2);
    }

    #[test]
    fn test_has_start_tag() {
        assert!(has_start_tag("<html><HEAD>", "head"));
        assert!(has_start_tag("<body class=\"x\">", "body"));
        assert!(!has_start_tag("<header>", "head"));
        assert!(!has_start_tag("<html><body></body></html>", "head"));
        assert!(!has_start_tag("just text", "body"));
    }
}
