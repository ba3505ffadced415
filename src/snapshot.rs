//! Detached point-in-time copy of the page's DOM tree.

use std::collections::HashMap;

use ego_tree::NodeRef;
use scraper::{Html, Selector, node::Node};

/// An owned, detached deep copy of the document, frozen at trigger time.
///
/// The snapshot is the sole work object of one save operation: style
/// injection and image-source replacement mutate it, and nothing it does is
/// ever reflected back into the live page. [`serialize`](Self::serialize)
/// produces the final standalone markup.
///
/// The markup is kept as the frozen source of truth and parsed on demand;
/// the parsed tree is never held across a suspension point, so a snapshot
/// can live inside spawned save tasks.
pub struct DocumentSnapshot {
    html: String,
    src_overrides: HashMap<String, String>,
    injected_css: Option<String>,
}

/// HTML5 void elements that must not have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose text children are raw text: the parser never decodes
/// entities inside them, so serialization must not re-escape.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

impl DocumentSnapshot {
    /// Take a detached snapshot of the page markup.
    ///
    /// Later changes to the live page are not reflected here.
    pub fn capture(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            src_overrides: HashMap::new(),
            injected_css: None,
        }
    }

    /// Every distinct non-empty `<img>` source, in document order.
    pub fn image_sources(&self) -> Vec<String> {
        let Ok(selector) = Selector::parse("img") else {
            tracing::warn!("img selector failed to parse");
            return Vec::new();
        };

        let doc = Html::parse_document(&self.html);
        let mut sources: Vec<String> = Vec::new();
        for element in doc.select(&selector) {
            let Some(src) = element.value().attr("src") else {
                continue;
            };
            if src.is_empty() || sources.iter().any(|s| s == src) {
                continue;
            }
            sources.push(src.to_string());
        }
        sources
    }

    /// Text content of every literal `<style>` element, in document order.
    pub fn inline_style_text(&self) -> Vec<String> {
        let Ok(selector) = Selector::parse("style") else {
            tracing::warn!("style selector failed to parse");
            return Vec::new();
        };

        let doc = Html::parse_document(&self.html);
        doc.select(&selector)
            .map(|element| element.text().collect::<String>())
            .collect()
    }

    /// Replace every `<img>` whose `src` equals `original` in the serialized
    /// output. Other elements, and other attributes, are never rewritten.
    /// Elements keep their original source until serialization.
    pub fn set_image_src(&mut self, original: String, replacement: String) {
        self.src_overrides.insert(original, replacement);
    }

    /// Record the aggregate style bundle; it is emitted as one `<style>`
    /// element appended to `<head>` during serialization.
    pub fn inject_styles(&mut self, css: String) {
        self.injected_css = Some(css);
    }

    /// Serialize the snapshot's full markup, prefixed with the standard
    /// HTML doctype declaration.
    pub fn serialize(&self) -> String {
        let doc = Html::parse_document(&self.html);
        let mut out = String::from("<!DOCTYPE html>\n");
        serialize_node(
            doc.tree.root(),
            &self.src_overrides,
            self.injected_css.as_deref(),
            false,
            &mut out,
        );
        out
    }
}

/// Serialize an HTML subtree, rewriting overridden `<img>` sources and
/// appending the injected style bundle at the end of `<head>`.
///
/// The parser decodes character references, so text and attribute values are
/// re-escaped here; `raw_text` marks children of [`RAW_TEXT_ELEMENTS`],
/// whose content the parser stored verbatim.
fn serialize_node(
    node: NodeRef<Node>,
    src_overrides: &HashMap<String, String>,
    injected_css: Option<&str>,
    raw_text: bool,
    out: &mut String,
) {
    match node.value() {
        Node::Document | Node::Fragment => {
            for child in node.children() {
                serialize_node(child, src_overrides, injected_css, false, out);
            }
        }
        Node::Element(el) => {
            let tag = el.name();
            out.push('<');
            out.push_str(tag);

            for (k, v) in el.attrs() {
                out.push(' ');
                out.push_str(k);
                out.push_str("=\"");
                match src_overrides.get(v) {
                    Some(replacement) if tag == "img" && k == "src" => {
                        push_escaped_attr(replacement, out);
                    }
                    _ => push_escaped_attr(v, out),
                }
                out.push('"');
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&tag) {
                return;
            }

            let raw_children = RAW_TEXT_ELEMENTS.contains(&tag);
            for child in node.children() {
                serialize_node(child, src_overrides, injected_css, raw_children, out);
            }

            if tag == "head" {
                if let Some(css) = injected_css {
                    out.push_str("<style>");
                    out.push_str(css);
                    out.push_str("</style>");
                }
            }

            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Node::Text(text) => {
            if raw_text {
                out.push_str(text.as_ref());
            } else {
                push_escaped_text(text.as_ref(), out);
            }
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment.as_ref());
            out.push_str("-->");
        }
        // The source doctype is dropped; serialize() emits its own.
        _ => {}
    }
}

fn push_escaped_text(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
