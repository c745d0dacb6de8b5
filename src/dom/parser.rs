use crate::dom::{Document, NodeId};
use scraper::{ElementRef, Html, Node};
use std::collections::HashMap;

/// Tags whose children should be stripped (invisible/script content)
const SKIP_CHILDREN: &[&str] = &["script", "style", "noscript", "svg"];

/// Parse raw HTML into a mutable [`Document`].
pub fn parse_html(html: &str, url: &str) -> Document {
    let parsed = Html::parse_document(html);

    let title = scraper::Selector::parse("title")
        .ok()
        .and_then(|sel| parsed.select(&sel).next())
        .map(|el| el.text().collect::<String>())
        .unwrap_or_default();

    let mut doc = Document::new();
    let root = doc.root();
    convert_element(&mut doc, root, parsed.root_element());
    doc.url = url.to_string();
    doc.title = title.trim().to_string();
    doc
}

fn convert_element(doc: &mut Document, parent: NodeId, el: ElementRef<'_>) {
    let tag = el.value().name.local.as_ref().to_string();
    let attributes: HashMap<String, String> = el
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    let id = doc.append_element(parent, tag.as_str(), attributes);

    if SKIP_CHILDREN.contains(&tag.as_str()) {
        return;
    }

    for child_ref in el.children() {
        match child_ref.value() {
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child_ref) {
                    convert_element(doc, id, child_el);
                }
            }
            Node::Text(t) => {
                let s = t.text.to_string();
                if !s.trim().is_empty() {
                    doc.append_text(id, s);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;

    #[test]
    fn parse_simple_html() {
        let html = r#"
        <html>
            <head><title>Portfolio</title></head>
            <body>
                <h1>Hello</h1>
                <span class="tag">Rust</span>
            </body>
        </html>
        "#;

        let doc = parse_html(html, "file:///index.html");
        assert_eq!(doc.title, "Portfolio");
        let tags = doc.elements_with_class("tag");
        assert_eq!(tags.len(), 1);
        assert_eq!(doc.text_content(tags[0]), "Rust");
    }

    #[test]
    fn keeps_document_order_and_classes() {
        let html = r#"<html><body>
            <ul><li class="tag">Go</li><li class="tag small">Rust</li></ul>
            <p><span class="tag">Go</span></p>
        </body></html>"#;

        let doc = parse_html(html, "");
        let labels: Vec<String> = doc
            .elements_with_class("tag")
            .into_iter()
            .map(|id| doc.text_content(id))
            .collect();
        assert_eq!(labels, vec!["Go", "Rust", "Go"]);
        let small = doc.first_by_class("small").unwrap();
        assert_eq!(doc.node(small).classes, vec!["tag", "small"]);
    }

    #[test]
    fn lifts_inline_style() {
        let html = r#"<html><body><span class="tag" style="color: #ffffff; margin: 1px">Go</span></body></html>"#;
        let doc = parse_html(html, "");
        let tag = doc.first_by_class("tag").unwrap();
        let style = &doc.node(tag).style;
        assert_eq!(style.color, Some(HexColor::new(255, 255, 255)));
        assert!(doc.node(tag).attr("style").is_none());
    }

    #[test]
    fn strips_script_children() {
        let html = r#"
        <html><body>
            <p>Visible</p>
            <script>alert("hidden");</script>
        </body></html>
        "#;

        let doc = parse_html(html, "");
        let text = doc.text_content(doc.root());
        assert!(text.contains("Visible"));
        assert!(!text.contains("alert"));
    }
}
