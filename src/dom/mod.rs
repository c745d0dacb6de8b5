pub mod parser;
pub mod css;

use std::collections::HashMap;

use css::InlineStyle;

/// Handle to a node in a [`Document`] arena.
///
/// Handles are stable for the lifetime of the document; nodes are never
/// removed, only appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
}

/// A single DOM node.
///
/// `class` and `style` attributes are lifted out of `attributes` into
/// `classes` and `style` so that handlers can mutate them directly.
#[derive(Debug, Clone)]
pub struct DomNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub classes: Vec<String>,
    pub style: InlineStyle,
    pub text: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub node_type: NodeType,
}

impl DomNode {
    fn document() -> Self {
        Self {
            tag: "#document".into(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            style: InlineStyle::default(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
            node_type: NodeType::Document,
        }
    }

    fn element(tag: impl Into<String>, mut attributes: HashMap<String, String>) -> Self {
        let classes = attributes
            .remove("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let style = attributes
            .remove("style")
            .map(|s| css::parse_inline_style(&s))
            .unwrap_or_default();
        Self {
            tag: tag.into(),
            attributes,
            classes,
            style,
            text: String::new(),
            children: Vec::new(),
            parent: None,
            node_type: NodeType::Element,
        }
    }

    fn text(content: impl Into<String>) -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            classes: Vec::new(),
            style: InlineStyle::default(),
            text: content.into(),
            children: Vec::new(),
            parent: None,
            node_type: NodeType::Text,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }
}

/// Arena-backed mutable DOM.
///
/// Unlike a plain tree, nodes are addressed by [`NodeId`] so that event
/// bindings, clusters and the activation set can refer to elements without
/// owning them.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<DomNode>,
    pub url: String,
    pub title: String,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![DomNode::document()],
            url: String::new(),
            title: String::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> &DomNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut DomNode {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id.0)
    }

    /// Append a new element as the last child of `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        attributes: HashMap<String, String>,
    ) -> NodeId {
        self.push(parent, DomNode::element(tag, attributes))
    }

    /// Append a text node as the last child of `parent`.
    pub fn append_text(&mut self, parent: NodeId, content: impl Into<String>) -> NodeId {
        self.push(parent, DomNode::text(content))
    }

    fn push(&mut self, parent: NodeId, mut node: DomNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// All nodes below `from` (inclusive) in document (pre-)order.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Elements carrying `class`, in document order.
    pub fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&id| {
                let node = self.node(id);
                node.is_element() && node.has_class(class)
            })
            .collect()
    }

    /// Elements with the given tag name below `from`, in document order.
    pub fn elements_by_tag(&self, from: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(from)
            .into_iter()
            .filter(|&id| {
                let node = self.node(id);
                node.is_element() && node.tag == tag
            })
            .collect()
    }

    /// First element whose `id` attribute equals `id_attr`.
    pub fn element_by_id(&self, id_attr: &str) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&id| self.node(id).attr("id") == Some(id_attr))
    }

    pub fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.elements_with_class(class).into_iter().next()
    }

    pub fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.elements_by_tag(self.root(), tag).into_iter().next()
    }

    /// Text content with whitespace runs collapsed and ends trimmed,
    /// the way a rendered label reads.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut buf = String::new();
        self.collect_text_inner(id, &mut buf);
        buf.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text_inner(&self, id: NodeId, buf: &mut String) {
        let node = self.node(id);
        if node.node_type == NodeType::Text {
            buf.push(' ');
            buf.push_str(&node.text);
        }
        for &child in &node.children {
            self.collect_text_inner(child, buf);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).has_class(class)
    }

    /// Add `class` unless already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        let node = self.node_mut(id);
        if !node.has_class(class) {
            node.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.node_mut(id).classes.retain(|c| c != class);
    }

    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(id, class);
        } else {
            self.remove_class(id, class);
        }
    }

    /// Serialize the subtree rooted at `id` back to HTML.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        match node.node_type {
            NodeType::Document => {
                for &child in &node.children {
                    self.write_html(child, out);
                }
            }
            NodeType::Text => out.push_str(&escape_text(&node.text)),
            NodeType::Element => {
                out.push('<');
                out.push_str(&node.tag);
                let mut attrs: Vec<(&String, &String)> = node.attributes.iter().collect();
                attrs.sort();
                for (k, v) in attrs {
                    out.push_str(&format!(" {}=\"{}\"", k, escape_attr(v)));
                }
                if !node.classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", escape_attr(&node.classes.join(" "))));
                }
                let style = node.style.to_css();
                if !style.is_empty() {
                    out.push_str(&format!(" style=\"{}\"", escape_attr(&style)));
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&node.tag.as_str()) {
                    return;
                }
                for &child in &node.children {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(&node.tag);
                out.push('>');
            }
        }
    }
}

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta", "source", "wbr"];

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

/// Build an attribute map from literal pairs.
pub fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
