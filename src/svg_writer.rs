//! SVG document assembly
//!
//! The backend edits its output while drawing: mask content is cloned, the
//! root size is only known at the footer, and the style sheet is rendered
//! last. Nodes are therefore kept as an owned tree and handed to the `svg`
//! crate once, when the document is finished.

use svg::node::element::Element;
use svg::node::Text;
use svg::{Document, Node};

/// Character data is written verbatim by `svg::node::Text`.
fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<SvgNode>,
    text: Option<String>,
}

impl SvgNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn set(mut self, name: &str, value: impl ToString) -> Self {
        self.assign(name, value);
        self
    }

    pub fn assign(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn add(mut self, child: SvgNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn append(&mut self, child: SvgNode) {
        self.children.push(child);
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> &[SvgNode] {
        &self.children
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn to_element(&self) -> Element {
        let mut element = Element::new(self.name.as_str());
        for (name, value) in &self.attrs {
            element.assign(name.as_str(), value.as_str());
        }
        if let Some(text) = &self.text {
            element.append(Text::new(escape_text(text)));
        }
        for child in &self.children {
            element.append(child.to_element());
        }
        element
    }
}

/// Root attributes, style sheet, definitions and content of one output
/// document. Content goes either to the root or to the open group.
#[derive(Debug, Default)]
pub struct SvgDocument {
    root_attrs: Vec<(String, String)>,
    style: String,
    defs: Vec<SvgNode>,
    content: Vec<SvgNode>,
    group: Option<usize>,
}

impl SvgDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root_attr(&mut self, name: &str, value: impl ToString) {
        let value = value.to_string();
        match self.root_attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value,
            None => self.root_attrs.push((name.to_string(), value)),
        }
    }

    pub fn root_attr(&self, name: &str) -> Option<&str> {
        self.root_attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_style(&mut self, css: String) {
        self.style = css;
    }

    pub fn add_def(&mut self, node: SvgNode) {
        self.defs.push(node);
    }

    pub fn find_def(&self, id: &str) -> Option<&SvgNode> {
        self.defs.iter().find(|node| node.attr("id") == Some(id))
    }

    pub fn defs(&self) -> &[SvgNode] {
        &self.defs
    }

    pub fn content(&self) -> &[SvgNode] {
        &self.content
    }

    /// Appends a drawing element to the open group, or to the root.
    pub fn append(&mut self, node: SvgNode) {
        match self.group.and_then(|index| self.content.get_mut(index)) {
            Some(group) => group.append(node),
            None => self.content.push(node),
        }
    }

    /// Starts a new top-level group that receives all following content.
    pub fn open_group(&mut self, group: SvgNode) {
        self.content.push(group);
        self.group = Some(self.content.len() - 1);
    }

    pub fn close_group(&mut self) {
        self.group = None;
    }

    /// Serializes the document: style sheet first, then definitions, then
    /// content in drawing order.
    pub fn render(&self) -> String {
        let mut document = Document::new();
        for (name, value) in &self.root_attrs {
            document.assign(name.as_str(), value.as_str());
        }

        if !self.style.is_empty() {
            let style = SvgNode::new("style")
                .set("type", "text/css")
                .with_text(self.style.as_str());
            document.append(style.to_element());
        }

        if !self.defs.is_empty() {
            let mut defs = Element::new("defs");
            for def in &self.defs {
                defs.append(def.to_element());
            }
            document.append(defs);
        }

        for node in &self.content {
            document.append(node.to_element());
        }

        document.to_string()
    }
}
