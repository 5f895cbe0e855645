use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Attribute that marks a subtree injected by the annotation tool itself
/// (markers, popovers, tooltips). Marked subtrees are invisible to queries.
pub const UI_MARKER_ATTR: &str = "data-pinote-ui";

/// Host element tag used by the tool's presentation layer.
pub const UI_HOST_TAG: &str = "pinote-host";

/// Attributes in this namespace belong to the tool (highlight bookkeeping)
/// and must never be used to anchor a page element.
pub const RESERVED_DATA_PREFIX: &str = "data-pinote-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Viewport-relative geometry as reported by the host page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub rect: Rect,
    pub style: BTreeMap<String, String>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            rect: Rect::default(),
            style: BTreeMap::new(),
        }
    }

    /// Set an attribute, replacing an existing one of the same name in place
    /// so that attribute order stays stable.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_attr("id", id)
    }

    pub fn with_class(self, class: &str) -> Self {
        self.with_attr("class", class)
    }

    pub fn with_rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(x, y, width, height);
        self
    }

    pub fn with_style(mut self, property: &str, value: &str) -> Self {
        self.style.insert(property.to_string(), value.to_string());
        self
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.attributes.push(Attribute {
                name,
                value: value.to_string(),
            }),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// The `id` attribute, if present and non-empty.
    pub fn id(&self) -> Option<&str> {
        self.attr("id").filter(|id| !id.is_empty())
    }

    /// Class tokens in source order, de-duplicated like `DOMTokenList`.
    pub fn classes(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for token in self.attr("class").unwrap_or("").split_ascii_whitespace() {
            if !out.contains(&token) {
                out.push(token);
            }
        }
        out
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_ascii_whitespace().any(|t| t == class))
            .unwrap_or(false)
    }

    /// Whether this element is the root of a tool-injected subtree.
    pub fn is_ui_marker(&self) -> bool {
        self.tag == UI_HOST_TAG || self.attr(UI_MARKER_ATTR).is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Arena-backed document tree. Node ids are stable for the lifetime of the
/// document; document order is the pre-order walk from the root.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    pub url: Option<String>,
    pub title: String,
}

impl Document {
    pub fn new(root: ElementData) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Element(root),
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
            url: None,
            title: String::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn append_element(&mut self, parent: NodeId, data: ElementData) -> NodeId {
        self.push(parent, NodeKind::Element(data))
    }

    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.push(parent, NodeKind::Text(text.into()))
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.node(id)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            NodeKind::Element(data) => Some(data),
            NodeKind::Text(_) => None,
        }
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id)?.parent?;
        self.element(parent).map(|_| parent)
    }

    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.node(id)
            .map(|n| {
                n.children
                    .iter()
                    .copied()
                    .filter(|c| self.element(*c).is_some())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Element siblings including `id` itself, in document order.
    pub fn element_siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.parent_element(id) {
            Some(parent) => self.element_children(parent),
            None => vec![id],
        }
    }

    /// 1-based position among element siblings (`:nth-child` numbering).
    pub fn element_index(&self, id: NodeId) -> Option<usize> {
        self.element(id)?;
        self.element_siblings(id)
            .iter()
            .position(|s| *s == id)
            .map(|p| p + 1)
    }

    /// 1-based position among element siblings sharing the same tag.
    pub fn type_index(&self, id: NodeId) -> Option<usize> {
        let tag = &self.element(id)?.tag;
        self.element_siblings(id)
            .into_iter()
            .filter(|s| self.element(*s).map(|e| &e.tag == tag).unwrap_or(false))
            .position(|s| s == id)
            .map(|p| p + 1)
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.element_siblings(id);
        let pos = siblings.iter().position(|s| *s == id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    /// Concatenated text of all descendant text nodes, like DOM `textContent`.
    /// Injected UI subtrees are skipped.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        match &node.kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element(_) => {
                for child in &node.children {
                    // injected markers are not part of the page's text
                    if self.element(*child).is_some_and(ElementData::is_ui_marker) {
                        continue;
                    }
                    self.collect_text(*child, out);
                }
            }
        }
    }

    /// All elements in document order, starting at the root.
    pub fn elements(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.node(id) else { continue };
            if let NodeKind::Element(_) = node.kind {
                out.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    pub fn body(&self) -> Option<NodeId> {
        self.elements()
            .into_iter()
            .find(|id| self.element(*id).map(|e| e.tag == "body").unwrap_or(false))
    }

    /// The document element or `body`; both collapse to the root marker.
    pub fn is_root(&self, id: NodeId) -> bool {
        id == self.root || self.element(id).map(|e| e.tag == "body").unwrap_or(false)
    }

    /// True when `id` lies inside a tool-injected subtree.
    pub fn is_excluded(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(n) = current {
            if self.element(n).map(|e| e.is_ui_marker()).unwrap_or(false) {
                return true;
            }
            current = self.node(n).and_then(|node| node.parent);
        }
        false
    }
}
