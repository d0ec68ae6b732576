#![forbid(unsafe_code)]

//! Arena-backed in-memory DOM with host-supplied layout.
//!
//! [`MemoryDom`] stands in for a browser document in tests and in the replay
//! harness. There is no layout engine: every element carries a [`NodeLayout`]
//! (top coordinate and natural border-box height) set by the host. The only
//! layout rule applied is that an inline `height: Npx` style overrides the
//! natural height, which is exactly what the height equalizer writes.
//!
//! Nodes are never freed. Detached nodes (cleared children, fresh clones) stay
//! in the arena and are simply unreachable from the document root.

use crate::dom::PageDom;
use crate::geometry::{Rect, parse_px};
use crate::selector::{Selector, SelectorError};

/// Element handle into a [`MemoryDom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Host-supplied layout for one element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeLayout {
    /// Document-relative top edge in pixels.
    pub top: f64,
    /// Natural (unconstrained) border-box height in pixels.
    pub natural_height: f64,
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    text: String,
    layout: NodeLayout,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl NodeData {
    fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            styles: Vec::new(),
            text: String::new(),
            layout: NodeLayout::default(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// Builder for elements inserted with [`MemoryDom::insert`].
#[derive(Debug, Clone, Default)]
pub struct ElementSpec {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    layout: NodeLayout,
}

impl ElementSpec {
    /// Describe a `tag` element.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Add a class (whitespace-separated lists are split).
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        for name in class.split_whitespace() {
            if !self.classes.iter().any(|c| c == name) {
                self.classes.push(name.to_string());
            }
        }
        self
    }

    /// Set the id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the element's own text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the document-relative top edge.
    #[must_use]
    pub fn top(mut self, top: f64) -> Self {
        self.layout.top = top;
        self
    }

    /// Set the natural border-box height.
    #[must_use]
    pub fn height(mut self, height: f64) -> Self {
        self.layout.natural_height = height;
        self
    }
}

/// In-memory document.
#[derive(Debug, Clone)]
pub struct MemoryDom {
    nodes: Vec<NodeData>,
    root: NodeId,
    scroll_offset: f64,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    /// Create an empty document with a `body` root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::element("body")],
            root: NodeId(0),
            scroll_offset: 0.0,
        }
    }

    /// The document root (`body`).
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Insert a new element as the last child of `parent`.
    pub fn insert(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let mut data = NodeData::element(&spec.tag);
        data.id = spec.id;
        data.classes = spec.classes;
        data.text = spec.text;
        data.layout = spec.layout;
        let id = self.push(data);
        self.attach(parent, id);
        id
    }

    /// Set the viewport scroll offset.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.scroll_offset = offset;
    }

    /// Replace the host-supplied layout of `node`.
    pub fn set_layout(&mut self, node: NodeId, layout: NodeLayout) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.layout = layout;
        }
    }

    /// Host-supplied layout of `node`.
    #[must_use]
    pub fn layout(&self, node: NodeId) -> NodeLayout {
        self.nodes.get(node.0).map(|n| n.layout).unwrap_or_default()
    }

    /// Lowercase tag name of `node`.
    #[must_use]
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.nodes.get(node.0).map(|n| n.tag.as_str())
    }

    /// Parent of `node`, if attached to one.
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Whether `node` is reachable from the document root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(&self.root, &node)
    }

    /// Class list of `node`.
    #[must_use]
    pub fn classes(&self, node: NodeId) -> &[String] {
        self.nodes.get(node.0).map_or(&[], |n| n.classes.as_slice())
    }

    /// Like [`PageDom::query_selector_all`], but reports selectors outside the
    /// supported subset instead of matching nothing.
    pub fn try_query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let parsed = Selector::parse(selector)?;
        Ok(self.collect_matches(self.root, &parsed))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(data);
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() {
            return;
        }
        // Appending an ancestor under its own descendant would create a cycle.
        if self.contains(&child, &parent) {
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != node);
        }
    }

    fn collect_matches(&self, root: NodeId, selector: &Selector) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.nodes.get(root.0) {
            Some(data) => data.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(id) = stack.pop() {
            let data = &self.nodes[id.0];
            if selector.matches(&data.tag, data.id.as_deref(), &data.classes) {
                out.push(id);
            }
            stack.extend(data.children.iter().rev().copied());
        }
        out
    }

    fn query_from(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        match Selector::parse(selector) {
            Ok(parsed) => self.collect_matches(root, &parsed),
            Err(_) => Vec::new(),
        }
    }

    fn clone_subtree(&mut self, node: NodeId) -> NodeId {
        let mut data = self.nodes[node.0].clone();
        let children = std::mem::take(&mut data.children);
        data.parent = None;
        let copy = self.push(data);
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.nodes[child_copy.0].parent = Some(copy);
            self.nodes[copy.0].children.push(child_copy);
        }
        copy
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let data = &self.nodes[node.0];
        out.push_str(&data.text);
        for &child in &data.children {
            self.collect_text(child, out);
        }
    }
}

impl PageDom for MemoryDom {
    type Node = NodeId;

    fn query_selector_all(&self, selector: &str) -> Vec<NodeId> {
        self.query_from(self.root, selector)
    }

    fn query_within(&self, root: &NodeId, selector: &str) -> Vec<NodeId> {
        self.query_from(*root, selector)
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes
            .get(node.0)
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    fn contains(&self, ancestor: &NodeId, node: &NodeId) -> bool {
        let mut current = Some(*node);
        while let Some(id) = current {
            if id == *ancestor {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.classes(*node).iter().any(|c| c == class)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(data) = self.nodes.get_mut(node.0)
            && !data.classes.iter().any(|c| c == class)
        {
            data.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.classes.retain(|c| c != class);
        }
    }

    fn style(&self, node: &NodeId, property: &str) -> Option<String> {
        self.nodes
            .get(node.0)?
            .styles
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.clone())
    }

    fn set_style(&mut self, node: &NodeId, property: &str, value: &str) {
        let Some(data) = self.nodes.get_mut(node.0) else {
            return;
        };
        // An empty value clears the property, as with CSSOM.
        if value.is_empty() {
            data.styles.retain(|(name, _)| name != property);
            return;
        }
        match data.styles.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => data.styles.push((property.to_string(), value.to_string())),
        }
    }

    fn remove_style(&mut self, node: &NodeId, property: &str) {
        if let Some(data) = self.nodes.get_mut(node.0) {
            data.styles.retain(|(name, _)| name != property);
        }
    }

    fn text(&self, node: &NodeId) -> String {
        let mut out = String::new();
        if node.0 < self.nodes.len() {
            self.collect_text(*node, &mut out);
        }
        out
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        if node.0 >= self.nodes.len() {
            return;
        }
        self.clear_children(node);
        self.nodes[node.0].text = text.to_string();
    }

    fn create_element(&mut self, tag: &str) -> Option<NodeId> {
        let tag = tag.trim();
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return None;
        }
        Some(self.push(NodeData::element(tag)))
    }

    fn clone_deep(&mut self, node: &NodeId) -> Option<NodeId> {
        (node.0 < self.nodes.len()).then(|| self.clone_subtree(*node))
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.attach(*parent, *child);
    }

    fn clear_children(&mut self, node: &NodeId) {
        let Some(data) = self.nodes.get_mut(node.0) else {
            return;
        };
        let children = std::mem::take(&mut data.children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    fn bounding_rect(&self, node: &NodeId) -> Rect {
        let Some(data) = self.nodes.get(node.0) else {
            return Rect::default();
        };
        Rect::new(
            0.0,
            data.layout.top - self.scroll_offset,
            0.0,
            self.offset_height(node),
        )
    }

    fn offset_height(&self, node: &NodeId) -> f64 {
        let Some(data) = self.nodes.get(node.0) else {
            return 0.0;
        };
        data.styles
            .iter()
            .find(|(name, _)| name == "height")
            .and_then(|(_, value)| parse_px(value))
            .unwrap_or(data.layout.natural_height)
    }
}
