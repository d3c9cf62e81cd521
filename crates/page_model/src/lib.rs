//! Headless document model: the rendering target for native runs and tests.

use std::{collections::BTreeMap, time::Duration};

use serde::Serialize;
use shared::{
    domain::{NodeId, Point, ScrollBehavior},
    error::SelectorError,
    selector::{ElementTree, Selector},
    surface::PageSurface,
};
use thiserror::Error;
use tracing::warn;

pub mod browser;
pub mod spec;

pub use browser::Browser;
pub use spec::{NodeSpec, PageSpec, Viewport};

const FORM_CONTROL_TAGS: [&str; 3] = ["input", "textarea", "select"];

#[derive(Debug, Error)]
pub enum PageError {
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),
    #[error("no element matches `{0}`")]
    NoMatch(String),
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),
    #[error("document has no node ids left")]
    NodeIdsExhausted,
}

pub type PageResult<T> = Result<T, PageError>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollRequest {
    pub top: f64,
    pub behavior: ScrollBehavior,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TranslateAnimation {
    pub node: NodeId,
    pub to: Point,
    pub duration_ms: u128,
}

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attributes: BTreeMap<String, String>,
    style: BTreeMap<String, String>,
    text: String,
    value: Option<String>,
    default_value: Option<String>,
    top: f64,
    height: f64,
}

/// In-memory element tree with a viewport, implementing [`PageSurface`].
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    viewport: Viewport,
    scroll_requests: Vec<ScrollRequest>,
    animations: Vec<TranslateAnimation>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Viewport::default())
    }
}

impl Document {
    pub fn new(viewport: Viewport) -> Self {
        let body = Node {
            tag: "body".into(),
            parent: None,
            children: Vec::new(),
            attributes: BTreeMap::new(),
            style: BTreeMap::new(),
            text: String::new(),
            value: None,
            default_value: None,
            top: 0.0,
            height: 0.0,
        };
        Self {
            nodes: vec![body],
            viewport,
            scroll_requests: Vec::new(),
            animations: Vec::new(),
        }
    }

    pub fn from_spec(spec: &PageSpec) -> Self {
        let mut document = Self::new(spec.viewport);
        let body = document.body_id();
        for child in &spec.body {
            if let Err(error) = document.append(body, child) {
                warn!(%error, "page fixture truncated");
                break;
            }
        }
        document
    }

    pub fn body_id(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends `spec` and its subtree under `parent`, returning the new node.
    pub fn append(&mut self, parent: NodeId, spec: &NodeSpec) -> PageResult<NodeId> {
        let id = NodeId::from_index(self.nodes.len()).ok_or(PageError::NodeIdsExhausted)?;
        let mut attributes = spec.attributes.clone();
        if let Some(dom_id) = &spec.id {
            attributes.insert("id".into(), dom_id.clone());
        }
        if let Some(class) = &spec.class {
            attributes.insert("class".into(), class.clone());
        }
        self.nodes.push(Node {
            tag: spec.tag.to_ascii_lowercase(),
            parent: Some(parent),
            children: Vec::new(),
            attributes,
            style: BTreeMap::new(),
            text: spec.text.clone().unwrap_or_default(),
            value: spec.value.clone(),
            default_value: spec.value.clone(),
            top: spec.top,
            height: spec.height,
        });
        if let Some(parent_node) = self.node_mut(parent) {
            parent_node.children.push(id);
        }
        for child in &spec.children {
            self.append(id, child)?;
        }
        Ok(id)
    }

    /// First element matching `selector`, in document order.
    pub fn find(&self, selector: &str) -> PageResult<NodeId> {
        let parsed = Selector::parse(selector)?;
        self.query_one(&parsed)
            .ok_or_else(|| PageError::NoMatch(selector.to_string()))
    }

    pub fn find_all(&self, selector: &str) -> PageResult<Vec<NodeId>> {
        let parsed = Selector::parse(selector)?;
        Ok(self.query_all(&parsed))
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.tag.as_str())
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.node(node)?.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).contains(&class)
    }

    pub fn classes(&self, node: NodeId) -> Vec<&str> {
        self.node(node)
            .and_then(|n| n.attributes.get("class"))
            .map(|class| class.split_whitespace().collect())
            .unwrap_or_default()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.node(node)?.style.get(property).map(String::as_str)
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.text.as_str())
    }

    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.node(node)?.value.as_deref()
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) -> PageResult<()> {
        let target = self.node_mut(node).ok_or(PageError::UnknownNode(node))?;
        target.value = Some(value.to_string());
        Ok(())
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.viewport.scroll_y = scroll_y.max(0.0);
    }

    pub fn set_viewport_width(&mut self, width: f64) {
        self.viewport.width = width;
    }

    pub fn scroll_requests(&self) -> &[ScrollRequest] {
        &self.scroll_requests
    }

    pub fn animations(&self) -> &[TranslateAnimation] {
        &self.animations
    }

    /// Fraction of the node's box inside the viewport, and whether any of it is.
    pub fn intersection(&self, node: NodeId) -> (f64, bool) {
        let Some(target) = self.node(node) else {
            return (0.0, false);
        };
        let view_top = self.viewport.scroll_y;
        let view_bottom = view_top + self.viewport.height;
        if target.height <= 0.0 {
            let inside = target.top >= view_top && target.top <= view_bottom;
            return if inside { (1.0, true) } else { (0.0, false) };
        }
        let overlap =
            (target.top + target.height).min(view_bottom) - target.top.max(view_top);
        if overlap <= 0.0 {
            return (0.0, false);
        }
        ((overlap / target.height).min(1.0), true)
    }

    /// Parent of `node`, or `None` for `<body>` and unknown handles.
    pub fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.body_id()];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = match self.node(root) {
            Some(node) => node.children.iter().rev().copied().collect::<Vec<_>>(),
            None => return found,
        };
        while let Some(id) = stack.pop() {
            found.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        found
    }

    fn form_control(&self, form: NodeId, field: &str) -> Option<NodeId> {
        self.descendants(form).into_iter().find(|id| {
            self.node(*id).is_some_and(|node| {
                FORM_CONTROL_TAGS.contains(&node.tag.as_str())
                    && node.attributes.get("name").map(String::as_str) == Some(field)
            })
        })
    }
}

impl ElementTree for Document {
    type Node = NodeId;

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.tag(node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        Document::attribute(self, node, name)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        Document::has_class(self, node, class)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }
}

impl PageSurface for Document {
    fn query_all(&self, selector: &Selector) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|id| selector.matches(self, *id))
            .collect()
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body_id())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        Document::attribute(self, node, name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(target) = self.node_mut(node) {
            target.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        Document::has_class(self, node, class)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if Document::has_class(self, node, class) {
            return;
        }
        if let Some(target) = self.node_mut(node) {
            let entry = target.attributes.entry("class".into()).or_default();
            if !entry.is_empty() {
                entry.push(' ');
            }
            entry.push_str(class);
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(target) = self.node_mut(node) {
            if let Some(current) = target.attributes.get_mut("class") {
                *current = current
                    .split_whitespace()
                    .filter(|existing| *existing != class)
                    .collect::<Vec<_>>()
                    .join(" ");
            }
        }
    }

    fn set_class_name(&mut self, node: NodeId, class_name: &str) {
        self.set_attribute(node, "class", class_name);
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(target) = self.node_mut(node) {
            if value.is_empty() {
                target.style.remove(property);
            } else {
                target.style.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(target) = self.node_mut(node) {
            target.text = text.to_string();
        }
    }

    fn animate_translate(&mut self, node: NodeId, to: Point, duration: Duration) {
        if self.node(node).is_none() {
            return;
        }
        // Animations fill forwards, so the end state is the computed value.
        self.set_style(node, "translate", &to.translate_value());
        self.animations.push(TranslateAnimation {
            node,
            to,
            duration_ms: duration.as_millis(),
        });
    }

    fn form_value(&self, form: NodeId, field: &str) -> Option<String> {
        let control = self.form_control(form, field)?;
        Some(self.value(control).unwrap_or_default().to_string())
    }

    fn reset_form(&mut self, form: NodeId) {
        for id in self.descendants(form) {
            if let Some(node) = self.node_mut(id) {
                if FORM_CONTROL_TAGS.contains(&node.tag.as_str()) {
                    node.value = node.default_value.clone();
                }
            }
        }
    }

    fn bounding_top(&self, node: NodeId) -> f64 {
        self.node(node)
            .map(|n| n.top - self.viewport.scroll_y)
            .unwrap_or_default()
    }

    fn scroll_offset(&self) -> f64 {
        self.viewport.scroll_y
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scroll_requests.push(ScrollRequest { top, behavior });
        self.set_scroll_y(top);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
