//! Document surface
//!
//! [`DocumentSurface`] is the small document interface the synthesizer
//! works against. [`Document`] is an arena-backed implementation used
//! server-side and in tests.

use crate::html::{Element, Fragment, escape_attr, escape_text, is_void};
use std::fmt::Write;

/// Element lookup used by the insertion policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `[name]`
    Attribute(&'a str),
    /// `tag`
    Tag(&'a str),
    /// `.class`
    Class(&'a str),
}

/// Document-like interface
pub trait DocumentSurface {
    type Node: Copy + Eq + std::fmt::Debug;

    fn body(&self) -> Self::Node;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// First match in document order, searching descendants of `scope`
    /// (or the whole document)
    fn query(&self, scope: Option<Self::Node>, selector: Selector<'_>) -> Option<Self::Node>;

    fn append_child(&mut self, parent: Self::Node, element: Element) -> Self::Node;

    /// Insert as the next sibling of `reference`
    fn insert_after(&mut self, reference: Self::Node, element: Element) -> Self::Node;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
    Raw(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree with `<html>`, `<head>` and `<body>`
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::with_capacity(64),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
        };
        doc.root = doc.alloc(
            NodeKind::Element {
                tag: "html".into(),
                attrs: vec![("lang".into(), "en".into())],
            },
            None,
        );
        doc.head = doc.alloc_element("head", doc.root);
        doc.body = doc.alloc_element("body", doc.root);
        doc
    }

    /// Document whose body holds `children`
    pub fn with_body(children: impl IntoIterator<Item = Element>) -> Self {
        let mut doc = Self::new();
        let body = doc.body;
        for child in children {
            doc.append_child(body, child);
        }
        doc
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    fn alloc(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        id
    }

    fn alloc_element(&mut self, tag: &str, parent: NodeId) -> NodeId {
        self.alloc(
            NodeKind::Element {
                tag: tag.into(),
                attrs: Vec::new(),
            },
            Some(parent),
        )
    }

    /// Build a detached subtree; the caller links the returned root
    fn build(&mut self, fragment: Fragment) -> NodeId {
        let (kind, children) = match fragment {
            Fragment::Element(el) => {
                let (tag, attrs, children) = el.into_parts();
                (NodeKind::Element { tag, attrs }, children)
            }
            Fragment::Text(t) => (NodeKind::Text(t), Vec::new()),
            Fragment::Raw(r) => (NodeKind::Raw(r), Vec::new()),
        };
        let id = self.alloc(kind, None);
        for child in children {
            let child_id = self.build(child);
            self.nodes[child_id.0].parent = Some(id);
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn matches(&self, node: NodeId, selector: Selector<'_>) -> bool {
        let NodeKind::Element { tag, attrs } = &self.nodes[node.0].kind else {
            return false;
        };
        match selector {
            Selector::Attribute(name) => attrs.iter().any(|(k, _)| k == name),
            Selector::Tag(t) => tag.eq_ignore_ascii_case(t),
            Selector::Class(class) => attrs
                .iter()
                .find(|(k, _)| k == "class")
                .is_some_and(|(_, v)| v.split_whitespace().any(|c| c == class)),
        }
    }

    /// Elements under `node` (exclusive) in document order
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Elements matching `selector` in document order
    pub fn query_all(&self, selector: Selector<'_>) -> Vec<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .filter(|id| self.matches(*id, selector))
            .collect()
    }

    pub fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Text(t) => t.clone(),
            NodeKind::Raw(_) => String::new(),
            NodeKind::Element { .. } => self.nodes[node.0]
                .children
                .iter()
                .map(|c| self.text_content(*c))
                .collect(),
        }
    }

    fn write_node(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(t) => out.push_str(&escape_text(t)),
            NodeKind::Raw(r) => out.push_str(r),
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    if value.is_empty() {
                        let _ = write!(out, " {name}");
                    } else {
                        let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
                    }
                }
                out.push('>');
                if is_void(tag) {
                    return;
                }
                for child in &self.nodes[node.0].children {
                    self.write_node(*child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    /// Serialized children of `node`
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in &self.nodes[node.0].children {
            self.write_node(*child, &mut out);
        }
        out
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    pub fn to_html(&self) -> String {
        format!("<!DOCTYPE html>{}", self.outer_html(self.root))
    }
}

impl DocumentSurface for Document {
    type Node = NodeId;

    fn body(&self) -> NodeId {
        self.body
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[node.0].kind {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    fn query(&self, scope: Option<NodeId>, selector: Selector<'_>) -> Option<NodeId> {
        self.descendants(scope.unwrap_or(self.root))
            .into_iter()
            .find(|id| self.matches(*id, selector))
    }

    fn append_child(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = self.build(Fragment::Element(element));
        self.nodes[id.0].parent = Some(parent);
        self.nodes[parent.0].children.push(id);
        id
    }

    fn insert_after(&mut self, reference: NodeId, element: Element) -> NodeId {
        let Some(parent) = self.nodes[reference.0].parent else {
            // Detached reference: fall back to the body
            let body = self.body;
            return self.append_child(body, element);
        };
        let id = self.build(Fragment::Element(element));
        self.nodes[id.0].parent = Some(parent);
        let siblings = &mut self.nodes[parent.0].children;
        let position = siblings
            .iter()
            .position(|s| *s == reference)
            .map_or(siblings.len(), |p| p + 1);
        siblings.insert(position, id);
        id
    }
}
