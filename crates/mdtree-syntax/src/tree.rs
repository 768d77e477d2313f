//! # Tree - Node Arena
//!
//! Parsed documents live in a [`Tree`]: a flat `Vec` of [`Node`]s addressed by
//! [`NodeId`]. Parent, child and sibling relations are stored as indices, so
//! navigation is O(1) in every direction and no node ever owns another.
//!
//! ```text
//! Document ─ first_child ─▶ List ─ next ─▶ Paragraph
//!                            │
//!                       first_child
//!                            ▼
//!                        ListItem ─ next ─▶ ListItem
//! ```
//!
//! Nodes are only ever appended. Sibling order is the order in which children
//! were attached with [`Tree::append_child`] (or [`Tree::prepend_child`]).

use crate::node::{NodeData, NodeKind};

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    /// Raw text for leaf kinds and for inline-bearing blocks before the
    /// inline pass
    pub content: String,
    pub data: NodeData,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl Node {
    fn new(kind: NodeKind, content: String, data: NodeData) -> Self {
        Self {
            kind,
            content,
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
        }
    }
}

/// Arena holding every node of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree holding only an empty [`NodeKind::Document`] root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Document, String::new(), NodeData::None)],
            root: NodeId(0),
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

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: NodeKind, content: impl Into<String>) -> NodeId {
        self.alloc_with(kind, content, NodeData::None)
    }

    /// Allocate a detached node carrying a payload.
    pub fn alloc_with(
        &mut self,
        kind: NodeKind,
        content: impl Into<String>,
        data: NodeData,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, content.into(), data));
        id
    }

    /// Attach `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child.0].parent.is_none(), "node already attached");
        let last = self.nodes[parent.0].last_child;

        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.prev = last;
            node.next = None;
        }

        match last {
            Some(last) => self.nodes[last.0].next = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    /// Attach `child` as the first child of `parent`.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child.0].parent.is_none(), "node already attached");
        let first = self.nodes[parent.0].first_child;

        {
            let node = &mut self.nodes[child.0];
            node.parent = Some(parent);
            node.prev = None;
            node.next = first;
        }

        match first {
            Some(first) => self.nodes[first.0].prev = Some(child),
            None => self.nodes[parent.0].last_child = Some(child),
        }
        self.nodes[parent.0].first_child = Some(child);
    }

    /// Allocate a node and append it to `parent` in one step.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind, content: impl Into<String>) -> NodeId {
        let id = self.alloc(kind, content);
        self.append_child(parent, id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.nodes[id.0].kind
    }

    pub fn content(&self, id: NodeId) -> &str {
        &self.nodes[id.0].content
    }

    pub fn set_content(&mut self, id: NodeId, content: impl Into<String>) {
        self.nodes[id.0].content = content.into();
    }

    /// Move the content out of `id`, leaving it empty.
    pub fn take_content(&mut self, id: NodeId) -> String {
        std::mem::take(&mut self.nodes[id.0].content)
    }

    pub fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0].data
    }

    pub fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.0].data
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].next
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].prev
    }

    /// Iterate over the direct children of `id` in order.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.first_child(id),
        }
    }

    /// All nodes below `id` in document order, `id` excluded.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        while let Some(n) = stack.pop() {
            out.push(n);
            let len = stack.len();
            stack.extend(self.children(n));
            stack[len..].reverse();
        }
        out
    }
}

/// Iterator returned by [`Tree::children`].
pub struct Children<'t> {
    tree: &'t Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}
