//! The parse tree produced by a successful match.
//!
//! Nodes live in one arena owned by [`ParseTree`] and refer to each other
//! by [`NodeId`]. Children are owned top-down; the parent link is only an
//! index, so the tree has no reference cycles.

use std::sync::Arc;

use super::scope::{CaptureTable, Span};
use crate::definition::Definition;

/// Index of a node in its [`ParseTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One matched definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode {
    pub(crate) parent: Option<NodeId>,
    pub(crate) definition: Arc<Definition>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) span: Span,
    pub(crate) captures: Option<CaptureTable>,
}

impl ParseNode {
    pub(crate) fn new(parent: Option<NodeId>, definition: Arc<Definition>, start: usize) -> Self {
        Self {
            parent,
            definition,
            children: Vec::new(),
            span: Span::new(start, start),
            captures: None,
        }
    }

    /// The node this one was matched inside, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The definition that matched.
    #[must_use]
    pub fn definition(&self) -> &Arc<Definition> {
        &self.definition
    }

    /// Shorthand for the definition's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Child nodes in match order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The matched input interval.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Captures recorded directly in this definition's pattern, if any.
    #[must_use]
    pub fn captures(&self) -> Option<&CaptureTable> {
        self.captures.as_ref()
    }
}

/// An arena of [`ParseNode`]s rooted at the main definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTree {
    pub(crate) nodes: Vec<ParseNode>,
}

impl ParseTree {
    /// The root node's id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The node with id `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` belongs to a different tree and is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &ParseNode {
        &self.nodes[id.0]
    }

    /// The node with id `id`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ParseNode> {
        self.nodes.get(id.0)
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The children of `id` with their ids.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &ParseNode)> {
        self.node(id)
            .children
            .iter()
            .map(|child| (*child, self.node(*child)))
    }

    /// Every node below and including `id`, in depth-first pre-order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            order.push(next);
            stack.extend(self.node(next).children.iter().rev());
        }
        order
    }

    /// The names of the definitions on the path from the root to `id`.
    #[must_use]
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(next) = cursor {
            let node = self.node(next);
            path.push(node.name());
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}
