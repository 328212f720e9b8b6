use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a node: its index in the owning tree's arena.
///
/// Ids are assigned in construction order (leaves first, then each level
/// left to right) and are only meaningful for the tree that produced them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the tree's arena.
    pub fn as_usize(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Leaf or internal variant of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Level-0 node carrying the original input item.
    Leaf {
        /// The input string this leaf commits to.
        payload: String,
    },
    /// Node derived from one or two children. `left == right` marks an odd
    /// trailing node paired with itself.
    Internal {
        /// Left child.
        left: NodeId,
        /// Right child, equal to `left` when self-paired.
        right: NodeId,
    },
}

/// One position in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    digest: String,
    level: u32,
    index: usize,
    kind: NodeKind,
    parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn leaf(id: NodeId, index: usize, digest: String, payload: String) -> Self {
        Node {
            id,
            digest,
            level: 0,
            index,
            kind: NodeKind::Leaf { payload },
            parent: None,
        }
    }

    pub(crate) fn internal(
        id: NodeId,
        level: u32,
        index: usize,
        digest: String,
        left: NodeId,
        right: NodeId,
    ) -> Self {
        Node {
            id,
            digest,
            level,
            index,
            kind: NodeKind::Internal { left, right },
            parent: None,
        }
    }

    /// Only called while the owning tree is under construction.
    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        debug_assert!(self.parent.is_none(), "parent is set once");
        self.parent = Some(parent);
    }

    /// Arena id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Hex digest committed to by this node.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// 0 for leaves, increasing toward the root.
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Position within the node's level, left to right.
    pub fn index_in_level(&self) -> usize {
        self.index
    }

    /// Leaf or internal variant.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// `true` for level-0 nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// Input item, leaves only.
    pub fn payload(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Leaf { payload } => Some(payload),
            NodeKind::Internal { .. } => None,
        }
    }

    /// Left child, internal nodes only.
    pub fn left_child(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { left, .. } => Some(left),
        }
    }

    /// Right child, internal nodes only. Same as the left child when the node
    /// hashes a single self-paired child.
    pub fn right_child(&self) -> Option<NodeId> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Internal { right, .. } => Some(right),
        }
    }

    /// `true` if this internal node was formed from an odd trailing child
    /// paired with itself.
    pub fn is_self_paired(&self) -> bool {
        matches!(self.kind, NodeKind::Internal { left, right } if left == right)
    }

    /// Parent node; `None` only for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// `true` for the node without a parent in a non-empty tree.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
