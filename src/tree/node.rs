//! Node identifiers and per-node storage for [`NodeTree`](super::NodeTree).
//!
//! Each node carries:
//! - A stable identifier (its slot in the tree arena)
//! - The caller's content
//! - Parent link and ordered children
//! - Order among siblings (0-based)
//! - Position (x written by layout, y = depth)

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Point;

/// Stable node identifier.
///
/// Wraps a u32 for efficient storage and WebAssembly interop. Identifiers are
/// handed out sequentially as nodes are added, so the n-th node added has id n.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Get the arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// One node of a [`NodeTree`](super::NodeTree).
#[derive(Debug, Clone)]
pub struct TreeNode<T> {
    pub(super) content: T,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) order: usize,
    pub(super) point: Point,
}

impl<T> TreeNode<T> {
    pub(super) fn new(content: T, parent: Option<NodeId>, order: usize, depth: f32) -> Self {
        Self {
            content,
            parent,
            children: Vec::new(),
            order,
            point: Point::new(0.0, depth),
        }
    }

    /// The caller-supplied content.
    #[inline]
    pub fn content(&self) -> &T {
        &self.content
    }

    /// Parent id, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in left-to-right order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Index of this node among its parent's children.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Current position.
    #[inline]
    pub fn point(&self) -> Point {
        self.point
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
