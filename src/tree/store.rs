//! Arena-backed ordered tree.

use super::node::{NodeId, TreeNode};
use super::{LayoutTree, Point};

/// An ordered rooted tree stored in a flat arena.
///
/// Nodes are never removed, so a [`NodeId`] stays valid for the life of the
/// tree. Adding a child appends it to its parent's children, assigns its
/// order, and places it one level below the parent (`y = parent.y + 1`).
#[derive(Debug, Clone)]
pub struct NodeTree<T> {
    nodes: Vec<TreeNode<T>>,
    root: Option<NodeId>,
}

impl<T> NodeTree<T> {
    /// Create an empty tree (no root).
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Create a tree holding a single root at depth 0.
    pub fn with_root(content: T) -> Self {
        Self {
            nodes: vec![TreeNode::new(content, None, 0, 0.0)],
            root: Some(NodeId(0)),
        }
    }

    /// Create a single-root tree with room for `capacity` nodes.
    pub fn with_root_and_capacity(content: T, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(TreeNode::new(content, None, 0, 0.0));
        Self {
            nodes,
            root: Some(NodeId(0)),
        }
    }

    /// Append a child under `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: NodeId, content: T) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let parent_node = &mut self.nodes[parent.index()];
        let order = parent_node.children.len();
        let depth = parent_node.point.y + 1.0;
        parent_node.children.push(id);
        self.nodes.push(TreeNode::new(content, Some(parent), order, depth));
        id
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Content of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn content(&self, id: NodeId) -> &T {
        &self.nodes[id.index()].content
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn point(&self, id: NodeId) -> Point {
        self.nodes[id.index()].point
    }

    /// All node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Iterate `(id, node)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode<T>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (NodeId(index as u32), node))
    }

    /// Largest depth of any node, `None` for an empty tree.
    pub fn height(&self) -> Option<u32> {
        self.nodes
            .iter()
            .map(|node| node.point.y as u32)
            .max()
    }
}

impl<T> Default for NodeTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LayoutTree for NodeTree<T> {
    type NodeRef = NodeId;

    #[inline]
    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.index()].children
    }

    #[inline]
    fn order(&self, node: NodeId) -> usize {
        self.nodes[node.index()].order
    }

    #[inline]
    fn position(&self, node: NodeId) -> Point {
        self.nodes[node.index()].point
    }

    #[inline]
    fn set_position(&mut self, node: NodeId, point: Point) {
        self.nodes[node.index()].point = point;
    }
}
