//! Per-node algorithm state, stored in an arena.
//!
//! `ancestor` and `thread` may point anywhere in the tree, not just along
//! parent/child edges, so every link is a [`MirrorId`] handle into
//! [`MirrorTree`] rather than a reference. The shape is fixed once built;
//! only the numeric fields change afterwards.

use std::ops::{Index, IndexMut};

/// Handle of a node in a [`MirrorTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MirrorId(usize);

impl MirrorId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Algorithm state for one node of the external tree.
#[derive(Debug, Clone)]
pub struct MirrorNode<R> {
    order: usize,
    source: R,
    parent: Option<MirrorId>,
    children: Vec<MirrorId>,
    /// Representative peer used by apportion. Starts as the node itself.
    pub ancestor: MirrorId,
    /// Contour continuation for nodes without children.
    pub thread: Option<MirrorId>,
    /// Position relative to the parent's frame before modifiers are summed.
    pub preliminary: f32,
    /// Displacement added to every descendant.
    pub modifier: f32,
    /// Per-gap shift rate, consumed by `execute_shifts`.
    pub change: f32,
    /// Pending shift, consumed by `execute_shifts`.
    pub shift: f32,
}

impl<R> MirrorNode<R> {
    fn new(id: MirrorId, source: R, parent: Option<MirrorId>, order: usize) -> Self {
        Self {
            order,
            source,
            parent,
            children: Vec::new(),
            ancestor: id,
            thread: None,
            preliminary: 0.0,
            modifier: 0.0,
            change: 0.0,
            shift: 0.0,
        }
    }

    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    #[inline]
    pub fn source(&self) -> &R {
        &self.source
    }

    #[inline]
    pub fn parent(&self) -> Option<MirrorId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[MirrorId] {
        &self.children
    }
}

/// Arena of [`MirrorNode`]s.
///
/// Usually holds a single tree, but any number of roots may be added.
#[derive(Debug, Clone)]
pub struct MirrorTree<R> {
    nodes: Vec<MirrorNode<R>>,
}

impl<R> MirrorTree<R> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a parentless node.
    pub fn add_root(&mut self, source: R) -> MirrorId {
        let id = MirrorId(self.nodes.len());
        self.nodes.push(MirrorNode::new(id, source, None, 0));
        id
    }

    /// Append a child under `parent`; its order is the parent's child count.
    pub fn add_child(&mut self, parent: MirrorId, source: R) -> MirrorId {
        let id = MirrorId(self.nodes.len());
        let order = self.nodes[parent.0].children.len();
        self.nodes[parent.0].children.push(id);
        self.nodes.push(MirrorNode::new(id, source, Some(parent), order));
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn parent(&self, id: MirrorId) -> Option<MirrorId> {
        self.nodes[id.0].parent
    }

    #[inline]
    pub fn children(&self, id: MirrorId) -> &[MirrorId] {
        &self.nodes[id.0].children
    }

    /// The sibling immediately to the left, `None` for a leftmost node or a root.
    pub fn left_sibling(&self, id: MirrorId) -> Option<MirrorId> {
        let node = &self.nodes[id.0];
        let parent = node.parent?;
        if node.order == 0 {
            return None;
        }
        self.nodes[parent.0].children.get(node.order - 1).copied()
    }

    /// First child of this node's parent, or the node itself for a root.
    pub fn leftmost_sibling(&self, id: MirrorId) -> MirrorId {
        self.nodes[id.0]
            .parent
            .and_then(|parent| self.leftmost_child(parent))
            .unwrap_or(id)
    }

    #[inline]
    pub fn leftmost_child(&self, id: MirrorId) -> Option<MirrorId> {
        self.nodes[id.0].children.first().copied()
    }

    #[inline]
    pub fn rightmost_child(&self, id: MirrorId) -> Option<MirrorId> {
        self.nodes[id.0].children.last().copied()
    }

    /// Next node down the left contour: first child, else the thread.
    pub fn next_left(&self, id: MirrorId) -> Option<MirrorId> {
        self.leftmost_child(id).or(self.nodes[id.0].thread)
    }

    /// Next node down the right contour: last child, else the thread.
    pub fn next_right(&self, id: MirrorId) -> Option<MirrorId> {
        self.rightmost_child(id).or(self.nodes[id.0].thread)
    }

    /// `id`'s ancestor, if it is still a sibling of `relative_to`.
    ///
    /// Once the ancestor belongs to another generation it no longer marks a
    /// subtree among `relative_to`'s siblings and callers must fall back to
    /// the default ancestor.
    pub fn qualifying_ancestor(&self, id: MirrorId, relative_to: MirrorId) -> Option<MirrorId> {
        let ancestor = self.nodes[id.0].ancestor;
        (self.nodes[ancestor.0].parent == self.nodes[relative_to.0].parent).then_some(ancestor)
    }
}

impl<R> Default for MirrorTree<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Index<MirrorId> for MirrorTree<R> {
    type Output = MirrorNode<R>;

    #[inline]
    fn index(&self, id: MirrorId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl<R> IndexMut<MirrorId> for MirrorTree<R> {
    #[inline]
    fn index_mut(&mut self, id: MirrorId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}
