//! External tree boundary.
//!
//! Layout algorithms never see a concrete tree type. They read structure and
//! write coordinates through the [`LayoutTree`] capability trait, which any
//! host tree can implement. [`NodeTree`] is the arena-backed implementation
//! shipped with the crate; it can also be built from flat parent→child edge
//! pairs (see [`NodeTree::from_edge_pairs`]).

mod edges;
mod node;
mod store;

use serde::{Deserialize, Serialize};

pub use node::{NodeId, TreeNode};
pub use store::NodeTree;

/// A 2-D position.
///
/// Layout writes `x`. `y` holds the node's depth and is owned by the tree.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Capability a tree must provide to be laid out.
///
/// Node handles are cheap copyable references into the implementor's own
/// storage. Implementations must keep `order` consistent with the node's
/// index in its parent's `children`; layout does not validate this.
pub trait LayoutTree {
    /// Handle identifying one node of the tree.
    type NodeRef: Copy + Eq + std::fmt::Debug;

    /// Children in stable left-to-right order.
    fn children(&self, node: Self::NodeRef) -> &[Self::NodeRef];

    /// 0-based index of `node` among its siblings.
    fn order(&self, node: Self::NodeRef) -> usize;

    fn is_leaf(&self, node: Self::NodeRef) -> bool {
        self.children(node).is_empty()
    }

    fn position(&self, node: Self::NodeRef) -> Point;

    fn set_position(&mut self, node: Self::NodeRef, point: Point);

    /// Overwrite only the horizontal coordinate, keeping `y`.
    fn set_x(&mut self, node: Self::NodeRef, x: f32) {
        let mut point = self.position(node);
        point.x = x;
        self.set_position(node, point);
    }
}
