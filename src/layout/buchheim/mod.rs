//! Buchheim-Junger-Leipert tidy tree layout.
//!
//! Implements the O(n) algorithm from "Improving Walker's Algorithm to Run in
//! Linear Time" (Buchheim, Junger, Leipert, 2002) for ordered m-ary trees.
//!
//! # Algorithm Overview
//!
//! 1. **Initialize:** mirror the external tree into a [`MirrorTree`] arena.
//! 2. **Resolve (first walk, bottom-up):** assign each node a preliminary x
//!    relative to its parent and a modifier for its subtree. After each child
//!    is placed, [apportion](BuchheimLayout) walks the contours of the new
//!    subtree and of everything to its left with [`ContourCursor`]s, shifting
//!    the new subtree right wherever they come too close. Shifts of the
//!    siblings in between are deferred and folded in by
//!    [`adjust::execute_shifts`]. Threads let the cursors skip resolved
//!    regions, so total contour walking stays linear.
//! 3. **Apply (second walk, top-down):** sum modifiers along each
//!    root-to-node path and write `x = sum + preliminary`.

pub mod adjust;
pub mod contour;
pub mod mirror;

use serde::Serialize;
use tracing::{debug, debug_span, trace};

use super::{LayoutConfig, LayoutPhase, Result, TreeLayout};
use crate::tree::LayoutTree;

pub use contour::ContourCursor;
pub use mirror::{MirrorId, MirrorNode, MirrorTree};

/// Counters collected during the resolve pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    /// Nodes in the mirrored tree.
    pub node_count: usize,
    /// Levels compared across all apportion calls. Never exceeds `node_count`.
    pub contour_steps: usize,
    /// Number of subtree moves applied.
    pub subtree_moves: usize,
}

/// The linear-time layout engine.
///
/// `R` is the node handle of the external tree being laid out.
#[derive(Debug, Clone)]
pub struct BuchheimLayout<R> {
    config: LayoutConfig,
    mirror: MirrorTree<R>,
    root: Option<MirrorId>,
    phase: LayoutPhase,
    stats: ResolveStats,
}

impl<R: Copy> BuchheimLayout<R> {
    /// Create a new layout with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            mirror: MirrorTree::new(),
            root: None,
            phase: LayoutPhase::Uninitialized,
            stats: ResolveStats::default(),
        }
    }

    /// Create a layout with default separations.
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn stats(&self) -> ResolveStats {
        self.stats
    }

    /// The mirrored tree and its current algorithm state.
    pub fn mirror(&self) -> &MirrorTree<R> {
        &self.mirror
    }

    fn mirror_children<T>(tree: &T, mirror: &mut MirrorTree<R>, source: R, parent: MirrorId)
    where
        T: LayoutTree<NodeRef = R>,
    {
        for &child in tree.children(source) {
            let id = mirror.add_child(parent, child);
            debug_assert_eq!(
                mirror[id].order(),
                tree.order(child),
                "external order must match child index"
            );
            if !tree.is_leaf(child) {
                Self::mirror_children(tree, mirror, child, id);
            }
        }
    }

    /// Bottom-up assignment of preliminary positions and modifiers.
    fn first_walk(&mut self, v: MirrorId) {
        // Clone children indices to avoid borrow conflict during recursion
        let children: Vec<MirrorId> = self.mirror.children(v).to_vec();

        if children.is_empty() {
            adjust::move_aside_from_left_sibling(&mut self.mirror, v, self.config.leaf_separation);
            return;
        }

        let mut default_ancestor = children[0];
        for &child in &children {
            self.first_walk(child);
            default_ancestor = self.apportion(child, default_ancestor);
        }

        adjust::execute_shifts(&mut self.mirror, v);
        adjust::center_over_children(&mut self.mirror, v);
        // Collisions with the left sibling are handled by apportion, no gap here.
        adjust::move_aside_from_left_sibling(&mut self.mirror, v, 0.0);
    }

    /// Push `v`'s subtree clear of the subtrees to its left.
    ///
    /// Four cursors walk down in lockstep: the left contour of `v`
    /// (`inner_right`), the right contour of the forest to its left
    /// (`inner_left`), and the outer contours of the combined forest
    /// (`outer_left` from the leftmost sibling, `outer_right` from `v`).
    /// When one side runs out, a thread links the shorter outer contour to
    /// the longer inner one.
    fn apportion(&mut self, v: MirrorId, default_ancestor: MirrorId) -> MirrorId {
        let Some(left_sibling) = self.mirror.left_sibling(v) else {
            return default_ancestor;
        };
        let mut default_ancestor = default_ancestor;
        let separation = self.config.subtree_separation;
        let tree = &mut self.mirror;

        // An internal node sits at its children's midpoint past the left
        // sibling, which can be closer than the separation (zero for a
        // single-leaf chain). Resolve that level before walking below it.
        if !tree.children(v).is_empty() {
            let shift = tree[left_sibling].preliminary - tree[v].preliminary + separation;
            if shift > 0.0 {
                trace!(?left_sibling, ?v, shift, "separating from left sibling");
                adjust::move_subtree(tree, left_sibling, v, shift);
                self.stats.subtree_moves += 1;
            }
        }

        let leftmost = tree.leftmost_sibling(v);
        let mut inner_right = ContourCursor::new(tree, Some(v));
        let mut inner_left = ContourCursor::new(tree, Some(left_sibling));
        let mut outer_left = ContourCursor::new(tree, Some(leftmost));
        let mut outer_right = ContourCursor::new(tree, Some(v));

        inner_left.move_right(tree);
        inner_right.move_left(tree);

        while !inner_left.is_finished() && !inner_right.is_finished() {
            outer_left.move_left(tree);
            outer_right.move_right(tree);
            outer_right.set_ancestor(tree, v);
            self.stats.contour_steps += 1;

            let shift = inner_left.offset(tree) - inner_right.offset(tree) + separation;
            if shift > 0.0 {
                let ancestor = inner_left
                    .current()
                    .and_then(|node| tree.qualifying_ancestor(node, v))
                    .unwrap_or(default_ancestor);
                trace!(?ancestor, ?v, shift, "moving subtree");
                adjust::move_subtree(tree, ancestor, v, shift);
                inner_right.add_to_sum(shift);
                outer_right.add_to_sum(shift);
                self.stats.subtree_moves += 1;
            }

            inner_left.update_sum(tree);
            inner_right.update_sum(tree);
            outer_right.update_sum(tree);
            outer_left.update_sum(tree);

            inner_left.move_right(tree);
            inner_right.move_left(tree);
        }

        if !inner_left.is_finished() && outer_right.is_last_on_right(tree) {
            outer_right.set_thread_and_update_mod(tree, &inner_left);
        }

        if !inner_right.is_finished() && outer_left.is_last_on_left(tree) {
            outer_left.set_thread_and_update_mod(tree, &inner_right);
            default_ancestor = v;
        }

        default_ancestor
    }

    /// Top-down pass: the root's own modifier only reaches its descendants.
    fn second_walk<T>(&self, v: MirrorId, mod_sum: f32, tree: &mut T)
    where
        T: LayoutTree<NodeRef = R>,
    {
        let node = &self.mirror[v];
        tree.set_x(*node.source(), mod_sum + node.preliminary);

        for &child in node.children() {
            self.second_walk(child, mod_sum + node.modifier, tree);
        }
    }
}

impl<R: Copy> Default for BuchheimLayout<R> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<R: Copy> TreeLayout for BuchheimLayout<R> {
    type NodeRef = R;

    fn phase(&self) -> LayoutPhase {
        self.phase
    }

    fn initialize<T>(&mut self, tree: &T, root: Option<R>)
    where
        T: LayoutTree<NodeRef = R>,
    {
        self.mirror = MirrorTree::new();
        self.root = root.map(|source| {
            let id = self.mirror.add_root(source);
            Self::mirror_children(tree, &mut self.mirror, source, id);
            id
        });
        self.stats = ResolveStats {
            node_count: self.mirror.len(),
            ..ResolveStats::default()
        };
        self.phase = LayoutPhase::Initialized;
        debug!(nodes = self.mirror.len(), "buchheim layout initialized");
    }

    fn resolve(&mut self) -> Result<()> {
        self.phase.check_resolve()?;
        let _span = debug_span!("buchheim_resolve", nodes = self.mirror.len()).entered();

        if let Some(root) = self.root {
            self.first_walk(root);
        }

        self.phase = LayoutPhase::Resolved;
        debug!(
            contour_steps = self.stats.contour_steps,
            subtree_moves = self.stats.subtree_moves,
            "buchheim layout resolved"
        );
        Ok(())
    }

    fn apply<T>(&mut self, tree: &mut T) -> Result<()>
    where
        T: LayoutTree<NodeRef = R>,
    {
        self.phase.check_apply()?;
        let _span = debug_span!("buchheim_apply", nodes = self.mirror.len()).entered();

        if let Some(root) = self.root {
            self.second_walk(root, 0.0, tree);
        }

        self.phase = LayoutPhase::Applied;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutError;
    use crate::tree::{NodeId, NodeTree};

    const TOLERANCE: f32 = 0.01;

    fn x(tree: &NodeTree<&str>, id: NodeId) -> f32 {
        tree.point(id).x
    }

    #[test]
    fn test_three_leaves() {
        let mut tree = NodeTree::with_root("root");
        let root = tree.root().unwrap();
        let leaves: Vec<_> = (0..3).map(|_| tree.add_child(root, "leaf")).collect();

        let mut layout = BuchheimLayout::with_defaults();
        layout.run(&mut tree, Some(root)).unwrap();

        assert!((x(&tree, leaves[0]) - 0.0).abs() < TOLERANCE);
        assert!((x(&tree, leaves[1]) - 0.5).abs() < TOLERANCE);
        assert!((x(&tree, leaves[2]) - 1.0).abs() < TOLERANCE);
        assert!(
            (x(&tree, root) - 0.5).abs() < TOLERANCE,
            "root should be centered over its leaves, got {}",
            x(&tree, root)
        );
    }

    #[test]
    fn test_single_node() {
        let mut tree = NodeTree::with_root("only");
        let root = tree.root().unwrap();

        let mut layout = BuchheimLayout::with_defaults();
        layout.run(&mut tree, Some(root)).unwrap();

        assert_eq!(x(&tree, root), 0.0);
        assert_eq!(layout.stats().node_count, 1);
        assert_eq!(layout.stats().contour_steps, 0);
    }

    #[test]
    fn test_parent_centered_over_children() {
        // root → a (3 leaves), b (1 leaf)
        let mut tree = NodeTree::with_root("root");
        let root = tree.root().unwrap();
        let a = tree.add_child(root, "a");
        let b = tree.add_child(root, "b");
        let a_leaves: Vec<_> = (0..3).map(|_| tree.add_child(a, "leaf")).collect();
        let b_leaf = tree.add_child(b, "leaf");

        let mut layout = BuchheimLayout::with_defaults();
        layout.run(&mut tree, Some(root)).unwrap();

        let a_mid = 0.5 * (x(&tree, a_leaves[0]) + x(&tree, a_leaves[2]));
        assert!((x(&tree, a) - a_mid).abs() < TOLERANCE);
        assert!((x(&tree, b) - x(&tree, b_leaf)).abs() < TOLERANCE);
        assert!((x(&tree, root) - 0.5 * (x(&tree, a) + x(&tree, b))).abs() < TOLERANCE);

        assert!(
            x(&tree, b_leaf) - x(&tree, a_leaves[2]) >= 0.5 - TOLERANCE,
            "cousins keep the minimum separation: {} vs {}",
            x(&tree, a_leaves[2]),
            x(&tree, b_leaf)
        );
    }

    #[test]
    fn test_deep_left_subtree_pushes_right_sibling() {
        // root → a → a1 → (a2, a3); root → b → (b1, b2)
        let mut tree = NodeTree::with_root("root");
        let root = tree.root().unwrap();
        let a = tree.add_child(root, "a");
        let a1 = tree.add_child(a, "a1");
        let a2 = tree.add_child(a1, "a2");
        let a3 = tree.add_child(a1, "a3");
        let b = tree.add_child(root, "b");
        let b1 = tree.add_child(b, "b1");
        let b2 = tree.add_child(b, "b2");
        let b1_child = tree.add_child(b1, "b1c");

        let mut layout = BuchheimLayout::with_defaults();
        layout.run(&mut tree, Some(root)).unwrap();

        assert!(x(&tree, a) < x(&tree, b));
        assert!(x(&tree, a1) < x(&tree, b1));
        assert!(x(&tree, a3) < x(&tree, b1_child));
        assert!(x(&tree, a2) < x(&tree, a3));
        assert!(x(&tree, b1) < x(&tree, b2));
    }

    #[test]
    fn test_single_child_chain_after_leaf() {
        // root → a (leaf), b → b1: b would land exactly on a without
        // resolving the siblings' own level.
        let mut tree = NodeTree::with_root("root");
        let root = tree.root().unwrap();
        let a = tree.add_child(root, "a");
        let b = tree.add_child(root, "b");
        let b1 = tree.add_child(b, "b1");

        let mut layout = BuchheimLayout::with_defaults();
        layout.run(&mut tree, Some(root)).unwrap();

        assert!(
            (x(&tree, b) - x(&tree, a) - 0.5).abs() < TOLERANCE,
            "b should sit one separation right of a: a={}, b={}",
            x(&tree, a),
            x(&tree, b)
        );
        assert!((x(&tree, b1) - x(&tree, b)).abs() < TOLERANCE);
    }

    #[test]
    fn test_small_subtree_between_wide_siblings_is_spread() {
        // The shift pushing `right` clear of `left` is shared by the leaves
        // in between.
        let mut tree = NodeTree::with_root("root");
        let root = tree.root().unwrap();
        let left = tree.add_child(root, "left");
        for _ in 0..4 {
            tree.add_child(left, "l");
        }
        let middle: Vec<_> = (0..2).map(|_| tree.add_child(root, "m")).collect();
        let right = tree.add_child(root, "right");
        for _ in 0..4 {
            tree.add_child(right, "r");
        }

        let mut layout = BuchheimLayout::with_defaults();
        layout.run(&mut tree, Some(root)).unwrap();

        let gap_a = x(&tree, middle[0]) - x(&tree, left);
        let gap_b = x(&tree, middle[1]) - x(&tree, middle[0]);
        let gap_c = x(&tree, right) - x(&tree, middle[1]);
        assert!(gap_c >= 0.5 - TOLERANCE);
        assert!(
            gap_a > 0.5 + TOLERANCE,
            "middle leaves should take a share of the shift: {gap_a}"
        );
        assert!(
            (gap_a - gap_b).abs() < TOLERANCE,
            "middle leaves should be evenly spread: {gap_a}, {gap_b}"
        );
        assert!(layout.stats().subtree_moves > 0);
    }

    #[test]
    fn test_thread_after_move_reaches_true_offset() {
        // root → a → (a1, a2); root → b → (b1 → (c1, c2), b2). Placing b
        // moves it at the a1/b1 level, then a1 is threaded onto c1. Walking
        // down a's left contour through the thread must land where walking
        // down b lands.
        let mut tree = NodeTree::with_root("root");
        let root = tree.root().unwrap();
        let a = tree.add_child(root, "a");
        tree.add_child(a, "a1");
        tree.add_child(a, "a2");
        let b = tree.add_child(root, "b");
        let b1 = tree.add_child(b, "b1");
        tree.add_child(b1, "c1");
        tree.add_child(b1, "c2");
        tree.add_child(b, "b2");

        let mut layout = BuchheimLayout::with_defaults();
        layout.initialize(&tree, Some(root));
        layout.resolve().unwrap();
        assert!(layout.stats().subtree_moves > 0);

        let mirror = layout.mirror();
        let top = layout.root.unwrap();
        let (first, second) = (mirror.children(top)[0], mirror.children(top)[1]);

        let mut through_thread = ContourCursor::new(mirror, Some(first));
        through_thread.move_left(mirror);
        through_thread.update_sum(mirror);
        through_thread.move_left(mirror);

        let mut direct = ContourCursor::new(mirror, Some(second));
        direct.move_left(mirror);
        direct.update_sum(mirror);
        direct.move_left(mirror);

        assert_eq!(through_thread.current(), direct.current());
        assert_eq!(mirror[direct.current().unwrap()].source(), &NodeId::new(6));
        assert!(
            (through_thread.offset(mirror) - direct.offset(mirror)).abs() < TOLERANCE,
            "thread lands at {}, c1 is at {}",
            through_thread.offset(mirror),
            direct.offset(mirror)
        );
    }

    #[test]
    fn test_empty_root_is_valid() {
        let mut tree: NodeTree<&str> = NodeTree::new();
        let mut layout = BuchheimLayout::with_defaults();

        layout.initialize(&tree, None);
        assert_eq!(layout.phase(), LayoutPhase::Initialized);
        layout.resolve().unwrap();
        layout.apply(&mut tree).unwrap();
        assert_eq!(layout.phase(), LayoutPhase::Applied);
        assert!(layout.mirror().is_empty());
    }

    #[test]
    fn test_lifecycle_flags() {
        let mut tree = NodeTree::with_root("root");
        let root = tree.root().unwrap();
        tree.add_child(root, "child");

        let mut layout = BuchheimLayout::with_defaults();
        assert_eq!(layout.phase(), LayoutPhase::Uninitialized);

        layout.initialize(&tree, Some(root));
        assert!(layout.phase().is_initialized());
        assert!(!layout.phase().is_resolved());

        layout.resolve().unwrap();
        assert!(layout.phase().is_resolved());
        assert!(!layout.phase().is_applied());

        layout.apply(&mut tree).unwrap();
        assert!(layout.phase().is_applied());

        layout.initialize(&tree, Some(root));
        assert_eq!(layout.phase(), LayoutPhase::Initialized, "re-initialize resets");
    }

    #[test]
    fn test_out_of_order_calls_fail() {
        let mut tree = NodeTree::with_root("root");
        let root = tree.root().unwrap();
        let mut layout = BuchheimLayout::with_defaults();

        assert!(matches!(
            layout.resolve(),
            Err(LayoutError::Sequencing { operation: "resolve", .. })
        ));
        assert!(matches!(
            layout.apply(&mut tree),
            Err(LayoutError::Sequencing { operation: "apply", .. })
        ));

        layout.initialize(&tree, Some(root));
        assert!(layout.apply(&mut tree).is_err());

        layout.resolve().unwrap();
        assert!(layout.resolve().is_err(), "resolving twice is rejected");
        layout.apply(&mut tree).unwrap();
        layout.apply(&mut tree).unwrap();
    }

    #[test]
    fn test_reapply_is_idempotent() {
        let mut tree = NodeTree::with_root("root");
        let root = tree.root().unwrap();
        let a = tree.add_child(root, "a");
        tree.add_child(a, "a1");
        tree.add_child(root, "b");

        let mut layout = BuchheimLayout::with_defaults();
        layout.run(&mut tree, Some(root)).unwrap();
        let first: Vec<f32> = tree.node_ids().map(|id| x(&tree, id)).collect();

        layout.apply(&mut tree).unwrap();
        let second: Vec<f32> = tree.node_ids().map(|id| x(&tree, id)).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_leaf_separation() {
        let mut tree = NodeTree::with_root("root");
        let root = tree.root().unwrap();
        let a = tree.add_child(root, "a");
        let b = tree.add_child(root, "b");

        let mut layout = BuchheimLayout::new(LayoutConfig::uniform(2.0));
        layout.run(&mut tree, Some(root)).unwrap();

        assert!((x(&tree, b) - x(&tree, a) - 2.0).abs() < TOLERANCE);
        assert!((x(&tree, root) - 1.0).abs() < TOLERANCE);
    }
}
