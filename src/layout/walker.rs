//! Walker-style tidy tree layout.
//!
//! A simpler relative of [`BuchheimLayout`](super::BuchheimLayout): each
//! internal node is placed one separation right of its left sibling, then
//! its subtree is pushed right until its left contour clears the right
//! contour of every sibling before it. Contours are recomputed by full
//! subtree traversal each time, which makes the layout quadratic in the
//! worst case. Kept as a reference to compare the linear algorithm against.

use std::collections::BTreeMap;

use tracing::{debug, debug_span};

use super::{LayoutConfig, LayoutPhase, Result, TreeLayout};
use crate::tree::LayoutTree;

/// Horizontal extent of a subtree per depth level.
type Contour = BTreeMap<usize, f32>;

#[derive(Debug, Clone)]
struct WalkerNode<R> {
    source: R,
    level: usize,
    order: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    x: f32,
    modifier: f32,
}

/// Quadratic layout engine.
#[derive(Debug, Clone)]
pub struct WalkerLayout<R> {
    config: LayoutConfig,
    nodes: Vec<WalkerNode<R>>,
    root: Option<usize>,
    phase: LayoutPhase,
}

impl<R: Copy> WalkerLayout<R> {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            nodes: Vec::new(),
            root: None,
            phase: LayoutPhase::Uninitialized,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    fn push_node(&mut self, source: R, parent: Option<usize>) -> usize {
        let index = self.nodes.len();
        let (level, order) = match parent {
            Some(p) => (self.nodes[p].level + 1, self.nodes[p].children.len()),
            None => (0, 0),
        };
        if let Some(p) = parent {
            self.nodes[p].children.push(index);
        }
        self.nodes.push(WalkerNode {
            source,
            level,
            order,
            parent,
            children: Vec::new(),
            x: 0.0,
            modifier: 0.0,
        });
        index
    }

    fn mirror_children<T>(&mut self, tree: &T, source: R, parent: usize)
    where
        T: LayoutTree<NodeRef = R>,
    {
        for &child in tree.children(source) {
            let index = self.push_node(child, Some(parent));
            if !tree.is_leaf(child) {
                self.mirror_children(tree, child, index);
            }
        }
    }

    fn left_sibling(&self, index: usize) -> Option<usize> {
        let node = &self.nodes[index];
        let parent = node.parent?;
        node.order
            .checked_sub(1)
            .map(|order| self.nodes[parent].children[order])
    }

    /// Bottom-up placement relative to the parent.
    fn calculate_x(&mut self, index: usize) {
        let children = self.nodes[index].children.clone();
        let left_x = self.left_sibling(index).map(|left| self.nodes[left].x);

        let (Some(&first), Some(&last)) = (children.first(), children.last()) else {
            if let Some(left_x) = left_x {
                self.nodes[index].x = left_x + self.config.leaf_separation;
            }
            return;
        };

        for &child in &children {
            self.calculate_x(child);
        }
        let mid = 0.5 * (self.nodes[first].x + self.nodes[last].x);

        match left_x {
            None => self.nodes[index].x = mid,
            Some(left_x) => {
                let node = &mut self.nodes[index];
                node.x = left_x + self.config.subtree_separation;
                node.modifier = node.x - mid;
                self.resolve_conflicts(index);
            }
        }
    }

    /// Push `index` right until it clears every sibling to its left on all
    /// shared levels.
    fn resolve_conflicts(&mut self, index: usize) {
        let Some(parent) = self.nodes[index].parent else {
            return;
        };
        let order = self.nodes[index].order;
        let separation = self.config.subtree_separation;

        let mut left_contour = Contour::new();
        self.collect_contour(index, 0.0, &mut left_contour, f32::min);

        let mut moved = 0.0f32;
        for i in 0..order {
            let sibling = self.nodes[parent].children[i];
            let mut right_contour = Contour::new();
            self.collect_contour(sibling, 0.0, &mut right_contour, f32::max);

            let deficit = left_contour
                .iter()
                .filter_map(|(level, &left)| {
                    right_contour
                        .get(level)
                        .map(|&right| separation - (left + moved - right))
                })
                .fold(0.0f32, f32::max);

            if deficit > 0.0 {
                moved += deficit;
            }
        }

        if moved > 0.0 {
            let node = &mut self.nodes[index];
            node.x += moved;
            node.modifier += moved;
        }
    }

    /// Collect one x per level below `index`, folding collisions with `pick`.
    fn collect_contour(&self, index: usize, mod_sum: f32, values: &mut Contour, pick: fn(f32, f32) -> f32) {
        let node = &self.nodes[index];
        let x = node.x + mod_sum;
        values
            .entry(node.level)
            .and_modify(|current| *current = pick(*current, x))
            .or_insert(x);

        let mod_sum = mod_sum + node.modifier;
        for &child in &node.children {
            self.collect_contour(child, mod_sum, values, pick);
        }
    }

    /// Shift the whole tree right if any node ended up left of zero.
    fn check_all_children_on_screen(&mut self, root: usize) {
        let mut contour = Contour::new();
        self.collect_contour(root, 0.0, &mut contour, f32::min);

        let min = contour.values().copied().fold(f32::INFINITY, f32::min);
        if min < 0.0 {
            let node = &mut self.nodes[root];
            node.x -= min;
            node.modifier -= min;
        }
    }

    fn write_positions<T>(&self, index: usize, mod_sum: f32, tree: &mut T)
    where
        T: LayoutTree<NodeRef = R>,
    {
        let node = &self.nodes[index];
        tree.set_x(node.source, node.x + mod_sum);
        for &child in &node.children {
            self.write_positions(child, mod_sum + node.modifier, tree);
        }
    }
}

impl<R: Copy> Default for WalkerLayout<R> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<R: Copy> TreeLayout for WalkerLayout<R> {
    type NodeRef = R;

    fn phase(&self) -> LayoutPhase {
        self.phase
    }

    fn initialize<T>(&mut self, tree: &T, root: Option<R>)
    where
        T: LayoutTree<NodeRef = R>,
    {
        self.nodes.clear();
        self.root = root.map(|source| {
            let index = self.push_node(source, None);
            self.mirror_children(tree, source, index);
            index
        });
        self.phase = LayoutPhase::Initialized;
        debug!(nodes = self.nodes.len(), "walker layout initialized");
    }

    fn resolve(&mut self) -> Result<()> {
        self.phase.check_resolve()?;
        let _span = debug_span!("walker_resolve", nodes = self.nodes.len()).entered();

        if let Some(root) = self.root {
            self.calculate_x(root);
            self.check_all_children_on_screen(root);
        }

        self.phase = LayoutPhase::Resolved;
        Ok(())
    }

    fn apply<T>(&mut self, tree: &mut T) -> Result<()>
    where
        T: LayoutTree<NodeRef = R>,
    {
        self.phase.check_apply()?;

        if let Some(root) = self.root {
            self.write_positions(root, 0.0, tree);
        }

        self.phase = LayoutPhase::Applied;
        Ok(())
    }
}
