//! Flat-buffer tidy tree entry point.
//!
//! Takes the tree as `[parent, child, ...]` edge pairs over a slot space of
//! `node_count` ids, lays it out with either algorithm, and returns one
//! position per slot, centered horizontally around 0.
//!
//! Slots that are not part of the tree (disconnected, removed, or never used)
//! get [`SENTINEL`] in both coordinates so callers can skip them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BuchheimLayout, LayoutConfig, Result, TreeLayout, WalkerLayout};
use crate::tree::{LayoutTree, NodeTree};

/// Position value for slots that are not part of the tree.
pub const SENTINEL: f32 = f32::MAX;

/// Which layout algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Linear-time Buchheim-Junger-Leipert.
    #[default]
    Buchheim,
    /// Quadratic contour-recomputing layout.
    Walker,
}

/// Configuration for the tidy tree layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TidyTreeConfig {
    /// Separation policy in layout units.
    pub layout: LayoutConfig,
    /// Vertical spacing between tree levels.
    pub level_separation: f32,
    /// Output distance of one layout unit horizontally.
    pub horizontal_unit: f32,
    pub algorithm: Algorithm,
}

impl Default for TidyTreeConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            level_separation: 80.0,
            horizontal_unit: 80.0,
            algorithm: Algorithm::Buchheim,
        }
    }
}

/// Result of the tidy tree layout computation.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyTreeResult {
    /// Target X positions (one per node in slot order).
    pub positions_x: Vec<f32>,
    /// Target Y positions (one per node in slot order).
    pub positions_y: Vec<f32>,
    /// Number of nodes laid out.
    pub node_count: usize,
}

impl TidyTreeResult {
    fn empty(node_count: usize) -> Self {
        Self {
            positions_x: vec![SENTINEL; node_count],
            positions_y: vec![SENTINEL; node_count],
            node_count: 0,
        }
    }

    /// Whether `slot` received a position.
    pub fn is_placed(&self, slot: usize) -> bool {
        self.positions_x.get(slot).is_some_and(|&x| x < SENTINEL)
    }

    /// `[x0, y0, x1, y1, ...]` in slot order.
    pub fn interleaved(&self) -> Vec<f32> {
        self.positions_x
            .iter()
            .zip(&self.positions_y)
            .flat_map(|(&x, &y)| [x, y])
            .collect()
    }
}

/// The tidy tree layout engine.
#[derive(Debug, Clone, Default)]
pub struct TidyTreeLayout {
    config: TidyTreeConfig,
}

impl TidyTreeLayout {
    /// Create a new tidy tree layout with the given configuration.
    pub fn new(config: TidyTreeConfig) -> Self {
        Self { config }
    }

    /// Create a tidy tree layout with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(TidyTreeConfig::default())
    }

    pub fn config(&self) -> &TidyTreeConfig {
        &self.config
    }

    /// Lay out any [`LayoutTree`] in layout units with the configured
    /// algorithm, writing `x` into the tree.
    pub fn layout_tree<T>(&self, tree: &mut T, root: Option<T::NodeRef>) -> Result<()>
    where
        T: LayoutTree,
    {
        match self.config.algorithm {
            Algorithm::Buchheim => BuchheimLayout::new(self.config.layout).run(tree, root),
            Algorithm::Walker => WalkerLayout::new(self.config.layout).run(tree, root),
        }
    }

    /// Compute the tidy tree layout.
    ///
    /// # Arguments
    ///
    /// * `node_count` - Total number of node slots (may include holes from removals)
    /// * `edges` - Flat array of directed edge pairs [src0, tgt0, src1, tgt1, ...]
    ///   representing parent→child relationships
    /// * `root_id` - The root node ID (or None to auto-detect)
    ///
    /// # Returns
    ///
    /// A `TidyTreeResult` with target positions for all slots. Slots not in
    /// the tree get [`SENTINEL`]. Invalid input (odd-length or empty edge
    /// array, out-of-range root) yields an all-sentinel result.
    pub fn compute(
        &self,
        node_count: usize,
        edges: &[u32],
        root_id: Option<u32>,
    ) -> Result<TidyTreeResult> {
        let Some(mut tree) = NodeTree::from_edge_pairs(node_count, edges, root_id) else {
            debug!(node_count, edges = edges.len() / 2, "no tree in edge input");
            return Ok(TidyTreeResult::empty(node_count));
        };

        let root = tree.root();
        self.layout_tree(&mut tree, root)?;

        // Center horizontally around 0
        let (min_x, max_x) = tree
            .iter()
            .map(|(_, node)| node.point().x)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(x), hi.max(x))
            });
        let x_offset = -(min_x + (max_x - min_x) / 2.0);

        let mut result = TidyTreeResult::empty(node_count);
        for (_, node) in tree.iter() {
            let slot = *node.content() as usize;
            let point = node.point();
            result.positions_x[slot] = (point.x + x_offset) * self.config.horizontal_unit;
            result.positions_y[slot] = point.y * self.config.level_separation;
            result.node_count += 1;
        }

        debug!(
            node_count,
            laid_out = result.node_count,
            algorithm = ?self.config.algorithm,
            "tidy tree computed"
        );
        Ok(result)
    }
}
