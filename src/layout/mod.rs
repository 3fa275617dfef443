//! Tree layout algorithms.
//!
//! Every algorithm mirrors the external tree into its own arena, runs a
//! bottom-up pass that computes relative positions, and a top-down pass that
//! writes absolute `x` coordinates back through [`LayoutTree`]. The three
//! steps are gated by [`LayoutPhase`]; driving them out of order fails with
//! [`LayoutError::Sequencing`].
//!
//! - [`buchheim`]: the linear-time Buchheim-Junger-Leipert algorithm.
//! - [`walker`]: a simpler contour-recomputing layout, quadratic in the worst
//!   case, kept for comparison.
//! - [`tidy_tree`]: flat-buffer entry point over either algorithm.

pub mod buchheim;
mod error;
pub mod tidy_tree;
pub mod walker;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::LayoutTree;

pub use buchheim::{BuchheimLayout, ResolveStats};
pub use error::{LayoutError, Result};
pub use tidy_tree::{Algorithm, TidyTreeConfig, TidyTreeLayout, TidyTreeResult};
pub use walker::WalkerLayout;

/// Separation policy shared by the layout algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance a leaf is pushed right of its left sibling.
    pub leaf_separation: f32,
    /// Minimum gap enforced between neighbouring subtree contours.
    pub subtree_separation: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            leaf_separation: 0.5,
            subtree_separation: 0.5,
        }
    }
}

impl LayoutConfig {
    /// Use the same separation for leaves and subtrees.
    pub fn uniform(separation: f32) -> Self {
        Self {
            leaf_separation: separation,
            subtree_separation: separation,
        }
    }
}

/// Where a layout is in its `initialize → resolve → apply` lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPhase {
    #[default]
    Uninitialized,
    Initialized,
    Resolved,
    Applied,
}

impl LayoutPhase {
    pub fn is_initialized(self) -> bool {
        self != Self::Uninitialized
    }

    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved | Self::Applied)
    }

    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }

    /// Resolving twice would fold every shift in a second time.
    pub(crate) fn check_resolve(self) -> Result<()> {
        match self {
            Self::Initialized => Ok(()),
            phase => Err(LayoutError::Sequencing {
                operation: "resolve",
                phase,
            }),
        }
    }

    pub(crate) fn check_apply(self) -> Result<()> {
        if self.is_resolved() {
            Ok(())
        } else {
            Err(LayoutError::Sequencing {
                operation: "apply",
                phase: self,
            })
        }
    }
}

impl fmt::Display for LayoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninitialized => "uninitialized",
            Self::Initialized => "initialized",
            Self::Resolved => "resolved",
            Self::Applied => "applied",
        };
        f.write_str(name)
    }
}

/// A gated three-pass tree layout.
pub trait TreeLayout {
    /// Handle type of the external tree this layout writes into.
    type NodeRef: Copy;

    fn phase(&self) -> LayoutPhase;

    /// Mirror `tree` below `root`, discarding any previous state.
    ///
    /// `None` yields an empty layout whose later passes are no-ops.
    fn initialize<T>(&mut self, tree: &T, root: Option<Self::NodeRef>)
    where
        T: LayoutTree<NodeRef = Self::NodeRef>;

    /// Bottom-up pass. Requires [`LayoutPhase::Initialized`].
    fn resolve(&mut self) -> Result<()>;

    /// Top-down pass writing `x` into `tree`. Requires a resolved layout.
    fn apply<T>(&mut self, tree: &mut T) -> Result<()>
    where
        T: LayoutTree<NodeRef = Self::NodeRef>;

    /// Initialize, resolve and apply in one go.
    fn run<T>(&mut self, tree: &mut T, root: Option<Self::NodeRef>) -> Result<()>
    where
        T: LayoutTree<NodeRef = Self::NodeRef>,
    {
        self.initialize(tree, root);
        self.resolve()?;
        self.apply(tree)
    }
}
