//! Sibling-overlap check for laid-out trees.
//!
//! Nodes are collected in pre-order, so on every level they appear left to
//! right. A correct layout therefore has strictly increasing `x` within each
//! level; any pair that is not is reported as a [`Collision`].

use std::collections::BTreeMap;

use serde::Serialize;

use crate::tree::LayoutTree;

/// Two neighbouring nodes on one level that are out of order or overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Collision {
    pub level: i32,
    pub left_x: f32,
    pub right_x: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    levels: usize,
    collisions: Vec<Collision>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.collisions.is_empty()
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Number of distinct levels inspected.
    pub fn levels(&self) -> usize {
        self.levels
    }
}

/// Check the `x` positions written into `tree` below `root`.
///
/// An empty tree (`root == None`) is valid.
pub fn validate<T: LayoutTree>(tree: &T, root: Option<T::NodeRef>) -> ValidationReport {
    let mut by_level: BTreeMap<i32, Vec<f32>> = BTreeMap::new();
    let mut stack: Vec<T::NodeRef> = root.into_iter().collect();

    while let Some(node) = stack.pop() {
        let point = tree.position(node);
        by_level.entry(point.y as i32).or_default().push(point.x);
        stack.extend(tree.children(node).iter().rev().copied());
    }

    let collisions = by_level
        .iter()
        .flat_map(|(&level, xs)| {
            xs.windows(2)
                .filter(|pair| pair[0] >= pair[1] || pair[1].is_nan())
                .map(move |pair| Collision {
                    level,
                    left_x: pair[0],
                    right_x: pair[1],
                })
        })
        .collect();

    ValidationReport {
        levels: by_level.len(),
        collisions,
    }
}
