//! Building a [`NodeTree`] from flat parent→child edge pairs.
//!
//! Edges arrive as `[parent0, child0, parent1, child1, ...]` slot ids, the
//! same shape the WASM surface receives from JavaScript. They are loaded into
//! a petgraph `StableGraph` so root detection and traversal work on a real
//! directed graph, then a preorder DFS from the root extracts a spanning tree.
//! Children keep edge insertion order.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{Dfs, EdgeRef};

use super::{NodeId, NodeTree};

impl NodeTree<u32> {
    /// Build a tree whose node contents are the input slot ids.
    ///
    /// # Arguments
    ///
    /// * `node_count` - Number of valid slots; ids `>= node_count` are skipped
    /// * `edges` - Flat `[parent, child, ...]` pairs
    /// * `root_id` - Root slot, or `None` to auto-detect
    ///
    /// Self-loops and out-of-range edges are skipped. An edge reaching a node
    /// already placed in the tree (a back-edge or a second parent) is dropped.
    /// Without an explicit root, the node with no incoming edge and the most
    /// descendants is chosen (lowest id on ties); if every node has a parent,
    /// the lowest id is used.
    ///
    /// Returns `None` when the input holds no valid edge, the edge array has
    /// odd length, or an explicit root is out of range.
    pub fn from_edge_pairs(node_count: usize, edges: &[u32], root_id: Option<u32>) -> Option<Self> {
        if node_count == 0 || edges.is_empty() || edges.len() % 2 != 0 {
            return None;
        }

        let mut graph: StableDiGraph<u32, ()> =
            StableDiGraph::with_capacity(node_count.min(edges.len()), edges.len() / 2);
        let mut index_of: HashMap<u32, NodeIndex> = HashMap::new();

        for pair in edges.chunks_exact(2) {
            let (parent, child) = (pair[0], pair[1]);
            if parent as usize >= node_count || child as usize >= node_count {
                continue;
            }
            if parent == child {
                continue;
            }

            let parent_idx = *index_of
                .entry(parent)
                .or_insert_with(|| graph.add_node(parent));
            let child_idx = *index_of
                .entry(child)
                .or_insert_with(|| graph.add_node(child));
            graph.add_edge(parent_idx, child_idx, ());
        }

        if graph.node_count() == 0 {
            return None;
        }

        let root = match root_id {
            Some(r) if r as usize >= node_count => return None,
            Some(r) => r,
            None => detect_root(&graph),
        };

        let Some(&root_idx) = index_of.get(&root) else {
            // Explicit root with no valid edges: a single-node tree.
            return Some(NodeTree::with_root(root));
        };

        Some(spanning_tree(&graph, root_idx))
    }
}

/// Pick the root of an edge graph: prefer nodes without incoming edges.
fn detect_root(graph: &StableDiGraph<u32, ()>) -> u32 {
    let candidates: Vec<NodeIndex> = graph.externals(Direction::Incoming).collect();

    if candidates.is_empty() {
        // Cycle or no clear root; pick the lowest slot
        return graph.node_indices().map(|idx| graph[idx]).min().unwrap_or(0);
    }

    candidates
        .iter()
        .map(|&idx| (count_descendants(graph, idx), graph[idx]))
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, slot)| slot)
        .unwrap_or(0)
}

/// Count nodes reachable from `start` (excluding itself).
fn count_descendants(graph: &StableDiGraph<u32, ()>, start: NodeIndex) -> usize {
    let mut dfs = Dfs::new(graph, start);
    let mut count = 0usize;
    while dfs.next(graph).is_some() {
        count += 1;
    }
    count.saturating_sub(1)
}

/// Outgoing neighbours of `node` in edge insertion order.
fn ordered_children(graph: &StableDiGraph<u32, ()>, node: NodeIndex) -> Vec<NodeIndex> {
    let mut out: Vec<_> = graph
        .edges_directed(node, Direction::Outgoing)
        .map(|edge| (edge.id().index(), edge.target()))
        .collect();
    out.sort_unstable_by_key(|&(edge_index, _)| edge_index);
    out.into_iter().map(|(_, target)| target).collect()
}

/// Preorder DFS from `root`; the first visit claims a node.
fn spanning_tree(graph: &StableDiGraph<u32, ()>, root: NodeIndex) -> NodeTree<u32> {
    let mut tree = NodeTree::with_root_and_capacity(graph[root], graph.node_count());
    let mut visited: HashSet<NodeIndex> = HashSet::with_capacity(graph.node_count());
    visited.insert(root);

    let mut stack: Vec<(NodeIndex, NodeId)> = Vec::new();
    let root_id = NodeId(0);
    for child in ordered_children(graph, root).into_iter().rev() {
        stack.push((child, root_id));
    }

    while let Some((node, parent)) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        let id = tree.add_child(parent, graph[node]);
        for child in ordered_children(graph, node).into_iter().rev() {
            if !visited.contains(&child) {
                stack.push((child, id));
            }
        }
    }

    tree
}
