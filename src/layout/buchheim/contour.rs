//! Contour cursor.
//!
//! A cursor walks down the left or right silhouette of a subtree one level at
//! a time, accumulating the modifiers of the nodes it has passed so that
//! [`ContourCursor::offset`] is the node's position in the frame where the
//! walk started. Childless nodes hand over to their thread, which is what
//! keeps the total walking linear: resolved regions are skipped rather than
//! re-descended.

use super::mirror::{MirrorId, MirrorTree};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourCursor {
    current: Option<MirrorId>,
    mod_sum: f32,
}

impl ContourCursor {
    /// Place a cursor on `start`, seeding the sum with its modifier.
    pub fn new<R>(tree: &MirrorTree<R>, start: Option<MirrorId>) -> Self {
        Self {
            current: start,
            mod_sum: start.map_or(0.0, |id| tree[id].modifier),
        }
    }

    #[inline]
    pub fn current(&self) -> Option<MirrorId> {
        self.current
    }

    #[inline]
    pub fn mod_sum(&self) -> f32 {
        self.mod_sum
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.current.is_none()
    }

    /// Accumulated position of the current node; 0 once finished.
    pub fn offset<R>(&self, tree: &MirrorTree<R>) -> f32 {
        self.current
            .map_or(0.0, |id| tree[id].preliminary + self.mod_sum)
    }

    pub fn move_left<R>(&mut self, tree: &MirrorTree<R>) {
        if let Some(id) = self.current {
            self.current = tree.next_left(id);
        }
    }

    pub fn move_right<R>(&mut self, tree: &MirrorTree<R>) {
        if let Some(id) = self.current {
            self.current = tree.next_right(id);
        }
    }

    pub fn update_sum<R>(&mut self, tree: &MirrorTree<R>) {
        if let Some(id) = self.current {
            self.mod_sum += tree[id].modifier;
        }
    }

    /// Account for a shift applied to the subtree the cursor is walking.
    #[inline]
    pub fn add_to_sum(&mut self, value: f32) {
        self.mod_sum += value;
    }

    pub fn set_ancestor<R>(&self, tree: &mut MirrorTree<R>, ancestor: MirrorId) {
        if let Some(id) = self.current {
            tree[id].ancestor = ancestor;
        }
    }

    /// Thread the current node onto `other`'s node.
    ///
    /// The two cursors have summed different modifiers on the way down, so
    /// the difference is folded into the current node's modifier; a walk that
    /// later crosses the thread then lands on the same offset `other` sees.
    pub fn set_thread_and_update_mod<R>(&self, tree: &mut MirrorTree<R>, other: &ContourCursor) {
        if let Some(id) = self.current {
            let node = &mut tree[id];
            node.thread = other.current;
            node.modifier += other.mod_sum - self.mod_sum;
        }
    }

    /// True when there is no next node on the left (or the cursor is finished).
    pub fn is_last_on_left<R>(&self, tree: &MirrorTree<R>) -> bool {
        self.current.and_then(|id| tree.next_left(id)).is_none()
    }

    /// True when there is no next node on the right (or the cursor is finished).
    pub fn is_last_on_right<R>(&self, tree: &MirrorTree<R>) -> bool {
        self.current.and_then(|id| tree.next_right(id)).is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 0.01;

    #[test]
    fn test_initialize_from_node() {
        let mut tree = MirrorTree::new();
        let leaf = tree.add_root(());
        tree[leaf].modifier = 5.0;

        let cursor = ContourCursor::new(&tree, Some(leaf));
        assert_eq!(cursor.current(), Some(leaf));
        assert_eq!(cursor.mod_sum(), 5.0);
    }

    #[test]
    fn test_finished_when_empty() {
        let mut tree = MirrorTree::new();
        let cursor = ContourCursor::new(&tree, None);
        assert!(cursor.is_finished());
        assert_eq!(cursor.mod_sum(), 0.0);
        assert_eq!(cursor.offset(&tree), 0.0);

        let leaf = tree.add_root(());
        assert!(!ContourCursor::new(&tree, Some(leaf)).is_finished());
    }

    #[test]
    fn test_last_on_either_side_when_empty_or_leaf() {
        let mut tree = MirrorTree::new();
        let empty = ContourCursor::new(&tree, None);
        assert!(empty.is_last_on_left(&tree));
        assert!(empty.is_last_on_right(&tree));

        let leaf = tree.add_root(());
        let cursor = ContourCursor::new(&tree, Some(leaf));
        assert!(cursor.is_last_on_left(&tree));
        assert!(cursor.is_last_on_right(&tree));
    }

    #[test]
    fn test_move_left_to_first_child() {
        let mut tree = MirrorTree::new();
        let root = tree.add_root(());
        let first = tree.add_child(root, ());
        tree.add_child(root, ());

        let mut cursor = ContourCursor::new(&tree, Some(root));
        assert!(!cursor.is_last_on_left(&tree));

        cursor.move_left(&tree);
        assert_eq!(cursor.current(), Some(first));
        assert!(cursor.is_last_on_left(&tree));

        cursor.move_left(&tree);
        assert!(cursor.is_finished());
        cursor.move_left(&tree);
        assert!(cursor.is_finished(), "moving a finished cursor is a no-op");
    }

    #[test]
    fn test_move_right_to_last_child() {
        let mut tree = MirrorTree::new();
        let root = tree.add_root(());
        tree.add_child(root, ());
        let last = tree.add_child(root, ());

        let mut cursor = ContourCursor::new(&tree, Some(root));
        assert!(!cursor.is_last_on_right(&tree));

        cursor.move_right(&tree);
        assert_eq!(cursor.current(), Some(last));
        assert!(cursor.is_last_on_right(&tree));
    }

    #[test]
    fn test_moves_through_thread() {
        let mut tree = MirrorTree::new();
        let leaf = tree.add_root(());
        let target = tree.add_root(());
        tree[leaf].thread = Some(target);

        let mut cursor = ContourCursor::new(&tree, Some(leaf));
        assert!(!cursor.is_last_on_right(&tree));
        cursor.move_right(&tree);
        assert_eq!(cursor.current(), Some(target));
    }

    #[test]
    fn test_update_sum_adds_modifier() {
        let mut tree = MirrorTree::new();
        let root = tree.add_root(());
        tree[root].modifier = 10.0;

        let mut cursor = ContourCursor::new(&tree, Some(root));
        cursor.update_sum(&tree);
        assert!((cursor.mod_sum() - 20.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_add_to_sum_moves_offset() {
        let mut tree = MirrorTree::new();
        let root = tree.add_root(());
        tree[root].preliminary = 1.0;
        tree[root].modifier = 2.0;

        let mut cursor = ContourCursor::new(&tree, Some(root));
        cursor.add_to_sum(0.75);
        assert!((cursor.mod_sum() - 2.75).abs() < TOLERANCE);
        assert!((cursor.offset(&tree) - 3.75).abs() < TOLERANCE);
        assert_eq!(cursor.current(), Some(root), "adding to the sum does not move");
    }

    #[test]
    fn test_offset_is_preliminary_plus_sum() {
        let mut tree = MirrorTree::new();
        let root = tree.add_root(());
        tree[root].modifier = 10.0;
        tree[root].preliminary = 5.0;

        let mut cursor = ContourCursor::new(&tree, Some(root));
        assert!((cursor.offset(&tree) - 15.0).abs() < TOLERANCE);

        cursor.update_sum(&tree);
        assert!((cursor.offset(&tree) - 25.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_set_ancestor_when_not_finished() {
        let mut tree = MirrorTree::new();
        let root = tree.add_root(());
        let ancestor = tree.add_root(());

        let cursor = ContourCursor::new(&tree, Some(root));
        cursor.set_ancestor(&mut tree, ancestor);
        assert_eq!(tree[root].ancestor, ancestor);

        let finished = ContourCursor::new(&tree, None);
        finished.set_ancestor(&mut tree, root);
        assert_eq!(tree[root].ancestor, ancestor, "finished cursor leaves nodes alone");
    }

    #[test]
    fn test_set_thread_and_update_mod() {
        let mut tree = MirrorTree::new();
        let root = tree.add_root(());
        tree[root].modifier = 1.0;
        let cursor = ContourCursor::new(&tree, Some(root));

        let thread = tree.add_root(());
        tree[thread].modifier = 20.0;
        tree[root].modifier = 5.0;
        let other = ContourCursor::new(&tree, Some(thread));

        cursor.set_thread_and_update_mod(&mut tree, &other);
        assert_eq!(tree[root].thread, Some(thread));
        assert!((tree[root].modifier - (5.0 + 20.0 - 1.0)).abs() < TOLERANCE);
    }
}
