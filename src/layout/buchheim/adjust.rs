//! Stateless adjustments of mirror node fields.

use super::mirror::{MirrorId, MirrorTree};

/// Fold pending `shift`/`change` values into `v`'s children, right to left.
///
/// The rightmost child is the baseline and stays put; every child to its left
/// absorbs the cumulative shift of the siblings to its right.
pub fn execute_shifts<R>(tree: &mut MirrorTree<R>, v: MirrorId) {
    let mut shift = 0.0f32;
    let mut change = 0.0f32;

    for i in (0..tree.children(v).len()).rev() {
        let child = tree.children(v)[i];
        let node = &mut tree[child];
        node.preliminary += shift;
        node.modifier += shift;
        change += node.change;
        shift += node.shift + change;
    }
}

/// Shift the subtree at `right` by `shift` and spread the correction evenly
/// over the siblings between `left` and `right`.
///
/// The in-between siblings are only recorded in `change`; `execute_shifts`
/// applies them later. No-op unless `right` lies strictly right of `left`.
pub fn move_subtree<R>(tree: &mut MirrorTree<R>, left: MirrorId, right: MirrorId, shift: f32) {
    let gaps = tree[right].order() as isize - tree[left].order() as isize;
    if gaps <= 0 {
        return;
    }
    let per_gap = shift / gaps as f32;

    tree[left].change += per_gap;
    let right = &mut tree[right];
    right.change -= per_gap;
    right.shift += shift;
    right.preliminary += shift;
    right.modifier += shift;
}

/// Place `v` to the right of its left sibling.
///
/// `v.preliminary` is treated as relative to the sibling; the sibling's
/// position becomes `v`'s modifier so its children follow. No-op for a
/// leftmost node or a root.
pub fn move_aside_from_left_sibling<R>(tree: &mut MirrorTree<R>, v: MirrorId, offset: f32) {
    if let Some(left) = tree.left_sibling(v) {
        let left_preliminary = tree[left].preliminary;
        let node = &mut tree[v];
        node.preliminary += left_preliminary + offset;
        node.modifier = left_preliminary;
    }
}

/// Center `v` over its leftmost and rightmost children. No-op for a leaf.
pub fn center_over_children<R>(tree: &mut MirrorTree<R>, v: MirrorId) {
    let (Some(first), Some(last)) = (tree.leftmost_child(v), tree.rightmost_child(v)) else {
        return;
    };
    tree[v].preliminary = 0.5 * (tree[first].preliminary + tree[last].preliminary);
}
