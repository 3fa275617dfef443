//! A small irregular tree used in demos, tests, and benches.

use crate::tree::NodeTree;

/// Build the sample tree.
///
/// ```text
/// O ─┬─ E ─┬─ A
///    │     └─ D ── G K L M N
///    ├─ F ─┬─ B
///    │     └─ C ── H1 I1 J1 K1 L1 H1 I1 J1 K1 L1
///    └─ N ─┬─ G
///          └─ M ── H I J K L
/// ```
pub fn sample_tree() -> NodeTree<&'static str> {
    let mut tree = NodeTree::with_root_and_capacity("O", 30);
    let Some(root) = tree.root() else {
        return tree;
    };

    let e = tree.add_child(root, "E");
    let f = tree.add_child(root, "F");
    let n = tree.add_child(root, "N");

    tree.add_child(e, "A");
    let d = tree.add_child(e, "D");
    for name in ["G", "K", "L", "M", "N"] {
        tree.add_child(d, name);
    }

    tree.add_child(n, "G");
    let m = tree.add_child(n, "M");

    tree.add_child(f, "B");
    let c = tree.add_child(f, "C");
    for _ in 0..2 {
        for name in ["H1", "I1", "J1", "K1", "L1"] {
            tree.add_child(c, name);
        }
    }

    for name in ["H", "I", "J", "K", "L"] {
        tree.add_child(m, name);
    }

    tree
}
