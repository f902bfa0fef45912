use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sabi_tree::os_avl_tree::NodeRef;
use sabi_tree::{OSAvlTree, Rank, TraversalOrder};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Generates a vector of random values in a range that ensures collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -5_000i64..5_000i64
}

/// The AVL worst-case height for a tree of `n` keys.
fn avl_height_bound(n: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let n = n as f64;
    1.44 * (n + 2.0).log2() - 1.0
}

/// Walks the whole tree through the public `NodeRef` accessors and checks the
/// balance, height and size invariants at every node. Returns (size, height).
fn check_node<K: Ord>(node: NodeRef<'_, K>) -> (usize, i32) {
    let (left_size, left_height) = node.left().map_or((0, -1), check_node);
    let (right_size, right_height) = node.right().map_or((0, -1), check_node);

    assert!((-1..=1).contains(&node.balance()), "balance factor out of range");
    assert_eq!(node.height(), left_height.max(right_height) + 1, "cached height incorrect");
    assert_eq!(node.size(), left_size + right_size + 1, "cached size incorrect");

    (node.size(), node.height())
}

fn check_invariants<K: Ord>(tree: &OSAvlTree<K>) {
    match tree.root() {
        Some(root) => {
            let (size, height) = check_node(root);
            assert_eq!(size, tree.len());
            assert_eq!(height, tree.height());
        }
        None => {
            assert_eq!(tree.len(), 0);
            assert_eq!(tree.height(), -1);
        }
    }
    assert!(f64::from(tree.height()) < avl_height_bound(tree.len()), "AVL height bound violated");
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    First,
    Last,
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        5 => value_strategy().prop_map(TreeOp::Insert),
        3 => value_strategy().prop_map(TreeOp::Remove),
        2 => value_strategy().prop_map(TreeOp::Contains),
        1 => Just(TreeOp::First),
        1 => Just(TreeOp::Last),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of insert/remove/contains operations on both
    /// OSAvlTree and BTreeSet and asserts identical results at every step.
    #[test]
    fn tree_ops_match_btreeset(ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE)) {
        let mut avl: OSAvlTree<i64> = OSAvlTree::new();
        let mut set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                TreeOp::Insert(v) => {
                    prop_assert_eq!(avl.insert(*v), set.insert(*v), "insert({})", v);
                }
                TreeOp::Remove(v) => {
                    prop_assert_eq!(avl.remove(v), set.remove(v), "remove({})", v);
                }
                TreeOp::Contains(v) => {
                    prop_assert_eq!(avl.contains(v), set.contains(v), "contains({})", v);
                }
                TreeOp::First => {
                    prop_assert_eq!(avl.first(), set.first(), "first()");
                }
                TreeOp::Last => {
                    prop_assert_eq!(avl.last(), set.last(), "last()");
                }
            }
            prop_assert_eq!(avl.len(), set.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(avl.is_empty(), set.is_empty(), "is_empty mismatch after {:?}", op);
        }

        check_invariants(&avl);

        // In-order traversal must equal the sorted model.
        let inorder: Vec<i64> = avl.as_list(TraversalOrder::In).into_iter().copied().collect();
        let expected: Vec<i64> = set.iter().copied().collect();
        prop_assert_eq!(inorder, expected, "in-order traversal mismatch");
    }

    /// Structural invariants hold after every single operation, not just at
    /// the end of a batch.
    #[test]
    fn invariants_hold_after_every_operation(ops in proptest::collection::vec(tree_op_strategy(), 0..300)) {
        let mut avl: OSAvlTree<i64> = OSAvlTree::new();

        for op in &ops {
            match op {
                TreeOp::Insert(v) => {
                    avl.insert(*v);
                }
                TreeOp::Remove(v) => {
                    avl.remove(v);
                }
                _ => {}
            }
            check_invariants(&avl);
        }
    }

    /// Iteration matches the materialized in-order traversal.
    #[test]
    fn iter_matches_inorder_list(values in proptest::collection::vec(value_strategy(), 0..TEST_SIZE)) {
        let avl: OSAvlTree<i64> = values.iter().copied().collect();

        let iterated: Vec<i64> = avl.iter().copied().collect();
        let listed: Vec<i64> = avl.as_list(TraversalOrder::In).into_iter().copied().collect();
        prop_assert_eq!(iterated, listed);
        prop_assert_eq!(avl.iter().len(), avl.len());
    }
}

// ─── Order statistics ────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// find_kth(k) returns the k-th element of the sorted key sequence for
    /// every k in range, and errors outside it.
    #[test]
    fn find_kth_matches_sorted_position(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let avl: OSAvlTree<i64> = values.iter().copied().collect();
        let sorted: Vec<i64> = values.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();

        for (index, expected) in sorted.iter().enumerate() {
            let node = avl.find_kth(index + 1).unwrap();
            prop_assert_eq!(node.key(), expected, "find_kth({})", index + 1);
        }

        let zero = avl.find_kth(0).unwrap_err();
        prop_assert_eq!(zero.rank(), 0);
        prop_assert_eq!(zero.len(), avl.len());

        let beyond = avl.find_kth(avl.len() + 1).unwrap_err();
        prop_assert_eq!(beyond.rank(), avl.len() + 1);
    }

    /// rank_of is the inverse of find_kth.
    #[test]
    fn rank_of_inverts_find_kth(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let avl: OSAvlTree<i64> = values.iter().copied().collect();

        for k in 1..=avl.len() {
            let key = *avl.find_kth(k).unwrap().key();
            prop_assert_eq!(avl.rank_of(&key), Some(Rank(k)), "rank_of({})", key);
        }
        prop_assert_eq!(avl.rank_of(&i64::MAX), None);
    }
}

// ─── Scenario tests ──────────────────────────────────────────────────────────

#[test]
fn ten_key_scenario() {
    let tree = OSAvlTree::from([5, 3, 8, 1, 4, 7, 9, 2, 6, 0]);

    let inorder: Vec<i32> = tree.as_list(TraversalOrder::In).into_iter().copied().collect();
    assert_eq!(inorder, vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);

    assert!(tree.height() <= 3);
    assert_eq!(*tree.find_kth(1).unwrap().key(), 0);
    assert_eq!(*tree.find_kth(10).unwrap().key(), 9);
    assert_eq!(tree[Rank(1)], 0);
    assert_eq!(tree[Rank(10)], 9);

    check_invariants(&tree);
}

#[test]
fn ascending_insertion_stays_balanced() {
    // The worst case for an unbalanced BST: without rotations the height
    // would be 999.
    let tree: OSAvlTree<u32> = (1..=1000).collect();

    assert_eq!(tree.len(), 1000);
    assert!(f64::from(tree.height()) < avl_height_bound(1000));
    assert!(tree.rebalance_count() > 0);

    check_invariants(&tree);
}

#[test]
fn removing_the_root_until_empty() {
    let mut tree: OSAvlTree<u32> = (0..128).collect();

    while !tree.is_empty() {
        // The root of a non-trivial AVL tree regularly has two children, so
        // this loop exercises the successor-swap removal path repeatedly.
        let key = *tree.root().unwrap().key();
        assert!(tree.remove(&key));
        check_invariants(&tree);
    }

    assert_eq!(tree.elements_count(), 0);
    assert_eq!(tree.height(), -1);
}

#[test]
fn removing_every_key_kind() {
    // 0..16 in shuffled order gives leaves, one-child nodes and two-child
    // nodes across the removals below.
    let keys = [8, 4, 12, 2, 6, 10, 14, 1, 3, 5, 7, 9, 11, 13, 15, 0];
    let mut tree = OSAvlTree::from(keys);

    for key in [8, 0, 15, 4, 12, 1, 2, 3, 5, 6, 7, 9, 10, 11, 13, 14] {
        assert!(tree.remove(&key));
        assert!(!tree.contains(&key));
        check_invariants(&tree);
    }
    assert!(tree.is_empty());
}

// ─── No-op conditions and round trips ────────────────────────────────────────

#[test]
fn duplicate_insert_is_idempotent() {
    let mut tree = OSAvlTree::from([2, 1, 3]);
    let inorder_before: Vec<i32> = tree.as_list(TraversalOrder::In).into_iter().copied().collect();
    let rebalances_before = tree.rebalance_count();

    assert!(!tree.insert(2));

    assert_eq!(tree.elements_count(), 3);
    assert_eq!(tree.rebalance_count(), rebalances_before);
    let inorder_after: Vec<i32> = tree.as_list(TraversalOrder::In).into_iter().copied().collect();
    assert_eq!(inorder_before, inorder_after);
}

#[test]
fn removing_an_absent_key_is_a_noop() {
    let mut tree = OSAvlTree::from([2, 1, 3]);
    assert!(!tree.remove(&4));
    assert_eq!(tree.len(), 3);
    check_invariants(&tree);
}

#[test]
fn insert_then_find_round_trip() {
    let mut tree = OSAvlTree::new();
    assert!(tree.find(&42).is_none());

    tree.insert(42);
    let node = tree.find(&42).expect("key must be present after insert");
    assert_eq!(*node.key(), 42);
    assert!(node.is_leaf());

    tree.remove(&42);
    assert!(tree.find(&42).is_none());
}

// ─── Traversals and rendering accessors ──────────────────────────────────────

#[test]
fn traversal_orders_on_a_known_tree() {
    // Builds the balanced tree   4
    //                          2   6
    //                         1 3 5 7
    let tree = OSAvlTree::from([4, 2, 6, 1, 3, 5, 7]);

    assert_eq!(tree.as_list(TraversalOrder::Pre), [&4, &2, &1, &3, &6, &5, &7]);
    assert_eq!(tree.as_list(TraversalOrder::In), [&1, &2, &3, &4, &5, &6, &7]);
    assert_eq!(tree.as_list(TraversalOrder::Post), [&1, &3, &2, &5, &7, &6, &4]);
}

#[test]
fn traversal_order_parses_from_str() {
    assert_eq!("pre".parse(), Ok(TraversalOrder::Pre));
    assert_eq!("inorder".parse(), Ok(TraversalOrder::In));
    assert_eq!("postorder".parse(), Ok(TraversalOrder::Post));
    assert!("sideways".parse::<TraversalOrder>().is_err());
}

#[test]
fn node_refs_expose_the_structure() {
    let tree = OSAvlTree::from([2, 1, 3]);
    let root = tree.root().expect("tree is non-empty");

    assert_eq!(*root.key(), 2);
    assert_eq!(root.height(), 1);
    assert_eq!(root.size(), 3);
    assert_eq!(root.balance(), 0);
    assert!(root.parent().is_none());

    let left = root.left().expect("root has a left child");
    assert_eq!(*left.key(), 1);
    assert!(left.is_leaf());
    assert_eq!(left.parent().map(|node| *node.key()), Some(2));

    let right = root.right().expect("root has a right child");
    assert_eq!(*right.key(), 3);
    assert!(right.is_leaf());
}

#[test]
fn clear_empties_the_tree_but_keeps_diagnostics() {
    let mut tree: OSAvlTree<u32> = (0..100).collect();
    let rebalances = tree.rebalance_count();
    assert!(rebalances > 0);

    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.height(), -1);
    assert!(tree.root().is_none());
    assert_eq!(tree.rebalance_count(), rebalances);

    // The tree is fully usable after a clear.
    tree.insert(1);
    assert_eq!(tree.len(), 1);
}
