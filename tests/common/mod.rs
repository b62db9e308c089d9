//! Shared helpers for the integration suites: a tree walker that checks the
//! structural invariants through the engine's read-only introspection.

use oakdb::btree::NodeSummary;
use oakdb::{Row, Table};

pub fn row(id: u32) -> Row {
    Row::new(id, format!("user{}", id), format!("user{}@example.com", id)).unwrap()
}

/// Walks the whole tree and asserts every structural invariant that holds
/// on insert-only workloads:
///
/// - keys strictly ascending within every node
/// - every internal key equals the max key of its left child's subtree,
///   and the right child's max exceeds the last key
/// - every non-root node's parent field names the node that lists it
/// - the root is page 0 and flagged as root
/// - the sibling chain visits every leaf exactly once, left to right, in
///   ascending key order, and terminates at 0
pub fn check_tree_invariants(table: &mut Table) {
    let root = table.node_summary(0).unwrap();
    match &root {
        NodeSummary::Leaf { is_root, .. } | NodeSummary::Internal { is_root, .. } => {
            assert!(*is_root, "page 0 must carry the root flag");
        }
    }

    let mut leaves = Vec::new();
    walk(table, 0, 0, true, &mut leaves);

    // Sibling chain covers exactly the leaves found by the walk, in order.
    let mut chain = Vec::new();
    let mut current = leaves
        .first()
        .copied()
        .expect("tree must have at least one leaf");
    loop {
        chain.push(current);
        let NodeSummary::Leaf { next_leaf, .. } = table.node_summary(current).unwrap() else {
            panic!("sibling chain reached a non-leaf page {}", current);
        };
        if next_leaf == 0 {
            break;
        }
        current = next_leaf;
    }
    assert_eq!(
        chain, leaves,
        "sibling chain must visit every leaf exactly once in walk order"
    );

    // Keys ascend globally across the chain.
    let mut all_keys = Vec::new();
    for leaf in &chain {
        let NodeSummary::Leaf { keys, .. } = table.node_summary(*leaf).unwrap() else {
            unreachable!();
        };
        all_keys.extend(keys);
    }
    let mut sorted = all_keys.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(all_keys, sorted, "leaf chain keys must ascend globally");
}

fn walk(table: &mut Table, page_num: u32, expected_parent: u32, is_root: bool, leaves: &mut Vec<u32>) {
    match table.node_summary(page_num).unwrap() {
        NodeSummary::Leaf { parent, keys, .. } => {
            if !is_root {
                assert_eq!(parent, expected_parent, "leaf {} parent mismatch", page_num);
            }
            assert_ascending(&keys, page_num);
            leaves.push(page_num);
        }
        NodeSummary::Internal {
            parent,
            keys,
            children,
            right_child,
            ..
        } => {
            if !is_root {
                assert_eq!(
                    parent, expected_parent,
                    "internal {} parent mismatch",
                    page_num
                );
            }
            assert_ascending(&keys, page_num);
            assert_eq!(keys.len(), children.len());

            for (child, key) in children.iter().zip(&keys) {
                assert_eq!(
                    subtree_max(table, *child),
                    *key,
                    "internal {}: key must equal child {}'s max",
                    page_num,
                    child
                );
                walk(table, *child, page_num, false, leaves);
            }

            if let Some(last_key) = keys.last() {
                assert!(
                    subtree_max(table, right_child) > *last_key,
                    "internal {}: right child max must exceed the last key",
                    page_num
                );
            }
            walk(table, right_child, page_num, false, leaves);
        }
    }
}

fn subtree_max(table: &mut Table, page_num: u32) -> u32 {
    match table.node_summary(page_num).unwrap() {
        NodeSummary::Leaf { keys, .. } => *keys.last().expect("max key of empty leaf"),
        NodeSummary::Internal { right_child, .. } => subtree_max(table, right_child),
    }
}

fn assert_ascending(keys: &[u32], page_num: u32) {
    for pair in keys.windows(2) {
        assert!(
            pair[0] < pair[1],
            "page {}: keys not strictly ascending: {:?}",
            page_num,
            keys
        );
    }
}
