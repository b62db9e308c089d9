//! # Tree Algorithms
//!
//! Every operation that spans more than one page lives here: descent by
//! key, max-key lookup, leaf insertion with splitting, internal-node child
//! insertion with splitting, and root replacement. The single-page cell and
//! entry mechanics stay in [`super::leaf`] and [`super::internal`].
//!
//! ## Structure
//!
//! The tree is rooted at page 0, always. Rows live only in leaves, sorted
//! ascending by key; an internal key is the maximum key of its left child's
//! subtree; leaves are chained left-to-right through their sibling links.
//!
//! ```text
//!                  [page 0: internal root]
//!                  /          |           \
//!          [leaf 1]       [leaf 2]      [leaf 3]
//!             |──────────────>|─────────────>|──> 0 (end of chain)
//! ```
//!
//! ## Splits
//!
//! Inserting into a full leaf allocates a sibling, redistributes the 14
//! virtual cells (13 existing plus the incoming one) half and half, and
//! pushes the new sibling into the parent. A full parent splits the same
//! way, moving its upper children into a fresh internal node one at a time.
//! When the root itself overflows, [`create_new_root`] copies page 0 into a
//! fresh page and reinstalls page 0 as a one-key internal root, so the root
//! page number never changes.
//!
//! During an internal split the node being emptied transiently violates the
//! internal-key law (its right child holds the invalid-page sentinel while
//! children migrate). Only post-conditions are observable: every public
//! entry point returns with the invariants restored.
//!
//! ## Borrow Discipline
//!
//! The pager hands out one page borrow at a time, so every step here is a
//! short scoped borrow: read what is needed into locals, drop the page,
//! move on. Leaf redistribution works from a stack snapshot of the old page
//! rather than holding two pages at once.

use eyre::{bail, ensure, Result};
use tracing::debug;

use super::cursor::Cursor;
use super::internal::{InternalNode, InternalNodeMut};
use super::leaf::{LeafNode, LeafNodeMut};
use crate::config::constants::{
    INTERNAL_NODE_MAX_KEYS, INVALID_PAGE_NUM, LEAF_NODE_LEFT_SPLIT_COUNT, LEAF_NODE_MAX_CELLS,
    LEAF_NODE_RIGHT_SPLIT_COUNT, ROW_SIZE,
};
use crate::row::Row;
use crate::storage::{node_type, NodeHeader, NodeType, PageBuf, Pager};

/// The root never moves: the file format and re-open both rely on it.
pub const ROOT_PAGE_NUM: u32 = 0;

/// Descends from the root to the leaf that holds `key`, or would hold it.
/// The cursor lands on the matching cell or on the insertion slot (which
/// may be one past the last cell).
pub fn find(pager: &mut Pager, key: u32) -> Result<Cursor> {
    let mut page_num = ROOT_PAGE_NUM;

    loop {
        let page = pager.get(page_num)?;
        match node_type(page)? {
            NodeType::Leaf => {
                let leaf = LeafNode::from_page(page)?;
                let cell_num = leaf.find(key)?.cell_num();
                return Ok(Cursor {
                    page_num,
                    cell_num,
                    end_of_table: false,
                });
            }
            NodeType::Internal => {
                let node = InternalNode::from_page(page)?;
                let child_index = node.find_child_index(key)?;
                page_num = node.child_at(child_index)?;
            }
        }
    }
}

/// The maximum key stored under `page_num`: the last cell of a leaf, or
/// recursively the maximum of an internal node's right child.
pub fn node_max_key(pager: &mut Pager, page_num: u32) -> Result<u32> {
    let mut current = page_num;

    loop {
        let page = pager.get(current)?;
        match node_type(page)? {
            NodeType::Leaf => {
                let leaf = LeafNode::from_page(page)?;
                let num_cells = leaf.num_cells();
                ensure!(num_cells > 0, "max key of empty leaf page {}", current);
                return leaf.key_at(num_cells - 1);
            }
            NodeType::Internal => {
                let node = InternalNode::from_page(page)?;
                let right_child = node.right_child();
                ensure!(
                    right_child != INVALID_PAGE_NUM,
                    "max key of internal page {} with unwired right child",
                    current
                );
                current = right_child;
            }
        }
    }
}

/// Inserts `(key, row)` at the cursor position, splitting the leaf when it
/// is already at capacity.
pub fn leaf_insert(pager: &mut Pager, cursor: &Cursor, key: u32, row: &Row) -> Result<()> {
    let mut row_bytes = [0u8; ROW_SIZE];
    row.serialize(&mut row_bytes)?;

    let num_cells = {
        let page = pager.get(cursor.page_num)?;
        LeafNode::from_page(page)?.num_cells()
    };

    if num_cells as usize >= LEAF_NODE_MAX_CELLS {
        return leaf_split_insert(pager, cursor, key, &row_bytes);
    }

    let page = pager.get(cursor.page_num)?;
    LeafNodeMut::from_page(page)?.insert_cell(cursor.cell_num, key, &row_bytes)
}

/// Splits a full leaf around an insertion.
///
/// The 14 virtual cells (13 existing plus the one being inserted at
/// `cursor.cell_num`) are redistributed highest index first: slots `[7, 14)`
/// land in the new right sibling, slots `[0, 7)` stay in the old leaf, and
/// each cell's position within its destination is `i % 7`. The sibling
/// chain and parent linkage are stitched before redistribution; the parent
/// learns about the new leaf afterwards.
fn leaf_split_insert(pager: &mut Pager, cursor: &Cursor, key: u32, row_bytes: &[u8]) -> Result<()> {
    let old_page_num = cursor.page_num;
    let old_max = node_max_key(pager, old_page_num)?;
    let new_page_num = pager.unused_page_num();

    debug!(
        old_page = old_page_num,
        new_page = new_page_num,
        key,
        "splitting leaf"
    );

    // Redistribution reads the pre-split cells while both destinations are
    // being written, so it works from a snapshot of the old page.
    let snapshot: PageBuf = *pager.get(old_page_num)?;
    let old_leaf = LeafNode::from_page(&snapshot)?;
    let (old_parent, old_next, old_is_root) =
        (old_leaf.parent(), old_leaf.next_leaf(), old_leaf.is_root());

    {
        let page = pager.get(new_page_num)?;
        let mut new_leaf = LeafNodeMut::init(page)?;
        new_leaf.set_parent(old_parent);
        new_leaf.set_next_leaf(old_next);
    }
    {
        let page = pager.get(old_page_num)?;
        LeafNodeMut::from_page(page)?.set_next_leaf(new_page_num);
    }

    for i in (0..=LEAF_NODE_MAX_CELLS).rev() {
        let destination_page = if i >= LEAF_NODE_LEFT_SPLIT_COUNT {
            new_page_num
        } else {
            old_page_num
        };
        let index_within_node = (i % LEAF_NODE_LEFT_SPLIT_COUNT) as u32;

        let page = pager.get(destination_page)?;
        let mut destination = LeafNodeMut::from_page(page)?;

        if i == cursor.cell_num as usize {
            destination.write_cell(index_within_node, key, row_bytes)?;
        } else if i > cursor.cell_num as usize {
            let source = LeafNode::from_page(&snapshot)?;
            destination.copy_cell(index_within_node, source.cell_at(i as u32 - 1)?)?;
        } else {
            let source = LeafNode::from_page(&snapshot)?;
            destination.copy_cell(index_within_node, source.cell_at(i as u32)?)?;
        }
    }

    {
        let page = pager.get(old_page_num)?;
        LeafNodeMut::from_page(page)?.set_num_cells(LEAF_NODE_LEFT_SPLIT_COUNT as u32);
    }
    {
        let page = pager.get(new_page_num)?;
        LeafNodeMut::from_page(page)?.set_num_cells(LEAF_NODE_RIGHT_SPLIT_COUNT as u32);
    }

    if old_is_root {
        return create_new_root(pager, new_page_num);
    }

    let new_max = node_max_key(pager, old_page_num)?;
    {
        let page = pager.get(old_parent)?;
        InternalNodeMut::from_page(page)?.update_key(old_max, new_max)?;
    }
    internal_insert(pager, old_parent, new_page_num)
}

/// Inserts `child_page_num` into the parent internal node, keyed by the
/// child's maximum key. Delegates to [`internal_split_insert`] when the
/// parent is already full.
pub fn internal_insert(pager: &mut Pager, parent_page_num: u32, child_page_num: u32) -> Result<()> {
    let child_max = node_max_key(pager, child_page_num)?;

    let (index, original_num_keys, right_child_page_num) = {
        let page = pager.get(parent_page_num)?;
        let parent = InternalNode::from_page(page)?;
        (
            parent.find_child_index(child_max)?,
            parent.num_keys(),
            parent.right_child(),
        )
    };

    if original_num_keys as usize >= INTERNAL_NODE_MAX_KEYS {
        return internal_split_insert(pager, parent_page_num, child_page_num);
    }

    // A freshly initialized internal node carries the sentinel: the first
    // child inserted into it simply becomes the right child.
    if right_child_page_num == INVALID_PAGE_NUM {
        let page = pager.get(parent_page_num)?;
        InternalNodeMut::from_page(page)?.set_right_child(child_page_num);
        return Ok(());
    }

    let right_child_max = node_max_key(pager, right_child_page_num)?;

    {
        let page = pager.get(parent_page_num)?;
        let mut parent = InternalNodeMut::from_page(page)?;
        parent.set_num_keys(original_num_keys + 1);

        if child_max > right_child_max {
            // The new child outranks the right child: demote the old right
            // child into the last positional slot and promote the new one.
            parent.set_entry(original_num_keys, right_child_page_num, right_child_max)?;
            parent.set_right_child(child_page_num);
        } else {
            for i in ((index + 1)..=original_num_keys).rev() {
                let (child, key) = parent.entry_at(i - 1)?;
                parent.set_entry(i, child, key)?;
            }
            parent.set_entry(index, child_page_num, child_max)?;
        }
    }

    set_parent(pager, child_page_num, parent_page_num)
}

/// Splits a full internal node to absorb one more child.
///
/// The node's right child and its upper positional children migrate into a
/// fresh sibling one at a time (each migration is itself an
/// [`internal_insert`] into the sibling), the entry just below the middle is
/// promoted to be the shrunken node's right child, and the incoming child is
/// routed to whichever half now covers its key range. If the node being
/// split is the root, a new root is installed first and the split proceeds
/// on the copied left child.
fn internal_split_insert(pager: &mut Pager, parent_page_num: u32, child_page_num: u32) -> Result<()> {
    let mut old_page_num = parent_page_num;
    let old_max = node_max_key(pager, old_page_num)?;
    let child_max = node_max_key(pager, child_page_num)?;

    let new_page_num = pager.unused_page_num();

    debug!(
        old_page = old_page_num,
        new_page = new_page_num,
        "splitting internal node"
    );

    let splitting_root = {
        let page = pager.get(old_page_num)?;
        NodeHeader::from_bytes(page)?.is_root()
    };

    // The page whose key for the old node must be corrected at the end:
    // the fresh root when splitting the root, the parent otherwise.
    let parent_page;
    if splitting_root {
        create_new_root(pager, new_page_num)?;
        parent_page = ROOT_PAGE_NUM;
        // The split continues on the copy of the old root installed as the
        // new root's left child.
        let page = pager.get(ROOT_PAGE_NUM)?;
        old_page_num = InternalNode::from_page(page)?.child_at(0)?;
    } else {
        parent_page = {
            let page = pager.get(old_page_num)?;
            InternalNode::from_page(page)?.parent()
        };
        let page = pager.get(new_page_num)?;
        InternalNodeMut::init(page)?;
    }

    // Move the old node's right child into the new node, then mark the slot
    // unwired while the upper entries migrate.
    let old_right_child = {
        let page = pager.get(old_page_num)?;
        let node = InternalNode::from_page(page)?;
        let right = node.right_child();
        ensure!(
            right != INVALID_PAGE_NUM,
            "splitting internal page {} with unwired right child",
            old_page_num
        );
        right
    };
    internal_insert(pager, new_page_num, old_right_child)?;
    set_parent(pager, old_right_child, new_page_num)?;
    {
        let page = pager.get(old_page_num)?;
        InternalNodeMut::from_page(page)?.set_right_child(INVALID_PAGE_NUM);
    }

    for i in ((INTERNAL_NODE_MAX_KEYS / 2 + 1)..INTERNAL_NODE_MAX_KEYS).rev() {
        let moved_child = {
            let page = pager.get(old_page_num)?;
            InternalNode::from_page(page)?.entry_child(i as u32)?
        };
        internal_insert(pager, new_page_num, moved_child)?;
        set_parent(pager, moved_child, new_page_num)?;
        let page = pager.get(old_page_num)?;
        let mut node = InternalNodeMut::from_page(page)?;
        let num_keys = node.num_keys();
        node.set_num_keys(num_keys - 1);
    }

    // The child just below the promoted middle key becomes the shrunken
    // node's right child.
    {
        let page = pager.get(old_page_num)?;
        let mut node = InternalNodeMut::from_page(page)?;
        let num_keys = node.num_keys();
        let promoted = node.entry_child(num_keys - 1)?;
        node.set_right_child(promoted);
        node.set_num_keys(num_keys - 1);
    }

    let max_after_split = node_max_key(pager, old_page_num)?;
    let destination_page_num = if child_max < max_after_split {
        old_page_num
    } else {
        new_page_num
    };
    internal_insert(pager, destination_page_num, child_page_num)?;
    set_parent(pager, child_page_num, destination_page_num)?;

    let new_old_max = node_max_key(pager, old_page_num)?;
    {
        let page = pager.get(parent_page)?;
        InternalNodeMut::from_page(page)?.update_key(old_max, new_old_max)?;
    }

    if !splitting_root {
        let grandparent = {
            let page = pager.get(old_page_num)?;
            InternalNode::from_page(page)?.parent()
        };
        // The insert path sets the sibling's parent to wherever it actually
        // lands; the grandparent may itself split and home the two halves
        // under different nodes, so nothing may be assumed here.
        internal_insert(pager, grandparent, new_page_num)?;
    }

    Ok(())
}

/// Installs a new root after the old root split.
///
/// Page 0 is copied byte-for-byte into a freshly allocated left child (the
/// root page number never changes), then reinitialized as an internal node
/// with a single key: (left child, its max key), right child =
/// `right_child_page_num`. When the old root was internal, the incoming
/// right child is initialized as an empty internal node for the caller to
/// populate, and the copied node's children are retargeted to its new page
/// number.
pub fn create_new_root(pager: &mut Pager, right_child_page_num: u32) -> Result<()> {
    // Materialize the right child before allocating the left child page;
    // the caller may not have touched it yet, and the two must not collide.
    pager.get(right_child_page_num)?;
    let left_child_page_num = pager.unused_page_num();

    debug!(
        left_child = left_child_page_num,
        right_child = right_child_page_num,
        "creating new root"
    );

    let snapshot: PageBuf = *pager.get(ROOT_PAGE_NUM)?;
    let root_type = node_type(&snapshot)?;

    {
        let page = pager.get(left_child_page_num)?;
        page.copy_from_slice(&snapshot);
        NodeHeader::from_bytes_mut(page)?.set_root(false);
    }

    if root_type == NodeType::Internal {
        {
            let page = pager.get(right_child_page_num)?;
            InternalNodeMut::init(page)?;
        }

        // The copy's children still point at page 0 as their parent.
        let children = {
            let page = pager.get(left_child_page_num)?;
            let node = InternalNode::from_page(page)?;
            let mut children = Vec::with_capacity(node.num_keys() as usize);
            for i in 0..node.num_keys() {
                children.push(node.child_at(i)?);
            }
            children
        };
        for child in children {
            set_parent(pager, child, left_child_page_num)?;
        }
    }

    let left_child_max = node_max_key(pager, left_child_page_num)?;

    {
        let page = pager.get(ROOT_PAGE_NUM)?;
        let mut root = InternalNodeMut::init(page)?;
        root.set_root(true);
        root.set_num_keys(1);
        root.set_entry(0, left_child_page_num, left_child_max)?;
        root.set_right_child(right_child_page_num);
    }

    set_parent(pager, left_child_page_num, ROOT_PAGE_NUM)?;
    set_parent(pager, right_child_page_num, ROOT_PAGE_NUM)
}

fn set_parent(pager: &mut Pager, page_num: u32, parent_page_num: u32) -> Result<()> {
    let page = pager.get(page_num)?;
    NodeHeader::from_bytes_mut(page)?.set_parent(parent_page_num);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read-only structure introspection, for the .btree dump and for tests.
// ---------------------------------------------------------------------------

/// A read-only description of one node's structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeSummary {
    Leaf {
        page_num: u32,
        parent: u32,
        is_root: bool,
        next_leaf: u32,
        keys: Vec<u32>,
    },
    Internal {
        page_num: u32,
        parent: u32,
        is_root: bool,
        keys: Vec<u32>,
        /// Positional children; the right child is separate.
        children: Vec<u32>,
        right_child: u32,
    },
}

/// Describes the node stored at `page_num`.
pub fn node_summary(pager: &mut Pager, page_num: u32) -> Result<NodeSummary> {
    let page = pager.get(page_num)?;
    match node_type(page)? {
        NodeType::Leaf => {
            let leaf = LeafNode::from_page(page)?;
            let mut keys = Vec::with_capacity(leaf.num_cells() as usize);
            for i in 0..leaf.num_cells() {
                keys.push(leaf.key_at(i)?);
            }
            Ok(NodeSummary::Leaf {
                page_num,
                parent: leaf.parent(),
                is_root: leaf.is_root(),
                next_leaf: leaf.next_leaf(),
                keys,
            })
        }
        NodeType::Internal => {
            let node = InternalNode::from_page(page)?;
            let mut keys = Vec::with_capacity(node.num_keys() as usize);
            let mut children = Vec::with_capacity(node.num_keys() as usize);
            for i in 0..node.num_keys() {
                children.push(node.entry_child(i)?);
                keys.push(node.key_at(i)?);
            }
            Ok(NodeSummary::Internal {
                page_num,
                parent: node.parent(),
                is_root: node.is_root(),
                keys,
                children,
                right_child: node.right_child(),
            })
        }
    }
}

/// Renders the tree as an indented outline, one node per block:
///
/// ```text
/// - internal (size 1)
///   - leaf (size 7)
///     - 1
///   - key 7
///   - leaf (size 7)
///     - 8
/// ```
pub fn dump(pager: &mut Pager) -> Result<String> {
    let mut out = String::new();
    dump_node(pager, ROOT_PAGE_NUM, 0, &mut out)?;
    Ok(out)
}

fn dump_node(pager: &mut Pager, page_num: u32, level: usize, out: &mut String) -> Result<()> {
    use std::fmt::Write;

    match node_summary(pager, page_num)? {
        NodeSummary::Leaf { keys, .. } => {
            let _ = writeln!(out, "{}- leaf (size {})", "  ".repeat(level), keys.len());
            for key in keys {
                let _ = writeln!(out, "{}- {}", "  ".repeat(level + 1), key);
            }
        }
        NodeSummary::Internal {
            keys,
            children,
            right_child,
            ..
        } => {
            let _ = writeln!(out, "{}- internal (size {})", "  ".repeat(level), keys.len());
            for (child, key) in children.iter().zip(&keys) {
                dump_node(pager, *child, level + 1, out)?;
                let _ = writeln!(out, "{}- key {}", "  ".repeat(level + 1), key);
            }
            if right_child == INVALID_PAGE_NUM {
                bail!("dump reached an unwired right child on page {}", page_num);
            }
            dump_node(pager, right_child, level + 1, out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_pager() -> (tempfile::TempDir, Pager) {
        let dir = tempdir().unwrap();
        let mut pager = Pager::open(dir.path().join("test.db")).unwrap();
        let page = pager.get(ROOT_PAGE_NUM).unwrap();
        let mut root = LeafNodeMut::init(page).unwrap();
        root.set_root(true);
        (dir, pager)
    }

    fn insert(pager: &mut Pager, key: u32) {
        let row = Row::new(key, format!("user{}", key), format!("user{}@x.test", key)).unwrap();
        let cursor = find(pager, key).unwrap();
        leaf_insert(pager, &cursor, key, &row).unwrap();
    }

    fn all_keys(pager: &mut Pager) -> Vec<u32> {
        let mut keys = Vec::new();
        let mut cursor = Cursor::start_of_table(pager).unwrap();
        while !cursor.end_of_table {
            keys.push(cursor.row(pager).unwrap().id);
            cursor.advance(pager).unwrap();
        }
        keys
    }

    #[test]
    fn find_on_empty_root_returns_slot_zero() {
        let (_dir, mut pager) = open_pager();

        let cursor = find(&mut pager, 42).unwrap();
        assert_eq!(cursor.page_num, ROOT_PAGE_NUM);
        assert_eq!(cursor.cell_num, 0);
    }

    #[test]
    fn insert_and_find_single_key() {
        let (_dir, mut pager) = open_pager();

        insert(&mut pager, 5);

        let cursor = find(&mut pager, 5).unwrap();
        assert_eq!(cursor.row(&mut pager).unwrap().id, 5);
    }

    #[test]
    fn max_key_of_leaf_is_last_cell() {
        let (_dir, mut pager) = open_pager();

        for key in [3u32, 1, 2] {
            insert(&mut pager, key);
        }

        assert_eq!(node_max_key(&mut pager, ROOT_PAGE_NUM).unwrap(), 3);
    }

    #[test]
    fn leaf_split_creates_sibling_and_new_root() {
        let (_dir, mut pager) = open_pager();

        for key in 1..=(LEAF_NODE_MAX_CELLS as u32 + 1) {
            insert(&mut pager, key);
        }

        // Root became internal; both halves hang off page 0.
        let root = node_summary(&mut pager, ROOT_PAGE_NUM).unwrap();
        let NodeSummary::Internal {
            is_root,
            keys,
            children,
            right_child,
            ..
        } = root
        else {
            panic!("root should be internal after split");
        };
        assert!(is_root);
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0], LEAF_NODE_LEFT_SPLIT_COUNT as u32);

        let left = node_summary(&mut pager, children[0]).unwrap();
        let right = node_summary(&mut pager, right_child).unwrap();
        let NodeSummary::Leaf {
            keys: left_keys,
            next_leaf,
            parent: left_parent,
            ..
        } = left
        else {
            panic!("left child should be a leaf");
        };
        let NodeSummary::Leaf {
            keys: right_keys,
            next_leaf: right_next,
            parent: right_parent,
            ..
        } = right
        else {
            panic!("right child should be a leaf");
        };

        assert_eq!(left_keys.len(), LEAF_NODE_LEFT_SPLIT_COUNT);
        assert_eq!(right_keys.len(), LEAF_NODE_RIGHT_SPLIT_COUNT);
        assert_eq!(next_leaf, right_child);
        assert_eq!(right_next, 0);
        assert_eq!(left_parent, ROOT_PAGE_NUM);
        assert_eq!(right_parent, ROOT_PAGE_NUM);

        assert_eq!(all_keys(&mut pager), (1..=14).collect::<Vec<_>>());
    }

    #[test]
    fn out_of_order_inserts_stay_sorted_across_splits() {
        let (_dir, mut pager) = open_pager();

        let keys = [
            18u32, 7, 10, 29, 23, 4, 14, 30, 15, 26, 22, 19, 2, 1, 21, 11, 6, 20, 5, 8, 9, 3, 12,
            27, 17, 16, 13, 24, 25, 28, 31,
        ];
        for key in keys {
            insert(&mut pager, key);
        }

        assert_eq!(all_keys(&mut pager), (1..=31).collect::<Vec<_>>());
    }

    #[test]
    fn internal_split_keeps_parent_pointers_consistent() {
        let (_dir, mut pager) = open_pager();

        // Enough ascending keys to split the root leaf, fill the internal
        // root past three keys, and force an internal split.
        for key in 1..=70u32 {
            insert(&mut pager, key);
        }

        let root = node_summary(&mut pager, ROOT_PAGE_NUM).unwrap();
        let NodeSummary::Internal {
            keys,
            children,
            right_child,
            ..
        } = root
        else {
            panic!("root should be internal");
        };
        assert!(keys.len() <= INTERNAL_NODE_MAX_KEYS);

        for child in children.iter().chain([&right_child]) {
            match node_summary(&mut pager, *child).unwrap() {
                NodeSummary::Internal {
                    parent,
                    children: grandchildren,
                    right_child: grand_right,
                    ..
                } => {
                    assert_eq!(parent, ROOT_PAGE_NUM);
                    for grandchild in grandchildren.iter().chain([&grand_right]) {
                        let summary = node_summary(&mut pager, *grandchild).unwrap();
                        let NodeSummary::Leaf {
                            parent: leaf_parent,
                            ..
                        } = summary
                        else {
                            panic!("grandchild should be a leaf");
                        };
                        assert_eq!(leaf_parent, *child);
                    }
                }
                NodeSummary::Leaf { parent, .. } => assert_eq!(parent, ROOT_PAGE_NUM),
            }
        }

        assert_eq!(all_keys(&mut pager), (1..=70).collect::<Vec<_>>());
    }

    #[test]
    fn dump_renders_internal_root_outline() {
        let (_dir, mut pager) = open_pager();

        for key in 1..=14u32 {
            insert(&mut pager, key);
        }

        let output = dump(&mut pager).unwrap();
        assert!(output.starts_with("- internal (size 1)"));
        assert!(output.contains("- leaf (size 7)"));
        assert!(output.contains("- key 7"));
    }
}
