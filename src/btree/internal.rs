//! # Internal Node Views
//!
//! Internal nodes hold no rows. Each stores up to [`INTERNAL_NODE_MAX_KEYS`]
//! packed `(child, key)` entries plus one distinguished right child, so a
//! node with k keys has k + 1 children.
//!
//! ## Page Layout
//!
//! ```text
//! +------------------------------------+
//! | InternalHeader (14 bytes)          |  type / root flag / parent /
//! |                                    |  num_keys / right_child
//! +------------------------------------+
//! | Entry 0: child (4) | key (4)       |
//! | Entry 1: child (4) | key (4)       |
//! | Entry 2: child (4) | key (4)       |
//! +------------------------------------+
//! ```
//!
//! ## Navigation Law
//!
//! Every key is the maximum key of its left child's subtree. For a search
//! key K, the target child index is the smallest i with K <= key[i]; if K
//! exceeds every key, the right child is taken.
//!
//! During a split the right child slot may transiently hold
//! [`INVALID_PAGE_NUM`]; [`InternalNode::child_at`] refuses to hand out the
//! sentinel, which turns a navigation into a half-wired node into a hard
//! error instead of a wild page access.

use eyre::{bail, ensure, Result};

use crate::config::constants::{
    INTERNAL_NODE_CHILD_SIZE, INTERNAL_NODE_ENTRY_SIZE, INTERNAL_NODE_HEADER_SIZE,
    INTERNAL_NODE_MAX_KEYS, INVALID_PAGE_NUM, PAGE_SIZE,
};
use crate::storage::{InternalHeader, NodeType};

#[derive(Debug)]
pub struct InternalNode<'a> {
    data: &'a [u8],
}

pub struct InternalNodeMut<'a> {
    data: &'a mut [u8],
}

fn entry_offset(index: usize) -> usize {
    INTERNAL_NODE_HEADER_SIZE + index * INTERNAL_NODE_ENTRY_SIZE
}

fn check_internal(data: &[u8]) -> Result<()> {
    ensure!(
        data.len() == PAGE_SIZE,
        "invalid page size: {} != {}",
        data.len(),
        PAGE_SIZE
    );
    let node_type = NodeType::from_byte(data[0])?;
    ensure!(
        node_type == NodeType::Internal,
        "expected internal page, got {:?}",
        node_type
    );
    let header = InternalHeader::from_bytes(data)?;
    ensure!(
        header.num_keys() as usize <= INTERNAL_NODE_MAX_KEYS,
        "internal key count {} exceeds maximum {}",
        header.num_keys(),
        INTERNAL_NODE_MAX_KEYS
    );
    Ok(())
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(buf)
}

impl<'a> InternalNode<'a> {
    pub fn from_page(data: &'a [u8]) -> Result<Self> {
        check_internal(data)?;
        Ok(Self { data })
    }

    fn header(&self) -> &InternalHeader {
        // INVARIANT: length and layout validated in from_page
        InternalHeader::from_bytes(self.data).expect("internal header validated at construction")
    }

    pub fn num_keys(&self) -> u32 {
        self.header().num_keys()
    }

    pub fn right_child(&self) -> u32 {
        self.header().right_child()
    }

    pub fn parent(&self) -> u32 {
        self.header().parent()
    }

    pub fn is_root(&self) -> bool {
        self.header().is_root()
    }

    pub fn key_at(&self, index: u32) -> Result<u32> {
        ensure!(
            index < self.num_keys(),
            "key index {} out of bounds (num_keys={})",
            index,
            self.num_keys()
        );
        Ok(read_u32(
            self.data,
            entry_offset(index as usize) + INTERNAL_NODE_CHILD_SIZE,
        ))
    }

    /// The positional child stored in entry `index`, without sentinel
    /// screening. Split redistribution reads half-wired nodes through this.
    pub fn entry_child(&self, index: u32) -> Result<u32> {
        ensure!(
            index < self.num_keys(),
            "entry index {} out of bounds (num_keys={})",
            index,
            self.num_keys()
        );
        Ok(read_u32(self.data, entry_offset(index as usize)))
    }

    /// The child page for logical child position `index` (0..=num_keys,
    /// where num_keys selects the right child). Refuses the invalid-page
    /// sentinel: navigating into an unwired slot is corruption.
    pub fn child_at(&self, index: u32) -> Result<u32> {
        let num_keys = self.num_keys();
        if index > num_keys {
            bail!(
                "tried to access child {} of node with {} keys",
                index,
                num_keys
            );
        }

        let page_num = if index == num_keys {
            self.right_child()
        } else {
            self.entry_child(index)?
        };

        ensure!(
            page_num != INVALID_PAGE_NUM,
            "tried to access child {} of node, but it is an invalid page",
            index
        );
        Ok(page_num)
    }

    /// Binary search for the child position of `key`: the smallest index i
    /// with key <= key[i], or num_keys (the right child) when `key` exceeds
    /// every key.
    pub fn find_child_index(&self, key: u32) -> Result<u32> {
        let mut min_index = 0u32;
        let mut max_index = self.num_keys();

        while min_index != max_index {
            let index = (min_index + max_index) / 2;
            let key_at_index = self.key_at(index)?;
            if key <= key_at_index {
                max_index = index;
            } else {
                min_index = index + 1;
            }
        }

        Ok(min_index)
    }
}

impl<'a> InternalNodeMut<'a> {
    pub fn from_page(data: &'a mut [u8]) -> Result<Self> {
        check_internal(data)?;
        Ok(Self { data })
    }

    /// Formats the page as an empty internal node. The right child starts as
    /// the invalid-page sentinel: page 0 is the root, so leaving a zero here
    /// would silently make this node a parent of the root.
    pub fn init(data: &'a mut [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );
        InternalHeader::from_bytes_mut(data)?.init(INVALID_PAGE_NUM);
        Ok(Self { data })
    }

    pub fn as_ref(&self) -> InternalNode<'_> {
        InternalNode { data: self.data }
    }

    fn header_mut(&mut self) -> &mut InternalHeader {
        InternalHeader::from_bytes_mut(self.data).expect("internal header validated at construction")
    }

    pub fn num_keys(&self) -> u32 {
        self.as_ref().num_keys()
    }

    pub fn set_num_keys(&mut self, count: u32) {
        self.header_mut().set_num_keys(count);
    }

    pub fn right_child(&self) -> u32 {
        self.as_ref().right_child()
    }

    pub fn set_right_child(&mut self, page_num: u32) {
        self.header_mut().set_right_child(page_num);
    }

    pub fn parent(&self) -> u32 {
        self.as_ref().parent()
    }

    pub fn set_parent(&mut self, page_num: u32) {
        self.header_mut().set_parent(page_num);
    }

    pub fn set_root(&mut self, is_root: bool) {
        self.header_mut().set_root(is_root);
    }

    pub fn key_at(&self, index: u32) -> Result<u32> {
        self.as_ref().key_at(index)
    }

    pub fn entry_child(&self, index: u32) -> Result<u32> {
        self.as_ref().entry_child(index)
    }

    pub fn child_at(&self, index: u32) -> Result<u32> {
        self.as_ref().child_at(index)
    }

    pub fn find_child_index(&self, key: u32) -> Result<u32> {
        self.as_ref().find_child_index(key)
    }

    /// Reads entry `index` as a (child, key) pair.
    pub fn entry_at(&self, index: u32) -> Result<(u32, u32)> {
        Ok((self.entry_child(index)?, self.key_at(index)?))
    }

    /// Overwrites entry `index`. The count must already cover the slot;
    /// callers grow `num_keys` before writing into the new last position.
    pub fn set_entry(&mut self, index: u32, child: u32, key: u32) -> Result<()> {
        ensure!(
            index < self.num_keys(),
            "entry index {} out of bounds (num_keys={})",
            index,
            self.num_keys()
        );
        let offset = entry_offset(index as usize);
        self.data[offset..offset + 4].copy_from_slice(&child.to_le_bytes());
        self.data[offset + 4..offset + 8].copy_from_slice(&key.to_le_bytes());
        Ok(())
    }

    /// Replaces the key that currently routes `old_key` with `new_key`,
    /// keeping the internal-key law intact after a child's max key changes.
    /// When `old_key` routed to the right child there is no key to rewrite.
    pub fn update_key(&mut self, old_key: u32, new_key: u32) -> Result<()> {
        let index = self.find_child_index(old_key)?;
        if index < self.num_keys() {
            let child = self.entry_child(index)?;
            self.set_entry(index, child, new_key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_page() -> Vec<u8> {
        vec![0u8; PAGE_SIZE]
    }

    fn node_with_entries(page: &mut [u8], entries: &[(u32, u32)], right_child: u32) {
        let mut node = InternalNodeMut::init(page).unwrap();
        node.set_num_keys(entries.len() as u32);
        for (i, (child, key)) in entries.iter().enumerate() {
            node.set_entry(i as u32, *child, *key).unwrap();
        }
        node.set_right_child(right_child);
    }

    #[test]
    fn init_sets_sentinel_right_child() {
        let mut page = make_page();
        let node = InternalNodeMut::init(&mut page).unwrap();

        assert_eq!(node.num_keys(), 0);
        assert_eq!(node.right_child(), INVALID_PAGE_NUM);
    }

    #[test]
    fn from_page_rejects_leaf_node() {
        let mut page = make_page();
        page[0] = NodeType::Leaf as u8;

        let result = InternalNode::from_page(&page);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("expected internal"));
    }

    #[test]
    fn find_child_index_follows_navigation_law() {
        let mut page = make_page();
        node_with_entries(&mut page, &[(2, 10), (3, 20), (4, 30)], 5);
        let node = InternalNode::from_page(&page).unwrap();

        assert_eq!(node.find_child_index(5).unwrap(), 0);
        assert_eq!(node.find_child_index(10).unwrap(), 0);
        assert_eq!(node.find_child_index(11).unwrap(), 1);
        assert_eq!(node.find_child_index(30).unwrap(), 2);
        assert_eq!(node.find_child_index(31).unwrap(), 3);
    }

    #[test]
    fn child_at_resolves_positional_and_right_children() {
        let mut page = make_page();
        node_with_entries(&mut page, &[(2, 10), (3, 20)], 9);
        let node = InternalNode::from_page(&page).unwrap();

        assert_eq!(node.child_at(0).unwrap(), 2);
        assert_eq!(node.child_at(1).unwrap(), 3);
        assert_eq!(node.child_at(2).unwrap(), 9);
    }

    #[test]
    fn child_at_rejects_out_of_range_index() {
        let mut page = make_page();
        node_with_entries(&mut page, &[(2, 10)], 9);
        let node = InternalNode::from_page(&page).unwrap();

        assert!(node.child_at(5).is_err());
    }

    #[test]
    fn child_at_rejects_invalid_page_sentinel() {
        let mut page = make_page();
        let mut node = InternalNodeMut::init(&mut page).unwrap();
        node.set_num_keys(0);

        let result = node.child_at(0);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("invalid page"));
    }

    #[test]
    fn update_key_rewrites_routing_slot() {
        let mut page = make_page();
        node_with_entries(&mut page, &[(2, 10), (3, 20)], 9);
        let mut node = InternalNodeMut::from_page(&mut page).unwrap();

        node.update_key(10, 15).unwrap();

        assert_eq!(node.key_at(0).unwrap(), 15);
        assert_eq!(node.key_at(1).unwrap(), 20);
    }

    #[test]
    fn update_key_for_right_child_is_a_no_op() {
        let mut page = make_page();
        node_with_entries(&mut page, &[(2, 10)], 9);
        let mut node = InternalNodeMut::from_page(&mut page).unwrap();

        // 50 routes to the right child, which carries no key.
        node.update_key(50, 60).unwrap();

        assert_eq!(node.num_keys(), 1);
        assert_eq!(node.key_at(0).unwrap(), 10);
    }

    #[test]
    fn corrupt_key_count_is_rejected() {
        let mut page = make_page();
        InternalNodeMut::init(&mut page).unwrap();
        {
            let header = InternalHeader::from_bytes_mut(&mut page).unwrap();
            header.set_num_keys(INTERNAL_NODE_MAX_KEYS as u32 + 1);
        }

        assert!(InternalNode::from_page(&page).is_err());
    }
}
