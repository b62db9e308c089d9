//! # Node Headers and Page Layout
//!
//! This module defines the byte-exact header layout shared by every page.
//! Each 4096-byte page is one B+ tree node, and every node starts with a
//! 6-byte common header:
//!
//! ```text
//! Offset  Size  Field        Description
//! ------  ----  -----------  ----------------------------------------
//! 0       1     node_type    0 = internal, 1 = leaf
//! 1       1     is_root      boolean (0 or 1)
//! 2       4     parent       parent page number; 0 for the root
//! ```
//!
//! Leaf nodes extend the common header with:
//!
//! ```text
//! 6       4     num_cells    number of (key, row) cells in the body
//! 10      4     next_leaf    right sibling page number; 0 = none
//! ```
//!
//! Internal nodes extend it with:
//!
//! ```text
//! 6       4     num_keys     number of (child, key) entries in the body
//! 10      4     right_child  distinguished rightmost child; may hold the
//!                            invalid-page sentinel mid-split
//! ```
//!
//! All multi-byte fields are little-endian u32. The headers are `zerocopy`
//! structs transmuted directly from page bytes; the `Unaligned` wrapper
//! types are required because the 4-byte fields sit at offset 2.
//!
//! These layouts are the wire format: the file is re-opened across runs and
//! interpreted byte-for-byte.

use eyre::{bail, ensure, Result};
use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

use crate::config::constants::{
    COMMON_NODE_HEADER_SIZE, INTERNAL_NODE_HEADER_SIZE, LEAF_NODE_HEADER_SIZE, PAGE_SIZE,
};

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Internal = 0,
    Leaf = 1,
}

impl NodeType {
    pub fn from_byte(b: u8) -> Result<Self> {
        match b {
            0 => Ok(NodeType::Internal),
            1 => Ok(NodeType::Leaf),
            other => bail!("invalid node type byte {:#04x}", other),
        }
    }
}

/// Reads the node type of a page without committing to a leaf or internal
/// view. Used by tree descent to decide how to interpret the page.
pub fn node_type(page: &[u8]) -> Result<NodeType> {
    ensure!(!page.is_empty(), "empty page buffer");
    NodeType::from_byte(page[0])
}

/// Common 6-byte prefix of every node header.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct NodeHeader {
    node_type: u8,
    is_root: u8,
    parent: U32<LittleEndian>,
}

/// Full 14-byte leaf node header.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct LeafHeader {
    node_type: u8,
    is_root: u8,
    parent: U32<LittleEndian>,
    num_cells: U32<LittleEndian>,
    next_leaf: U32<LittleEndian>,
}

/// Full 14-byte internal node header.
#[repr(C)]
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned)]
pub struct InternalHeader {
    node_type: u8,
    is_root: u8,
    parent: U32<LittleEndian>,
    num_keys: U32<LittleEndian>,
    right_child: U32<LittleEndian>,
}

const _: () = assert!(size_of::<NodeHeader>() == COMMON_NODE_HEADER_SIZE);
const _: () = assert!(size_of::<LeafHeader>() == LEAF_NODE_HEADER_SIZE);
const _: () = assert!(size_of::<InternalHeader>() == INTERNAL_NODE_HEADER_SIZE);

fn check_len(len: usize, what: &str, need: usize) -> Result<()> {
    ensure!(
        len >= need,
        "buffer too small for {}: {} < {}",
        what,
        len,
        need
    );
    Ok(())
}

impl NodeHeader {
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        check_len(data.len(), "NodeHeader", size_of::<Self>())?;
        Self::ref_from_bytes(&data[..size_of::<Self>()])
            .map_err(|e| eyre::eyre!("failed to read NodeHeader: {:?}", e))
    }

    pub fn from_bytes_mut(data: &mut [u8]) -> Result<&mut Self> {
        check_len(data.len(), "NodeHeader", size_of::<Self>())?;
        Self::mut_from_bytes(&mut data[..size_of::<Self>()])
            .map_err(|e| eyre::eyre!("failed to read NodeHeader: {:?}", e))
    }

    pub fn node_type(&self) -> Result<NodeType> {
        NodeType::from_byte(self.node_type)
    }

    pub fn is_root(&self) -> bool {
        self.is_root != 0
    }

    pub fn set_root(&mut self, is_root: bool) {
        self.is_root = is_root as u8;
    }

    pub fn parent(&self) -> u32 {
        self.parent.get()
    }

    pub fn set_parent(&mut self, page_num: u32) {
        self.parent = U32::new(page_num);
    }
}

impl LeafHeader {
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        check_len(data.len(), "LeafHeader", size_of::<Self>())?;
        Self::ref_from_bytes(&data[..size_of::<Self>()])
            .map_err(|e| eyre::eyre!("failed to read LeafHeader: {:?}", e))
    }

    pub fn from_bytes_mut(data: &mut [u8]) -> Result<&mut Self> {
        check_len(data.len(), "LeafHeader", size_of::<Self>())?;
        Self::mut_from_bytes(&mut data[..size_of::<Self>()])
            .map_err(|e| eyre::eyre!("failed to read LeafHeader: {:?}", e))
    }

    pub fn init(&mut self) {
        self.node_type = NodeType::Leaf as u8;
        self.is_root = 0;
        self.parent = U32::new(0);
        self.num_cells = U32::new(0);
        self.next_leaf = U32::new(0);
    }

    pub fn is_root(&self) -> bool {
        self.is_root != 0
    }

    pub fn set_root(&mut self, is_root: bool) {
        self.is_root = is_root as u8;
    }

    pub fn parent(&self) -> u32 {
        self.parent.get()
    }

    pub fn set_parent(&mut self, page_num: u32) {
        self.parent = U32::new(page_num);
    }

    pub fn num_cells(&self) -> u32 {
        self.num_cells.get()
    }

    pub fn set_num_cells(&mut self, count: u32) {
        self.num_cells = U32::new(count);
    }

    pub fn next_leaf(&self) -> u32 {
        self.next_leaf.get()
    }

    pub fn set_next_leaf(&mut self, page_num: u32) {
        self.next_leaf = U32::new(page_num);
    }
}

impl InternalHeader {
    pub fn from_bytes(data: &[u8]) -> Result<&Self> {
        check_len(data.len(), "InternalHeader", size_of::<Self>())?;
        Self::ref_from_bytes(&data[..size_of::<Self>()])
            .map_err(|e| eyre::eyre!("failed to read InternalHeader: {:?}", e))
    }

    pub fn from_bytes_mut(data: &mut [u8]) -> Result<&mut Self> {
        check_len(data.len(), "InternalHeader", size_of::<Self>())?;
        Self::mut_from_bytes(&mut data[..size_of::<Self>()])
            .map_err(|e| eyre::eyre!("failed to read InternalHeader: {:?}", e))
    }

    pub fn init(&mut self, right_child: u32) {
        self.node_type = NodeType::Internal as u8;
        self.is_root = 0;
        self.parent = U32::new(0);
        self.num_keys = U32::new(0);
        self.right_child = U32::new(right_child);
    }

    pub fn is_root(&self) -> bool {
        self.is_root != 0
    }

    pub fn set_root(&mut self, is_root: bool) {
        self.is_root = is_root as u8;
    }

    pub fn parent(&self) -> u32 {
        self.parent.get()
    }

    pub fn set_parent(&mut self, page_num: u32) {
        self.parent = U32::new(page_num);
    }

    pub fn num_keys(&self) -> u32 {
        self.num_keys.get()
    }

    pub fn set_num_keys(&mut self, count: u32) {
        self.num_keys = U32::new(count);
    }

    pub fn right_child(&self) -> u32 {
        self.right_child.get()
    }

    pub fn set_right_child(&mut self, page_num: u32) {
        self.right_child = U32::new(page_num);
    }
}

/// Validates that a page is a plausible node: correct length and a known
/// node type. A fully zeroed page is also accepted (freshly allocated,
/// not yet initialized).
pub fn validate_page(data: &[u8]) -> Result<()> {
    ensure!(
        data.len() == PAGE_SIZE,
        "invalid page size: {} != {}",
        data.len(),
        PAGE_SIZE
    );
    NodeType::from_byte(data[0])?;
    ensure!(
        data[1] <= 1,
        "invalid is_root byte {:#04x}",
        data[1]
    );
    Ok(())
}
