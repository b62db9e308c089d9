//! # Leaf Node Views
//!
//! Leaf nodes hold the table's rows as a packed array of fixed-size cells,
//! sorted ascending by key, plus a sibling link for ordered scans.
//!
//! ## Page Layout
//!
//! ```text
//! +-------------------------------+
//! | LeafHeader (14 bytes)         |  type / root flag / parent /
//! |                               |  num_cells / next_leaf
//! +-------------------------------+
//! | Cell 0: key (4) | row (293)   |
//! | Cell 1: key (4) | row (293)   |
//! | ...                           |
//! | Cell 12                       |  LEAF_NODE_MAX_CELLS = 13
//! +-------------------------------+
//! | 221 unused bytes              |
//! +-------------------------------+
//! ```
//!
//! The views borrow a page buffer for the scope of one operation:
//! [`LeafNode`] for reads, [`LeafNodeMut`] for in-place mutation. Neither
//! view performs I/O or crosses pages; multi-page operations (splits) live
//! in [`crate::btree::tree`].

use eyre::{ensure, Result};

use crate::config::constants::{
    LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_KEY_SIZE, LEAF_NODE_MAX_CELLS,
    PAGE_SIZE, ROW_SIZE,
};
use crate::storage::{LeafHeader, NodeType};

/// Result of a key search within one leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchResult {
    /// The key exists at this cell index.
    Found(u32),
    /// The key is absent; this is the index it would be inserted at
    /// (may equal `num_cells`).
    NotFound(u32),
}

impl SearchResult {
    /// The cell index regardless of whether the key was found. This is the
    /// cursor position the tree search returns.
    pub fn cell_num(self) -> u32 {
        match self {
            SearchResult::Found(i) | SearchResult::NotFound(i) => i,
        }
    }
}

#[derive(Debug)]
pub struct LeafNode<'a> {
    data: &'a [u8],
}

pub struct LeafNodeMut<'a> {
    data: &'a mut [u8],
}

fn cell_offset(index: usize) -> usize {
    LEAF_NODE_HEADER_SIZE + index * LEAF_NODE_CELL_SIZE
}

fn check_leaf(data: &[u8]) -> Result<()> {
    ensure!(
        data.len() == PAGE_SIZE,
        "invalid page size: {} != {}",
        data.len(),
        PAGE_SIZE
    );
    let header = LeafHeader::from_bytes(data)?;
    let node_type = NodeType::from_byte(data[0])?;
    ensure!(
        node_type == NodeType::Leaf,
        "expected leaf page, got {:?}",
        node_type
    );
    ensure!(
        header.num_cells() as usize <= LEAF_NODE_MAX_CELLS,
        "leaf cell count {} exceeds maximum {}",
        header.num_cells(),
        LEAF_NODE_MAX_CELLS
    );
    Ok(())
}

impl<'a> LeafNode<'a> {
    pub fn from_page(data: &'a [u8]) -> Result<Self> {
        check_leaf(data)?;
        Ok(Self { data })
    }

    fn header(&self) -> &LeafHeader {
        // INVARIANT: length and layout validated in from_page
        LeafHeader::from_bytes(self.data).expect("leaf header validated at construction")
    }

    pub fn num_cells(&self) -> u32 {
        self.header().num_cells()
    }

    pub fn next_leaf(&self) -> u32 {
        self.header().next_leaf()
    }

    pub fn parent(&self) -> u32 {
        self.header().parent()
    }

    pub fn is_root(&self) -> bool {
        self.header().is_root()
    }

    pub fn key_at(&self, index: u32) -> Result<u32> {
        ensure!(
            index < self.num_cells(),
            "cell index {} out of bounds (num_cells={})",
            index,
            self.num_cells()
        );
        let offset = cell_offset(index as usize);
        let mut key = [0u8; LEAF_NODE_KEY_SIZE];
        key.copy_from_slice(&self.data[offset..offset + LEAF_NODE_KEY_SIZE]);
        Ok(u32::from_le_bytes(key))
    }

    /// The serialized row bytes of the cell at `index`.
    pub fn value_at(&self, index: u32) -> Result<&'a [u8]> {
        ensure!(
            index < self.num_cells(),
            "cell index {} out of bounds (num_cells={})",
            index,
            self.num_cells()
        );
        let offset = cell_offset(index as usize) + LEAF_NODE_KEY_SIZE;
        Ok(&self.data[offset..offset + ROW_SIZE])
    }

    /// The whole cell (key + row) at `index`, for redistribution copies.
    pub fn cell_at(&self, index: u32) -> Result<&'a [u8]> {
        ensure!(
            index < self.num_cells(),
            "cell index {} out of bounds (num_cells={})",
            index,
            self.num_cells()
        );
        let offset = cell_offset(index as usize);
        Ok(&self.data[offset..offset + LEAF_NODE_CELL_SIZE])
    }

    /// Binary search for `key`. A miss positions at the first cell whose key
    /// is greater, i.e. the insertion slot.
    pub fn find(&self, key: u32) -> Result<SearchResult> {
        let mut min_index = 0u32;
        let mut one_past_max_index = self.num_cells();

        while min_index != one_past_max_index {
            let mid = (min_index + one_past_max_index) / 2;
            let key_at_mid = self.key_at(mid)?;
            if key_at_mid == key {
                return Ok(SearchResult::Found(mid));
            }
            if key < key_at_mid {
                one_past_max_index = mid;
            } else {
                min_index = mid + 1;
            }
        }

        Ok(SearchResult::NotFound(min_index))
    }
}

impl<'a> LeafNodeMut<'a> {
    pub fn from_page(data: &'a mut [u8]) -> Result<Self> {
        check_leaf(data)?;
        Ok(Self { data })
    }

    /// Formats the page as an empty leaf: no cells, no sibling, parent 0,
    /// not root.
    pub fn init(data: &'a mut [u8]) -> Result<Self> {
        ensure!(
            data.len() == PAGE_SIZE,
            "invalid page size: {} != {}",
            data.len(),
            PAGE_SIZE
        );
        LeafHeader::from_bytes_mut(data)?.init();
        Ok(Self { data })
    }

    pub fn as_ref(&self) -> LeafNode<'_> {
        LeafNode { data: self.data }
    }

    fn header(&self) -> &LeafHeader {
        // INVARIANT: length and layout validated in from_page/init
        LeafHeader::from_bytes(self.data).expect("leaf header validated at construction")
    }

    fn header_mut(&mut self) -> &mut LeafHeader {
        LeafHeader::from_bytes_mut(self.data).expect("leaf header validated at construction")
    }

    pub fn num_cells(&self) -> u32 {
        self.header().num_cells()
    }

    pub fn set_num_cells(&mut self, count: u32) {
        self.header_mut().set_num_cells(count);
    }

    pub fn next_leaf(&self) -> u32 {
        self.header().next_leaf()
    }

    pub fn set_next_leaf(&mut self, page_num: u32) {
        self.header_mut().set_next_leaf(page_num);
    }

    pub fn parent(&self) -> u32 {
        self.header().parent()
    }

    pub fn set_parent(&mut self, page_num: u32) {
        self.header_mut().set_parent(page_num);
    }

    pub fn is_root(&self) -> bool {
        self.header().is_root()
    }

    pub fn set_root(&mut self, is_root: bool) {
        self.header_mut().set_root(is_root);
    }

    pub fn key_at(&self, index: u32) -> Result<u32> {
        self.as_ref().key_at(index)
    }

    pub fn find(&self, key: u32) -> Result<SearchResult> {
        self.as_ref().find(key)
    }

    /// Mutable view of the row bytes at `index`, for in-place update.
    pub fn value_at_mut(&mut self, index: u32) -> Result<&mut [u8]> {
        ensure!(
            index < self.num_cells(),
            "cell index {} out of bounds (num_cells={})",
            index,
            self.num_cells()
        );
        let offset = cell_offset(index as usize) + LEAF_NODE_KEY_SIZE;
        Ok(&mut self.data[offset..offset + ROW_SIZE])
    }

    /// Inserts a cell at `pos`, shifting cells `[pos, num_cells)` right by
    /// one. The leaf must not be full; splitting is the tree's job.
    pub fn insert_cell(&mut self, pos: u32, key: u32, row: &[u8]) -> Result<()> {
        let num_cells = self.num_cells();
        ensure!(
            (num_cells as usize) < LEAF_NODE_MAX_CELLS,
            "leaf is full ({} cells)",
            num_cells
        );
        ensure!(
            pos <= num_cells,
            "insert position {} out of bounds (num_cells={})",
            pos,
            num_cells
        );

        for i in (pos..num_cells).rev() {
            let src = cell_offset(i as usize);
            let dst = cell_offset(i as usize + 1);
            self.data.copy_within(src..src + LEAF_NODE_CELL_SIZE, dst);
        }

        self.set_num_cells(num_cells + 1);
        self.write_cell(pos, key, row)
    }

    /// Overwrites the cell slot at `index` without touching the count. Used
    /// by split redistribution, which fixes the counts afterwards.
    pub fn write_cell(&mut self, index: u32, key: u32, row: &[u8]) -> Result<()> {
        ensure!(
            (index as usize) < LEAF_NODE_MAX_CELLS,
            "cell slot {} beyond leaf capacity {}",
            index,
            LEAF_NODE_MAX_CELLS
        );
        ensure!(row.len() == ROW_SIZE, "row must be {} bytes", ROW_SIZE);

        let offset = cell_offset(index as usize);
        self.data[offset..offset + LEAF_NODE_KEY_SIZE].copy_from_slice(&key.to_le_bytes());
        self.data[offset + LEAF_NODE_KEY_SIZE..offset + LEAF_NODE_CELL_SIZE].copy_from_slice(row);
        Ok(())
    }

    /// Copies a whole serialized cell into slot `index`. Counterpart of
    /// [`LeafNode::cell_at`] for split redistribution.
    pub fn copy_cell(&mut self, index: u32, cell: &[u8]) -> Result<()> {
        ensure!(
            (index as usize) < LEAF_NODE_MAX_CELLS,
            "cell slot {} beyond leaf capacity {}",
            index,
            LEAF_NODE_MAX_CELLS
        );
        ensure!(
            cell.len() == LEAF_NODE_CELL_SIZE,
            "cell must be {} bytes",
            LEAF_NODE_CELL_SIZE
        );

        let offset = cell_offset(index as usize);
        self.data[offset..offset + LEAF_NODE_CELL_SIZE].copy_from_slice(cell);
        Ok(())
    }

    /// Removes the cell at `pos`, shifting cells `[pos + 1, num_cells)` left
    /// by one and decrementing the count. The page is never reclaimed.
    pub fn remove_cell(&mut self, pos: u32) -> Result<()> {
        let num_cells = self.num_cells();
        ensure!(
            pos < num_cells,
            "remove position {} out of bounds (num_cells={})",
            pos,
            num_cells
        );

        for i in pos..num_cells - 1 {
            let src = cell_offset(i as usize + 1);
            let dst = cell_offset(i as usize);
            self.data.copy_within(src..src + LEAF_NODE_CELL_SIZE, dst);
        }

        self.set_num_cells(num_cells - 1);
        Ok(())
    }
}
