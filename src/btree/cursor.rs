//! # Cursor
//!
//! A cursor is a position inside the tree: a leaf page plus a cell index,
//! possibly one past the last cell. Scans open a cursor at the start of the
//! table and advance it cell by cell, hopping leaf-to-leaf through the
//! sibling links; the tree's fill state never matters, only the chain.
//!
//! Cursors hold no locks and borrow nothing: each access re-borrows the
//! page from the pager for just that call. The caller owns the cursor and
//! drops it after use.

use eyre::Result;

use super::leaf::LeafNode;
use super::tree;
use crate::row::Row;
use crate::storage::Pager;

#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub page_num: u32,
    pub cell_num: u32,
    /// One past the last row of the table.
    pub end_of_table: bool,
}

impl Cursor {
    /// Positions at the first row of the table: a search for key 0 lands on
    /// the leftmost leaf, and the cursor settles on the first filled cell
    /// along the chain. The table is empty iff no leaf holds a cell.
    pub fn start_of_table(pager: &mut Pager) -> Result<Self> {
        let mut cursor = tree::find(pager, 0)?;
        cursor.settle(pager)?;
        Ok(cursor)
    }

    /// Deserializes the row under the cursor.
    pub fn row(&self, pager: &mut Pager) -> Result<Row> {
        let page = pager.get(self.page_num)?;
        let leaf = LeafNode::from_page(page)?;
        Row::deserialize(leaf.value_at(self.cell_num)?)
    }

    /// Moves to the next cell, following sibling links at the end of a
    /// leaf. A sibling link of 0 marks the rightmost leaf and ends the scan.
    pub fn advance(&mut self, pager: &mut Pager) -> Result<()> {
        self.cell_num += 1;
        self.settle(pager)
    }

    /// Walks the sibling chain until the cursor rests on a filled cell or
    /// the chain ends. Deletes can leave wholly empty leaves behind; they
    /// are skipped here so a scan only ever yields real rows.
    fn settle(&mut self, pager: &mut Pager) -> Result<()> {
        loop {
            let page = pager.get(self.page_num)?;
            let leaf = LeafNode::from_page(page)?;

            if self.cell_num < leaf.num_cells() {
                return Ok(());
            }

            let next_page_num = leaf.next_leaf();
            if next_page_num == 0 {
                self.end_of_table = true;
                return Ok(());
            }
            self.page_num = next_page_num;
            self.cell_num = 0;
        }
    }
}
