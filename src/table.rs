//! # Table Driver
//!
//! [`Table`] is the public face of the engine: it owns the pager, bootstraps
//! an empty database on first open, and orchestrates the cursor and node
//! operations behind the four table operations (insert, update, delete,
//! scan).
//!
//! Recoverable outcomes — duplicate key, row not found, table full — are
//! typed results, never errors. `eyre` errors coming out of these methods
//! mean corruption or I/O failure and are fatal to the caller.
//!
//! Durability is write-on-close: [`Table::close`] flushes every cached page
//! and syncs the file. Dropping a table without closing it discards all
//! mutations made since open.

use std::path::Path;

use eyre::{ensure, Result};
use tracing::{debug, info};

use crate::btree::tree::{self, ROOT_PAGE_NUM};
use crate::btree::{Cursor, LeafNode, LeafNodeMut, NodeSummary};
use crate::config::constants::{
    EMAIL_SIZE, LEAF_NODE_MAX_CELLS, ROW_SIZE, TABLE_MAX_PAGES, USERNAME_OFFSET, USERNAME_SIZE,
};
use crate::row::Row;
use crate::storage::Pager;

/// Result of a point insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row with this id already exists; the tree is unchanged.
    DuplicateKey,
    /// The target leaf is full and the table is at its page limit.
    TableFull,
}

/// Result of a point update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
}

/// Result of a point delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

#[derive(Debug)]
pub struct Table {
    pager: Pager,
    root_page_num: u32,
}

impl Table {
    /// Opens or creates the database at `path`. A brand-new file gets page 0
    /// initialized as an empty leaf root.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut pager = Pager::open(path)?;

        if pager.num_pages() == 0 {
            let page = pager.get(ROOT_PAGE_NUM)?;
            let mut root = LeafNodeMut::init(page)?;
            root.set_root(true);
            debug!("initialized empty database");
        }

        info!(path = %path.display(), "database opened");
        Ok(Self {
            pager,
            root_page_num: ROOT_PAGE_NUM,
        })
    }

    /// Flushes all cached pages and syncs the file. Required for any
    /// mutation to survive the process.
    pub fn close(&mut self) -> Result<()> {
        self.pager.close()?;
        info!("database closed");
        Ok(())
    }

    /// Inserts a row keyed by its id.
    pub fn insert(&mut self, row: &Row) -> Result<InsertOutcome> {
        let key = row.id;
        let cursor = tree::find(&mut self.pager, key)?;

        let (num_cells, key_at_cursor) = {
            let page = self.pager.get(cursor.page_num)?;
            let leaf = LeafNode::from_page(page)?;
            let num_cells = leaf.num_cells();
            let key_at_cursor = if cursor.cell_num < num_cells {
                Some(leaf.key_at(cursor.cell_num)?)
            } else {
                None
            };
            (num_cells, key_at_cursor)
        };

        if key_at_cursor == Some(key) {
            return Ok(InsertOutcome::DuplicateKey);
        }

        if num_cells as usize >= LEAF_NODE_MAX_CELLS
            && self.pager.num_pages() as usize >= TABLE_MAX_PAGES
        {
            return Ok(InsertOutcome::TableFull);
        }

        tree::leaf_insert(&mut self.pager, &cursor, key, row)?;
        Ok(InsertOutcome::Inserted)
    }

    /// Overwrites the username and email of the row with `row.id`. The key
    /// and the stored id are never touched.
    pub fn update(&mut self, row: &Row) -> Result<UpdateOutcome> {
        let cursor = tree::find(&mut self.pager, row.id)?;

        let mut serialized = [0u8; ROW_SIZE];
        row.serialize(&mut serialized)?;

        let page = self.pager.get(cursor.page_num)?;
        let mut leaf = LeafNodeMut::from_page(page)?;

        if cursor.cell_num >= leaf.num_cells() || leaf.key_at(cursor.cell_num)? != row.id {
            return Ok(UpdateOutcome::NotFound);
        }

        let value = leaf.value_at_mut(cursor.cell_num)?;
        value[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE + EMAIL_SIZE]
            .copy_from_slice(&serialized[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE + EMAIL_SIZE]);

        Ok(UpdateOutcome::Updated)
    }

    /// Removes the row with `id`, shifting the leaf's later cells left. The
    /// tree is not rebalanced and pages are never reclaimed.
    pub fn delete(&mut self, id: u32) -> Result<DeleteOutcome> {
        let cursor = tree::find(&mut self.pager, id)?;

        let page = self.pager.get(cursor.page_num)?;
        let mut leaf = LeafNodeMut::from_page(page)?;

        if cursor.cell_num >= leaf.num_cells() || leaf.key_at(cursor.cell_num)? != id {
            return Ok(DeleteOutcome::NotFound);
        }

        leaf.remove_cell(cursor.cell_num)?;
        Ok(DeleteOutcome::Deleted)
    }

    /// Returns every row in ascending id order by walking the leaf chain.
    pub fn select(&mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        let mut cursor = Cursor::start_of_table(&mut self.pager)?;

        while !cursor.end_of_table {
            rows.push(cursor.row(&mut self.pager)?);
            cursor.advance(&mut self.pager)?;
        }

        Ok(rows)
    }

    /// Looks up a single row by id.
    pub fn find(&mut self, id: u32) -> Result<Option<Row>> {
        let cursor = tree::find(&mut self.pager, id)?;

        let page = self.pager.get(cursor.page_num)?;
        let leaf = LeafNode::from_page(page)?;

        if cursor.cell_num < leaf.num_cells() && leaf.key_at(cursor.cell_num)? == id {
            return Ok(Some(Row::deserialize(leaf.value_at(cursor.cell_num)?)?));
        }
        Ok(None)
    }

    pub fn num_pages(&self) -> u32 {
        self.pager.num_pages()
    }

    pub fn root_page_num(&self) -> u32 {
        self.root_page_num
    }

    /// Read-only structure of one node, for debug dumps and tests.
    pub fn node_summary(&mut self, page_num: u32) -> Result<NodeSummary> {
        ensure!(
            page_num < self.pager.num_pages(),
            "page {} beyond table ({} pages)",
            page_num,
            self.pager.num_pages()
        );
        tree::node_summary(&mut self.pager, page_num)
    }

    /// Indented outline of the whole tree, as shown by the `.btree` meta
    /// command.
    pub fn dump_tree(&mut self) -> Result<String> {
        tree::dump(&mut self.pager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn open_table() -> (tempfile::TempDir, Table) {
        let dir = tempdir().unwrap();
        let table = Table::open(dir.path().join("test.db")).unwrap();
        (dir, table)
    }

    fn row(id: u32) -> Row {
        Row::new(id, format!("user{}", id), format!("user{}@example.com", id)).unwrap()
    }

    #[test]
    fn open_initializes_empty_leaf_root() {
        let (_dir, mut table) = open_table();

        assert_eq!(table.num_pages(), 1);
        let summary = table.node_summary(0).unwrap();
        assert_eq!(
            summary,
            NodeSummary::Leaf {
                page_num: 0,
                parent: 0,
                is_root: true,
                next_leaf: 0,
                keys: vec![],
            }
        );
    }

    #[test]
    fn insert_then_select_returns_rows_in_order() {
        let (_dir, mut table) = open_table();

        assert_eq!(table.insert(&row(2)).unwrap(), InsertOutcome::Inserted);
        assert_eq!(table.insert(&row(1)).unwrap(), InsertOutcome::Inserted);

        let rows = table.select().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[1].id, 2);
        assert_eq!(rows[0].username, "user1");
    }

    #[test]
    fn duplicate_insert_is_rejected_and_leaves_table_unchanged() {
        let (_dir, mut table) = open_table();

        let first = Row::new(1, "a", "a@x").unwrap();
        let second = Row::new(1, "z", "z@x").unwrap();
        assert_eq!(table.insert(&first).unwrap(), InsertOutcome::Inserted);
        assert_eq!(table.insert(&second).unwrap(), InsertOutcome::DuplicateKey);

        let rows = table.select().unwrap();
        assert_eq!(rows, vec![first]);
    }

    #[test]
    fn update_overwrites_strings_but_not_key() {
        let (_dir, mut table) = open_table();

        table.insert(&row(3)).unwrap();
        let updated = Row::new(3, "renamed", "renamed@x").unwrap();
        assert_eq!(table.update(&updated).unwrap(), UpdateOutcome::Updated);

        let found = table.find(3).unwrap().unwrap();
        assert_eq!(found.id, 3);
        assert_eq!(found.username, "renamed");
        assert_eq!(found.email, "renamed@x");
    }

    #[test]
    fn update_of_missing_row_reports_not_found() {
        let (_dir, mut table) = open_table();

        table.insert(&row(1)).unwrap();
        table.insert(&row(5)).unwrap();

        // 3 would land between the two existing cells; 9 lands past the end.
        assert_eq!(table.update(&row(3)).unwrap(), UpdateOutcome::NotFound);
        assert_eq!(table.update(&row(9)).unwrap(), UpdateOutcome::NotFound);
    }

    #[test]
    fn delete_removes_row_and_reports_missing_id() {
        let (_dir, mut table) = open_table();

        table.insert(&row(5)).unwrap();
        assert_eq!(table.delete(5).unwrap(), DeleteOutcome::Deleted);
        assert_eq!(table.delete(5).unwrap(), DeleteOutcome::NotFound);
        assert!(table.select().unwrap().is_empty());
    }

    #[test]
    fn delete_within_filled_region_requires_key_match() {
        let (_dir, mut table) = open_table();

        table.insert(&row(1)).unwrap();
        table.insert(&row(5)).unwrap();

        assert_eq!(table.delete(3).unwrap(), DeleteOutcome::NotFound);
        assert_eq!(table.select().unwrap().len(), 2);
    }

    #[test]
    fn find_returns_inserted_row() {
        let (_dir, mut table) = open_table();

        for id in [7u32, 3, 9] {
            table.insert(&row(id)).unwrap();
        }

        assert_eq!(table.find(3).unwrap().unwrap().id, 3);
        assert!(table.find(4).unwrap().is_none());
    }

    #[test]
    fn close_then_reopen_preserves_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        {
            let mut table = Table::open(&path).unwrap();
            for id in 1..=20u32 {
                table.insert(&row(id)).unwrap();
            }
            table.close().unwrap();
        }

        let mut table = Table::open(&path).unwrap();
        let ids: Vec<u32> = table.select().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=20).collect::<Vec<_>>());
    }
}
