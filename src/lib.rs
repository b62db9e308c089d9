//! # oakdb — Single-File Embedded B+ Tree Table Store
//!
//! oakdb persists one table — rows of `(id, username, email)` keyed by a
//! u32 id — in a single file of fixed-size pages organized as a B+ tree.
//! It supports point insert, update, and delete, plus a full-table ordered
//! scan, and ships an interactive shell.
//!
//! ## Quick Start
//!
//! ```no_run
//! use oakdb::{Row, Table};
//!
//! # fn main() -> eyre::Result<()> {
//! let mut table = Table::open("./users.db")?;
//! table.insert(&Row::new(1, "alice", "alice@example.com")?)?;
//! for row in table.select()? {
//!     println!("{}", row);
//! }
//! table.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Shell (cli + binary)         │
//! ├─────────────────────────────────────┤
//! │        Table driver (table)         │
//! ├──────────────────┬──────────────────┤
//! │  Row codec (row) │  Cursor (btree)  │
//! ├──────────────────┴──────────────────┤
//! │   B+ tree nodes & splits (btree)    │
//! ├─────────────────────────────────────┤
//! │  Pager & page layout (storage)      │
//! └─────────────────────────────────────┘
//! ```
//!
//! The engine is strictly single-threaded and durable only on clean close:
//! every cached page is written back by [`Table::close`], and a session
//! that skips it loses its mutations. There is no write-ahead log.
//!
//! ## Module Overview
//!
//! - [`storage`]: pager (page cache + file I/O) and node header layout
//! - [`btree`]: leaf/internal node views, split algorithms, cursor
//! - [`row`]: fixed-width row serialization
//! - [`table`]: the public driver with typed operation outcomes
//! - [`cli`]: statement preparation, meta commands, rustyline REPL

pub mod btree;
pub mod cli;
pub mod config;
pub mod row;
pub mod storage;
pub mod table;

pub use row::Row;
pub use table::{DeleteOutcome, InsertOutcome, Table, UpdateOutcome};
