//! # Storage Layer
//!
//! The storage layer maps page numbers to in-memory page buffers and defines
//! the byte-exact node header layout shared by the whole engine.
//!
//! ## Components
//!
//! - [`pager`]: file handle + fixed-capacity page cache; read-on-miss,
//!   write-on-close. The only component that touches the file.
//! - [`page`]: zerocopy node header views (`NodeHeader`, `LeafHeader`,
//!   `InternalHeader`) over raw page bytes.
//!
//! ## File Format
//!
//! A database file is a flat sequence of 4096-byte pages:
//!
//! ```text
//! Offset 0:      Page 0 (always the tree root)
//! Offset 4096:   Page 1
//! Offset 8192:   Page 2
//! ...
//! ```
//!
//! The file length must be a whole multiple of the page size; any other
//! length is rejected at open as corruption.
//!
//! ## Safety Model
//!
//! Page buffers are handed out as `&mut [u8; PAGE_SIZE]` borrows scoped to a
//! single operation step. `Pager::get` takes `&mut self`, so the borrow
//! checker guarantees no page reference survives across an access that could
//! hand out another buffer — the compile-time form of the "never retain page
//! pointers across pager calls" rule.

pub mod page;
pub mod pager;

pub use page::{node_type, validate_page, InternalHeader, LeafHeader, NodeHeader, NodeType};
pub use pager::{PageBuf, Pager};
