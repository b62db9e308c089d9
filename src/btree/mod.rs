//! # B+ Tree Engine
//!
//! A disk-backed B+ tree keyed by row id. All rows live in leaf nodes,
//! sorted ascending; internal nodes hold separator keys and child page
//! numbers only; leaves are chained left-to-right for ordered scans.
//!
//! ## Structural Invariants
//!
//! 1. Keys within any node are strictly ascending.
//! 2. Every internal key equals the maximum key of its left child's
//!    subtree, and the right child's maximum exceeds the last key.
//! 3. Every non-root node's parent field names a node that lists it as a
//!    child; the root's parent field is 0.
//! 4. The root is page 0, always — splits replace the root's contents, not
//!    its page number.
//! 5. Walking the sibling chain from the leftmost leaf visits every leaf
//!    exactly once in ascending key order and ends at 0.
//!
//! ## Module Organization
//!
//! - [`leaf`] / [`internal`]: typed views over a single node's page bytes
//! - [`tree`]: multi-page algorithms (descent, splits, root replacement)
//!   and structure introspection
//! - [`cursor`]: positioned iteration across the leaf chain
//!
//! Deletion shifts cells within a leaf and never rebalances; under-full
//! leaves are legal and scans stay correct because they follow sibling
//! links, not fill counts.

pub mod cursor;
pub mod internal;
pub mod leaf;
pub mod tree;

pub use cursor::Cursor;
pub use internal::{InternalNode, InternalNodeMut};
pub use leaf::{LeafNode, LeafNodeMut, SearchResult};
pub use tree::{NodeSummary, ROOT_PAGE_NUM};
