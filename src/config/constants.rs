//! # oakdb Layout Constants
//!
//! This module centralizes every constant that defines the on-disk file
//! format. The constants are interdependent: each offset is derived from the
//! widths declared above it, and the split counts are derived from the cell
//! capacity. Changing any width changes the file format.
//!
//! ## Dependency Graph
//!
//! ```text
//! COLUMN_USERNAME_SIZE (32) ──┐
//! COLUMN_EMAIL_SIZE (255) ────┼─> USERNAME_SIZE / EMAIL_SIZE (+1 for the
//!                             │   NUL terminator) ─> ROW_SIZE (293)
//!                             │
//! PAGE_SIZE (4096)            │
//!       │                     │
//!       ├─> LEAF_NODE_SPACE_FOR_CELLS (PAGE_SIZE - LEAF_NODE_HEADER_SIZE)
//!       │         │
//!       │         └─> LEAF_NODE_MAX_CELLS (13 with ROW_SIZE = 293)
//!       │                   │
//!       │                   ├─> LEAF_NODE_RIGHT_SPLIT_COUNT ((MAX + 1) / 2)
//!       │                   └─> LEAF_NODE_LEFT_SPLIT_COUNT (the remainder)
//!       │
//!       └─> TABLE_MAX_PAGES (100) bounds both the page cache and the file
//! ```
//!
//! ## Critical Invariants
//!
//! Enforced by compile-time assertions at the bottom of this file:
//!
//! 1. `LEAF_NODE_LEFT_SPLIT_COUNT + LEAF_NODE_RIGHT_SPLIT_COUNT ==
//!    LEAF_NODE_MAX_CELLS + 1` (a split distributes every virtual cell
//!    exactly once)
//! 2. The leaf and internal bodies fit inside a page.
//! 3. Header sizes match the byte-exact wire format in `storage::page`.
//!
//! These values form the wire format: files written with one set of
//! constants cannot be read with another.

// ============================================================================
// ROW LAYOUT
// Fixed-width record: id, then two NUL-terminated fixed-size string fields.
// ============================================================================

/// Maximum username length in bytes, excluding the NUL terminator.
pub const COLUMN_USERNAME_SIZE: usize = 32;

/// Maximum email length in bytes, excluding the NUL terminator.
pub const COLUMN_EMAIL_SIZE: usize = 255;

pub const ID_SIZE: usize = size_of::<u32>();
pub const USERNAME_SIZE: usize = COLUMN_USERNAME_SIZE + 1;
pub const EMAIL_SIZE: usize = COLUMN_EMAIL_SIZE + 1;

pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SIZE;

/// Serialized row width: 4 + 33 + 256 = 293 bytes.
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

// ============================================================================
// PAGE GEOMETRY
// ============================================================================

/// Size of one page, the unit of disk I/O and node storage.
pub const PAGE_SIZE: usize = 4096;

/// Maximum pages per table. The page cache has exactly this many slots, so
/// cache capacity equals file capacity.
pub const TABLE_MAX_PAGES: usize = 100;

/// Sentinel page number marking a child slot that exists but is not yet
/// wired up during a split. Never a valid page.
pub const INVALID_PAGE_NUM: u32 = u32::MAX;

// ============================================================================
// COMMON NODE HEADER
// Shared prefix of every node: type tag, root flag, parent page number.
// ============================================================================

pub const NODE_TYPE_SIZE: usize = size_of::<u8>();
pub const NODE_TYPE_OFFSET: usize = 0;

pub const IS_ROOT_SIZE: usize = size_of::<u8>();
pub const IS_ROOT_OFFSET: usize = NODE_TYPE_OFFSET + NODE_TYPE_SIZE;

pub const PARENT_POINTER_SIZE: usize = size_of::<u32>();
pub const PARENT_POINTER_OFFSET: usize = IS_ROOT_OFFSET + IS_ROOT_SIZE;

pub const COMMON_NODE_HEADER_SIZE: usize =
    NODE_TYPE_SIZE + IS_ROOT_SIZE + PARENT_POINTER_SIZE;

// ============================================================================
// LEAF NODE LAYOUT
// Header extends the common header with a cell count and the sibling link.
// The body is a packed sequence of (key, row) cells in ascending key order.
// ============================================================================

pub const LEAF_NODE_NUM_CELLS_SIZE: usize = size_of::<u32>();
pub const LEAF_NODE_NUM_CELLS_OFFSET: usize = COMMON_NODE_HEADER_SIZE;

/// Page number of the right sibling leaf; 0 means no sibling (page 0 is
/// always the root, so 0 can never be a sibling).
pub const LEAF_NODE_NEXT_LEAF_SIZE: usize = size_of::<u32>();
pub const LEAF_NODE_NEXT_LEAF_OFFSET: usize =
    LEAF_NODE_NUM_CELLS_OFFSET + LEAF_NODE_NUM_CELLS_SIZE;

pub const LEAF_NODE_HEADER_SIZE: usize =
    COMMON_NODE_HEADER_SIZE + LEAF_NODE_NUM_CELLS_SIZE + LEAF_NODE_NEXT_LEAF_SIZE;

pub const LEAF_NODE_KEY_SIZE: usize = size_of::<u32>();
pub const LEAF_NODE_VALUE_SIZE: usize = ROW_SIZE;
pub const LEAF_NODE_CELL_SIZE: usize = LEAF_NODE_KEY_SIZE + LEAF_NODE_VALUE_SIZE;

pub const LEAF_NODE_SPACE_FOR_CELLS: usize = PAGE_SIZE - LEAF_NODE_HEADER_SIZE;
pub const LEAF_NODE_MAX_CELLS: usize = LEAF_NODE_SPACE_FOR_CELLS / LEAF_NODE_CELL_SIZE;

/// Cell counts after a leaf split. The upper half (including the incoming
/// cell) moves to the new right sibling.
pub const LEAF_NODE_RIGHT_SPLIT_COUNT: usize = (LEAF_NODE_MAX_CELLS + 1) / 2;
pub const LEAF_NODE_LEFT_SPLIT_COUNT: usize =
    (LEAF_NODE_MAX_CELLS + 1) - LEAF_NODE_RIGHT_SPLIT_COUNT;

// ============================================================================
// INTERNAL NODE LAYOUT
// Header extends the common header with a key count and the distinguished
// right child. The body is a packed sequence of (child, key) entries where
// each key is the maximum key of its left child's subtree.
// ============================================================================

pub const INTERNAL_NODE_NUM_KEYS_SIZE: usize = size_of::<u32>();
pub const INTERNAL_NODE_NUM_KEYS_OFFSET: usize = COMMON_NODE_HEADER_SIZE;

pub const INTERNAL_NODE_RIGHT_CHILD_SIZE: usize = size_of::<u32>();
pub const INTERNAL_NODE_RIGHT_CHILD_OFFSET: usize =
    INTERNAL_NODE_NUM_KEYS_OFFSET + INTERNAL_NODE_NUM_KEYS_SIZE;

pub const INTERNAL_NODE_HEADER_SIZE: usize = COMMON_NODE_HEADER_SIZE
    + INTERNAL_NODE_NUM_KEYS_SIZE
    + INTERNAL_NODE_RIGHT_CHILD_SIZE;

pub const INTERNAL_NODE_CHILD_SIZE: usize = size_of::<u32>();
pub const INTERNAL_NODE_KEY_SIZE: usize = size_of::<u32>();
pub const INTERNAL_NODE_ENTRY_SIZE: usize =
    INTERNAL_NODE_CHILD_SIZE + INTERNAL_NODE_KEY_SIZE;

/// Keys per internal node. A page could hold far more 8-byte entries, but a
/// small fan-out keeps split paths short and exercised; the split algorithm
/// is correct for any bound >= 3.
pub const INTERNAL_NODE_MAX_KEYS: usize = 3;

// ============================================================================
// COMPILE-TIME ASSERTIONS
// ============================================================================

const _: () = assert!(
    LEAF_NODE_LEFT_SPLIT_COUNT + LEAF_NODE_RIGHT_SPLIT_COUNT == LEAF_NODE_MAX_CELLS + 1,
    "leaf split must distribute every virtual cell exactly once"
);

const _: () = assert!(
    LEAF_NODE_HEADER_SIZE + LEAF_NODE_MAX_CELLS * LEAF_NODE_CELL_SIZE <= PAGE_SIZE,
    "leaf body must fit inside a page"
);

const _: () = assert!(
    INTERNAL_NODE_HEADER_SIZE + INTERNAL_NODE_MAX_KEYS * INTERNAL_NODE_ENTRY_SIZE <= PAGE_SIZE,
    "internal body must fit inside a page"
);

const _: () = assert!(ROW_SIZE == 293, "row layout is part of the wire format");
const _: () = assert!(LEAF_NODE_HEADER_SIZE == 14);
const _: () = assert!(INTERNAL_NODE_HEADER_SIZE == 14);
const _: () = assert!(LEAF_NODE_MAX_CELLS == 13);
