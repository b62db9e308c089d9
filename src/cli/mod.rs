//! # oakdb Shell
//!
//! Line-oriented interactive shell over the table driver. The shell is a
//! strict layer above the core: it prepares text into typed statements,
//! calls the table's operations, and formats their typed outcomes. The
//! engine never depends on anything in this module.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               Entry point (bin)              │
//! ├──────────────────────────────────────────────┤
//! │                  REPL loop                   │
//! │   rustyline input → meta command | statement │
//! ├──────────────────────────────────────────────┤
//! │  statement     │  commands      │  history   │
//! │  tokenizer +   │  .exit .btree  │  ~/.oakdb_ │
//! │  validation    │  .constant ... │  history   │
//! └──────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod history;
pub mod repl;
pub mod statement;

pub use repl::Repl;
