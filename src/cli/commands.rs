//! # Meta Command Handler
//!
//! Parses and executes the dot commands used for shell control and engine
//! introspection. Meta commands start with a period and bypass statement
//! preparation.
//!
//! | Command     | Description                                |
//! |-------------|--------------------------------------------|
//! | `.exit`     | Close the database cleanly and exit        |
//! | `.btree`    | Dump the tree structure                    |
//! | `.constant` | Dump the on-disk layout constants          |
//! | `.help`     | Show available commands                    |
//!
//! Unrecognized commands are reported and ignored. The tree and constant
//! dumps go through the engine's read-only introspection; meta commands
//! never mutate the table.

use eyre::Result;

use crate::config::constants::{
    COMMON_NODE_HEADER_SIZE, INTERNAL_NODE_HEADER_SIZE, INTERNAL_NODE_MAX_KEYS,
    LEAF_NODE_CELL_SIZE, LEAF_NODE_HEADER_SIZE, LEAF_NODE_MAX_CELLS, LEAF_NODE_SPACE_FOR_CELLS,
    PAGE_SIZE, ROW_SIZE, TABLE_MAX_PAGES,
};
use crate::table::Table;

#[derive(Debug, PartialEq, Eq)]
pub enum MetaResult {
    /// Close the database and leave the shell.
    Exit,
    Output(String),
    Unrecognized(String),
}

pub struct MetaCommands;

impl MetaCommands {
    pub fn is_meta(input: &str) -> bool {
        input.trim_start().starts_with('.')
    }

    pub fn execute(input: &str, table: &mut Table) -> Result<MetaResult> {
        match input.trim() {
            ".exit" => Ok(MetaResult::Exit),
            ".btree" => Ok(MetaResult::Output(format!(
                "Tree:\n{}",
                table.dump_tree()?
            ))),
            ".constant" => Ok(MetaResult::Output(constants_text())),
            ".help" => Ok(MetaResult::Output(help_text())),
            other => Ok(MetaResult::Unrecognized(other.to_string())),
        }
    }
}

fn constants_text() -> String {
    format!(
        "Constants:\n\
         PAGE_SIZE: {}\n\
         TABLE_MAX_PAGES: {}\n\
         ROW_SIZE: {}\n\
         COMMON_NODE_HEADER_SIZE: {}\n\
         LEAF_NODE_HEADER_SIZE: {}\n\
         LEAF_NODE_CELL_SIZE: {}\n\
         LEAF_NODE_SPACE_FOR_CELLS: {}\n\
         LEAF_NODE_MAX_CELLS: {}\n\
         INTERNAL_NODE_HEADER_SIZE: {}\n\
         INTERNAL_NODE_MAX_KEYS: {}",
        PAGE_SIZE,
        TABLE_MAX_PAGES,
        ROW_SIZE,
        COMMON_NODE_HEADER_SIZE,
        LEAF_NODE_HEADER_SIZE,
        LEAF_NODE_CELL_SIZE,
        LEAF_NODE_SPACE_FOR_CELLS,
        LEAF_NODE_MAX_CELLS,
        INTERNAL_NODE_HEADER_SIZE,
        INTERNAL_NODE_MAX_KEYS,
    )
}

fn help_text() -> String {
    r#"oakdb commands:

  .exit                               Close the database and exit
  .btree                              Show the B+ tree structure
  .constant                           Show the on-disk layout constants
  .help                               Show this help message

Statements:

  insert <id> <username> <email>      Insert a row
  update <username> <email> where id=<id>
                                      Rewrite a row's string fields
  delete where id=<id>                Delete a row
  select                              List all rows in id order"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::Row;
    use tempfile::tempdir;

    fn open_table() -> (tempfile::TempDir, Table) {
        let dir = tempdir().unwrap();
        let table = Table::open(dir.path().join("test.db")).unwrap();
        (dir, table)
    }

    #[test]
    fn is_meta_detects_dot_prefix() {
        assert!(MetaCommands::is_meta(".exit"));
        assert!(MetaCommands::is_meta("  .btree"));
        assert!(!MetaCommands::is_meta("select"));
        assert!(!MetaCommands::is_meta(""));
    }

    #[test]
    fn exit_command_signals_exit() {
        let (_dir, mut table) = open_table();
        assert_eq!(
            MetaCommands::execute(".exit", &mut table).unwrap(),
            MetaResult::Exit
        );
    }

    #[test]
    fn btree_command_dumps_tree() {
        let (_dir, mut table) = open_table();
        table.insert(&Row::new(1, "a", "a@x").unwrap()).unwrap();

        let result = MetaCommands::execute(".btree", &mut table).unwrap();
        let MetaResult::Output(text) = result else {
            panic!("expected output");
        };
        assert!(text.starts_with("Tree:"));
        assert!(text.contains("- leaf (size 1)"));
        assert!(text.contains("- 1"));
    }

    #[test]
    fn constant_command_lists_layout_constants() {
        let (_dir, mut table) = open_table();

        let result = MetaCommands::execute(".constant", &mut table).unwrap();
        let MetaResult::Output(text) = result else {
            panic!("expected output");
        };
        assert!(text.contains("ROW_SIZE: 293"));
        assert!(text.contains("LEAF_NODE_MAX_CELLS: 13"));
        assert!(text.contains("LEAF_NODE_CELL_SIZE: 297"));
    }

    #[test]
    fn unknown_command_is_reported() {
        let (_dir, mut table) = open_table();

        assert_eq!(
            MetaCommands::execute(".tables", &mut table).unwrap(),
            MetaResult::Unrecognized(".tables".to_string())
        );
    }

    #[test]
    fn help_lists_commands_and_statements() {
        let (_dir, mut table) = open_table();

        let result = MetaCommands::execute(".help", &mut table).unwrap();
        let MetaResult::Output(text) = result else {
            panic!("expected output");
        };
        assert!(text.contains(".exit"));
        assert!(text.contains(".btree"));
        assert!(text.contains("insert <id>"));
    }
}
