//! # REPL
//!
//! The interactive loop for the oakdb shell:
//!
//! - reads input with rustyline (history, line editing)
//! - dispatches meta commands (leading `.`) to [`MetaCommands`]
//! - prepares everything else into a [`Statement`] and executes it
//!
//! Prepare and execution errors are displayed and the loop continues; the
//! shell terminates on `.exit` or Ctrl+D, closing the database cleanly so
//! the session's mutations reach disk. Fatal engine errors (corruption,
//! I/O) propagate out of [`Repl::run`] and end the process.

use eyre::{Result, WrapErr};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::cli::commands::{MetaCommands, MetaResult};
use crate::cli::history::history_path;
use crate::cli::statement::{prepare, Statement};
use crate::table::{DeleteOutcome, InsertOutcome, Table, UpdateOutcome};

const PROMPT: &str = "oakdb> ";

pub struct Repl {
    table: Table,
    editor: DefaultEditor,
}

impl Repl {
    pub fn new(table: Table) -> Result<Self> {
        let mut editor = DefaultEditor::new().wrap_err("failed to initialize line editor")?;

        if let Some(history_file) = history_path() {
            let _ = editor.load_history(&history_file);
        }

        Ok(Self { table, editor })
    }

    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    self.editor.add_history_entry(trimmed).ok();

                    if MetaCommands::is_meta(trimmed) {
                        if !self.handle_meta(trimmed)? {
                            break;
                        }
                    } else {
                        self.handle_statement(trimmed)?;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                }
                Err(ReadlineError::Eof) => {
                    break;
                }
                Err(err) => {
                    eprintln!("Error reading input: {}", err);
                    break;
                }
            }
        }

        self.save_history();
        self.table.close()
    }

    /// Returns false when the shell should exit.
    fn handle_meta(&mut self, input: &str) -> Result<bool> {
        match MetaCommands::execute(input, &mut self.table)? {
            MetaResult::Exit => Ok(false),
            MetaResult::Output(text) => {
                println!("{}", text);
                Ok(true)
            }
            MetaResult::Unrecognized(cmd) => {
                println!("Unrecognized command '{}'.", cmd);
                Ok(true)
            }
        }
    }

    fn handle_statement(&mut self, input: &str) -> Result<()> {
        let statement = match prepare(input) {
            Ok(statement) => statement,
            Err(err) => {
                println!("{}", err);
                return Ok(());
            }
        };

        match statement {
            Statement::Insert(row) => match self.table.insert(&row)? {
                InsertOutcome::Inserted => println!("Executed."),
                InsertOutcome::DuplicateKey => println!("Error: Duplicate key."),
                InsertOutcome::TableFull => println!("Error: Table full."),
            },
            Statement::Update(row) => match self.table.update(&row)? {
                UpdateOutcome::Updated => println!("Executed."),
                UpdateOutcome::NotFound => println!("Error: Row not found."),
            },
            Statement::Delete { id } => match self.table.delete(id)? {
                DeleteOutcome::Deleted => println!("Executed."),
                DeleteOutcome::NotFound => println!("Error: Row not found."),
            },
            Statement::Select => {
                for row in self.table.select()? {
                    println!("{}", row);
                }
                println!("Executed.");
            }
        }

        Ok(())
    }

    fn save_history(&mut self) {
        if let Some(history_file) = history_path() {
            if let Err(err) = self.editor.save_history(&history_file) {
                eprintln!("Warning: could not save history: {}", err);
            }
        }
    }
}
