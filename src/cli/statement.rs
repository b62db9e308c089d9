//! # Statement Preparation
//!
//! Tokenizes one line of shell input into a typed [`Statement`]. The
//! grammar is deliberately tiny:
//!
//! ```text
//! insert <id> <username> <email>
//! update <username> <email> where id=<id>
//! delete where id=<id>
//! select
//! ```
//!
//! Preparation validates everything the engine's contracts require from
//! user input: unparseable and negative ids, over-long string fields, and
//! unknown keywords. All of these are reported as [`PrepareError`] values;
//! the REPL prints them and keeps running.

use std::fmt;

use crate::config::constants::{COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE};
use crate::row::Row;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Update(Row),
    Delete { id: u32 },
    Select,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    SyntaxError,
    NegativeId,
    StringTooLong,
    Unrecognized(String),
}

impl fmt::Display for PrepareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrepareError::SyntaxError => write!(f, "Syntax error. Could not parse statement."),
            PrepareError::NegativeId => write!(f, "ID must be positive."),
            PrepareError::StringTooLong => write!(f, "String is too long."),
            PrepareError::Unrecognized(input) => {
                write!(f, "Unrecognized keyword at start of '{}'.", input)
            }
        }
    }
}

/// Parses one input line into a statement.
pub fn prepare(input: &str) -> Result<Statement, PrepareError> {
    let trimmed = input.trim();
    let mut tokens = trimmed.split_whitespace();

    match tokens.next() {
        Some("insert") => prepare_insert(tokens),
        Some("update") => prepare_update(tokens),
        Some("delete") => prepare_delete(tokens),
        Some("select") => {
            if tokens.next().is_some() {
                return Err(PrepareError::SyntaxError);
            }
            Ok(Statement::Select)
        }
        _ => Err(PrepareError::Unrecognized(trimmed.to_string())),
    }
}

fn prepare_insert<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<Statement, PrepareError> {
    let id = parse_id(tokens.next().ok_or(PrepareError::SyntaxError)?)?;
    let username = tokens.next().ok_or(PrepareError::SyntaxError)?;
    let email = tokens.next().ok_or(PrepareError::SyntaxError)?;
    if tokens.next().is_some() {
        return Err(PrepareError::SyntaxError);
    }

    Ok(Statement::Insert(build_row(id, username, email)?))
}

fn prepare_update<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<Statement, PrepareError> {
    let username = tokens.next().ok_or(PrepareError::SyntaxError)?;
    let email = tokens.next().ok_or(PrepareError::SyntaxError)?;
    let id = parse_where_id(tokens.by_ref())?;
    if tokens.next().is_some() {
        return Err(PrepareError::SyntaxError);
    }

    Ok(Statement::Update(build_row(id, username, email)?))
}

fn prepare_delete<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<Statement, PrepareError> {
    let id = parse_where_id(tokens.by_ref())?;
    if tokens.next().is_some() {
        return Err(PrepareError::SyntaxError);
    }

    Ok(Statement::Delete { id })
}

/// Parses the trailing `where id=<id>` clause.
fn parse_where_id<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<u32, PrepareError> {
    let where_keyword = tokens.next().ok_or(PrepareError::SyntaxError)?;
    if where_keyword != "where" {
        return Err(PrepareError::SyntaxError);
    }

    let condition = tokens.next().ok_or(PrepareError::SyntaxError)?;
    let (column, value) = condition.split_once('=').ok_or(PrepareError::SyntaxError)?;
    if column != "id" {
        return Err(PrepareError::SyntaxError);
    }

    parse_id(value)
}

fn parse_id(token: &str) -> Result<u32, PrepareError> {
    if token.starts_with('-') {
        return Err(PrepareError::NegativeId);
    }
    token.parse::<u32>().map_err(|_| PrepareError::SyntaxError)
}

fn build_row(id: u32, username: &str, email: &str) -> Result<Row, PrepareError> {
    if username.len() > COLUMN_USERNAME_SIZE || email.len() > COLUMN_EMAIL_SIZE {
        return Err(PrepareError::StringTooLong);
    }
    Row::new(id, username, email).map_err(|_| PrepareError::StringTooLong)
}
