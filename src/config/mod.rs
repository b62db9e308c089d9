//! Configuration and file-format constants.

pub mod constants;

pub use constants::*;
