//! # Row Codec
//!
//! A row is the fixed-width record stored in leaf cells:
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  --------------------------------------------
//! 0       4     id (u32, little-endian; also the tree key)
//! 4       33    username (NUL-terminated, NUL-padded)
//! 37      256   email (NUL-terminated, NUL-padded)
//! ```
//!
//! Serialization is a fixed-offset copy of each field; the offsets and
//! widths are part of the on-disk format. String fields shorter than their
//! buffer are padded with NUL bytes, so the serialized form of a row is
//! deterministic.

use std::fmt;

use eyre::{ensure, Result};

use crate::config::constants::{
    COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE, EMAIL_OFFSET, EMAIL_SIZE, ID_OFFSET, ID_SIZE,
    ROW_SIZE, USERNAME_OFFSET, USERNAME_SIZE,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub username: String,
    pub email: String,
}

impl Row {
    /// Builds a row, rejecting over-long string fields.
    pub fn new(id: u32, username: impl Into<String>, email: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let email = email.into();
        ensure!(
            username.len() <= COLUMN_USERNAME_SIZE,
            "username exceeds {} bytes",
            COLUMN_USERNAME_SIZE
        );
        ensure!(
            email.len() <= COLUMN_EMAIL_SIZE,
            "email exceeds {} bytes",
            COLUMN_EMAIL_SIZE
        );
        Ok(Self {
            id,
            username,
            email,
        })
    }

    /// Serializes the row into the first [`ROW_SIZE`] bytes of `dest`.
    pub fn serialize(&self, dest: &mut [u8]) -> Result<()> {
        ensure!(
            dest.len() >= ROW_SIZE,
            "row destination too small: {} < {}",
            dest.len(),
            ROW_SIZE
        );
        ensure!(
            self.username.len() <= COLUMN_USERNAME_SIZE,
            "username exceeds {} bytes",
            COLUMN_USERNAME_SIZE
        );
        ensure!(
            self.email.len() <= COLUMN_EMAIL_SIZE,
            "email exceeds {} bytes",
            COLUMN_EMAIL_SIZE
        );

        dest[ID_OFFSET..ID_OFFSET + ID_SIZE].copy_from_slice(&self.id.to_le_bytes());
        write_padded(
            &mut dest[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE],
            self.username.as_bytes(),
        );
        write_padded(
            &mut dest[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE],
            self.email.as_bytes(),
        );
        Ok(())
    }

    /// Reconstructs a row from its serialized form.
    pub fn deserialize(src: &[u8]) -> Result<Self> {
        ensure!(
            src.len() >= ROW_SIZE,
            "row source too small: {} < {}",
            src.len(),
            ROW_SIZE
        );

        let mut id_bytes = [0u8; ID_SIZE];
        id_bytes.copy_from_slice(&src[ID_OFFSET..ID_OFFSET + ID_SIZE]);

        Ok(Self {
            id: u32::from_le_bytes(id_bytes),
            username: read_padded(&src[USERNAME_OFFSET..USERNAME_OFFSET + USERNAME_SIZE]),
            email: read_padded(&src[EMAIL_OFFSET..EMAIL_OFFSET + EMAIL_SIZE]),
        })
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.id, self.username, self.email)
    }
}

fn write_padded(dest: &mut [u8], src: &[u8]) {
    dest[..src.len()].copy_from_slice(src);
    dest[src.len()..].fill(0);
}

fn read_padded(src: &[u8]) -> String {
    let end = src.iter().position(|&b| b == 0).unwrap_or(src.len());
    String::from_utf8_lossy(&src[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize_deserialize_round_trip() {
        let row = Row::new(42, "alice", "alice@example.com").unwrap();
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf).unwrap();

        let decoded = Row::deserialize(&buf).unwrap();
        assert_eq!(decoded, row);
    }

    #[test]
    fn serialized_width_is_deterministic() {
        let short = Row::new(1, "a", "b").unwrap();
        let long = Row::new(1, "a".repeat(32), "b".repeat(255)).unwrap();

        let mut buf_short = [0xFFu8; ROW_SIZE];
        let mut buf_long = [0xFFu8; ROW_SIZE];
        short.serialize(&mut buf_short).unwrap();
        long.serialize(&mut buf_long).unwrap();

        // Unused string bytes are NUL padding, not leftovers.
        assert_eq!(buf_short[USERNAME_OFFSET + 1], 0);
        assert_eq!(buf_short[EMAIL_OFFSET + 1], 0);
        assert_eq!(Row::deserialize(&buf_long).unwrap(), long);
    }

    #[test]
    fn max_length_fields_round_trip() {
        let row = Row::new(7, "u".repeat(32), "e".repeat(255)).unwrap();
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf).unwrap();
        assert_eq!(Row::deserialize(&buf).unwrap(), row);
    }

    #[test]
    fn oversize_fields_are_rejected() {
        assert!(Row::new(1, "u".repeat(33), "e").is_err());
        assert!(Row::new(1, "u", "e".repeat(256)).is_err());
    }

    #[test]
    fn key_is_little_endian_at_offset_zero() {
        let row = Row::new(0x0102_0304, "u", "e").unwrap();
        let mut buf = [0u8; ROW_SIZE];
        row.serialize(&mut buf).unwrap();
        assert_eq!(&buf[0..4], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn display_matches_scan_output_format() {
        let row = Row::new(1, "a", "a@x").unwrap();
        assert_eq!(row.to_string(), "(1, a, a@x)");
    }
}
