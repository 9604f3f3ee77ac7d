//! Value encoding for the `value_str` column.
//!
//! ## Blob Format
//! ```text
//! ┌──────────┬─────────┬────────────┬──────────────────────────┐
//! │ Magic(2) │ Ver (1) │ CRC32 (4)  │     Payload (bincode)    │
//! │   "SH"   │  0x01   │ of payload │   tagged `Value` tree    │
//! └──────────┴─────────┴────────────┴──────────────────────────┘
//! ```
//!
//! The payload is `bincode` with fixed-width little-endian integers. Every
//! `Value` node starts with a `u32` variant tag, and strings, byte blobs,
//! lists and maps carry a `u64` length prefix, so the encoding describes
//! itself without a schema. The CRC covers the payload only.

use crate::error::{Error, Result};
use crate::model::Value;
use bincode::Options;

/// Leading bytes of every blob written by this crate.
pub const MAGIC: &[u8; 2] = b"SH";

/// Current blob format version.
pub const VERSION: u8 = 1;

/// Magic + version + checksum.
pub const HEADER_SIZE: usize = 7;

/// Upper bound on payload size (64 MB), applied in both directions.
pub const MAX_PAYLOAD_SIZE: u64 = 64 * 1024 * 1024;

fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .with_limit(MAX_PAYLOAD_SIZE)
        .reject_trailing_bytes()
}

/// Encode a value into a self-contained blob.
///
/// # Errors
///
/// Returns `Error::Encode` if the payload exceeds [`MAX_PAYLOAD_SIZE`].
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    let payload = options()
        .serialize(value)
        .map_err(|e| Error::Encode(e.to_string()))?;

    let mut blob = Vec::with_capacity(HEADER_SIZE + payload.len());
    blob.extend_from_slice(MAGIC);
    blob.push(VERSION);
    blob.extend_from_slice(&crc32fast::hash(&payload).to_le_bytes());
    blob.extend_from_slice(&payload);
    Ok(blob)
}

/// Decode a blob produced by [`encode`].
///
/// # Errors
///
/// Returns `Error::Decode` for truncated blobs, foreign formats, checksum
/// mismatches, malformed payloads and trailing garbage.
pub fn decode(blob: &[u8]) -> Result<Value> {
    if blob.len() < HEADER_SIZE {
        return Err(Error::Decode(format!(
            "blob is {} bytes, shorter than the {HEADER_SIZE}-byte header",
            blob.len()
        )));
    }

    let (header, payload) = blob.split_at(HEADER_SIZE);
    if &header[..2] != MAGIC {
        return Err(Error::Decode(
            "unrecognized format (bad magic bytes)".to_string(),
        ));
    }
    if header[2] != VERSION {
        return Err(Error::Decode(format!(
            "unsupported format version {}",
            header[2]
        )));
    }

    let expected = u32::from_le_bytes([header[3], header[4], header[5], header[6]]);
    let actual = crc32fast::hash(payload);
    if expected != actual {
        return Err(Error::Decode(format!(
            "checksum mismatch (stored {expected:08x}, computed {actual:08x})"
        )));
    }

    options()
        .deserialize(payload)
        .map_err(|e| Error::Decode(e.to_string()))
}
