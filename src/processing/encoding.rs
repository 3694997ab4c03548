//! Single-byte text helpers for formats that store raw 8-bit strings
//!
//! Character values are read as Windows-1252, the default SAS session
//! encoding on most installations. Every byte decodes to exactly one char and
//! encodes back to the same byte, so untouched values survive a round trip.

use crate::error::{FileReplaceError, Result};
use encoding_rs::WINDOWS_1252;

pub fn decode_single_byte(bytes: &[u8]) -> String {
    WINDOWS_1252
        .decode_without_bom_handling(bytes)
        .0
        .into_owned()
}

/// Encode text back to single bytes, failing on characters Windows-1252 lacks
pub fn encode_single_byte(text: &str) -> Result<Vec<u8>> {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(text);
    if !had_errors {
        return Ok(bytes.into_owned());
    }

    let mut buf = [0u8; 4];
    let culprit = text
        .chars()
        .find(|c| WINDOWS_1252.encode(c.encode_utf8(&mut buf)).2)
        .unwrap_or(char::REPLACEMENT_CHARACTER);
    Err(FileReplaceError::Encoding(format!(
        "character '{}' (U+{:04X}) cannot be stored in a single-byte string",
        culprit,
        u32::from(culprit)
    )))
}
