//! Hex codec for captured frame payloads.
//!
//! Log records carry frames as whitespace-separated hex tokens
//! (`"68 04 07 00 00 00"`). This module turns them into an immutable
//! [`Bytes`] buffer and back.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Iec104Error, Result};

/// Parse a whitespace-delimited hex string into bytes.
///
/// Each token must be one or two hex digits (case-insensitive). Leading and
/// trailing whitespace is ignored and runs of whitespace count as a single
/// separator. An empty or whitespace-only input yields an empty buffer.
pub fn parse_hex(input: &str) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(input.len() / 3 + 1);

    for (position, token) in input.split_whitespace().enumerate() {
        buf.put_u8(parse_token(token).ok_or_else(|| Iec104Error::HexFormat {
            token: token.to_string(),
            position,
        })?);
    }

    Ok(buf.freeze())
}

fn parse_token(token: &str) -> Option<u8> {
    if token.is_empty() || token.len() > 2 || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u8::from_str_radix(token, 16).ok()
}

/// Format bytes as upper-case hex tokens separated by single spaces.
pub fn format_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{:02X}", b));
    }
    out
}

/// Number of whitespace-separated tokens in a hex string.
#[inline]
pub fn token_count(input: &str) -> usize {
    input.split_whitespace().count()
}
