//! Frame normalizer: raw WebSocket payload -> canonical STOMP frame string.
//!
//! Wire convention for compressed frames:
//!
//! ```text
//! <ASCII header block>\n\n<zlib body>[\0]
//! ```
//!
//! The header block (separator included) is copied through byte-for-byte, the
//! body is inflated, and exactly one NUL terminator is appended. Text payloads
//! are already canonical and pass through unchanged.

use crate::error::{ErrorKind, Result, StompWsError};
use crate::protocol::inflate::inflate_zlib;
use crate::protocol::payload::RawPayload;

/// Header/body separator (the empty line after the last header).
pub const HEADER_SEPARATOR: &[u8] = b"\n\n";

/// STOMP frame terminator.
pub const FRAME_TERMINATOR: u8 = 0x00;

/// Default cap on the inflated body size (16 MiB).
pub const DEFAULT_MAX_INFLATED_BYTES: usize = 16 * 1024 * 1024;

/// Resource limits applied to binary payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeLimits {
    pub max_inflated_bytes: usize,
}

impl Default for NormalizeLimits {
    fn default() -> Self {
        Self {
            max_inflated_bytes: DEFAULT_MAX_INFLATED_BYTES,
        }
    }
}

/// Normalize one inbound payload, dropping it on any decode failure.
///
/// A dropped payload yields only its `ErrorKind`; the details are logged at
/// `debug` and never propagated.
pub fn normalize(
    payload: RawPayload,
    limits: &NormalizeLimits,
) -> std::result::Result<String, ErrorKind> {
    let len = payload.len();
    let res = match payload {
        RawPayload::Text(text) => Ok(normalize_text(text)),
        RawPayload::Binary(bytes) => normalize_binary(&bytes, limits),
    };
    res.map_err(|e| {
        tracing::debug!(
            reason = e.kind().as_str(),
            len,
            error = %e,
            "dropping binary payload"
        );
        e.kind()
    })
}

/// Text payloads are canonical frames already.
pub fn normalize_text(text: String) -> String {
    text
}

/// Inflate a `<header>\n\n<zlib body>[\0]` payload into a NUL-terminated frame.
pub fn normalize_binary(bytes: &[u8], limits: &NormalizeLimits) -> Result<String> {
    let (header, rest) = split_header(bytes).ok_or(StompWsError::UnrecognizedPayload)?;

    // A bare header block has no body to inflate.
    if rest.is_empty() {
        return Err(StompWsError::UnrecognizedPayload);
    }

    if !header.is_ascii() {
        return Err(StompWsError::Encoding("header block is not ASCII".into()));
    }

    let body = strip_terminator(rest);
    let inflated = inflate_zlib(body, limits.max_inflated_bytes)?;
    let body_text = String::from_utf8(inflated)
        .map_err(|e| StompWsError::Encoding(format!("inflated body is not UTF-8: {e}")))?;

    let mut frame = String::with_capacity(header.len() + body_text.len() + 1);
    // ASCII was checked above, so every header byte maps to one char.
    frame.extend(header.iter().map(|&b| char::from(b)));
    frame.push_str(&body_text);
    frame.push(char::from(FRAME_TERMINATOR));
    Ok(frame)
}

/// Split at the first `\n\n`: `(header block incl. separator, remainder)`.
pub fn split_header(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = bytes
        .windows(HEADER_SEPARATOR.len())
        .position(|w| w == HEADER_SEPARATOR)?;
    Some(bytes.split_at(pos + HEADER_SEPARATOR.len()))
}

/// Remove one trailing NUL terminator, if present.
pub fn strip_terminator(body: &[u8]) -> &[u8] {
    match body.split_last() {
        Some((&FRAME_TERMINATOR, head)) => head,
        _ => body,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn split_uses_first_separator() {
        let (h, r) = split_header(b"A\n\nB\n\nC").unwrap();
        assert_eq!(h, b"A\n\n");
        assert_eq!(r, b"B\n\nC");
    }

    #[test]
    fn split_without_separator() {
        assert!(split_header(b"CONNECTED\nversion:1.2\n").is_none());
        assert!(split_header(b"").is_none());
        assert!(split_header(b"\n").is_none());
    }

    #[test]
    fn split_leading_separator_gives_empty_headers() {
        let (h, r) = split_header(b"\n\nxyz").unwrap();
        assert_eq!(h, b"\n\n");
        assert_eq!(r, b"xyz");
    }

    #[test]
    fn strip_removes_at_most_one_nul() {
        assert_eq!(strip_terminator(b"ab\0\0"), b"ab\0");
        assert_eq!(strip_terminator(b"ab\0"), b"ab");
        assert_eq!(strip_terminator(b"ab"), b"ab");
        assert_eq!(strip_terminator(b"\0"), b"");
        assert_eq!(strip_terminator(b""), b"");
    }

    #[test]
    fn text_passes_through() {
        let frame = "MESSAGE\ndestination:/a\n\nplain\0".to_string();
        let out = normalize(RawPayload::from(frame.clone()), &NormalizeLimits::default());
        assert_eq!(out, Ok(frame));
    }

    #[test]
    fn bare_header_block_is_unrecognized() {
        let err = normalize_binary(b"MESSAGE\n\n", &NormalizeLimits::default()).unwrap_err();
        assert_eq!(err.kind().as_str(), "UNRECOGNIZED_PAYLOAD");
    }

    #[test]
    fn lone_terminator_body_fails_to_inflate() {
        let err = normalize_binary(b"MESSAGE\n\n\0", &NormalizeLimits::default()).unwrap_err();
        assert_eq!(err.kind().as_str(), "DECOMPRESSION");
    }
}
