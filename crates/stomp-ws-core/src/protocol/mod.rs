//! Protocol modules (payload model, zlib inflater, frame normalizer).
//!
//! Inbound WebSocket payloads come in two lanes:
//! - Text: already a STOMP frame, passed through untouched.
//! - Binary: `<header>\n\n<zlib body>[\0]`, inflated into a text frame.
//!
//! All parsers are panic-free: malformed input is reported as `StompWsError`
//! instead of panicking or indexing raw buffers out of bounds.

pub mod inflate;
pub mod normalize;
pub mod payload;

pub use normalize::{normalize, normalize_binary, normalize_text, NormalizeLimits};
pub use payload::RawPayload;
