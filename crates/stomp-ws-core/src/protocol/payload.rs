//! Raw inbound payload as delivered by a WebSocket transport.

use bytes::Bytes;

/// One inbound transport message, consumed once by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    /// Text message (a plain STOMP frame).
    Text(String),
    /// Binary message (header block plus compressed body).
    Binary(Bytes),
}

impl RawPayload {
    /// Payload size in bytes.
    pub(crate) fn len(&self) -> usize {
        match self {
            RawPayload::Text(s) => s.len(),
            RawPayload::Binary(b) => b.len(),
        }
    }
}

impl From<String> for RawPayload {
    fn from(s: String) -> Self {
        RawPayload::Text(s)
    }
}

impl From<Bytes> for RawPayload {
    fn from(b: Bytes) -> Self {
        RawPayload::Binary(b)
    }
}
