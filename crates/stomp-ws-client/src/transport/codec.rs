//! Decode-once mapping from tungstenite messages to transport events.
//!
//! - Text/Binary frames => `RawPayload` for the normalizer
//! - Ping/Pong are surfaced but answered by tungstenite itself
//! - Close carries the peer's status code and reason

use bytes::Bytes;
use tokio_tungstenite::tungstenite::Message;

use stomp_ws_core::protocol::RawPayload;

use super::CLOSE_NO_STATUS;

#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    Payload(RawPayload),
    Ping(Bytes),
    Pong(Bytes),
    Close { code: u16, reason: String },
    /// Raw frames never reach a reader; kept for exhaustiveness.
    Ignored,
}

pub fn decode(msg: Message) -> Inbound {
    match msg {
        Message::Text(t) => Inbound::Payload(RawPayload::Text(t.as_str().to_owned())),
        Message::Binary(b) => Inbound::Payload(RawPayload::Binary(b)),
        Message::Ping(p) => Inbound::Ping(p),
        Message::Pong(p) => Inbound::Pong(p),
        Message::Close(Some(frame)) => Inbound::Close {
            code: u16::from(frame.code),
            reason: frame.reason.as_str().to_owned(),
        },
        Message::Close(None) => Inbound::Close {
            code: CLOSE_NO_STATUS,
            reason: String::new(),
        },
        Message::Frame(_) => Inbound::Ignored,
    }
}
