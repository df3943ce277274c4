//! Transport layer (WebSocket).
//!
//! The adapter talks to the socket only through these traits, so the
//! tungstenite implementation in [`ws`] can be swapped for another client or a
//! test double. Callbacks for one session are delivered in order from a single
//! task and must not block.

pub mod codec;
pub mod ws;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use stomp_ws_core::error::{Result, StompWsError};

pub use ws::TungsteniteTransport;

/// Ordered HTTP header map (request and handshake response).
pub type Headers = BTreeMap<String, String>;

/// Normal closure status code.
pub const CLOSE_NORMAL: u16 = 1000;
/// Reported when the peer's close frame carried no status.
pub const CLOSE_NO_STATUS: u16 = 1005;

/// One open WebSocket session.
pub trait WsSession: Send + Sync {
    /// Queue a text message. Fails with `NotConnected` once the session is gone.
    fn send_text(&self, text: String) -> Result<()>;

    /// Start the close handshake. Repeated calls are no-ops.
    fn close(&self, code: u16, reason: &str) -> Result<()>;
}

/// Callback surface a transport drives for each session.
pub trait TransportListener: Send + Sync {
    fn on_open(&self, session: &Arc<dyn WsSession>, response_headers: Headers);
    fn on_text_message(&self, session: &Arc<dyn WsSession>, text: String);
    fn on_binary_message(&self, session: &Arc<dyn WsSession>, bytes: Bytes);
    /// Peer started the close handshake.
    fn on_closing(&self, session: &Arc<dyn WsSession>, code: u16, reason: &str);
    /// Close handshake finished; no further callbacks for this session.
    fn on_closed(&self, session: &Arc<dyn WsSession>, code: u16, reason: &str);
    /// Session failed; no further callbacks for this session.
    fn on_failure(&self, session: &Arc<dyn WsSession>, cause: StompWsError);
}

/// Opens sessions.
#[async_trait]
pub trait WsTransport: Send + Sync {
    /// Open `uri` with request `headers`. Errors here are returned only; the
    /// listener is not notified for a session that never opened.
    async fn open(
        &self,
        uri: &str,
        headers: &Headers,
        listener: Arc<dyn TransportListener>,
    ) -> Result<Arc<dyn WsSession>>;
}

/// Identity comparison for session handles (data pointer only).
pub fn same_session(a: &Arc<dyn WsSession>, b: &Arc<dyn WsSession>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}
