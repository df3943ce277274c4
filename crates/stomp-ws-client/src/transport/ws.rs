//! WebSocket transport on `tokio-tungstenite`.
//!
//! Responsibilities:
//! - Build the handshake request (uri + request headers)
//! - Report the handshake response headers through `on_open`
//! - One reader task: decode once, dispatch callbacks in delivery order
//! - One writer task: drain the session's outbound queue into the socket
//!
//! A stream that ends without a close frame is reported as a failure, which
//! the adapter turns into `Error` then `Closed`.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderMap, HeaderName, HeaderValue, Request};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use stomp_ws_core::error::{Result, StompWsError};
use stomp_ws_core::protocol::RawPayload;

use super::codec::{decode, Inbound};
use super::{Headers, TransportListener, WsSession, WsTransport};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Transport backed by `tokio_tungstenite::connect_async`.
#[derive(Debug, Default, Clone)]
pub struct TungsteniteTransport;

impl TungsteniteTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WsTransport for TungsteniteTransport {
    async fn open(
        &self,
        uri: &str,
        headers: &Headers,
        listener: Arc<dyn TransportListener>,
    ) -> Result<Arc<dyn WsSession>> {
        let request = build_request(uri, headers)?;

        let (stream, response) = connect_async(request)
            .await
            .map_err(|e| StompWsError::Transport(format!("connect {uri} failed: {e}")))?;

        let (out_tx, out_rx) = mpsc::unbounded_channel::<Message>();
        let channel = Arc::new(ChannelSession::new(out_tx));
        let session: Arc<dyn WsSession> = channel.clone();

        listener.on_open(&session, headers_as_map(response.headers()));

        let (ws_tx, ws_rx) = stream.split();
        tokio::spawn(write_loop(ws_tx, out_rx));
        tokio::spawn(read_loop(ws_rx, channel, listener));

        Ok(session)
    }
}

/// Handshake request with the caller's headers appended.
pub fn build_request(uri: &str, headers: &Headers) -> Result<Request<()>> {
    let mut request = uri
        .into_client_request()
        .map_err(|e| StompWsError::Transport(format!("invalid uri {uri}: {e}")))?;

    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| StompWsError::Transport(format!("invalid header name {name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| StompWsError::Transport(format!("invalid header value for {name}: {e}")))?;
        request.headers_mut().append(name, value);
    }

    Ok(request)
}

/// Flatten response headers; the last value wins for repeated names.
pub fn headers_as_map(headers: &HeaderMap) -> Headers {
    let mut map = Headers::new();
    for (name, value) in headers {
        match value.to_str() {
            Ok(v) => {
                map.insert(name.as_str().to_owned(), v.to_owned());
            }
            Err(_) => tracing::debug!(header = %name, "skipping non-text response header"),
        }
    }
    map
}

/// Session handle: a sender into the writer task's queue.
struct ChannelSession {
    tx: mpsc::UnboundedSender<Message>,
    /// Code and reason of the close frame we sent, if any.
    local_close: Mutex<Option<(u16, String)>>,
}

impl ChannelSession {
    fn new(tx: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            tx,
            local_close: Mutex::new(None),
        }
    }

    fn local_close(&self) -> Option<(u16, String)> {
        self.local_close
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl WsSession for ChannelSession {
    fn send_text(&self, text: String) -> Result<()> {
        if self.local_close().is_some() {
            return Err(StompWsError::NotConnected);
        }
        self.tx
            .send(Message::text(text))
            .map_err(|_| StompWsError::NotConnected)
    }

    fn close(&self, code: u16, reason: &str) -> Result<()> {
        {
            let mut sent = self.local_close.lock().unwrap_or_else(PoisonError::into_inner);
            if sent.is_some() {
                return Ok(());
            }
            *sent = Some((code, reason.to_owned()));
        }
        let frame = CloseFrame {
            code: CloseCode::from(code),
            reason: reason.to_owned().into(),
        };
        self.tx
            .send(Message::Close(Some(frame)))
            .map_err(|_| StompWsError::NotConnected)
    }
}

async fn write_loop(
    mut ws_tx: SplitSink<WsStream, Message>,
    mut out_rx: mpsc::UnboundedReceiver<Message>,
) {
    while let Some(msg) = out_rx.recv().await {
        let is_close = matches!(msg, Message::Close(_));
        if let Err(e) = ws_tx.send(msg).await {
            tracing::debug!(error = %e, "websocket write failed");
            break;
        }
        if is_close {
            break;
        }
    }
}

async fn read_loop(
    mut ws_rx: SplitStream<WsStream>,
    channel: Arc<ChannelSession>,
    listener: Arc<dyn TransportListener>,
) {
    let session: Arc<dyn WsSession> = channel.clone();
    let mut peer_close: Option<(u16, String)> = None;

    while let Some(incoming) = ws_rx.next().await {
        let msg = match incoming {
            Ok(msg) => msg,
            Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => break,
            Err(e) => {
                listener.on_failure(&session, StompWsError::Transport(e.to_string()));
                return;
            }
        };

        match decode(msg) {
            Inbound::Payload(RawPayload::Text(text)) => listener.on_text_message(&session, text),
            Inbound::Payload(RawPayload::Binary(bytes)) => {
                listener.on_binary_message(&session, bytes)
            }
            Inbound::Close { code, reason } => {
                listener.on_closing(&session, code, &reason);
                peer_close = Some((code, reason));
            }
            // tungstenite answers pings on its own
            Inbound::Ping(_) | Inbound::Pong(_) | Inbound::Ignored => {}
        }
    }

    // a handshake we started counts as a clean close too
    match peer_close.or_else(|| channel.local_close()) {
        Some((code, reason)) => listener.on_closed(&session, code, &reason),
        None => listener.on_failure(
            &session,
            StompWsError::Transport("connection ended without a close frame".into()),
        ),
    }
}
