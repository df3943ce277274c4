//! Connection adapter: WebSocket session lifecycle -> STOMP client streams.
//!
//! Responsibilities:
//! - Own at most one live session (`connect` / `disconnect`)
//! - Forward outbound frames as text messages (`send`)
//! - Turn transport callbacks into `LifecycleEvent`s
//! - Run every inbound payload through the frame normalizer
//!
//! State machine:
//! Disconnected -> (connect) -> Connecting -> (on_open) -> Connected
//! -> (on_closed | on_failure) -> Disconnected.
//!
//! Callbacks never block: events go out on unbounded channels, in the order
//! the transport delivered them. A payload that fails to normalize is counted
//! and dropped; it never touches connection state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use tokio::sync::mpsc;

use stomp_ws_core::error::{Result, StompWsError};
use stomp_ws_core::protocol::{normalize, NormalizeLimits, RawPayload};

use crate::event::{ConnectionState, LifecycleEvent};
use crate::obs::{AdapterStats, AdapterStatsSnapshot};
use crate::transport::{
    same_session, Headers, TransportListener, WsSession, WsTransport, CLOSE_NORMAL,
};

/// Receiving ends handed to the upstream STOMP client.
#[derive(Debug)]
pub struct AdapterStreams {
    pub lifecycle: mpsc::UnboundedReceiver<LifecycleEvent>,
    /// Canonical, NUL-terminated STOMP frames.
    pub messages: mpsc::UnboundedReceiver<String>,
}

pub struct ConnectionAdapter {
    transport: Arc<dyn WsTransport>,
    inner: Arc<AdapterInner>,
}

struct AdapterInner {
    limits: NormalizeLimits,
    slot: Mutex<SessionSlot>,
    lifecycle_tx: mpsc::UnboundedSender<LifecycleEvent>,
    messages_tx: mpsc::UnboundedSender<String>,
    stats: AdapterStats,
}

#[derive(Default)]
struct SessionSlot {
    state: ConnectionState,
    session: Option<Arc<dyn WsSession>>,
}

impl ConnectionAdapter {
    pub fn new(transport: Arc<dyn WsTransport>, limits: NormalizeLimits) -> (Self, AdapterStreams) {
        let (lifecycle_tx, lifecycle) = mpsc::unbounded_channel();
        let (messages_tx, messages) = mpsc::unbounded_channel();

        let inner = Arc::new(AdapterInner {
            limits,
            slot: Mutex::new(SessionSlot::default()),
            lifecycle_tx,
            messages_tx,
            stats: AdapterStats::new(),
        });

        (Self { transport, inner }, AdapterStreams { lifecycle, messages })
    }

    /// Open a session to `uri`. Absent headers mean none.
    ///
    /// An open failure is returned and also reported as `Error` then `Closed`.
    pub async fn connect(&self, uri: &str, headers: Option<Headers>) -> Result<()> {
        {
            let mut slot = self.inner.slot();
            if slot.state != ConnectionState::Disconnected {
                return Err(StompWsError::AlreadyConnected);
            }
            slot.state = ConnectionState::Connecting;
        }

        let headers = headers.unwrap_or_default();
        let listener: Arc<dyn TransportListener> = self.inner.clone();

        tracing::info!(%uri, headers = headers.len(), "opening websocket");
        let session = match self.transport.open(uri, &headers, listener).await {
            Ok(s) => s,
            Err(e) => {
                self.inner.slot().state = ConnectionState::Disconnected;
                tracing::warn!(%uri, error = %e, "websocket open failed");
                self.inner.emit_lifecycle(LifecycleEvent::Error { cause: e.to_string() });
                self.inner.emit_lifecycle(LifecycleEvent::Closed);
                return Err(e);
            }
        };

        // on_open normally stored the session already
        let mut slot = self.inner.slot();
        if slot.state == ConnectionState::Disconnected {
            tracing::debug!(%uri, "session ended before open() returned");
        } else if slot.session.is_none() {
            slot.session = Some(session);
        }
        Ok(())
    }

    /// Forward a complete STOMP frame as a text message.
    pub fn send(&self, frame: &str) -> Result<()> {
        let session = self.inner.current_session().ok_or(StompWsError::NotConnected)?;
        session.send_text(frame.to_owned())?;
        self.inner.stats.record_sent();
        Ok(())
    }

    /// Request a normal closure. Completion arrives as `Closed`.
    pub fn disconnect(&self) {
        let Some(session) = self.inner.current_session() else {
            return;
        };
        if let Err(e) = session.close(CLOSE_NORMAL, "") {
            tracing::debug!(error = %e, "close request failed");
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.slot().state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    pub fn stats(&self) -> AdapterStatsSnapshot {
        self.inner.stats.snapshot()
    }
}

impl AdapterInner {
    fn slot(&self) -> MutexGuard<'_, SessionSlot> {
        // the slot holds no invariant a panicking holder could break
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_session(&self) -> Option<Arc<dyn WsSession>> {
        self.slot().session.clone()
    }

    /// Clear the slot unless it already holds a different session.
    /// Returns false for a stale session, whose callbacks are ignored.
    fn release(&self, session: &Arc<dyn WsSession>) -> bool {
        let mut slot = self.slot();
        let stale = matches!(&slot.session, Some(current) if !same_session(current, session));
        if stale {
            return false;
        }
        slot.session = None;
        slot.state = ConnectionState::Disconnected;
        true
    }

    fn emit_lifecycle(&self, event: LifecycleEvent) {
        tracing::debug!(event = event.name(), "lifecycle");
        let _ = self.lifecycle_tx.send(event);
    }

    fn accept(&self, payload: RawPayload) {
        match normalize(payload, &self.limits) {
            Ok(frame) => {
                self.stats.record_emitted();
                let _ = self.messages_tx.send(frame);
            }
            Err(kind) => self.stats.record_dropped(kind),
        }
    }
}

impl TransportListener for AdapterInner {
    fn on_open(&self, session: &Arc<dyn WsSession>, response_headers: Headers) {
        {
            // stored before Opened goes out, so send() works from its handler
            let mut slot = self.slot();
            if slot.state == ConnectionState::Connecting {
                slot.state = ConnectionState::Connected;
                slot.session = Some(session.clone());
            }
        }
        tracing::info!(headers = response_headers.len(), "websocket opened");
        self.emit_lifecycle(LifecycleEvent::Opened {
            headers: response_headers,
        });
    }

    fn on_text_message(&self, _session: &Arc<dyn WsSession>, text: String) {
        self.accept(RawPayload::from(text));
    }

    fn on_binary_message(&self, _session: &Arc<dyn WsSession>, bytes: Bytes) {
        self.accept(RawPayload::from(bytes));
    }

    fn on_closing(&self, session: &Arc<dyn WsSession>, code: u16, reason: &str) {
        tracing::debug!(code, %reason, "peer is closing");
        if let Err(e) = session.close(code, reason) {
            tracing::debug!(error = %e, "close acknowledgement failed");
        }
    }

    fn on_closed(&self, session: &Arc<dyn WsSession>, code: u16, reason: &str) {
        if !self.release(session) {
            tracing::debug!(code, "ignoring close from a stale session");
            return;
        }
        tracing::info!(code, %reason, "websocket closed");
        self.emit_lifecycle(LifecycleEvent::Closed);
    }

    fn on_failure(&self, session: &Arc<dyn WsSession>, cause: StompWsError) {
        tracing::warn!(error = %cause, "websocket failed");
        if !self.release(session) {
            tracing::debug!("ignoring failure from a stale session");
            return;
        }
        // Error is always immediately followed by its Closed
        self.emit_lifecycle(LifecycleEvent::Error {
            cause: cause.to_string(),
        });
        self.emit_lifecycle(LifecycleEvent::Closed);
    }
}
