//! Lifecycle events and connection state exposed to the upstream client.

use std::collections::BTreeMap;

/// Connection-state notification, separate from frame messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Handshake completed; carries the response headers.
    Opened { headers: BTreeMap<String, String> },
    /// Transport failure. Always followed by `Closed`.
    Error { cause: String },
    /// Session is gone.
    Closed,
}

impl LifecycleEvent {
    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Opened { .. } => "opened",
            LifecycleEvent::Error { .. } => "error",
            LifecycleEvent::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}
