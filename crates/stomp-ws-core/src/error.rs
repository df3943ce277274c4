//! Shared error type across stomp-ws crates.

use thiserror::Error;

/// Stable error kinds (used in logs, counters and test vectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Binary payload without a header/body separator.
    UnrecognizedPayload,
    /// Malformed, truncated or oversized compressed body.
    Decompression,
    /// Bytes that are not the expected text encoding.
    Encoding,
    /// No open session.
    NotConnected,
    /// A session is already live.
    AlreadyConnected,
    /// Failure reported by the WebSocket transport.
    Transport,
    /// Invalid configuration.
    BadConfig,
    /// Unsupported configuration version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnrecognizedPayload => "UNRECOGNIZED_PAYLOAD",
            ErrorKind::Decompression => "DECOMPRESSION",
            ErrorKind::Encoding => "ENCODING",
            ErrorKind::NotConnected => "NOT_CONNECTED",
            ErrorKind::AlreadyConnected => "ALREADY_CONNECTED",
            ErrorKind::Transport => "TRANSPORT",
            ErrorKind::BadConfig => "BAD_CONFIG",
            ErrorKind::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StompWsError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum StompWsError {
    #[error("unrecognized payload: no header/body separator")]
    UnrecognizedPayload,
    #[error("decompression failed: {0}")]
    Decompression(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("not connected")]
    NotConnected,
    #[error("already connected")]
    AlreadyConnected,
    #[error("transport: {0}")]
    Transport(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl StompWsError {
    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StompWsError::UnrecognizedPayload => ErrorKind::UnrecognizedPayload,
            StompWsError::Decompression(_) => ErrorKind::Decompression,
            StompWsError::Encoding(_) => ErrorKind::Encoding,
            StompWsError::NotConnected => ErrorKind::NotConnected,
            StompWsError::AlreadyConnected => ErrorKind::AlreadyConnected,
            StompWsError::Transport(_) => ErrorKind::Transport,
            StompWsError::BadConfig(_) => ErrorKind::BadConfig,
            StompWsError::UnsupportedVersion => ErrorKind::UnsupportedVersion,
            StompWsError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Per-payload failures that the normalizer swallows instead of surfacing.
    pub fn is_payload_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UnrecognizedPayload | ErrorKind::Decompression | ErrorKind::Encoding
        )
    }
}
