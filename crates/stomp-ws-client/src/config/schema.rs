use serde::Deserialize;
use stomp_ws_core::error::{Result, StompWsError};
use stomp_ws_core::protocol::normalize::DEFAULT_MAX_INFLATED_BYTES;
use stomp_ws_core::protocol::NormalizeLimits;

use crate::transport::Headers;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub version: u32,

    pub connection: ConnectionSection,

    #[serde(default)]
    pub normalizer: NormalizerSection,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(StompWsError::UnsupportedVersion);
        }

        self.connection.validate()?;
        self.normalizer.validate()?;

        Ok(())
    }

    pub fn limits(&self) -> NormalizeLimits {
        NormalizeLimits {
            max_inflated_bytes: self.normalizer.max_inflated_bytes,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionSection {
    pub uri: String,

    /// Extra handshake request headers.
    #[serde(default)]
    pub headers: Headers,

    /// Raw STOMP frames sent once the socket is open (e.g. CONNECT, SUBSCRIBE).
    #[serde(default)]
    pub send_on_open: Vec<String>,
}

impl ConnectionSection {
    pub fn validate(&self) -> Result<()> {
        let uri = self.uri.trim();
        if !(uri.starts_with("ws://") || uri.starts_with("wss://")) {
            return Err(StompWsError::BadConfig(
                "connection.uri must start with ws:// or wss://".into(),
            ));
        }
        if self.headers.keys().any(|k| k.trim().is_empty()) {
            return Err(StompWsError::BadConfig(
                "connection.headers must not contain empty names".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormalizerSection {
    #[serde(default = "default_max_inflated_bytes")]
    pub max_inflated_bytes: usize,
}

impl Default for NormalizerSection {
    fn default() -> Self {
        Self {
            max_inflated_bytes: default_max_inflated_bytes(),
        }
    }
}

impl NormalizerSection {
    pub fn validate(&self) -> Result<()> {
        if !(1024..=256 * 1024 * 1024).contains(&self.max_inflated_bytes) {
            return Err(StompWsError::BadConfig(
                "normalizer.max_inflated_bytes must be between 1024 and 268435456".into(),
            ));
        }
        Ok(())
    }
}

fn default_max_inflated_bytes() -> usize {
    DEFAULT_MAX_INFLATED_BYTES
}
