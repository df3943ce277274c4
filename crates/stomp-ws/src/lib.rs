//! Top-level facade crate for stomp-ws.
//!
//! Re-exports the core normalizer and the client library so users can depend on a single crate.

pub mod core {
    pub use stomp_ws_core::*;
}

pub mod client {
    pub use stomp_ws_client::*;
}
