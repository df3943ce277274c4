//! stomp-ws client library entry.
//!
//! This crate wires the WebSocket transport, the connection adapter and the
//! core frame normalizer into a client stack that hands canonical STOMP frames
//! to an upstream STOMP client. It is consumed by the binary (`main.rs`) and
//! by integration tests.

pub mod adapter;
pub mod config;
pub mod event;
pub mod obs;
pub mod transport;

pub use adapter::{AdapterStreams, ConnectionAdapter};
pub use event::{ConnectionState, LifecycleEvent};
