//! stomp-ws core: transport-agnostic frame normalization and error types.
//!
//! This crate turns raw WebSocket payloads into canonical STOMP frame strings,
//! inflating zlib-compressed bodies while keeping the header block intact. It
//! carries no transport or runtime dependencies so it can be reused by any
//! WebSocket client.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `StompWsError`/`Result` so a hostile or
//! corrupted payload can never take the connection down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ErrorKind, Result, StompWsError};
