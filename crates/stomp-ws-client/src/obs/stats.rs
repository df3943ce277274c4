//! Adapter counters stored as relaxed atomics.

use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use stomp_ws_core::ErrorKind;

#[derive(Debug, Default)]
pub struct AdapterStats {
    frames_emitted: AtomicU64,
    frames_sent: AtomicU64,
    dropped_unrecognized: AtomicU64,
    dropped_decompression: AtomicU64,
    dropped_encoding: AtomicU64,
}

/// Point-in-time copy of [`AdapterStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdapterStatsSnapshot {
    pub frames_emitted: u64,
    pub frames_sent: u64,
    pub dropped_unrecognized: u64,
    pub dropped_decompression: u64,
    pub dropped_encoding: u64,
}

impl AdapterStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_emitted(&self) {
        self.frames_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sent(&self) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a dropped inbound payload by its failure kind.
    pub fn record_dropped(&self, kind: ErrorKind) {
        let counter = match kind {
            ErrorKind::UnrecognizedPayload => &self.dropped_unrecognized,
            ErrorKind::Decompression => &self.dropped_decompression,
            ErrorKind::Encoding => &self.dropped_encoding,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> AdapterStatsSnapshot {
        AdapterStatsSnapshot {
            frames_emitted: self.frames_emitted.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            dropped_unrecognized: self.dropped_unrecognized.load(Ordering::Relaxed),
            dropped_decompression: self.dropped_decompression.load(Ordering::Relaxed),
            dropped_encoding: self.dropped_encoding.load(Ordering::Relaxed),
        }
    }
}

impl AdapterStatsSnapshot {
    pub fn dropped_total(&self) -> u64 {
        self.dropped_unrecognized + self.dropped_decompression + self.dropped_encoding
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(512);
        let _ = writeln!(out, "# TYPE stomp_ws_frames_emitted_total counter");
        let _ = writeln!(out, "stomp_ws_frames_emitted_total {}", self.frames_emitted);
        let _ = writeln!(out, "# TYPE stomp_ws_frames_sent_total counter");
        let _ = writeln!(out, "stomp_ws_frames_sent_total {}", self.frames_sent);
        let _ = writeln!(out, "# TYPE stomp_ws_payloads_dropped_total counter");
        for (reason, v) in [
            (ErrorKind::UnrecognizedPayload, self.dropped_unrecognized),
            (ErrorKind::Decompression, self.dropped_decompression),
            (ErrorKind::Encoding, self.dropped_encoding),
        ] {
            let _ = writeln!(
                out,
                "stomp_ws_payloads_dropped_total{{reason=\"{}\"}} {}",
                reason.as_str(),
                v
            );
        }
        out
    }
}
