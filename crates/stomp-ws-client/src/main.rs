//! stomp-ws client
//!
//! Connects to a STOMP-over-WebSocket endpoint and prints every normalized
//! frame to stdout (NUL terminators shown as `^@`).
//! - Config: first argument, default `stomp-ws.yaml`
//! - `connection.send_on_open` frames are sent after the socket opens
//! - Ctrl-C requests a normal closure; the process exits on `Closed`

use std::sync::Arc;

use tracing_subscriber::{fmt, EnvFilter};

use stomp_ws_client::config;
use stomp_ws_client::transport::TungsteniteTransport;
use stomp_ws_client::{ConnectionAdapter, LifecycleEvent};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "stomp-ws.yaml".into());
    let cfg = config::load_from_file(&path).expect("config load failed");

    let (adapter, mut streams) =
        ConnectionAdapter::new(Arc::new(TungsteniteTransport::new()), cfg.limits());

    tracing::info!(uri = %cfg.connection.uri, "stomp-ws-client starting");
    if let Err(e) = adapter
        .connect(&cfg.connection.uri, Some(cfg.connection.headers.clone()))
        .await
    {
        tracing::error!(error = %e, "connect failed");
        return;
    }

    let mut closing = false;
    loop {
        tokio::select! {
            event = streams.lifecycle.recv() => {
                let Some(event) = event else { break; };
                match event {
                    LifecycleEvent::Opened { headers } => {
                        tracing::info!(?headers, "opened");
                        for frame in &cfg.connection.send_on_open {
                            if let Err(e) = adapter.send(frame) {
                                tracing::warn!(error = %e, "send_on_open failed");
                            }
                        }
                    }
                    LifecycleEvent::Error { cause } => tracing::error!(%cause, "transport error"),
                    LifecycleEvent::Closed => break,
                }
            }

            frame = streams.messages.recv() => {
                let Some(frame) = frame else { break; };
                println!("{}", frame.replace('\0', "^@"));
            }

            _ = tokio::signal::ctrl_c(), if !closing => {
                closing = true;
                tracing::info!("interrupt: disconnecting");
                adapter.disconnect();
            }
        }
    }

    // frames that arrived before Closed
    while let Ok(frame) = streams.messages.try_recv() {
        println!("{}", frame.replace('\0', "^@"));
    }

    let stats = adapter.stats();
    tracing::info!(
        emitted = stats.frames_emitted,
        sent = stats.frames_sent,
        dropped = stats.dropped_total(),
        "stomp-ws-client stopped"
    );
    tracing::debug!("counters:\n{}", stats.render());
}
