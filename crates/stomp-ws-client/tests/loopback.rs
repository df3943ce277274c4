//! End-to-end tests against a local tungstenite server.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::io::Write;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use stomp_ws_client::transport::{Headers, TungsteniteTransport};
use stomp_ws_client::{AdapterStreams, ConnectionAdapter, ConnectionState, LifecycleEvent};
use stomp_ws_core::protocol::NormalizeLimits;

const WAIT: Duration = Duration::from_secs(5);

fn zlib(data: &[u8]) -> Vec<u8> {
    let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// Accept one client; echo its `X-Client` request header back in the response.
async fn accept_one(listener: TcpListener) -> WebSocketStream<tokio::net::TcpStream> {
    let (tcp, _) = listener.accept().await.unwrap();
    let callback = |req: &Request, mut resp: Response| {
        if let Some(v) = req.headers().get("x-client") {
            resp.headers_mut().insert("x-echo-client", v.clone());
        }
        Ok::<Response, ErrorResponse>(resp)
    };
    tokio_tungstenite::accept_hdr_async(tcp, callback).await.unwrap()
}

async fn bind() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

async fn connect(addr: SocketAddr) -> (ConnectionAdapter, AdapterStreams) {
    let (adapter, streams) =
        ConnectionAdapter::new(Arc::new(TungsteniteTransport::new()), NormalizeLimits::default());
    let mut headers = Headers::new();
    headers.insert("X-Client".into(), "demo".into());
    adapter
        .connect(&format!("ws://{addr}/ws"), Some(headers))
        .await
        .unwrap();
    (adapter, streams)
}

async fn next_event(streams: &mut AdapterStreams) -> LifecycleEvent {
    timeout(WAIT, streams.lifecycle.recv()).await.unwrap().unwrap()
}

async fn next_frame(streams: &mut AdapterStreams) -> String {
    timeout(WAIT, streams.messages.recv()).await.unwrap().unwrap()
}

#[tokio::test]
async fn frames_flow_and_server_close_is_acknowledged() {
    let (listener, addr) = bind().await;

    let server = tokio::spawn(async move {
        let mut ws = accept_one(listener).await;

        let mut compressed = b"MESSAGE\ndestination:/foo\n\n".to_vec();
        compressed.extend_from_slice(&zlib(b"hello"));
        compressed.push(0);

        ws.send(Message::text("CONNECTED\nversion:1.2\n\n\0")).await.unwrap();
        ws.send(Message::binary(b"junk".to_vec())).await.unwrap();
        ws.send(Message::binary(compressed)).await.unwrap();

        let sent = match ws.next().await.unwrap().unwrap() {
            Message::Text(t) => t.as_str().to_owned(),
            other => panic!("expected text, got {other:?}"),
        };
        ws.send(Message::text(sent.replacen("SEND", "MESSAGE", 1))).await.unwrap();

        ws.close(Some(CloseFrame {
            code: CloseCode::Away,
            reason: "bye".into(),
        }))
        .await
        .unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    let (adapter, mut streams) = connect(addr).await;

    match next_event(&mut streams).await {
        LifecycleEvent::Opened { headers } => {
            assert_eq!(headers.get("x-echo-client").map(String::as_str), Some("demo"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(adapter.is_connected());

    assert_eq!(next_frame(&mut streams).await, "CONNECTED\nversion:1.2\n\n\0");
    assert_eq!(next_frame(&mut streams).await, "MESSAGE\ndestination:/foo\n\nhello\0");

    adapter.send("SEND\ndestination:/q\n\nping\0").unwrap();
    assert_eq!(next_frame(&mut streams).await, "MESSAGE\ndestination:/q\n\nping\0");

    assert_eq!(next_event(&mut streams).await, LifecycleEvent::Closed);
    assert_eq!(adapter.state(), ConnectionState::Disconnected);

    let stats = adapter.stats();
    assert_eq!(stats.frames_emitted, 3);
    assert_eq!(stats.dropped_unrecognized, 1);
    assert_eq!(stats.frames_sent, 1);

    timeout(WAIT, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn client_disconnect_completes_with_closed() {
    let (listener, addr) = bind().await;

    let server = tokio::spawn(async move {
        let mut ws = accept_one(listener).await;
        let mut close_code = None;
        while let Some(Ok(msg)) = ws.next().await {
            if let Message::Close(Some(frame)) = msg {
                close_code = Some(u16::from(frame.code));
            }
        }
        close_code
    });

    let (adapter, mut streams) = connect(addr).await;
    assert!(matches!(next_event(&mut streams).await, LifecycleEvent::Opened { .. }));

    adapter.disconnect();
    assert_eq!(next_event(&mut streams).await, LifecycleEvent::Closed);
    assert_eq!(adapter.state(), ConnectionState::Disconnected);
    assert_eq!(adapter.send("late").unwrap_err().kind().as_str(), "NOT_CONNECTED");

    let code = timeout(WAIT, server).await.unwrap().unwrap();
    assert_eq!(code, Some(1000));
}

#[tokio::test]
async fn dropped_connection_is_error_then_closed() {
    let (listener, addr) = bind().await;

    let server = tokio::spawn(async move {
        let ws = accept_one(listener).await;
        drop(ws);
    });

    let (adapter, mut streams) = connect(addr).await;
    assert!(matches!(next_event(&mut streams).await, LifecycleEvent::Opened { .. }));
    timeout(WAIT, server).await.unwrap().unwrap();

    assert!(matches!(next_event(&mut streams).await, LifecycleEvent::Error { .. }));
    assert_eq!(next_event(&mut streams).await, LifecycleEvent::Closed);
    assert_eq!(adapter.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn refused_connection_fails_connect() {
    let (listener, addr) = bind().await;
    drop(listener);

    let (adapter, mut streams) =
        ConnectionAdapter::new(Arc::new(TungsteniteTransport::new()), NormalizeLimits::default());
    let err = adapter.connect(&format!("ws://{addr}/ws"), None).await.unwrap_err();
    assert_eq!(err.kind().as_str(), "TRANSPORT");

    assert!(matches!(next_event(&mut streams).await, LifecycleEvent::Error { .. }));
    assert_eq!(next_event(&mut streams).await, LifecycleEvent::Closed);
}
