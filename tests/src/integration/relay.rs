//! # Relay Scenarios
//!
//! ```text
//! alice ──"alice: hi"──► Hub ──► bob
//!                         └─x──► alice (never echoed)
//!
//! alice ══flood══► Hub ══► bob (not reading, queue full)
//!                   └── evict bob: unregister + close transport
//! ```

use super::fixtures::{TestServer, ALICE, BOB};
use dg_cli::CallerSession;
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};

async fn next_text(socket: &mut super::fixtures::Socket) -> String {
    let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await
        .expect("timed out waiting for a frame");
    match frame {
        Some(Ok(Message::Text(text))) => text.as_str().to_string(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

async fn assert_silent(socket: &mut super::fixtures::Socket) {
    let frame = tokio::time::timeout(Duration::from_millis(200), socket.next()).await;
    assert!(frame.is_err(), "unexpected frame: {frame:?}");
}

fn refused_with(result: Result<super::fixtures::Socket, WsError>, status: u16) {
    match result {
        Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), status),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("connection should have been refused"),
    }
}

#[tokio::test]
async fn test_connect_without_certificate_is_refused() {
    let server = TestServer::start().await;
    refused_with(server.dial(None).await, 401);
    refused_with(server.dial(Some("not base64 at all")).await, 401);
    assert_eq!(server.hub.stats().await.unwrap().sessions, 0);
}

#[tokio::test]
async fn test_connect_with_root_certificate_is_refused() {
    let server = TestServer::start().await;
    refused_with(server.dial(Some(&server.root_certificate_b64())).await, 401);
}

#[tokio::test]
async fn test_relay_between_two_sessions_without_echo() {
    let server = TestServer::start().await;
    let mut alice = server.join(ALICE).await;
    let mut bob = server.join(BOB).await;
    server.wait_for_sessions(2).await;

    alice.send(Message::text("alice: hi")).await.unwrap();
    assert_eq!(next_text(&mut bob).await, "alice: hi");
    assert_silent(&mut alice).await;

    bob.send(Message::text("bob: hello alice")).await.unwrap();
    assert_eq!(next_text(&mut alice).await, "bob: hello alice");
    assert_silent(&mut bob).await;
}

#[tokio::test]
async fn test_closing_session_unregisters() {
    let server = TestServer::start().await;
    let mut alice = server.join(ALICE).await;
    let _bob = server.join(BOB).await;
    server.wait_for_sessions(2).await;

    alice.close(None).await.unwrap();
    server.wait_for_sessions(1).await;
}

#[tokio::test]
async fn test_caller_session_over_relay() {
    let server = TestServer::start().await;
    let alice = server.join(ALICE).await;
    let mut bob = server.join(BOB).await;
    server.wait_for_sessions(2).await;

    let input: &'static [u8] = b"hello bob\nbye\n";
    let result = CallerSession::new("alice", false)
        .run(alice, input, tokio::io::sink())
        .await;
    assert!(result.is_ok());

    assert_eq!(next_text(&mut bob).await, "alice: hello bob");
    assert_eq!(next_text(&mut bob).await, "alice: is going away");
    server.wait_for_sessions(1).await;
}

#[tokio::test]
async fn test_slow_reader_is_evicted_and_disconnected() {
    let server = TestServer::start_with(|config| config.hub.outbound_capacity = 4).await;
    let mut alice = server.join(ALICE).await;
    let mut bob = server.join(BOB).await;
    server.wait_for_sessions(2).await;

    // Enough data to fill the socket buffers while bob never reads.
    let chunk = "x".repeat(128 * 1024);
    for n in 0..256 {
        alice.send(Message::text(format!("alice: {n} {chunk}"))).await.unwrap();
    }
    server.wait_for_sessions(1).await;

    // Bob's transport ends after whatever was already in flight.
    let drained = tokio::time::timeout(Duration::from_secs(10), async {
        let mut frames = 0usize;
        while let Some(Ok(Message::Text(_))) = bob.next().await {
            frames += 1;
        }
        frames
    })
    .await
    .expect("evicted session was never disconnected");
    assert!(drained < 256);

    // The sender keeps its session.
    alice.send(Message::text("alice: still here")).await.unwrap();
    assert_silent(&mut alice).await;
    assert_eq!(server.hub.stats().await.unwrap().sessions, 1);
}
