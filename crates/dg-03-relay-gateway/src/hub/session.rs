//! Server side of a session: the read and write pumps.
//!
//! The read loop forwards text frames to the hub. The write loop drains the
//! outbound queue onto the socket. When the queue closes or the hub evicts
//! the session it sends a close frame, bounded by [`CLOSE_GRACE`], and tells
//! the read loop to stop.

use crate::domain::session_id::SessionId;
use crate::hub::broadcaster::{HubHandle, SessionHandle, SessionQueue};
use crate::hub::CLOSE_GRACE;
use axum::extract::ws::{Message, WebSocket};
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Display;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Register a freshly upgraded socket with the hub and pump it until either
/// side goes away.
pub async fn run_session(socket: WebSocket, alias: String, hub: HubHandle, capacity: usize) {
    let (session, outbound) = SessionHandle::new(alias, capacity);
    let id = session.id();
    let alias = session.alias().to_string();

    if hub.register(session).await.is_err() {
        warn!(session_id = %id, "Hub unavailable, dropping connection");
        return;
    }
    info!(session_id = %id, alias = %alias, "Session started");

    let (sink, stream) = socket.split();
    let (teardown_tx, teardown_rx) = oneshot::channel();

    let writer = tokio::spawn(write_loop(id, sink, outbound, teardown_tx));
    let reader = tokio::spawn(read_loop(id, stream, hub, teardown_rx));
    let _ = tokio::join!(writer, reader);

    info!(session_id = %id, alias = %alias, "Session ended");
}

/// Forward inbound text frames to the hub until the peer leaves, the
/// transport fails, or the writer tears the session down. Always
/// unregisters on exit.
pub async fn read_loop<S, E>(
    id: SessionId,
    mut stream: S,
    hub: HubHandle,
    mut teardown: oneshot::Receiver<()>,
) where
    S: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    loop {
        tokio::select! {
            _ = &mut teardown => {
                debug!(session_id = %id, "Writer closed the session");
                break;
            }
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if hub.broadcast(id, text).await.is_err() {
                        break;
                    }
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                Some(Ok(Message::Binary(_))) => {
                    warn!(session_id = %id, "Binary frame received, closing session");
                    break;
                }
                Some(Ok(Message::Close(_))) | None => {
                    debug!(session_id = %id, "Peer closed the session");
                    break;
                }
                Some(Err(e)) => {
                    warn!(session_id = %id, error = %e, "Transport error");
                    break;
                }
            }
        }
    }

    hub.unregister(id).await;
}

/// Write queued messages as text frames. On queue close or eviction, send a
/// close frame, close the transport and signal the reader.
///
/// Eviction interrupts a pending send and drops whatever is still queued.
pub async fn write_loop<S>(
    id: SessionId,
    mut sink: S,
    queue: SessionQueue,
    teardown: oneshot::Sender<()>,
) where
    S: Sink<Message> + Unpin,
    S::Error: Display,
{
    let SessionQueue {
        mut messages,
        mut eviction,
    } = queue;

    loop {
        let payload = tokio::select! {
            biased;
            _ = eviction.fired() => break,
            payload = messages.recv() => match payload {
                Some(payload) => payload,
                None => break,
            },
        };
        tokio::select! {
            biased;
            _ = eviction.fired() => break,
            sent = sink.send(Message::Text(payload)) => {
                if let Err(e) = sent {
                    warn!(session_id = %id, error = %e, "Write failed");
                    break;
                }
            }
        }
    }

    if eviction.is_fired() {
        info!(session_id = %id, "Session evicted, closing transport");
    }

    let close = async {
        let _ = sink.send(Message::Close(None)).await;
        let _ = sink.close().await;
    };
    if tokio::time::timeout(CLOSE_GRACE, close).await.is_err() {
        debug!(session_id = %id, "Close handshake timed out");
    }
    let _ = teardown.send(());
}
