//! Hub control loop.
//!
//! All registry mutations happen on one task that processes [`HubEvent`]s in
//! arrival order. Delivery to a session never blocks: a session whose queue
//! is full (or already closed) is evicted. Eviction fires the session's
//! [`EvictionSignal`] so its writer stops sending and closes the transport.

use crate::domain::session_id::SessionId;
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Hub-side view of a session: its identity, the sending half of its
/// outbound queue and the trigger for its eviction signal.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    alias: String,
    outbound: mpsc::Sender<String>,
    evict: oneshot::Sender<()>,
}

impl SessionHandle {
    /// Create a handle and the session side of its outbound queue.
    pub fn new(alias: impl Into<String>, capacity: usize) -> (Self, SessionQueue) {
        let (outbound, messages) = mpsc::channel(capacity);
        let (evict, evicted) = oneshot::channel();
        let handle = Self {
            id: SessionId::new(),
            alias: alias.into(),
            outbound,
            evict,
        };
        let queue = SessionQueue {
            messages,
            eviction: EvictionSignal {
                rx: Some(evicted),
                fired: false,
            },
        };
        (handle, queue)
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    fn evict(self) {
        let _ = self.evict.send(());
    }
}

/// Session side of the outbound queue.
#[derive(Debug)]
pub struct SessionQueue {
    pub messages: mpsc::Receiver<String>,
    pub eviction: EvictionSignal,
}

impl SessionQueue {
    pub async fn recv(&mut self) -> Option<String> {
        self.messages.recv().await
    }

    pub fn try_recv(&mut self) -> Result<String, mpsc::error::TryRecvError> {
        self.messages.try_recv()
    }
}

/// Resolves once the hub evicts the session. A plain unregister never fires it.
#[derive(Debug)]
pub struct EvictionSignal {
    rx: Option<oneshot::Receiver<()>>,
    fired: bool,
}

impl EvictionSignal {
    /// Wait for eviction. Cancel safe; once fired it stays ready.
    pub async fn fired(&mut self) {
        if let Some(rx) = self.rx.as_mut() {
            let evicted = rx.await.is_ok();
            self.rx = None;
            self.fired = evicted;
        }
        if !self.fired {
            std::future::pending::<()>().await;
        }
    }

    pub fn is_fired(&self) -> bool {
        self.fired
    }
}

/// Snapshot of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubStats {
    pub sessions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HubError {
    #[error("hub is not running")]
    Stopped,
}

#[derive(Debug)]
enum HubEvent {
    Register(SessionHandle),
    Unregister(SessionId),
    Broadcast { from: SessionId, payload: String },
    Stats(oneshot::Sender<HubStats>),
}

/// Cloneable sender side of the hub.
#[derive(Debug, Clone)]
pub struct HubHandle {
    events: mpsc::Sender<HubEvent>,
}

impl HubHandle {
    pub async fn register(&self, session: SessionHandle) -> Result<(), HubError> {
        self.send(HubEvent::Register(session)).await
    }

    /// Remove a session. Unknown ids and a stopped hub are both no-ops.
    pub async fn unregister(&self, id: SessionId) {
        let _ = self.send(HubEvent::Unregister(id)).await;
    }

    /// Deliver `payload` to every registered session except `from`.
    pub async fn broadcast(&self, from: SessionId, payload: String) -> Result<(), HubError> {
        self.send(HubEvent::Broadcast { from, payload }).await
    }

    pub async fn stats(&self) -> Result<HubStats, HubError> {
        let (tx, rx) = oneshot::channel();
        self.send(HubEvent::Stats(tx)).await?;
        rx.await.map_err(|_| HubError::Stopped)
    }

    async fn send(&self, event: HubEvent) -> Result<(), HubError> {
        self.events.send(event).await.map_err(|_| HubError::Stopped)
    }
}

/// The registry owner. Runs until every [`HubHandle`] is dropped.
#[derive(Debug)]
pub struct Hub {
    sessions: HashMap<SessionId, SessionHandle>,
    events: mpsc::Receiver<HubEvent>,
}

impl Hub {
    pub fn new(control_buffer: usize) -> (Self, HubHandle) {
        let (tx, rx) = mpsc::channel(control_buffer);
        let hub = Self {
            sessions: HashMap::new(),
            events: rx,
        };
        (hub, HubHandle { events: tx })
    }

    /// Create a hub and run it on a new task.
    pub fn spawn(control_buffer: usize) -> (HubHandle, JoinHandle<()>) {
        let (hub, handle) = Self::new(control_buffer);
        let task = tokio::spawn(hub.run());
        (handle, task)
    }

    pub async fn run(mut self) {
        debug!("Hub started");
        while let Some(event) = self.events.recv().await {
            self.handle(event);
        }
        debug!(sessions = self.sessions.len(), "Hub stopped");
    }

    fn handle(&mut self, event: HubEvent) {
        match event {
            HubEvent::Register(session) => {
                info!(session_id = %session.id, alias = %session.alias, "Session registered");
                self.sessions.insert(session.id, session);
            }
            HubEvent::Unregister(id) => {
                if let Some(session) = self.sessions.remove(&id) {
                    info!(session_id = %id, alias = %session.alias, "Session unregistered");
                }
            }
            HubEvent::Broadcast { from, payload } => self.broadcast(from, payload),
            HubEvent::Stats(reply) => {
                let _ = reply.send(HubStats {
                    sessions: self.sessions.len(),
                });
            }
        }
    }

    fn broadcast(&mut self, from: SessionId, payload: String) {
        let mut evicted = Vec::new();

        for (id, session) in &self.sessions {
            if *id == from {
                continue;
            }
            if session.outbound.try_send(payload.clone()).is_err() {
                evicted.push(*id);
            }
        }

        for id in evicted {
            if let Some(session) = self.sessions.remove(&id) {
                warn!(session_id = %id, alias = %session.alias, "Evicting session with full outbound queue");
                session.evict();
            }
        }
    }
}
