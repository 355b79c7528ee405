//! Reachable-peer bookkeeping.
//!
//! A peer is a paired device reachable over the relay. Each peer owns a
//! bounded mailbox; the sending half lives in the registry of every device
//! that can reach it. Peers attach when connectivity comes up and detach
//! when it goes away.

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use sundial_protocol::Message;

/// Why a message could not be handed to a peer.
///
/// Never surfaced past the relay: delivery is best-effort and failures are
/// only logged.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("peer mailbox is full")]
    MailboxFull,

    #[error("peer is disconnected")]
    Disconnected,
}

/// Sending half of one peer's mailbox.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    id: String,
    outbox: mpsc::Sender<Message>,
}

impl PeerHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Push a message into the peer's mailbox without waiting.
    ///
    /// At-most-once: on failure the message is dropped, not requeued.
    pub fn deliver(&self, message: Message) -> Result<(), DeliveryError> {
        self.outbox.try_send(message).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => DeliveryError::MailboxFull,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Disconnected,
        })
    }
}

/// The set of currently reachable peers.
///
/// Thread-safe; attaches and detaches race freely with sends. A snapshot
/// taken by [`reachable`](PeerRegistry::reachable) reflects the peers
/// connected at that instant.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: RwLock<HashMap<String, mpsc::Sender<Message>>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a peer, returning the receiving end of its mailbox.
    ///
    /// `capacity` must be at least 1. Re-attaching an id replaces the
    /// previous mailbox; messages queued in the old one are dropped with it.
    pub fn attach(&self, id: impl Into<String>, capacity: usize) -> mpsc::Receiver<Message> {
        let (tx, rx) = mpsc::channel(capacity);
        let id = id.into();
        tracing::info!(peer = %id, "peer attached");
        self.peers.write().insert(id, tx);
        rx
    }

    /// Disconnect a peer. Messages still in its mailbox are dropped.
    pub fn detach(&self, id: &str) {
        if self.peers.write().remove(id).is_some() {
            tracing::info!(peer = %id, "peer detached");
        }
    }

    /// Snapshot of the peers reachable right now.
    pub fn reachable(&self) -> Vec<PeerHandle> {
        self.peers
            .read()
            .iter()
            .map(|(id, outbox)| PeerHandle {
                id: id.clone(),
                outbox: outbox.clone(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}
