//! Connection registry mapping `user_id -> connection`. Writes occur on
//! authenticate and disconnect; reads occur on broadcast targeting —
//! grounded on `Arc<DashMap<(GameId, HandId), _>>` (`active_hands` in
//! `GameCoordinator`, `src/game/coordinator/manager.rs`).

use dashmap::DashMap;
use tokio::sync::mpsc;

use crate::domain::{ConnectionId, UserId};

use super::messages::OutboundEvent;

const OUTBOUND_QUEUE_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct ConnectionHandle {
    pub connection_id: ConnectionId,
    pub outbound_tx: mpsc::Sender<OutboundEvent>,
}

impl ConnectionHandle {
    /// Enqueues an outbound frame. Overflow drops the connection (it is
    /// stuck); the client must reconnect, per §5's backpressure policy.
    pub fn try_send(&self, event: OutboundEvent) -> bool {
        self.outbound_tx.try_send(event).is_ok()
    }
}

#[derive(Default)]
pub struct ConnectionRegistry {
    connections: DashMap<UserId, ConnectionHandle>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outbound_channel() -> (mpsc::Sender<OutboundEvent>, mpsc::Receiver<OutboundEvent>) {
        mpsc::channel(OUTBOUND_QUEUE_CAPACITY)
    }

    /// Registers a new authoritative connection for `user_id`. If an older
    /// connection exists, it is returned to the caller so its writer task
    /// can be notified and aborted (displacement, §4.5).
    pub fn register(&self, user_id: UserId, handle: ConnectionHandle) -> Option<ConnectionHandle> {
        self.connections.insert(user_id, handle)
    }

    /// Removes a connection only if it is still the registered one for
    /// `user_id` (a displaced connection's own disconnect must not evict
    /// its successor).
    pub fn remove_if_current(&self, user_id: &str, connection_id: ConnectionId) {
        self.connections.remove_if(user_id, |_, handle| {
            handle.connection_id == connection_id
        });
    }

    pub fn get(&self, user_id: &str) -> Option<ConnectionHandle> {
        self.connections.get(user_id).map(|e| e.clone())
    }

    pub fn send_to(&self, user_id: &str, event: OutboundEvent) -> bool {
        match self.get(user_id) {
            Some(handle) => handle.try_send(event),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
