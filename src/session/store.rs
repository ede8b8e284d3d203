//! The registry of active rooms (C4). Read-mostly: creation and eviction
//! take a short exclusive guard; reads may observe a transiently-missing
//! or transiently-orphaned room and must tolerate it — grounded on
//! `Arc<RwLock<Inner<C>>>` in `src/ledger/lobby/storage/in_memory.rs`.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::domain::{RoomId, RoomStatus, UserId};
use crate::game::GameState;
use crate::record_sink::RecordSink;

use super::errors::SessionError;
use super::room_loop::{self, RoomHandle, RoomLoopConfig};
use super::summary::RoomSummary;

pub struct SessionStoreConfig {
    pub room_queue_capacity: usize,
    pub room_grace_period: Duration,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            room_queue_capacity: 64,
            room_grace_period: Duration::from_secs(30),
        }
    }
}

pub struct SessionStore {
    rooms: RwLock<std::collections::HashMap<RoomId, RoomHandle>>,
    record_sink: Arc<dyn RecordSink>,
    config: SessionStoreConfig,
}

impl SessionStore {
    pub fn new(record_sink: Arc<dyn RecordSink>, config: SessionStoreConfig) -> Self {
        Self {
            rooms: RwLock::new(std::collections::HashMap::new()),
            record_sink,
            config,
        }
    }

    /// Allocates a room id, spawns its writer task, registers the handle.
    /// The writer task is given a callback that evicts its own registry
    /// entry once it exits on its own (terminal grace window elapsed),
    /// so `evict` is not only an externally-triggered path.
    pub fn create_room(
        self: &Arc<Self>,
        creator_user_id: UserId,
        creator_display_name: String,
        turn_time_limit: Duration,
    ) -> RoomHandle {
        let room_id = Uuid::new_v4();
        let state = GameState::new(room_id, creator_user_id, creator_display_name, turn_time_limit);
        let store = Arc::clone(self);
        let handle = room_loop::spawn(
            state,
            RoomLoopConfig {
                queue_capacity: self.config.room_queue_capacity,
                rng_seed: None,
                grace_period: self.config.room_grace_period,
            },
            Arc::clone(&self.record_sink),
            move |room_id| store.evict(room_id),
        );
        self.rooms.write().insert(room_id, handle.clone());
        handle
    }

    pub fn get_room(&self, room_id: RoomId) -> Result<RoomHandle, SessionError> {
        self.rooms
            .read()
            .get(&room_id)
            .cloned()
            .ok_or(SessionError::NotFound)
    }

    /// Read-only snapshot, at-most-stale bounded by one state transition.
    /// Only `Waiting`/`InProgress` rooms are listed — completed and
    /// cancelled rooms stay reachable by id but drop out of the directory.
    pub fn list_rooms(&self, limit: usize) -> Vec<RoomSummary> {
        self.rooms
            .read()
            .values()
            .map(|handle| handle.summary())
            .filter(|summary| matches!(summary.status, RoomStatus::Waiting | RoomStatus::InProgress))
            .take(limit)
            .collect()
    }

    /// Trips the room's cancellation token and drops the registry entry.
    /// Called on completion plus a grace window, or explicitly.
    pub fn evict(&self, room_id: RoomId) {
        if let Some(handle) = self.rooms.write().remove(&room_id) {
            handle.cancellation.cancel();
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.read().len()
    }
}
