//! Audit record shape emitted by the state machine and lifecycle ops.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ActorType, CorrelationId, RoomId, UserId};

/// One row of the append-only action log (C7). Mirrors the persisted
/// `game_actions` table contract named in the external interfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub room_id: RoomId,
    pub ts: DateTime<Utc>,
    pub actor_type: ActorType,
    pub actor_id: UserId,
    pub kind: String,
    pub correlation_id: Option<CorrelationId>,
    pub payload: serde_json::Value,
}

impl AuditEntry {
    pub fn new(
        room_id: RoomId,
        actor_type: ActorType,
        actor_id: impl Into<UserId>,
        kind: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            room_id,
            ts: Utc::now(),
            actor_type,
            actor_id: actor_id.into(),
            kind: kind.into(),
            correlation_id: None,
            payload,
        }
    }

    pub fn with_correlation(mut self, correlation_id: impl Into<CorrelationId>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}
