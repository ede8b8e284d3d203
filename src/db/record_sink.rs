//! `SeaOrmRecordSink`: persists `AuditEntry` rows into `game_actions`.
//! Dual-implementation alongside `InMemoryRecordSink`/`NullRecordSink`,
//! grounded on `LobbyStorage`'s `InMemory`/`SeaOrm` split
//! (`src/ledger/lobby/storage/`).

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection};
use uuid::Uuid;

use crate::domain::AuditEntry;
use crate::record_sink::{RecordSink, RecordSinkError};

use super::entity::game_actions;

pub struct SeaOrmRecordSink {
    db: DatabaseConnection,
}

impl SeaOrmRecordSink {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordSink for SeaOrmRecordSink {
    async fn append(&self, entry: AuditEntry) -> Result<(), RecordSinkError> {
        let round_id = entry
            .correlation_id
            .as_deref()
            .and_then(|raw| Uuid::parse_str(raw).ok());

        let model = game_actions::ActiveModel {
            id: Set(Uuid::new_v4()),
            game_id: Set(entry.room_id),
            round_id: Set(round_id),
            player_id: Set(entry.actor_id),
            action_type: Set(entry.kind),
            action_data: Set(entry.payload),
            created_at: Set(entry.ts),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|err| RecordSinkError::Unreachable(err.to_string()))?;

        Ok(())
    }
}
