//! In-memory record sink, used in tests and the bootstrap path when no
//! durable `RECORD_SINK_URL` is configured. Mirrors `InMemoryLobbyStorage`
//! (`src/ledger/lobby/storage/in_memory.rs`): an `Arc<RwLock<Vec<_>>>`.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::AuditEntry;

use super::{RecordSink, RecordSinkError};

#[derive(Clone, Default)]
pub struct InMemoryRecordSink {
    entries: Arc<RwLock<Vec<AuditEntry>>>,
}

impl InMemoryRecordSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl RecordSink for InMemoryRecordSink {
    async fn append(&self, entry: AuditEntry) -> Result<(), RecordSinkError> {
        self.entries.write().push(entry);
        Ok(())
    }
}
