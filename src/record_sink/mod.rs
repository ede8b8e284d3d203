//! Record Sink (C7): append-only action log interface. Failures are logged
//! and swallowed; they never roll back a state transition — grounded on
//! the `WorkerError::Apply` vs `WorkerError::Database` split in
//! `src/ledger/worker.rs`, where persistence failure is distinguished from
//! apply failure and does not abort the ongoing transition.

pub mod memory;
pub mod null;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::AuditEntry;

pub use memory::InMemoryRecordSink;
pub use null::NullRecordSink;

#[derive(Debug, Error)]
pub enum RecordSinkError {
    #[error("record sink unreachable: {0}")]
    Unreachable(String),
}

#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> Result<(), RecordSinkError>;
}
