//! Discards every entry. Selected when no `RECORD_SINK_URL` is configured
//! (matches the "Non-goal: durable persistence" framing — the trait is the
//! contract, not a mandatory concrete backend).

use async_trait::async_trait;

use crate::domain::AuditEntry;

use super::{RecordSink, RecordSinkError};

#[derive(Clone, Default)]
pub struct NullRecordSink;

#[async_trait]
impl RecordSink for NullRecordSink {
    async fn append(&self, _entry: AuditEntry) -> Result<(), RecordSinkError> {
        Ok(())
    }
}
