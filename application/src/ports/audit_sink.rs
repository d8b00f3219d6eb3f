//! Audit sink port
//!
//! Every terminal resolution emits an [`EvidenceRecord`]. Where those
//! records go (in-memory log, file, SIEM forwarder) is an adapter concern.

use async_trait::async_trait;
use chamber_domain::EvidenceRecord;

/// Receives evidence records as sessions resolve
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: &EvidenceRecord);
}

/// Sink that drops every record; for callers that do not retain audit data
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuditSink;

#[async_trait]
impl AuditSink for NoAuditSink {
    async fn record(&self, _record: &EvidenceRecord) {}
}
