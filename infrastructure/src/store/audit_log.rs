//! In-memory audit log
//!
//! Retains every evidence record emitted by the engine, addressable by
//! evidence id. Records are immutable: a second write under the same id is
//! ignored, which keeps replays of the same resolution harmless.

use async_trait::async_trait;
use chamber_application::ports::audit_sink::AuditSink;
use chamber_domain::EvidenceRecord;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Audit sink that keeps records in memory for later retrieval
#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    records: RwLock<HashMap<String, EvidenceRecord>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, evidence_id: &str) -> Option<EvidenceRecord> {
        self.records.read().await.get(evidence_id).cloned()
    }

    /// All records, oldest resolution first
    pub async fn records(&self) -> Vec<EvidenceRecord> {
        let mut records: Vec<EvidenceRecord> =
            self.records.read().await.values().cloned().collect();
        records.sort_by_key(|r| r.resolved_at);
        records
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditLog {
    async fn record(&self, record: &EvidenceRecord) {
        let mut records = self.records.write().await;
        if records.contains_key(&record.evidence_id) {
            return;
        }
        debug!(evidence_id = %record.evidence_id, "evidence record retained");
        records.insert(record.evidence_id.clone(), record.clone());
    }
}
