//! Sweep expired use case
//!
//! Walks every retained session and expires the overdue ones, so audit
//! consumers see expiries without waiting for the next read of each
//! session. Each session is locked individually; the sweep never holds two
//! locks at once.

use crate::ports::audit_sink::AuditSink;
use crate::ports::clock::Clock;
use crate::ports::session_store::SessionStore;
use chamber_domain::EvidenceRecord;
use std::sync::Arc;
use tracing::info;

/// Use case for bulk-expiring overdue sessions
pub struct SweepExpiredUseCase<S, C, A>
where
    S: SessionStore,
    C: Clock,
    A: AuditSink,
{
    store: Arc<S>,
    clock: Arc<C>,
    audit: Arc<A>,
}

impl<S, C, A> SweepExpiredUseCase<S, C, A>
where
    S: SessionStore,
    C: Clock,
    A: AuditSink,
{
    pub fn new(store: Arc<S>, clock: Arc<C>, audit: Arc<A>) -> Self {
        Self {
            store,
            clock,
            audit,
        }
    }

    /// Expire every overdue session, returning the evidence records of the
    /// sessions this sweep transitioned
    pub async fn execute(&self) -> Vec<EvidenceRecord> {
        let mut expired = Vec::new();

        for handle in self.store.sessions().await {
            let mut session = handle.lock().await;
            let now = self.clock.now();
            if session.check_expiry(now) {
                if let Some(record) = EvidenceRecord::from_session(&session) {
                    expired.push(record);
                }
            }
        }

        for record in &expired {
            info!(
                action_id = %record.action_id,
                evidence_id = %record.evidence_id,
                "chamber session expired by sweep"
            );
            self.audit.record(record).await;
        }

        expired
    }
}
