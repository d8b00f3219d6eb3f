//! Get status use case
//!
//! Read path: snapshot a session's state, progress, and remaining window.
//! Expiry is evaluated lazily here, so an overdue session transitions to
//! EXPIRED on its next read even if nobody votes again.

use crate::ports::audit_sink::AuditSink;
use crate::ports::clock::Clock;
use crate::ports::session_store::{SessionStore, StoreError};
use chamber_domain::{EvidenceRecord, SessionStatus};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GetStatusError {
    #[error("no chamber session found for action `{0}`")]
    SessionNotFound(String),
}

/// Use case for polling a session's status
pub struct GetStatusUseCase<S, C, A>
where
    S: SessionStore,
    C: Clock,
    A: AuditSink,
{
    store: Arc<S>,
    clock: Arc<C>,
    audit: Arc<A>,
}

impl<S, C, A> GetStatusUseCase<S, C, A>
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

    pub async fn execute(&self, action_id: &str) -> Result<SessionStatus, GetStatusError> {
        let handle = self.store.get(action_id).await.map_err(|e| match e {
            StoreError::SessionNotFound(id) | StoreError::DuplicateSessionId(id) => {
                GetStatusError::SessionNotFound(id)
            }
        })?;

        let mut session = handle.lock().await;
        let now = self.clock.now();
        let expired_now = session.check_expiry(now);
        let status = SessionStatus::snapshot(&session, now);
        let record = if expired_now {
            EvidenceRecord::from_session(&session)
        } else {
            None
        };
        drop(session);

        if let Some(record) = record {
            info!(
                action_id = %record.action_id,
                evidence_id = %record.evidence_id,
                "chamber session expired"
            );
            self.audit.record(&record).await;
        }

        Ok(status)
    }
}
