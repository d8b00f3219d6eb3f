//! Initiate authorization use case
//!
//! Opens a chamber session for a high-risk action: resolves the action type
//! to a policy, binds the policy to a new session, and registers it.

use crate::ports::clock::Clock;
use crate::ports::session_store::{SessionStore, StoreError};
use chamber_domain::{ChamberSession, PolicyTable, SessionStatus};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while opening a session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InitiateAuthorizationError {
    #[error("a chamber session for action `{0}` already exists")]
    DuplicateSessionId(String),
}

/// Input for the InitiateAuthorization use case
#[derive(Debug, Clone)]
pub struct InitiateAuthorizationInput {
    /// Caller-supplied unique token for the gated action
    pub action_id: String,
    /// Opaque description of what the action will do
    pub description: String,
    /// Tag resolved against the policy table
    pub action_type: String,
    /// Consensus window override; policy default when absent
    pub timeout_override_secs: Option<u64>,
}

impl InitiateAuthorizationInput {
    pub fn new(
        action_id: impl Into<String>,
        description: impl Into<String>,
        action_type: impl Into<String>,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            description: description.into(),
            action_type: action_type.into(),
            timeout_override_secs: None,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_override_secs = Some(secs);
        self
    }
}

/// Use case for opening a chamber session
pub struct InitiateAuthorizationUseCase<S: SessionStore, C: Clock> {
    store: Arc<S>,
    clock: Arc<C>,
    policies: Arc<PolicyTable>,
}

impl<S: SessionStore, C: Clock> InitiateAuthorizationUseCase<S, C> {
    pub fn new(store: Arc<S>, clock: Arc<C>, policies: Arc<PolicyTable>) -> Self {
        Self {
            store,
            clock,
            policies,
        }
    }

    pub async fn execute(
        &self,
        input: InitiateAuthorizationInput,
    ) -> Result<SessionStatus, InitiateAuthorizationError> {
        let mut policy = self.policies.resolve(&input.action_type).clone();
        if let Some(secs) = input.timeout_override_secs {
            policy = policy.with_timeout_secs(secs);
        }

        let now = self.clock.now();
        let session = ChamberSession::new(
            &input.action_id,
            &input.description,
            &input.action_type,
            policy,
            now,
        );

        // insert only ever fails on a duplicate action id
        let handle = self.store.insert(session).await.map_err(|e| match e {
            StoreError::DuplicateSessionId(id) | StoreError::SessionNotFound(id) => {
                InitiateAuthorizationError::DuplicateSessionId(id)
            }
        })?;

        let session = handle.lock().await;
        let status = SessionStatus::snapshot(&session, now);
        info!(
            action_id = %status.action_id,
            action_type = %status.action_type,
            rule = %status.rule,
            risk = %status.risk_tier,
            votes_required = status.votes_required,
            "chamber session opened"
        );
        Ok(status)
    }
}
