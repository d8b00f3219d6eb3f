//! Read-only status snapshots of chamber sessions
//!
//! A [`SessionStatus`] is what callers polling a session see: state, vote
//! progress, outstanding roles, and the resolution once one exists. It is a
//! plain value, safe to serialize and hand to audit consumers.

use super::entities::{ChamberSession, FinalDecision, SessionState};
use crate::policy::RiskTier;
use crate::quorum::{ConsensusRule, Vote, VoteTally};
use crate::role::AgentRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub action_id: String,
    pub action_type: String,
    pub description: String,
    pub state: SessionState,
    pub rule: ConsensusRule,
    pub risk_tier: RiskTier,
    pub votes_cast: usize,
    pub votes_required: usize,
    pub votes_pending: usize,
    pub pending_roles: Vec<AgentRole>,
    /// Full vote ledger in arrival order
    pub ledger: Vec<Vote>,
    pub final_decision: Option<FinalDecision>,
    pub resolution_reason: Option<String>,
    pub evidence_span_id: String,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    /// Remaining consensus window in seconds; absent once terminal
    pub expires_in_secs: Option<i64>,
}

impl SessionStatus {
    /// Snapshot a session as observed at `now`
    pub fn snapshot(session: &ChamberSession, now: DateTime<Utc>) -> Self {
        let pending_roles = session.pending_roles();
        Self {
            action_id: session.action_id().to_string(),
            action_type: session.action_type().to_string(),
            description: session.description().to_string(),
            state: session.state(),
            rule: session.policy().rule,
            risk_tier: session.policy().risk_tier,
            votes_cast: session.ledger().len(),
            votes_required: session.policy().votes_required(),
            votes_pending: pending_roles.len(),
            pending_roles,
            ledger: session.ledger().to_vec(),
            final_decision: session.final_decision(),
            resolution_reason: session.resolution().map(|r| r.reason.clone()),
            evidence_span_id: session.evidence_span_id().to_string(),
            created_at: session.created_at(),
            resolved_at: session.resolution().map(|r| r.resolved_at),
            expires_in_secs: session.expires_in(now).map(|d| d.num_seconds()),
        }
    }

    /// Visual ledger summary, e.g. `[●●◐]`
    pub fn ledger_summary(&self) -> String {
        VoteTally::summarize(&self.ledger)
    }
}
