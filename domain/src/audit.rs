//! Evidence records for resolved sessions
//!
//! Every terminal resolution produces an immutable [`EvidenceRecord`]
//! addressed by a content-derived identifier, so downstream audit consumers
//! can recompute and verify the id from the same inputs.

use crate::policy::ActionPolicy;
use crate::quorum::Vote;
use crate::session::{ChamberSession, FinalDecision};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Short span id binding an action to its evidence trail at initiation
///
/// Derived from the action id and description; stable across processes.
pub fn evidence_span_id(action_id: &str, description: &str) -> String {
    let digest = Sha256::digest(format!("{}{}", action_id, description).as_bytes());
    hex::encode(digest)[..16].to_string()
}

/// Immutable audit artifact produced when a session resolves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Content-derived identifier; reproducible from the fields below
    pub evidence_id: String,
    pub action_id: String,
    pub action_type: String,
    pub description: String,
    pub decision: FinalDecision,
    pub reason: String,
    /// Policy the session was bound to at creation
    pub policy: ActionPolicy,
    /// Full vote ledger in arrival order
    pub ledger: Vec<Vote>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: DateTime<Utc>,
}

impl EvidenceRecord {
    /// Build the record for a resolved session; `None` while still pending
    pub fn from_session(session: &ChamberSession) -> Option<Self> {
        let resolution = session.resolution()?;
        let evidence_id = derive_evidence_id(
            session.action_id(),
            resolution.decision,
            resolution.resolved_at,
            session.ledger(),
        );
        Some(Self {
            evidence_id,
            action_id: session.action_id().to_string(),
            action_type: session.action_type().to_string(),
            description: session.description().to_string(),
            decision: resolution.decision,
            reason: resolution.reason.clone(),
            policy: session.policy().clone(),
            ledger: session.ledger().to_vec(),
            created_at: session.created_at(),
            resolved_at: resolution.resolved_at,
        })
    }
}

/// Pure hash of the session id plus resolution inputs
///
/// Field order and formatting are part of the identifier contract; changing
/// either changes every id.
fn derive_evidence_id(
    action_id: &str,
    decision: FinalDecision,
    resolved_at: DateTime<Utc>,
    ledger: &[Vote],
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(action_id.as_bytes());
    hasher.update(decision.as_str().as_bytes());
    hasher.update(resolved_at.to_rfc3339().as_bytes());
    for vote in ledger {
        hasher.update(vote.role.as_str().as_bytes());
        hasher.update(vote.decision.as_str().as_bytes());
        hasher.update(vote.rationale.as_bytes());
        hasher.update(vote.confidence.to_string().as_bytes());
        hasher.update(vote.signature.as_bytes());
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{ActionPolicy, RiskTier};
    use crate::quorum::{ConsensusRule, VoteDecision};
    use crate::role::AgentRole;

    fn resolved_session(now: DateTime<Utc>) -> ChamberSession {
        let policy = ActionPolicy::new(
            vec![AgentRole::LegalAuditor, AgentRole::Ciso],
            ConsensusRule::Unanimous,
            RiskTier::High,
        );
        let mut session =
            ChamberSession::new("exp-1", "export case bundle", "data_export", policy, now);
        for role in [AgentRole::LegalAuditor, AgentRole::Ciso] {
            session
                .record_vote(Vote::new(role, VoteDecision::Approve, "ok", 1.0, "sig", now))
                .unwrap();
        }
        session
    }

    #[test]
    fn test_span_id_is_deterministic() {
        let a = evidence_span_id("act-1", "wipe staging bucket");
        let b = evidence_span_id("act-1", "wipe staging bucket");
        let c = evidence_span_id("act-2", "wipe staging bucket");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn test_no_record_for_pending_session() {
        let now = Utc::now();
        let policy = ActionPolicy::new(
            vec![AgentRole::Ciso],
            ConsensusRule::SimpleMajority,
            RiskTier::Low,
        );
        let session = ChamberSession::new("p-1", "probe", "external_api_call", policy, now);

        assert!(EvidenceRecord::from_session(&session).is_none());
    }

    #[test]
    fn test_record_captures_full_ledger() {
        let now = Utc::now();
        let session = resolved_session(now);
        let record = EvidenceRecord::from_session(&session).unwrap();

        assert_eq!(record.decision, FinalDecision::Approved);
        assert_eq!(record.ledger.len(), 2);
        assert_eq!(record.action_id, "exp-1");
        assert_eq!(record.policy.rule, ConsensusRule::Unanimous);
    }

    #[test]
    fn test_evidence_id_reproducible_from_same_inputs() {
        let now = Utc::now();
        let session = resolved_session(now);

        let first = EvidenceRecord::from_session(&session).unwrap();
        let second = EvidenceRecord::from_session(&session).unwrap();
        assert_eq!(first.evidence_id, second.evidence_id);
        assert_eq!(first.evidence_id.len(), 64);
    }

    #[test]
    fn test_evidence_id_differs_across_sessions() {
        let now = Utc::now();
        let policy = ActionPolicy::new(
            vec![AgentRole::Ciso],
            ConsensusRule::SimpleMajority,
            RiskTier::Medium,
        );
        let mut other = ChamberSession::new("other", "probe", "external_api_call", policy, now);
        other
            .record_vote(Vote::new(
                AgentRole::Ciso,
                VoteDecision::Approve,
                "ok",
                1.0,
                "sig",
                now,
            ))
            .unwrap();

        let a = EvidenceRecord::from_session(&resolved_session(now)).unwrap();
        let b = EvidenceRecord::from_session(&other).unwrap();
        assert_ne!(a.evidence_id, b.evidence_id);
    }
}
