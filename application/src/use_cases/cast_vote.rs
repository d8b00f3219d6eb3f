//! Cast vote use case
//!
//! The write path of the engine. Everything between looking the session up
//! and (possibly) resolving it happens under that session's lock, so
//! concurrent reviewers serialize and exactly one vote can be the one that
//! tips quorum. The lock is released before the audit sink runs.

use crate::ports::audit_sink::AuditSink;
use crate::ports::clock::Clock;
use crate::ports::session_store::{SessionStore, StoreError};
use crate::ports::signer::{BallotPayload, VoteSigner};
use chamber_domain::{
    AgentRole, EvidenceRecord, FinalDecision, Vote, VoteDecision, VoteError, VoteReceipt,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Input for the CastVote use case
#[derive(Debug, Clone)]
pub struct CastVoteInput {
    pub action_id: String,
    pub role: AgentRole,
    pub decision: VoteDecision,
    pub rationale: String,
    pub confidence: f64,
}

impl CastVoteInput {
    pub fn new(
        action_id: impl Into<String>,
        role: AgentRole,
        decision: VoteDecision,
        rationale: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            action_id: action_id.into(),
            role,
            decision,
            rationale: rationale.into(),
            confidence,
        }
    }
}

/// Use case for recording a reviewer's vote
pub struct CastVoteUseCase<S, G, C, A>
where
    S: SessionStore,
    G: VoteSigner,
    C: Clock,
    A: AuditSink,
{
    store: Arc<S>,
    signer: Arc<G>,
    clock: Arc<C>,
    audit: Arc<A>,
}

impl<S, G, C, A> CastVoteUseCase<S, G, C, A>
where
    S: SessionStore,
    G: VoteSigner,
    C: Clock,
    A: AuditSink,
{
    pub fn new(store: Arc<S>, signer: Arc<G>, clock: Arc<C>, audit: Arc<A>) -> Self {
        Self {
            store,
            signer,
            clock,
            audit,
        }
    }

    pub async fn execute(&self, input: CastVoteInput) -> Result<VoteReceipt, VoteError> {
        let handle = self.store.get(&input.action_id).await.map_err(|e| match e {
            StoreError::SessionNotFound(id) | StoreError::DuplicateSessionId(id) => {
                VoteError::SessionNotFound(id)
            }
        })?;

        let mut session = handle.lock().await;
        let now = self.clock.now();

        // Deadline first: a vote arriving after the window closed loses,
        // and it loses before any other precondition is looked at. When
        // this call is the one that expires the session, it also owns
        // emitting the evidence record.
        if session.check_expiry(now) {
            let record = EvidenceRecord::from_session(&session);
            let err = VoteError::SessionAlreadyResolved {
                action_id: input.action_id.clone(),
                decision: FinalDecision::Expired,
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
            return Err(err);
        }
        session.validate_ballot(input.role, input.confidence)?;

        let payload = BallotPayload {
            role: input.role,
            decision: input.decision,
            rationale: &input.rationale,
            confidence: input.confidence,
            action_id: &input.action_id,
        };
        let signature = self.signer.sign(&payload);
        let vote = Vote::new(
            input.role,
            input.decision,
            input.rationale,
            input.confidence,
            signature,
            now,
        );

        let outcome = session.record_vote(vote.clone())?;
        debug!(
            action_id = %input.action_id,
            role = %input.role,
            decision = %input.decision,
            outcome = %outcome,
            "vote recorded"
        );

        let evidence = if session.is_terminal() {
            EvidenceRecord::from_session(&session)
        } else {
            None
        };

        let receipt = VoteReceipt {
            vote,
            votes_collected: session.ledger().len(),
            votes_required: session.policy().votes_required(),
            final_decision: session.final_decision(),
            evidence_id: evidence.as_ref().map(|r| r.evidence_id.clone()),
        };
        drop(session);

        if let Some(record) = evidence {
            info!(
                action_id = %record.action_id,
                decision = %record.decision,
                evidence_id = %record.evidence_id,
                "chamber session resolved"
            );
            self.audit.record(&record).await;
        }

        Ok(receipt)
    }
}
