//! Chamber session entity and its state machine
//!
//! A [`ChamberSession`] is the one mutable entity in the engine. It is
//! created `PENDING`, transitions exactly once to `APPROVED`, `REJECTED`, or
//! `EXPIRED`, and afterwards accepts no further writes. All vote validation
//! and the consensus re-check happen inside [`ChamberSession::record_vote`],
//! so a caller holding the session lock gets the whole
//! validate/append/evaluate/resolve sequence atomically.

use crate::audit::evidence_span_id;
use crate::core::error::VoteError;
use crate::policy::ActionPolicy;
use crate::quorum::{ConsensusOutcome, Vote, evaluate};
use crate::role::AgentRole;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a chamber session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionState {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionState::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Pending => "PENDING",
            SessionState::Approved => "APPROVED",
            SessionState::Rejected => "REJECTED",
            SessionState::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal verdict of a resolved session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FinalDecision {
    Approved,
    Rejected,
    Expired,
}

impl FinalDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinalDecision::Approved => "APPROVED",
            FinalDecision::Rejected => "REJECTED",
            FinalDecision::Expired => "EXPIRED",
        }
    }
}

impl std::fmt::Display for FinalDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<FinalDecision> for SessionState {
    fn from(decision: FinalDecision) -> Self {
        match decision {
            FinalDecision::Approved => SessionState::Approved,
            FinalDecision::Rejected => SessionState::Rejected,
            FinalDecision::Expired => SessionState::Expired,
        }
    }
}

/// How and when a session reached its terminal state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub decision: FinalDecision,
    pub reason: String,
    pub resolved_at: DateTime<Utc>,
}

/// One authorization request and its voting state
///
/// Owned exclusively by the session store; mutation happens only through
/// [`record_vote`](Self::record_vote) and
/// [`check_expiry`](Self::check_expiry), under the store's per-session lock.
#[derive(Debug, Clone)]
pub struct ChamberSession {
    action_id: String,
    description: String,
    action_type: String,
    policy: ActionPolicy,
    evidence_span_id: String,
    votes: Vec<Vote>,
    created_at: DateTime<Utc>,
    resolution: Option<Resolution>,
}

impl ChamberSession {
    pub fn new(
        action_id: impl Into<String>,
        description: impl Into<String>,
        action_type: impl Into<String>,
        policy: ActionPolicy,
        created_at: DateTime<Utc>,
    ) -> Self {
        let action_id = action_id.into();
        let description = description.into();
        let span = evidence_span_id(&action_id, &description);
        Self {
            action_id,
            description,
            action_type: action_type.into(),
            policy,
            evidence_span_id: span,
            votes: Vec::new(),
            created_at,
            resolution: None,
        }
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn policy(&self) -> &ActionPolicy {
        &self.policy
    }

    pub fn evidence_span_id(&self) -> &str {
        &self.evidence_span_id
    }

    /// Ledger of accepted votes, in arrival order
    pub fn ledger(&self) -> &[Vote] {
        &self.votes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn state(&self) -> SessionState {
        match &self.resolution {
            None => SessionState::Pending,
            Some(r) => r.decision.into(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.resolution.is_some()
    }

    pub fn final_decision(&self) -> Option<FinalDecision> {
        self.resolution.as_ref().map(|r| r.decision)
    }

    /// Instant after which an unresolved session expires
    pub fn deadline(&self) -> DateTime<Utc> {
        self.created_at + self.policy.timeout()
    }

    /// Remaining consensus window; `None` once terminal
    pub fn expires_in(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.is_terminal() {
            return None;
        }
        Some((self.deadline() - now).max(Duration::zero()))
    }

    /// Roles that have not voted yet, in policy order
    pub fn pending_roles(&self) -> Vec<AgentRole> {
        self.policy
            .required_roles
            .iter()
            .copied()
            .filter(|role| !self.votes.iter().any(|v| v.role == *role))
            .collect()
    }

    /// Check the preconditions for a ballot without mutating anything
    ///
    /// Failure order is fixed: resolved state, then role authorization, then
    /// duplicate vote, then confidence range.
    pub fn validate_ballot(&self, role: AgentRole, confidence: f64) -> Result<(), VoteError> {
        if let Some(resolution) = &self.resolution {
            return Err(VoteError::SessionAlreadyResolved {
                action_id: self.action_id.clone(),
                decision: resolution.decision,
            });
        }
        if !self.policy.authorizes(role) {
            return Err(VoteError::UnauthorizedRole {
                action_id: self.action_id.clone(),
                role,
                authorized: self.policy.required_roles.clone(),
            });
        }
        if let Some(existing) = self.votes.iter().find(|v| v.role == role) {
            return Err(VoteError::DuplicateVote {
                action_id: self.action_id.clone(),
                role,
                existing: Box::new(existing.clone()),
            });
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(VoteError::InvalidConfidence(confidence));
        }
        Ok(())
    }

    /// Append a vote and re-evaluate consensus
    ///
    /// On a decisive outcome the session resolves in the same call, so no
    /// observer can see the vote recorded without the resolution. The ledger
    /// is untouched on any error.
    pub fn record_vote(&mut self, vote: Vote) -> Result<ConsensusOutcome, VoteError> {
        self.validate_ballot(vote.role, vote.confidence)?;

        let resolved_at = vote.submitted_at.max(self.created_at);
        self.votes.push(vote);

        let outcome = evaluate(&self.policy.rule, &self.votes, &self.policy.required_roles);
        match &outcome {
            ConsensusOutcome::Approved { reason } => {
                self.resolution = Some(Resolution {
                    decision: FinalDecision::Approved,
                    reason: reason.clone(),
                    resolved_at,
                });
            }
            ConsensusOutcome::Rejected { reason } => {
                self.resolution = Some(Resolution {
                    decision: FinalDecision::Rejected,
                    reason: reason.clone(),
                    resolved_at,
                });
            }
            ConsensusOutcome::Pending { .. } => {}
        }
        Ok(outcome)
    }

    /// Lazily expire an overdue session
    ///
    /// Returns `true` iff this call performed the transition. Terminal
    /// sessions are never touched, so a quorum resolution and an expiry can
    /// never both win.
    pub fn check_expiry(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_terminal() {
            return false;
        }
        if now - self.created_at > self.policy.timeout() {
            self.resolution = Some(Resolution {
                decision: FinalDecision::Expired,
                reason: format!(
                    "consensus window of {}s elapsed with {} of {} votes",
                    self.policy.timeout_secs,
                    self.votes.len(),
                    self.policy.votes_required()
                ),
                resolved_at: now.max(self.created_at),
            });
            return true;
        }
        false
    }
}
