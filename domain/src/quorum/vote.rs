//! Vote types for chamber sessions
//!
//! This module defines the voting primitives recorded in a session's ledger.

use crate::role::AgentRole;
use crate::session::FinalDecision;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Position taken by a reviewer on a gated action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDecision {
    Approve,
    Reject,
    Abstain,
}

impl VoteDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteDecision::Approve => "approve",
            VoteDecision::Reject => "reject",
            VoteDecision::Abstain => "abstain",
        }
    }
}

impl std::fmt::Display for VoteDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoteDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" => Ok(VoteDecision::Approve),
            "reject" => Ok(VoteDecision::Reject),
            "abstain" => Ok(VoteDecision::Abstain),
            _ => Err(format!(
                "Unknown vote decision: {}. Valid: approve, reject, abstain",
                s
            )),
        }
    }
}

/// A recorded vote from one reviewer role
///
/// Immutable once appended to a session's ledger. The `signature` binds
/// role, decision, rationale, confidence, and the session's action id
/// through the configured signer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    /// Role that cast this vote
    pub role: AgentRole,
    /// approve / reject / abstain
    pub decision: VoteDecision,
    /// Reviewer reasoning; may embed evidence references from external scorers
    pub rationale: String,
    /// Reviewer confidence in [0.0, 1.0], informational only
    pub confidence: f64,
    /// Authenticity token from the configured signer
    pub signature: String,
    /// When the ledger accepted this vote
    pub submitted_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        role: AgentRole,
        decision: VoteDecision,
        rationale: impl Into<String>,
        confidence: f64,
        signature: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            role,
            decision,
            rationale: rationale.into(),
            confidence,
            signature: signature.into(),
            submitted_at,
        }
    }

    pub fn is_approval(&self) -> bool {
        self.decision == VoteDecision::Approve
    }

    pub fn is_rejection(&self) -> bool {
        self.decision == VoteDecision::Reject
    }
}

/// Aggregated counts over a session's ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    pub approvals: usize,
    pub rejections: usize,
    pub abstentions: usize,
    pub total: usize,
}

impl VoteTally {
    pub fn from_votes(votes: &[Vote]) -> Self {
        let approvals = votes.iter().filter(|v| v.is_approval()).count();
        let rejections = votes.iter().filter(|v| v.is_rejection()).count();
        Self {
            approvals,
            rejections,
            abstentions: votes.len() - approvals - rejections,
            total: votes.len(),
        }
    }

    /// Visual ledger summary: ● approve, ○ reject, ◐ abstain
    pub fn summarize(votes: &[Vote]) -> String {
        let mut summary = String::from("[");
        for vote in votes {
            summary.push(match vote.decision {
                VoteDecision::Approve => '●',
                VoteDecision::Reject => '○',
                VoteDecision::Abstain => '◐',
            });
        }
        summary.push(']');
        summary
    }
}

/// Receipt returned to a reviewer whose vote was accepted
///
/// Mirrors the ledger's view at the moment of the append: how many votes are
/// in, how many the policy requires, and whether this vote resolved the
/// session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteReceipt {
    /// The vote as recorded, including its signature
    pub vote: Vote,
    pub votes_collected: usize,
    pub votes_required: usize,
    /// Set when this vote tipped the session into a terminal state
    pub final_decision: Option<FinalDecision>,
    /// Evidence record id, present iff the session resolved on this vote
    pub evidence_id: Option<String>,
}
