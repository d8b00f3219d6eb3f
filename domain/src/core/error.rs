//! Domain error types

use crate::quorum::Vote;
use crate::role::AgentRole;
use crate::session::FinalDecision;
use thiserror::Error;

/// Failure modes for casting a vote
///
/// Two families share this enum. Request errors mean the caller sent
/// something wrong and can retry correctly (the payload says how); the
/// single state error, [`SessionAlreadyResolved`](VoteError::SessionAlreadyResolved),
/// means the voting window has closed. [`is_state_error`](VoteError::is_state_error)
/// distinguishes them. None of these mutate the ledger.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoteError {
    #[error("no chamber session found for action `{0}`")]
    SessionNotFound(String),

    #[error("session `{action_id}` already resolved: {decision}")]
    SessionAlreadyResolved {
        action_id: String,
        decision: FinalDecision,
    },

    #[error("role `{role}` is not authorized to vote on `{action_id}`")]
    UnauthorizedRole {
        action_id: String,
        role: AgentRole,
        /// Roles that may vote on this session, for a corrected retry
        authorized: Vec<AgentRole>,
    },

    #[error("role `{role}` has already voted on `{action_id}`")]
    DuplicateVote {
        action_id: String,
        role: AgentRole,
        /// The previously recorded ballot, for audit
        existing: Box<Vote>,
    },

    #[error("confidence {0} is outside [0.0, 1.0]")]
    InvalidConfidence(f64),
}

impl VoteError {
    /// True for "the window already closed", false for "you made a mistake"
    pub fn is_state_error(&self) -> bool {
        matches!(self, VoteError::SessionAlreadyResolved { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_classification() {
        let state_err = VoteError::SessionAlreadyResolved {
            action_id: "a".to_string(),
            decision: FinalDecision::Expired,
        };
        assert!(state_err.is_state_error());

        assert!(!VoteError::SessionNotFound("a".to_string()).is_state_error());
        assert!(!VoteError::InvalidConfidence(2.0).is_state_error());
        assert!(
            !VoteError::UnauthorizedRole {
                action_id: "a".to_string(),
                role: AgentRole::Researcher,
                authorized: vec![AgentRole::Ciso],
            }
            .is_state_error()
        );
    }

    #[test]
    fn test_display_names_the_session() {
        let err = VoteError::SessionAlreadyResolved {
            action_id: "act-9".to_string(),
            decision: FinalDecision::Approved,
        };
        assert_eq!(
            err.to_string(),
            "session `act-9` already resolved: APPROVED"
        );
    }
}
