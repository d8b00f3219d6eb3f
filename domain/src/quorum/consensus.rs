//! Consensus evaluation
//!
//! The evaluator is a pure function over a policy's rule and a session's
//! ledger. Sessions call it after every accepted vote; it never mutates
//! anything itself.

use super::rule::ConsensusRule;
use super::vote::{Vote, VoteTally};
use crate::role::AgentRole;
use serde::{Deserialize, Serialize};

/// Outcome of evaluating a ledger against a consensus rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsensusOutcome {
    /// Quorum reached: the action is authorized
    Approved { reason: String },
    /// Quorum reached: the action is denied
    Rejected { reason: String },
    /// Not enough votes to decide yet
    Pending {
        votes_pending: usize,
        pending_roles: Vec<AgentRole>,
    },
}

impl ConsensusOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, ConsensusOutcome::Approved { .. })
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ConsensusOutcome::Rejected { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ConsensusOutcome::Pending { .. })
    }

    pub fn is_decisive(&self) -> bool {
        !self.is_pending()
    }
}

impl std::fmt::Display for ConsensusOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsensusOutcome::Approved { .. } => write!(f, "Approved"),
            ConsensusOutcome::Rejected { .. } => write!(f, "Rejected"),
            ConsensusOutcome::Pending { votes_pending, .. } => {
                write!(f, "Pending ({} votes outstanding)", votes_pending)
            }
        }
    }
}

/// Evaluate a ledger against the session's rule
///
/// Deterministic given the rule, the ledger, and the required role set.
/// `Supermajority` and `Threshold` short-circuit on a decisive margin;
/// `Unanimous` and `SimpleMajority` stay pending until every required role
/// has voted. With the full ledger in and no margin met (reachable through
/// abstentions), the required approval count is unreachable and the session
/// rejects.
pub fn evaluate(
    rule: &ConsensusRule,
    votes: &[Vote],
    required_roles: &[AgentRole],
) -> ConsensusOutcome {
    let n = required_roles.len();
    let tally = VoteTally::from_votes(votes);
    let complete = tally.total >= n;

    if !complete && !rule.resolves_incrementally() {
        return pending(votes, required_roles);
    }

    match rule {
        ConsensusRule::Unanimous => {
            if tally.rejections == 0 && tally.abstentions == 0 {
                ConsensusOutcome::Approved {
                    reason: format!("all {} required roles approved", n),
                }
            } else {
                ConsensusOutcome::Rejected {
                    reason: format!(
                        "unanimity defeated: {} rejection(s), {} abstention(s)",
                        tally.rejections, tally.abstentions
                    ),
                }
            }
        }
        ConsensusRule::SimpleMajority => {
            if tally.approvals > n / 2 {
                ConsensusOutcome::Approved {
                    reason: format!("{} of {} roles approved", tally.approvals, n),
                }
            } else {
                ConsensusOutcome::Rejected {
                    reason: format!(
                        "majority not reached: {} of {} approvals (ties reject)",
                        tally.approvals, n
                    ),
                }
            }
        }
        ConsensusRule::Supermajority => {
            decide_by_margin(rule.min_approvals_needed(n), n, &tally, complete, votes, required_roles)
        }
        ConsensusRule::Threshold { required, total } => {
            decide_by_margin(*required, *total, &tally, complete, votes, required_roles)
        }
    }
}

/// Margin arithmetic shared by the incrementally-resolving rules:
/// approve once `required` approvals are in, reject once rejections make
/// that count unreachable, otherwise keep collecting.
fn decide_by_margin(
    required: usize,
    total: usize,
    tally: &VoteTally,
    complete: bool,
    votes: &[Vote],
    required_roles: &[AgentRole],
) -> ConsensusOutcome {
    if tally.approvals >= required {
        ConsensusOutcome::Approved {
            reason: format!("{} approvals met the required {}", tally.approvals, required),
        }
    } else if tally.rejections > total - required {
        ConsensusOutcome::Rejected {
            reason: format!(
                "{} rejections made {} approvals unreachable",
                tally.rejections, required
            ),
        }
    } else if complete {
        // Only abstentions can land here: every role voted, no margin hit.
        ConsensusOutcome::Rejected {
            reason: format!(
                "ledger complete with {} of {} required approvals",
                tally.approvals, required
            ),
        }
    } else {
        pending(votes, required_roles)
    }
}

fn pending(votes: &[Vote], required_roles: &[AgentRole]) -> ConsensusOutcome {
    let voted: Vec<AgentRole> = votes.iter().map(|v| v.role).collect();
    let pending_roles: Vec<AgentRole> = required_roles
        .iter()
        .copied()
        .filter(|r| !voted.contains(r))
        .collect();
    ConsensusOutcome::Pending {
        votes_pending: pending_roles.len(),
        pending_roles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quorum::vote::VoteDecision;
    use chrono::Utc;

    fn vote(role: AgentRole, decision: VoteDecision) -> Vote {
        Vote::new(role, decision, "", 1.0, "sig", Utc::now())
    }

    const THREE: [AgentRole; 3] = [
        AgentRole::ForensicPathologist,
        AgentRole::LegalAuditor,
        AgentRole::Ciso,
    ];

    const FIVE: [AgentRole; 5] = [
        AgentRole::ForensicPathologist,
        AgentRole::LegalAuditor,
        AgentRole::Ciso,
        AgentRole::Comptroller,
        AgentRole::Guardian,
    ];

    #[test]
    fn test_unanimous_all_approve() {
        let votes: Vec<Vote> = THREE
            .iter()
            .map(|r| vote(*r, VoteDecision::Approve))
            .collect();
        assert!(evaluate(&ConsensusRule::Unanimous, &votes, &THREE).is_approved());
    }

    #[test]
    fn test_unanimous_single_rejection_defeats() {
        let votes = vec![
            vote(THREE[0], VoteDecision::Approve),
            vote(THREE[1], VoteDecision::Approve),
            vote(THREE[2], VoteDecision::Reject),
        ];
        assert!(evaluate(&ConsensusRule::Unanimous, &votes, &THREE).is_rejected());
    }

    #[test]
    fn test_unanimous_abstention_defeats() {
        let votes = vec![
            vote(THREE[0], VoteDecision::Approve),
            vote(THREE[1], VoteDecision::Approve),
            vote(THREE[2], VoteDecision::Abstain),
        ];
        assert!(evaluate(&ConsensusRule::Unanimous, &votes, &THREE).is_rejected());
    }

    #[test]
    fn test_unanimous_waits_for_full_ledger() {
        // Even a rejection does not resolve until every role has voted.
        let votes = vec![vote(THREE[0], VoteDecision::Reject)];
        let outcome = evaluate(&ConsensusRule::Unanimous, &votes, &THREE);
        assert_eq!(
            outcome,
            ConsensusOutcome::Pending {
                votes_pending: 2,
                pending_roles: vec![THREE[1], THREE[2]],
            }
        );
    }

    #[test]
    fn test_simple_majority_three_of_five() {
        let votes = vec![
            vote(FIVE[0], VoteDecision::Approve),
            vote(FIVE[1], VoteDecision::Approve),
            vote(FIVE[2], VoteDecision::Approve),
            vote(FIVE[3], VoteDecision::Reject),
            vote(FIVE[4], VoteDecision::Reject),
        ];
        assert!(evaluate(&ConsensusRule::SimpleMajority, &votes, &FIVE).is_approved());
    }

    #[test]
    fn test_simple_majority_waits_even_when_margin_is_decisive() {
        // 3 approvals of 5 would already win, but the rule waits for the
        // full ledger.
        let votes = vec![
            vote(FIVE[0], VoteDecision::Approve),
            vote(FIVE[1], VoteDecision::Approve),
            vote(FIVE[2], VoteDecision::Approve),
        ];
        assert!(evaluate(&ConsensusRule::SimpleMajority, &votes, &FIVE).is_pending());
    }

    #[test]
    fn test_simple_majority_tie_rejects() {
        let two = [AgentRole::Ciso, AgentRole::Comptroller];
        let votes = vec![
            vote(two[0], VoteDecision::Approve),
            vote(two[1], VoteDecision::Reject),
        ];
        assert!(evaluate(&ConsensusRule::SimpleMajority, &votes, &two).is_rejected());
    }

    #[test]
    fn test_supermajority_three_roles_requires_all_three() {
        // n=3 -> required = 2*3/3 + 1 = 3
        let votes = vec![
            vote(THREE[0], VoteDecision::Approve),
            vote(THREE[1], VoteDecision::Approve),
        ];
        assert!(evaluate(&ConsensusRule::Supermajority, &votes, &THREE).is_pending());

        let mut votes = votes;
        votes.push(vote(THREE[2], VoteDecision::Approve));
        assert!(evaluate(&ConsensusRule::Supermajority, &votes, &THREE).is_approved());
    }

    #[test]
    fn test_supermajority_short_circuits_on_rejections() {
        // n=3, required=3, so a single rejection already makes approval
        // unreachable: 1 > 3 - 3.
        let votes = vec![
            vote(THREE[0], VoteDecision::Approve),
            vote(THREE[1], VoteDecision::Reject),
        ];
        assert!(evaluate(&ConsensusRule::Supermajority, &votes, &THREE).is_rejected());
    }

    #[test]
    fn test_supermajority_five_roles_early_approval() {
        // n=5 -> required = 4; fourth approval resolves before the fifth vote.
        let votes = vec![
            vote(FIVE[0], VoteDecision::Approve),
            vote(FIVE[1], VoteDecision::Approve),
            vote(FIVE[2], VoteDecision::Approve),
            vote(FIVE[3], VoteDecision::Approve),
        ];
        assert!(evaluate(&ConsensusRule::Supermajority, &votes, &FIVE).is_approved());
    }

    #[test]
    fn test_supermajority_full_ledger_with_abstentions_rejects() {
        let votes = vec![
            vote(THREE[0], VoteDecision::Approve),
            vote(THREE[1], VoteDecision::Approve),
            vote(THREE[2], VoteDecision::Abstain),
        ];
        let outcome = evaluate(&ConsensusRule::Supermajority, &votes, &THREE);
        assert!(outcome.is_rejected());
    }

    #[test]
    fn test_threshold_two_of_three_approves_immediately() {
        let rule = ConsensusRule::Threshold {
            required: 2,
            total: 3,
        };
        let votes = vec![
            vote(THREE[0], VoteDecision::Approve),
            vote(THREE[1], VoteDecision::Approve),
        ];
        // Independent of the third vote.
        assert!(evaluate(&rule, &votes, &THREE).is_approved());
    }

    #[test]
    fn test_threshold_rejects_when_unreachable() {
        let rule = ConsensusRule::Threshold {
            required: 2,
            total: 3,
        };
        let votes = vec![
            vote(THREE[0], VoteDecision::Reject),
            vote(THREE[1], VoteDecision::Reject),
        ];
        // 2 rejections > 3 - 2.
        assert!(evaluate(&rule, &votes, &THREE).is_rejected());
    }

    #[test]
    fn test_threshold_stays_pending_within_margin() {
        let rule = ConsensusRule::Threshold {
            required: 2,
            total: 3,
        };
        let votes = vec![
            vote(THREE[0], VoteDecision::Approve),
            vote(THREE[1], VoteDecision::Reject),
        ];
        assert!(evaluate(&rule, &votes, &THREE).is_pending());
    }

    #[test]
    fn test_single_role_degenerate_policies() {
        let one = [AgentRole::Guardian];
        let approve = vec![vote(one[0], VoteDecision::Approve)];
        let reject = vec![vote(one[0], VoteDecision::Reject)];
        let abstain = vec![vote(one[0], VoteDecision::Abstain)];

        for rule in [
            ConsensusRule::Unanimous,
            ConsensusRule::Supermajority,
            ConsensusRule::SimpleMajority,
            ConsensusRule::Threshold {
                required: 1,
                total: 1,
            },
        ] {
            assert!(evaluate(&rule, &approve, &one).is_approved(), "{:?}", rule);
            assert!(evaluate(&rule, &reject, &one).is_rejected(), "{:?}", rule);
            // One abstention means the single required approval never
            // arrives, so every rule rejects at full participation.
            assert!(evaluate(&rule, &abstain, &one).is_rejected(), "{:?}", rule);
        }
    }

    #[test]
    fn test_pending_reports_outstanding_roles() {
        let votes = vec![vote(THREE[1], VoteDecision::Approve)];
        let outcome = evaluate(&ConsensusRule::Unanimous, &votes, &THREE);
        match outcome {
            ConsensusOutcome::Pending {
                votes_pending,
                pending_roles,
            } => {
                assert_eq!(votes_pending, 2);
                assert_eq!(pending_roles, vec![THREE[0], THREE[2]]);
            }
            other => panic!("expected pending, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_ledger_is_pending() {
        let outcome = evaluate(&ConsensusRule::Supermajority, &[], &THREE);
        assert!(outcome.is_pending());
    }
}
