//! Quorum primitives: votes, rules, and consensus evaluation

pub mod consensus;
pub mod rule;
pub mod vote;

pub use consensus::{ConsensusOutcome, evaluate};
pub use rule::ConsensusRule;
pub use vote::{Vote, VoteDecision, VoteReceipt, VoteTally};
