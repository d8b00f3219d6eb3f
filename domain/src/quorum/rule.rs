//! Consensus rules for chamber resolution
//!
//! This module defines the rules used to decide whether a chamber session's
//! vote set authorizes the gated action.

use serde::{Deserialize, Serialize};

/// Rule deciding approval from a vote set
///
/// Different rules fit different risk tiers:
/// - `Unanimous`: every role must approve; any rejection or abstention defeats it
/// - `Supermajority`: 2/3+ of the required roles must approve
/// - `SimpleMajority`: more than half must approve (default)
/// - `Threshold { required, total }`: N-of-M approvals (e.g. 3-of-5)
///
/// `Supermajority` and `Threshold` are monotonic in approvals/rejections and
/// are re-checked after every vote, so a decisive margin resolves the session
/// before the remaining roles have voted. `Unanimous` and `SimpleMajority`
/// depend on the final abstention count and only fire once every required
/// role has voted. The asymmetry is deliberate.
///
/// # Example
///
/// ```
/// use chamber_domain::quorum::ConsensusRule;
///
/// let rule = ConsensusRule::Supermajority;
/// assert_eq!(rule.min_approvals_needed(3), 3); // 2*3/3 + 1
/// assert_eq!(rule.min_approvals_needed(5), 4);
///
/// let strict = ConsensusRule::Unanimous;
/// assert_eq!(strict.min_approvals_needed(3), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusRule {
    /// Every required role must approve
    Unanimous,

    /// At least 2n/3 + 1 of the required roles must approve
    Supermajority,

    /// More than half of the required roles must approve
    #[default]
    SimpleMajority,

    /// At least `required` of `total` roles must approve
    Threshold { required: usize, total: usize },
}

impl ConsensusRule {
    /// Minimum approvals needed under this rule for `n` required roles
    pub fn min_approvals_needed(&self, n: usize) -> usize {
        match self {
            ConsensusRule::Unanimous => n,
            ConsensusRule::Supermajority => (2 * n) / 3 + 1,
            ConsensusRule::SimpleMajority => n / 2 + 1,
            ConsensusRule::Threshold { required, .. } => *required,
        }
    }

    /// Whether this rule is re-checked after every vote rather than waiting
    /// for the full ledger
    pub fn resolves_incrementally(&self) -> bool {
        matches!(
            self,
            ConsensusRule::Supermajority | ConsensusRule::Threshold { .. }
        )
    }

    /// Human-readable description of this rule
    pub fn description(&self) -> String {
        match self {
            ConsensusRule::Unanimous => "unanimous (all roles must approve)".to_string(),
            ConsensusRule::Supermajority => "supermajority (2/3+ must approve)".to_string(),
            ConsensusRule::SimpleMajority => "simple majority (more than half)".to_string(),
            ConsensusRule::Threshold { required, total } => {
                format!("threshold ({}-of-{})", required, total)
            }
        }
    }
}

impl std::fmt::Display for ConsensusRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for ConsensusRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "unanimous" => Ok(ConsensusRule::Unanimous),
            "supermajority" => Ok(ConsensusRule::Supermajority),
            "simple_majority" | "majority" => Ok(ConsensusRule::SimpleMajority),
            s if s.starts_with("threshold:") => {
                let counts = s.trim_start_matches("threshold:");
                let (required, total) = counts
                    .split_once('/')
                    .or_else(|| counts.split_once("-of-"))
                    .ok_or("Threshold format: threshold:K/N or threshold:K-of-N")?;
                let required: usize = required
                    .parse()
                    .map_err(|_| "Invalid threshold approval count")?;
                let total: usize = total.parse().map_err(|_| "Invalid threshold total")?;
                Ok(ConsensusRule::Threshold { required, total })
            }
            _ => Err(format!(
                "Unknown consensus rule: {}. Valid: unanimous, supermajority, simple_majority, threshold:K/N",
                s
            )),
        }
    }
}
