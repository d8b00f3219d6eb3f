//! Action policies and the policy table
//!
//! [`PolicyTable::resolve`] maps an action type to the roles, consensus rule,
//! and timeout that govern its authorization. Resolution is total: unknown
//! action types fall back to a conservative default policy. The table is
//! static at runtime; every entry is validated when the table is built, so a
//! malformed policy can never reach a live session.

use super::risk::RiskTier;
use crate::quorum::ConsensusRule;
use crate::role::AgentRole;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Default consensus window in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Errors raised while building a policy table
///
/// These surface at configuration load time only. A table that fails to
/// build is rejected wholesale (fail closed) rather than falling back to
/// partial defaults.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyConfigError {
    #[error("policy for `{0}` lists no required roles")]
    NoRequiredRoles(String),

    #[error("policy for `{action_type}` lists role `{role}` more than once")]
    DuplicateRole {
        action_type: String,
        role: AgentRole,
    },

    #[error(
        "policy for `{action_type}` has threshold {required}-of-{total}, which cannot be met"
    )]
    UnsatisfiableThreshold {
        action_type: String,
        required: usize,
        total: usize,
    },

    #[error(
        "policy for `{action_type}` has threshold total {total} but {role_count} required roles"
    )]
    ThresholdTotalMismatch {
        action_type: String,
        total: usize,
        role_count: usize,
    },

    #[error("policy for `{0}` has a zero timeout")]
    ZeroTimeout(String),
}

/// Authorization requirements for one action type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPolicy {
    /// Roles whose votes this action requires; distinct, non-empty
    pub required_roles: Vec<AgentRole>,
    /// Rule deciding approval from the vote set
    pub rule: ConsensusRule,
    /// Informational risk classification
    pub risk_tier: RiskTier,
    /// Consensus window; an unresolved session expires after this long
    pub timeout_secs: u64,
}

impl ActionPolicy {
    pub fn new(required_roles: Vec<AgentRole>, rule: ConsensusRule, risk_tier: RiskTier) -> Self {
        Self {
            required_roles,
            rule,
            risk_tier,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Consensus window as a duration
    pub fn timeout(&self) -> Duration {
        Duration::seconds(self.timeout_secs as i64)
    }

    pub fn votes_required(&self) -> usize {
        self.required_roles.len()
    }

    pub fn authorizes(&self, role: AgentRole) -> bool {
        self.required_roles.contains(&role)
    }

    /// Validate the structural invariants for this policy
    fn validate(&self, action_type: &str) -> Result<(), PolicyConfigError> {
        if self.required_roles.is_empty() {
            return Err(PolicyConfigError::NoRequiredRoles(action_type.to_string()));
        }
        for (i, role) in self.required_roles.iter().enumerate() {
            if self.required_roles[..i].contains(role) {
                return Err(PolicyConfigError::DuplicateRole {
                    action_type: action_type.to_string(),
                    role: *role,
                });
            }
        }
        if let ConsensusRule::Threshold { required, total } = self.rule {
            if required == 0 || required > total {
                return Err(PolicyConfigError::UnsatisfiableThreshold {
                    action_type: action_type.to_string(),
                    required,
                    total,
                });
            }
            if total != self.required_roles.len() {
                return Err(PolicyConfigError::ThresholdTotalMismatch {
                    action_type: action_type.to_string(),
                    total,
                    role_count: self.required_roles.len(),
                });
            }
        }
        if self.timeout_secs == 0 {
            return Err(PolicyConfigError::ZeroTimeout(action_type.to_string()));
        }
        Ok(())
    }
}

/// Static lookup table from action type to policy
#[derive(Debug, Clone)]
pub struct PolicyTable {
    entries: HashMap<String, ActionPolicy>,
    default_policy: ActionPolicy,
}

impl PolicyTable {
    /// The built-in table covering the known high-risk action types
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "delete_evidence".to_string(),
            ActionPolicy::new(
                vec![
                    AgentRole::ForensicPathologist,
                    AgentRole::LegalAuditor,
                    AgentRole::Ciso,
                ],
                ConsensusRule::Unanimous,
                RiskTier::Critical,
            ),
        );
        entries.insert(
            "policy_override".to_string(),
            ActionPolicy::new(
                vec![AgentRole::Comptroller, AgentRole::Ciso, AgentRole::Guardian],
                ConsensusRule::Supermajority,
                RiskTier::High,
            ),
        );
        entries.insert(
            "data_export".to_string(),
            ActionPolicy::new(
                vec![AgentRole::LegalAuditor, AgentRole::Ciso],
                ConsensusRule::Unanimous,
                RiskTier::High,
            ),
        );
        entries.insert(
            "external_api_call".to_string(),
            ActionPolicy::new(
                vec![AgentRole::Ciso, AgentRole::Comptroller],
                ConsensusRule::SimpleMajority,
                RiskTier::Medium,
            ),
        );
        entries.insert(
            "memory_modification".to_string(),
            ActionPolicy::new(
                vec![
                    AgentRole::ForensicPathologist,
                    AgentRole::Comptroller,
                    AgentRole::Guardian,
                ],
                ConsensusRule::Supermajority,
                RiskTier::High,
            ),
        );

        Self {
            entries,
            default_policy: Self::conservative_default(),
        }
    }

    /// Fallback for unmapped action types: two generic reviewers, simple
    /// majority
    pub fn conservative_default() -> ActionPolicy {
        ActionPolicy::new(
            vec![AgentRole::Comptroller, AgentRole::Ciso],
            ConsensusRule::SimpleMajority,
            RiskTier::Medium,
        )
    }

    /// Build a table from explicit entries, validating each one
    ///
    /// Any invalid entry rejects the whole table.
    pub fn from_entries(
        entries: HashMap<String, ActionPolicy>,
        default_policy: ActionPolicy,
    ) -> Result<Self, PolicyConfigError> {
        for (action_type, policy) in &entries {
            policy.validate(action_type)?;
        }
        default_policy.validate("default")?;
        Ok(Self {
            entries,
            default_policy,
        })
    }

    /// Resolve an action type to its policy
    ///
    /// Pure and total: the same input always yields the same policy, and
    /// unknown action types resolve to the default.
    pub fn resolve(&self, action_type: &str) -> &ActionPolicy {
        self.entries.get(action_type).unwrap_or(&self.default_policy)
    }

    /// Whether this action type has an explicit entry
    pub fn is_known(&self, action_type: &str) -> bool {
        self.entries.contains_key(action_type)
    }

    /// Explicit entries, for overlaying configuration on the builtin table
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ActionPolicy)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Explicitly configured action types, sorted
    pub fn action_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    pub fn default_policy(&self) -> &ActionPolicy {
        &self.default_policy
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_entries() {
        let table = PolicyTable::builtin();

        let delete = table.resolve("delete_evidence");
        assert_eq!(delete.rule, ConsensusRule::Unanimous);
        assert_eq!(delete.risk_tier, RiskTier::Critical);
        assert_eq!(delete.votes_required(), 3);

        let export = table.resolve("data_export");
        assert_eq!(export.rule, ConsensusRule::Unanimous);
        assert_eq!(export.votes_required(), 2);

        let api = table.resolve("external_api_call");
        assert_eq!(api.rule, ConsensusRule::SimpleMajority);
        assert_eq!(api.risk_tier, RiskTier::Medium);
    }

    #[test]
    fn test_unknown_action_type_gets_default() {
        let table = PolicyTable::builtin();
        let policy = table.resolve("launch_probe");

        assert!(!table.is_known("launch_probe"));
        assert_eq!(policy, table.default_policy());
        assert_eq!(
            policy.required_roles,
            vec![AgentRole::Comptroller, AgentRole::Ciso]
        );
        assert_eq!(policy.rule, ConsensusRule::SimpleMajority);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let table = PolicyTable::builtin();
        assert_eq!(
            table.resolve("policy_override"),
            table.resolve("policy_override")
        );
    }

    #[test]
    fn test_builtin_passes_validation() {
        let table = PolicyTable::builtin();
        let rebuilt =
            PolicyTable::from_entries(table.entries.clone(), table.default_policy.clone());
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_empty_roles_fail_closed() {
        let mut entries = HashMap::new();
        entries.insert(
            "bad".to_string(),
            ActionPolicy::new(vec![], ConsensusRule::Unanimous, RiskTier::High),
        );
        let err = PolicyTable::from_entries(entries, PolicyTable::conservative_default())
            .unwrap_err();
        assert_eq!(err, PolicyConfigError::NoRequiredRoles("bad".to_string()));
    }

    #[test]
    fn test_duplicate_role_fails_closed() {
        let mut entries = HashMap::new();
        entries.insert(
            "bad".to_string(),
            ActionPolicy::new(
                vec![AgentRole::Ciso, AgentRole::Ciso],
                ConsensusRule::Unanimous,
                RiskTier::High,
            ),
        );
        assert!(PolicyTable::from_entries(entries, PolicyTable::conservative_default()).is_err());
    }

    #[test]
    fn test_threshold_must_match_role_count() {
        let mut entries = HashMap::new();
        entries.insert(
            "bad".to_string(),
            ActionPolicy::new(
                vec![AgentRole::Ciso, AgentRole::Guardian],
                ConsensusRule::Threshold {
                    required: 2,
                    total: 5,
                },
                RiskTier::High,
            ),
        );
        let err = PolicyTable::from_entries(entries, PolicyTable::conservative_default())
            .unwrap_err();
        assert!(matches!(
            err,
            PolicyConfigError::ThresholdTotalMismatch { total: 5, .. }
        ));
    }

    #[test]
    fn test_unsatisfiable_threshold_fails_closed() {
        let mut entries = HashMap::new();
        entries.insert(
            "bad".to_string(),
            ActionPolicy::new(
                vec![AgentRole::Ciso, AgentRole::Guardian],
                ConsensusRule::Threshold {
                    required: 3,
                    total: 2,
                },
                RiskTier::High,
            ),
        );
        assert!(PolicyTable::from_entries(entries, PolicyTable::conservative_default()).is_err());
    }

    #[test]
    fn test_zero_timeout_fails_closed() {
        let mut entries = HashMap::new();
        entries.insert(
            "bad".to_string(),
            ActionPolicy::new(
                vec![AgentRole::Ciso],
                ConsensusRule::SimpleMajority,
                RiskTier::Low,
            )
            .with_timeout_secs(0),
        );
        assert!(PolicyTable::from_entries(entries, PolicyTable::conservative_default()).is_err());
    }

    #[test]
    fn test_action_types_sorted() {
        let table = PolicyTable::builtin();
        assert_eq!(
            table.action_types(),
            vec![
                "data_export",
                "delete_evidence",
                "external_api_call",
                "memory_modification",
                "policy_override",
            ]
        );
    }
}
