//! Configuration file model
//!
//! `chamber.toml` carries the signer key, the default consensus window, and
//! policy table overrides. Entries are written with plain strings and
//! converted into domain types in one validated pass; any malformed entry
//! rejects the whole table rather than silently defaulting.
//!
//! ```toml
//! [chamber]
//! default_timeout_secs = 300
//! signing_key = "replace-me"
//!
//! [policies.delete_evidence]
//! roles = ["forensic_pathologist", "legal_auditor", "ciso"]
//! rule = "unanimous"
//! risk = "critical"
//!
//! [policies.backup_restore]
//! roles = ["ciso", "guardian", "comptroller"]
//! rule = "threshold:2/3"
//! timeout_secs = 600
//! ```

use chamber_domain::{
    ActionPolicy, AgentRole, ConsensusRule, DEFAULT_TIMEOUT_SECS, PolicyConfigError, PolicyTable,
    RiskTier,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid policy for `{action_type}`: {message}")]
    InvalidPolicy {
        action_type: String,
        message: String,
    },

    #[error(transparent)]
    Policy(#[from] PolicyConfigError),
}

/// Top-level configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub chamber: ChamberConfig,
    /// Policy overrides and additions, keyed by action type
    pub policies: BTreeMap<String, PolicyEntry>,
    /// Override for the unknown-action-type fallback
    pub default_policy: Option<PolicyEntry>,
}

/// `[chamber]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChamberConfig {
    /// Consensus window for policies without an explicit timeout
    pub default_timeout_secs: u64,
    /// Key for the HMAC vote signer
    pub signing_key: String,
}

impl Default for ChamberConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: DEFAULT_TIMEOUT_SECS,
            signing_key: "chamber-dev-key".to_string(),
        }
    }
}

/// One `[policies.<action_type>]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub roles: Vec<String>,
    pub rule: String,
    #[serde(default)]
    pub risk: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl PolicyEntry {
    fn into_policy(
        self,
        action_type: &str,
        default_timeout_secs: u64,
    ) -> Result<ActionPolicy, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidPolicy {
            action_type: action_type.to_string(),
            message,
        };

        let roles = self
            .roles
            .iter()
            .map(|r| r.parse::<AgentRole>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;
        let rule = self.rule.parse::<ConsensusRule>().map_err(invalid)?;
        let risk = match &self.risk {
            Some(r) => r.parse::<RiskTier>().map_err(invalid)?,
            None => RiskTier::Medium,
        };

        Ok(ActionPolicy::new(roles, rule, risk)
            .with_timeout_secs(self.timeout_secs.unwrap_or(default_timeout_secs)))
    }
}

impl FileConfig {
    /// Build the runtime policy table: builtin entries overlaid with this
    /// file's policies, every entry validated
    pub fn into_policy_table(self) -> Result<PolicyTable, ConfigError> {
        let default_timeout = self.chamber.default_timeout_secs;

        let builtin = PolicyTable::builtin();
        let mut entries: HashMap<String, ActionPolicy> = builtin
            .entries()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    v.clone().with_timeout_secs(default_timeout),
                )
            })
            .collect();

        for (action_type, entry) in self.policies {
            let policy = entry.into_policy(&action_type, default_timeout)?;
            entries.insert(action_type, policy);
        }

        let default_policy = match self.default_policy {
            Some(entry) => entry.into_policy("default", default_timeout)?,
            None => PolicyTable::conservative_default().with_timeout_secs(default_timeout),
        };

        Ok(PolicyTable::from_entries(entries, default_policy)?)
    }
}
