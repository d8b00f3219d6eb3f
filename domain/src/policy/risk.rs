//! Risk tiers for gated actions

use serde::{Deserialize, Serialize};

/// Risk tier of a gated action, derived from its action type
///
/// Informational: the binding constraints are the required roles and the
/// consensus rule, both carried on the policy itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    /// Irreversible or evidence-destroying operations
    Critical,
    /// Policy overrides, data leaving the boundary
    High,
    /// Reversible operations with external visibility
    Medium,
    /// Everything else
    Low,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Critical => "critical",
            RiskTier::High => "high",
            RiskTier::Medium => "medium",
            RiskTier::Low => "low",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RiskTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(RiskTier::Critical),
            "high" => Ok(RiskTier::High),
            "medium" => Ok(RiskTier::Medium),
            "low" => Ok(RiskTier::Low),
            _ => Err(format!(
                "Unknown risk tier: {}. Valid: critical, high, medium, low",
                s
            )),
        }
    }
}
