//! Reviewer roles for chamber sessions
//!
//! Each high-risk action is reviewed by a set of specialized roles. The set
//! is closed: policies are validated against these variants at load time, so
//! an unknown role can never reach the voting path.

use serde::{Deserialize, Serialize};

/// A specialized reviewer identity authorized to vote on chamber sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    /// Examines evidence integrity and chain of custody
    ForensicPathologist,
    /// Security posture and operational risk
    Ciso,
    /// Legal and regulatory compliance
    LegalAuditor,
    /// Resource and budget accountability
    Comptroller,
    /// Organizational norms and external perception
    CulturalSentinel,
    /// Safety constraints and containment
    Guardian,
    /// Technical background and context
    Researcher,
}

impl AgentRole {
    /// All roles, in a stable order
    pub const ALL: [AgentRole; 7] = [
        AgentRole::ForensicPathologist,
        AgentRole::Ciso,
        AgentRole::LegalAuditor,
        AgentRole::Comptroller,
        AgentRole::CulturalSentinel,
        AgentRole::Guardian,
        AgentRole::Researcher,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::ForensicPathologist => "forensic_pathologist",
            AgentRole::Ciso => "ciso",
            AgentRole::LegalAuditor => "legal_auditor",
            AgentRole::Comptroller => "comptroller",
            AgentRole::CulturalSentinel => "cultural_sentinel",
            AgentRole::Guardian => "guardian",
            AgentRole::Researcher => "researcher",
        }
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "forensic_pathologist" => Ok(AgentRole::ForensicPathologist),
            "ciso" => Ok(AgentRole::Ciso),
            "legal_auditor" => Ok(AgentRole::LegalAuditor),
            "comptroller" => Ok(AgentRole::Comptroller),
            "cultural_sentinel" => Ok(AgentRole::CulturalSentinel),
            "guardian" => Ok(AgentRole::Guardian),
            "researcher" => Ok(AgentRole::Researcher),
            _ => Err(format!(
                "Unknown agent role: {}. Valid: {}",
                s,
                AgentRole::ALL
                    .iter()
                    .map(|r| r.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_roles() {
        for role in AgentRole::ALL {
            assert_eq!(role.as_str().parse::<AgentRole>().ok(), Some(role));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("CISO".parse::<AgentRole>().ok(), Some(AgentRole::Ciso));
        assert_eq!(
            " Guardian ".parse::<AgentRole>().ok(),
            Some(AgentRole::Guardian)
        );
    }

    #[test]
    fn test_parse_unknown_role_lists_valid_ones() {
        let err = "archivist".parse::<AgentRole>().unwrap_err();
        assert!(err.contains("archivist"));
        assert!(err.contains("forensic_pathologist"));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&AgentRole::LegalAuditor).unwrap();
        assert_eq!(json, "\"legal_auditor\"");
    }
}
