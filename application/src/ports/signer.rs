//! Vote signer port
//!
//! The engine binds each accepted vote to an authenticity token computed
//! over a canonical payload. The algorithm is a deployment choice (keyed
//! MAC or equivalent), so the signer is a port; consensus arithmetic never
//! depends on it.

use chamber_domain::{AgentRole, VoteDecision};

/// Canonical view of a ballot for signing
///
/// The signature covers role, decision, rationale, confidence, and the
/// session's action id, concatenated in that order.
#[derive(Debug, Clone, Copy)]
pub struct BallotPayload<'a> {
    pub role: AgentRole,
    pub decision: VoteDecision,
    pub rationale: &'a str,
    pub confidence: f64,
    pub action_id: &'a str,
}

impl BallotPayload<'_> {
    /// Byte serialization the signature is computed over
    pub fn canonical_bytes(&self) -> Vec<u8> {
        format!(
            "{}{}{}{}{}",
            self.role, self.decision, self.rationale, self.confidence, self.action_id
        )
        .into_bytes()
    }
}

/// Computes and checks vote signatures
pub trait VoteSigner: Send + Sync {
    /// Sign a ballot payload, returning an opaque token
    fn sign(&self, payload: &BallotPayload<'_>) -> String;

    /// Check a token against a payload
    fn verify(&self, payload: &BallotPayload<'_>, signature: &str) -> bool {
        self.sign(payload) == signature
    }
}
