//! HMAC-SHA256 vote signer

use chamber_application::ports::signer::{BallotPayload, VoteSigner};
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Keyed signer binding votes to a shared secret
///
/// The key is injected at startup (configuration or environment); the mac
/// is initialized once and cloned per signature.
#[derive(Clone)]
pub struct HmacSigner {
    mac: HmacSha256,
}

impl std::fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        f.debug_struct("HmacSigner").finish_non_exhaustive()
    }
}

impl HmacSigner {
    pub fn new(key: &[u8]) -> Result<Self, InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(key)?,
        })
    }
}

impl VoteSigner for HmacSigner {
    fn sign(&self, payload: &BallotPayload<'_>) -> String {
        let mut mac = self.mac.clone();
        mac.update(&payload.canonical_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chamber_domain::{AgentRole, VoteDecision};

    fn payload<'a>(action_id: &'a str, rationale: &'a str) -> BallotPayload<'a> {
        BallotPayload {
            role: AgentRole::Ciso,
            decision: VoteDecision::Approve,
            rationale,
            confidence: 0.9,
            action_id,
        }
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = HmacSigner::new(b"chamber-secret").unwrap();
        let p = payload("act-1", "reviewed the export scope");

        assert_eq!(signer.sign(&p), signer.sign(&p));
        assert_eq!(signer.sign(&p).len(), 64);
    }

    #[test]
    fn test_signature_binds_every_field() {
        let signer = HmacSigner::new(b"chamber-secret").unwrap();
        let base = signer.sign(&payload("act-1", "ok"));

        assert_ne!(base, signer.sign(&payload("act-2", "ok")));
        assert_ne!(base, signer.sign(&payload("act-1", "not ok")));
    }

    #[test]
    fn test_keys_produce_distinct_signatures() {
        let a = HmacSigner::new(b"key-a").unwrap();
        let b = HmacSigner::new(b"key-b").unwrap();
        let p = payload("act-1", "ok");

        assert_ne!(a.sign(&p), b.sign(&p));
    }

    #[test]
    fn test_verify_round_trip() {
        let signer = HmacSigner::new(b"chamber-secret").unwrap();
        let p = payload("act-1", "ok");
        let sig = signer.sign(&p);

        assert!(signer.verify(&p, &sig));
        assert!(!signer.verify(&p, "forged"));
        assert!(!signer.verify(&payload("act-2", "ok"), &sig));
    }
}
