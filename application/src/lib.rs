//! Application layer for star-chamber
//!
//! Use cases orchestrate the domain's consensus engine behind ports for
//! storage, signing, time, and audit output. Implementations of the ports
//! live in the infrastructure layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    AuditSink, BallotPayload, Clock, ManualClock, NoAuditSink, SessionStore, SharedSession,
    StoreError, SystemClock, VoteSigner,
};
pub use use_cases::{
    CastVoteInput, CastVoteUseCase, GetStatusError, GetStatusUseCase, InitiateAuthorizationError,
    InitiateAuthorizationInput, InitiateAuthorizationUseCase, SweepExpiredUseCase,
};
