//! Use cases: the engine's caller-facing operations

pub mod cast_vote;
pub mod get_status;
pub mod initiate_authorization;
pub mod sweep_expired;

pub use cast_vote::{CastVoteInput, CastVoteUseCase};
pub use get_status::{GetStatusError, GetStatusUseCase};
pub use initiate_authorization::{
    InitiateAuthorizationError, InitiateAuthorizationInput, InitiateAuthorizationUseCase,
};
pub use sweep_expired::SweepExpiredUseCase;
