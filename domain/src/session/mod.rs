//! Chamber sessions: the authorization request entity and its snapshots

pub mod entities;
pub mod status;

pub use entities::{ChamberSession, FinalDecision, Resolution, SessionState};
pub use status::SessionStatus;
