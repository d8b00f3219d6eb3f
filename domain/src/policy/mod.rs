//! Action policies: risk tiers and the action-type lookup table

pub mod risk;
pub mod table;

pub use risk::RiskTier;
pub use table::{ActionPolicy, DEFAULT_TIMEOUT_SECS, PolicyConfigError, PolicyTable};
