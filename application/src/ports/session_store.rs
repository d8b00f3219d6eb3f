//! Session store port
//!
//! The registry owns every chamber session and hands out per-session
//! handles. Each handle carries its own lock, so the
//! validate/append/evaluate/resolve sequence serializes per session while
//! distinct sessions proceed independently.

use async_trait::async_trait;
use chamber_domain::ChamberSession;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Shared handle to one session; the mutex is the per-session lock
pub type SharedSession = Arc<Mutex<ChamberSession>>;

/// Registry failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("a chamber session for action `{0}` already exists")]
    DuplicateSessionId(String),

    #[error("no chamber session found for action `{0}`")]
    SessionNotFound(String),
}

/// Registry of chamber sessions keyed by action id
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Register a new session; fails if the action id is already present
    async fn insert(&self, session: ChamberSession) -> Result<SharedSession, StoreError>;

    /// Look up a session by action id
    async fn get(&self, action_id: &str) -> Result<SharedSession, StoreError>;

    /// Handles to every retained session, for sweeps and audits
    async fn sessions(&self) -> Vec<SharedSession>;
}
