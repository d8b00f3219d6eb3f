//! In-memory session store
//!
//! The process-wide registry of chamber sessions. The outer map lock is
//! held only to look a handle up or insert one; every mutation of a session
//! happens under that session's own mutex, so sessions never contend with
//! each other.

use async_trait::async_trait;
use chamber_application::ports::session_store::{SessionStore, SharedSession, StoreError};
use chamber_domain::ChamberSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Session registry backed by a process-local map
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SharedSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retained sessions (terminal ones included)
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop terminal sessions from the registry
    ///
    /// Sessions still pending are always retained. Returns the number of
    /// sessions evicted.
    pub async fn purge_resolved(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        let mut retained = HashMap::new();
        for (id, handle) in sessions.drain() {
            let terminal = handle.lock().await.is_terminal();
            if !terminal {
                retained.insert(id, handle);
            }
        }
        *sessions = retained;
        before - sessions.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: ChamberSession) -> Result<SharedSession, StoreError> {
        let mut sessions = self.sessions.write().await;
        let action_id = session.action_id().to_string();
        if sessions.contains_key(&action_id) {
            return Err(StoreError::DuplicateSessionId(action_id));
        }
        debug!(action_id = %action_id, "session registered");
        let handle: SharedSession = Arc::new(Mutex::new(session));
        sessions.insert(action_id, Arc::clone(&handle));
        Ok(handle)
    }

    async fn get(&self, action_id: &str) -> Result<SharedSession, StoreError> {
        self.sessions
            .read()
            .await
            .get(action_id)
            .cloned()
            .ok_or_else(|| StoreError::SessionNotFound(action_id.to_string()))
    }

    async fn sessions(&self) -> Vec<SharedSession> {
        self.sessions.read().await.values().cloned().collect()
    }
}
