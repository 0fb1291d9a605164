//! In-memory session store.

use super::types::Session;
use crate::error::ChatError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// A stored session behind its own lock.
pub type SharedSession = Arc<Mutex<Session>>;

/// Identifier-keyed session retention for the process lifetime.
///
/// Each session sits behind its own lock so message processing against the
/// same session serializes while unrelated sessions stay concurrent. The
/// outer map lock covers only lookup, insert, and remove; it is never held
/// across a model call. No eviction and no persistence: sessions live until
/// deleted or the process exits, a deliberate limit of this deployment.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a session.
    pub async fn insert(&self, session: Session) {
        let id = session.session_id.clone();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
    }

    /// Live handle to a session, if present.
    pub async fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.read().await.get(id).cloned()
    }

    /// Look up a session handle, failing when the id is empty or unknown.
    pub async fn validate(&self, id: &str) -> Result<SharedSession, ChatError> {
        if id.is_empty() {
            return Err(ChatError::MissingSessionId);
        }
        self.get(id)
            .await
            .ok_or_else(|| ChatError::SessionNotFound(id.to_string()))
    }

    /// Remove a session. Absent ids are ignored.
    pub async fn delete(&self, id: &str) {
        self.sessions.write().await.remove(id);
    }

    /// Snapshot all sessions, optionally filtered by owning user.
    pub async fn list(&self, user_id: Option<&str>) -> Vec<Session> {
        let handles: Vec<SharedSession> =
            self.sessions.read().await.values().cloned().collect();

        let mut sessions = Vec::with_capacity(handles.len());
        for handle in handles {
            let session = handle.lock().await.clone();
            let matches = user_id.map_or(true, |uid| session.user_id.as_deref() == Some(uid));
            if matches {
                sessions.push(session);
            }
        }
        sessions
    }

    /// Number of stored sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
