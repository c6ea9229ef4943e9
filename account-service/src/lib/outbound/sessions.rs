use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::errors::SessionError;
use crate::domain::auth::models::Session;
use crate::domain::auth::ports::SessionStore;

/// Tracks all live refresh sessions for the process.
///
/// Sessions are not shared across instances; a restart logs everyone out.
#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    /// Map of session_id -> Session
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of sessions currently held, revoked ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) {
        self.sessions
            .write()
            .await
            .insert(session.session_id, session);
    }

    async fn find(&self, session_id: Uuid) -> Option<Session> {
        self.sessions.read().await.get(&session_id).cloned()
    }

    async fn rotate(&self, consumed: Uuid, replacement: Session) -> Result<(), SessionError> {
        // One write guard covers the check and both updates, so of two
        // concurrent rotations of the same session only one can succeed.
        let mut sessions = self.sessions.write().await;

        let current = sessions.get_mut(&consumed).ok_or(SessionError::Unknown)?;
        if current.revoked {
            return Err(if current.replaced_by.is_some() {
                SessionError::Consumed
            } else {
                SessionError::Revoked
            });
        }

        current.revoked = true;
        current.replaced_by = Some(replacement.session_id);
        sessions.insert(replacement.session_id, replacement);

        Ok(())
    }

    async fn revoke(&self, session_id: Uuid) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&session_id).ok_or(SessionError::Unknown)?;
        session.revoked = true;

        Ok(())
    }

    async fn revoke_all_for(&self, identity_id: i64) -> u64 {
        let mut sessions = self.sessions.write().await;
        let mut revoked = 0;
        for session in sessions.values_mut() {
            if session.identity_id == identity_id && !session.revoked {
                session.revoked = true;
                revoked += 1;
            }
        }

        revoked
    }

    async fn prune_expired(&self, max_age: Duration) -> u64 {
        let cutoff = Utc::now() - max_age;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.issued_at > cutoff);

        (before - sessions.len()) as u64
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}
