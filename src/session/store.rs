use chrono::{DateTime, Utc};
use moka::future::Cache;
use std::time::Duration;
use uuid::Uuid;

/// An authenticated dashboard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Live sessions keyed by id. Entries expire after `idle_ttl` without use.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Session>,
}

impl SessionStore {
    const MAX_SESSIONS: u64 = 10_000;

    #[must_use]
    pub fn new(idle_ttl: Duration) -> Self {
        let sessions = Cache::builder()
            .max_capacity(Self::MAX_SESSIONS)
            .time_to_idle(idle_ttl)
            .build();
        Self { sessions }
    }

    pub async fn create(&self, username: &str) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            username: username.to_string(),
            created_at: Utc::now(),
        };
        self.sessions.insert(session.id, session.clone()).await;
        tracing::debug!(session_id = %session.id, "session_created");
        session
    }

    /// Look up a live session. A hit counts as activity for idle expiry.
    pub async fn get(&self, id: &Uuid) -> Option<Session> {
        self.sessions.get(id).await
    }

    /// End a session. Returns the session if it was still live.
    pub async fn end(&self, id: &Uuid) -> Option<Session> {
        let removed = self.sessions.remove(id).await;
        if removed.is_some() {
            tracing::debug!(session_id = %id, "session_ended");
        }
        removed
    }
}
