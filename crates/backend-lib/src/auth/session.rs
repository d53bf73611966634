// ============================
// campus-backend-lib/src/auth/session.rs
// ============================
//! Server-side sessions keyed by an opaque cookie token.
use async_trait::async_trait;
use tokio::sync::RwLock;
use std::{collections::HashMap, sync::Arc, time::{Duration, SystemTime}};
use metrics::{counter, gauge};
use crate::metrics::{SESSION_ACTIVE, SESSION_CREATED, SESSION_EXPIRED};
use crate::models::UserId;
use super::token_generator::generate_secure_token;

/// Session information. Only the user id is kept; the user record is
/// re-read from storage on every authenticated request.
#[derive(Clone, Debug)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub created_at: SystemTime,
    pub expires_at: SystemTime,
}

impl Session {
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }
}

/// Where sessions live. Injected into `AppState` so handlers never reach
/// for global state.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session for `user_id` and return it with its fresh token
    async fn create(&self, user_id: UserId) -> Session;

    /// Look up a live session; expired sessions are treated as absent
    async fn get(&self, token: &str) -> Option<Session>;

    /// End a session. Returns whether one existed.
    async fn destroy(&self, token: &str) -> bool;

    /// Drop every expired session and return how many went
    async fn purge_expired(&self) -> usize;
}

/// In-memory session store
#[derive(Clone)]
pub struct SessionManager {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Seed the store with sessions carried over from a previous run
    pub fn from_sessions(ttl: Duration, sessions: impl IntoIterator<Item = Session>) -> Self {
        let sessions = sessions
            .into_iter()
            .map(|session| (session.token.clone(), session))
            .collect();
        Self {
            sessions: Arc::new(RwLock::new(sessions)),
            ttl,
        }
    }

    /// Copy of every session held, expired or not
    pub async fn snapshot(&self) -> Vec<Session> {
        self.sessions.read().await.values().cloned().collect()
    }

    /// Number of sessions held, expired or not
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for SessionManager {
    async fn create(&self, user_id: UserId) -> Session {
        let now = SystemTime::now();
        let session = Session {
            token: generate_secure_token(),
            user_id,
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.insert(session.token.clone(), session.clone());

        counter!(SESSION_CREATED).increment(1);
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);

        session
    }

    async fn get(&self, token: &str) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(token)
            .filter(|session| !session.is_expired_at(SystemTime::now()))
            .cloned()
    }

    async fn destroy(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(token).is_some();
        gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        removed
    }

    async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = SystemTime::now();
        let before_count = sessions.len();

        sessions.retain(|_, session| !session.is_expired_at(now));

        let removed = before_count - sessions.len();
        if removed > 0 {
            counter!(SESSION_EXPIRED).increment(removed as u64);
            gauge!(SESSION_ACTIVE).set(sessions.len() as f64);
        }
        removed
    }
}
