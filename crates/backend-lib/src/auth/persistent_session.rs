// ============================
// campus-backend-lib/src/auth/persistent_session.rs
// ============================
//! Sessions that survive a restart.
//!
//! The live set is held in a [`SessionManager`] and written through to
//! `sessions.json` under the data directory after every change. The file
//! is replaced by rename, so a crash mid-save leaves the previous copy.
use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{fs as tokio_fs, sync::Mutex};
use tracing::{error, info, warn};
use crate::models::UserId;
use super::session::{Session, SessionManager, SessionStore};

pub const SESSIONS_FILE: &str = "sessions.json";

/// On-disk form of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistentSessionEntry {
    token: String,
    user_id: UserId,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<&Session> for PersistentSessionEntry {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            user_id: session.user_id,
            created_at: DateTime::from(session.created_at),
            expires_at: DateTime::from(session.expires_at),
        }
    }
}

impl From<PersistentSessionEntry> for Session {
    fn from(entry: PersistentSessionEntry) -> Self {
        Self {
            token: entry.token,
            user_id: entry.user_id,
            created_at: SystemTime::from(entry.created_at),
            expires_at: SystemTime::from(entry.expires_at),
        }
    }
}

/// File-backed session store
pub struct PersistentSessionStore {
    inner: SessionManager,
    path: PathBuf,
    /// orders saves so an older snapshot never lands after a newer one
    save_lock: Mutex<()>,
}

impl PersistentSessionStore {
    /// Open the store in `data_dir`, restoring every session that has not
    /// expired yet. An unreadable file is logged and treated as empty.
    pub fn open<P: AsRef<Path>>(data_dir: P, ttl: Duration) -> anyhow::Result<Self> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(SESSIONS_FILE);

        let now = SystemTime::now();
        let restored: Vec<Session> = load_entries(&path)?
            .into_iter()
            .map(Session::from)
            .filter(|session| !session.is_expired_at(now))
            .collect();
        if !restored.is_empty() {
            info!(restored = restored.len(), "restored sessions from disk");
        }

        Ok(Self {
            inner: SessionManager::from_sessions(ttl, restored),
            path,
            save_lock: Mutex::new(()),
        })
    }

    async fn save(&self) {
        let _guard = self.save_lock.lock().await;
        let entries: Vec<PersistentSessionEntry> =
            self.inner.snapshot().await.iter().map(PersistentSessionEntry::from).collect();

        if let Err(err) = write_atomically(&self.path, &entries).await {
            error!(path = %self.path.display(), error = %err, "failed to save sessions");
        }
    }
}

fn load_entries(path: &Path) -> anyhow::Result<Vec<PersistentSessionEntry>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    match serde_json::from_str(&content) {
        Ok(entries) => Ok(entries),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable session file");
            Ok(Vec::new())
        },
    }
}

async fn write_atomically(path: &Path, entries: &[PersistentSessionEntry]) -> anyhow::Result<()> {
    let json = serde_json::to_vec(entries)?;
    let tmp_path = path.with_extension("json.tmp");
    tokio_fs::write(&tmp_path, &json).await?;
    tokio_fs::rename(&tmp_path, path).await?;
    Ok(())
}

#[async_trait]
impl SessionStore for PersistentSessionStore {
    async fn create(&self, user_id: UserId) -> Session {
        let session = self.inner.create(user_id).await;
        self.save().await;
        session
    }

    async fn get(&self, token: &str) -> Option<Session> {
        self.inner.get(token).await
    }

    async fn destroy(&self, token: &str) -> bool {
        let removed = self.inner.destroy(token).await;
        if removed {
            self.save().await;
        }
        removed
    }

    async fn purge_expired(&self) -> usize {
        let removed = self.inner.purge_expired().await;
        if removed > 0 {
            self.save().await;
        }
        removed
    }
}
