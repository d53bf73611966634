// ============================
// campus-backend-lib/src/storage.rs
// ============================
//! Document store abstraction with a flat-file implementation.
//!
//! Every collection is a JSON-lines file; one line is one document and
//! lines are only ever appended, so listing returns insertion order.
use std::{fs, io::{self, SeekFrom}, path::{Path, PathBuf}, sync::Arc};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use serde::{de::DeserializeOwned, Serialize};
use tokio::{
    fs as tokio_fs,
    io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt},
    sync::Mutex,
};
use tracing::{error, warn};
use crate::error::AppError;
use crate::models::{ExamResult, ForumThread, MarketplaceItem, StudyGroup, User, UserId};

/// The collections kept by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    ForumThreads,
    StudyGroups,
    Exams,
    MarketplaceItems,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::ForumThreads,
        Collection::StudyGroups,
        Collection::Exams,
        Collection::MarketplaceItems,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Users => "users.jsonl",
            Collection::ForumThreads => "forum_threads.jsonl",
            Collection::StudyGroups => "study_groups.jsonl",
            Collection::Exams => "exams.jsonl",
            Collection::MarketplaceItems => "marketplace_items.jsonl",
        }
    }
}

/// A document that lives in one of the append-only resource collections.
/// Users are written through `create_user` instead, which keeps the
/// username index in step with the file.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
}

impl Record for ForumThread {
    const COLLECTION: Collection = Collection::ForumThreads;
}

impl Record for StudyGroup {
    const COLLECTION: Collection = Collection::StudyGroups;
}

impl Record for ExamResult {
    const COLLECTION: Collection = Collection::Exams;
}

impl Record for MarketplaceItem {
    const COLLECTION: Collection = Collection::MarketplaceItems;
}

/// Trait for storage backends
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist a new user; fails with `UsernameTaken` on a duplicate
    async fn create_user(&self, user: &User) -> Result<(), AppError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, AppError>;

    /// All users in registration order
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    /// Append a document to its collection
    async fn insert<R: Record>(&self, record: &R) -> Result<(), AppError>;

    /// All documents of a collection in insertion order
    async fn list<R: Record>(&self) -> Result<Vec<R>, AppError>;
}

/// Flat-file implementation of the Storage trait
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
    /// username -> id, rebuilt from `users.jsonl` on open
    usernames: Arc<DashMap<String, UserId>>,
    /// id -> user, so session lookups never touch the disk
    users: Arc<DashMap<UserId, User>>,
    /// held for every file access so no reader sees a half-written line
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        for collection in Collection::ALL {
            let dropped = repair_torn_tail(&root.join(collection.file_name()))?;
            if dropped > 0 {
                warn!(collection = collection.file_name(), dropped, "truncated an interrupted append");
            }
        }

        let usernames = DashMap::new();
        let users = DashMap::new();
        let users_path = root.join(Collection::Users.file_name());
        if users_path.exists() {
            for line in fs::read_to_string(&users_path)?.lines() {
                if line.trim().is_empty() {
                    continue;
                }
                let user: User = serde_json::from_str(line)?;
                usernames.insert(user.username.clone(), user.id);
                users.insert(user.id, user);
            }
        }
        tracing::debug!(root = %root.display(), users = users.len(), "opened flat-file storage");

        Ok(Self {
            root,
            usernames: Arc::new(usernames),
            users: Arc::new(users),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn path(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }

    /// Append one document as a single line. A failed write is cut back
    /// off the file so the collection stays readable.
    async fn append_line<D: Serialize + Sync>(
        &self,
        collection: Collection,
        doc: &D,
    ) -> Result<(), AppError> {
        let mut line = serde_json::to_string(doc)?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        let mut file = tokio_fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.path(collection))
            .await?;

        let mut len = file.metadata().await?.len();
        if len > 0 && !ends_with_newline(&mut file).await? {
            len = truncate_torn_tail(&mut file).await?;
            warn!(collection = collection.file_name(), "dropped an unterminated line before appending");
        }
        file.seek(SeekFrom::Start(len)).await?;

        if let Err(err) = write_line(&mut file, line.as_bytes()).await {
            if let Err(truncate_err) = file.set_len(len).await {
                error!(collection = collection.file_name(), error = %truncate_err, "could not roll back a failed append");
            }
            return Err(err.into());
        }
        Ok(())
    }

    async fn read_all<D: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<D>, AppError> {
        let path = self.path(collection);
        let _guard = self.write_lock.lock().await;
        if !tokio_fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }

        let content = tokio_fs::read_to_string(&path).await?;
        complete_lines(&content, collection)
            .map(|line| serde_json::from_str(line).map_err(AppError::from))
            .collect()
    }
}

/// Byte length of `content` up to and including its last newline
fn complete_len(content: &[u8]) -> u64 {
    content.iter().rposition(|b| *b == b'\n').map_or(0, |pos| pos + 1) as u64
}

/// Newline-terminated, non-blank lines. An unterminated tail is an append
/// still in flight or one that never finished, and is skipped.
fn complete_lines(content: &str, collection: Collection) -> impl Iterator<Item = &str> {
    let complete = &content[..complete_len(content.as_bytes()) as usize];
    if complete.len() < content.len() {
        warn!(collection = collection.file_name(), "skipping an unterminated trailing line");
    }
    complete.lines().filter(|line| !line.trim().is_empty())
}

/// Cut an unterminated last line off a collection file, returning how many
/// bytes were dropped
fn repair_torn_tail(path: &Path) -> io::Result<u64> {
    let content = match fs::read(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err),
    };
    let keep = complete_len(&content);
    if keep < content.len() as u64 {
        fs::OpenOptions::new().write(true).open(path)?.set_len(keep)?;
    }
    Ok(content.len() as u64 - keep)
}

async fn ends_with_newline(file: &mut tokio_fs::File) -> io::Result<bool> {
    file.seek(SeekFrom::End(-1)).await?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last).await?;
    Ok(last[0] == b'\n')
}

async fn truncate_torn_tail(file: &mut tokio_fs::File) -> io::Result<u64> {
    file.seek(SeekFrom::Start(0)).await?;
    let mut content = Vec::new();
    file.read_to_end(&mut content).await?;
    let keep = complete_len(&content);
    file.set_len(keep).await?;
    Ok(keep)
}

async fn write_line(file: &mut tokio_fs::File, line: &[u8]) -> io::Result<()> {
    file.write_all(line).await?;
    file.flush().await
}

#[async_trait]
impl Storage for FlatFileStorage {
    async fn create_user(&self, user: &User) -> Result<(), AppError> {
        // Reserve the username first; the entry guard is dropped before any await
        match self.usernames.entry(user.username.clone()) {
            Entry::Occupied(_) => return Err(AppError::UsernameTaken(user.username.clone())),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            },
        }

        if let Err(err) = self.append_line(Collection::Users, user).await {
            self.usernames.remove(&user.username);
            return Err(err);
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let Some(id) = self.usernames.get(username).map(|entry| *entry.value()) else {
            return Ok(None);
        };
        self.find_user_by_id(id).await
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.read_all(Collection::Users).await
    }

    async fn insert<R: Record>(&self, record: &R) -> Result<(), AppError> {
        self.append_line(R::COLLECTION, record).await
    }

    async fn list<R: Record>(&self) -> Result<Vec<R>, AppError> {
        self.read_all(R::COLLECTION).await
    }
}
