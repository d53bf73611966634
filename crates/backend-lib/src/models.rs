// ============================
// campus-backend-lib/src/models.rs
// ============================
//! Stored documents. References between collections are plain ids that
//! handlers populate at read time.
use campus_common::{DocId, PublicUser};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type UserId = DocId;

/// A registered student
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// scrypt PHC string, never the plaintext
    pub password_hash: String,
    pub name: String,
    pub academic_interests: Vec<String>,
}

impl User {
    pub fn new(
        username: String,
        password_hash: String,
        name: String,
        academic_interests: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            name,
            academic_interests,
        }
    }

    /// Profile without the password hash
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
            academic_interests: self.academic_interests.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumThread {
    pub id: DocId,
    pub title: String,
    pub content: String,
    pub author: UserId,
    pub created_at: DateTime<Utc>,
}

impl ForumThread {
    pub fn new(title: String, content: String, author: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            author,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroup {
    pub id: DocId,
    pub name: String,
    pub is_private: bool,
    pub members: Vec<UserId>,
}

impl StudyGroup {
    /// A new group always starts with its creator as the only member
    pub fn new(name: String, is_private: bool, creator: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            is_private,
            members: vec![creator],
        }
    }
}

/// One graded quiz attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub id: DocId,
    pub user: UserId,
    pub score: u32,
    pub taken_at: DateTime<Utc>,
}

impl ExamResult {
    pub fn new(user: UserId, score: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            score,
            taken_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceItem {
    pub id: DocId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub seller: UserId,
    pub created_at: DateTime<Utc>,
}

impl MarketplaceItem {
    pub fn new(title: String, description: String, price: f64, seller: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            price,
            seller,
            created_at: Utc::now(),
        }
    }
}
