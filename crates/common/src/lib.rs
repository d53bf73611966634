// ================
// common/src/lib.rs
// ================
//! Request and response bodies exchanged between campus clients and the
//! REST API. Field names follow the camelCase JSON the web client sends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier shared by every stored document
pub type DocId = Uuid;

/// Body of `POST /api/auth/register`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    /// Interest tags shown on the student directory
    #[serde(default, alias = "interests")]
    pub academic_interests: Vec<String>,
}

/// Body of `POST /api/auth/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Profile fields safe to hand to any authenticated client
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: DocId,
    pub username: String,
    pub name: String,
    pub academic_interests: Vec<String>,
}

/// Response to a successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub message: String,
    pub user: PublicUser,
}

/// A populated user reference: the id plus the display name
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: DocId,
    pub name: String,
}

/// Body of `POST /api/forums`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewThread {
    pub title: String,
    pub content: String,
}

/// Forum thread as listed, with the author populated
/// # Fields
/// * `author` - `None` when the referenced user no longer resolves
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ThreadView {
    pub id: DocId,
    pub title: String,
    pub content: String,
    pub author: Option<UserRef>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/studygroups`
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewStudyGroup {
    pub name: String,
    #[serde(default)]
    pub is_private: Option<bool>,
}

/// Study group as listed, with members populated
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StudyGroupView {
    pub id: DocId,
    pub name: String,
    pub is_private: bool,
    pub members: Vec<UserRef>,
}

/// A quiz question with its answer key stripped
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub question: String,
    pub options: Vec<String>,
}

/// Body of `POST /api/exams/submit`; answers are positional
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExamSubmission {
    pub answers: Vec<String>,
}

/// Outcome of a graded submission
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExamScore {
    pub message: String,
    pub score: u32,
    pub total: u32,
}

/// Body of `POST /api/marketplace`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub price: f64,
}

/// Marketplace listing as listed, with the seller populated
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ListingView {
    pub id: DocId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub seller: Option<UserRef>,
    pub created_at: DateTime<Utc>,
}
