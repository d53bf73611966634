// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! REST handlers, one module per resource.

pub mod auth;
pub mod exams;
pub mod forums;
pub mod marketplace;
pub mod reports;
pub mod students;
pub mod study_groups;

use std::collections::HashMap;
use campus_common::UserRef;
use crate::error::AppError;
use crate::models::{User, UserId};
use crate::storage::Storage;

/// Id -> display name lookup used to populate user references at read time
pub(crate) struct UserDirectory(HashMap<UserId, String>);

impl UserDirectory {
    pub(crate) async fn load<S: Storage>(storage: &S) -> Result<Self, AppError> {
        let users = storage.list_users().await?;
        Ok(Self(users.into_iter().map(|u| (u.id, u.name)).collect()))
    }

    /// `None` when the referenced user is gone
    pub(crate) fn lookup(&self, id: UserId) -> Option<UserRef> {
        self.0.get(&id).map(|name| UserRef { id, name: name.clone() })
    }
}

pub(crate) fn user_ref(user: &User) -> UserRef {
    UserRef {
        id: user.id,
        name: user.name.clone(),
    }
}
