use std::sync::Arc;
use axum::{extract::State, Json};
use campus_common::PublicUser;
use crate::error::AppError;
use crate::storage::Storage;
use crate::AppState;

/// `GET /api/students`: the student directory
pub async fn list<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<PublicUser>>, AppError> {
    let users = state.storage.list_users().await?;
    Ok(Json(users.iter().map(|u| u.to_public()).collect()))
}
