//! Discussion threads.
use std::sync::Arc;
use axum::{extract::State, http::StatusCode, Json};
use campus_common::{NewThread, ThreadView};
use tracing::{info, instrument};
use crate::error::AppError;
use crate::extract::{CurrentUser, Payload};
use crate::models::ForumThread;
use crate::storage::Storage;
use crate::AppState;
use super::{user_ref, UserDirectory};

/// `GET /api/forums`
pub async fn list<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ThreadView>>, AppError> {
    let threads: Vec<ForumThread> = state.storage.list().await?;
    let directory = UserDirectory::load(&state.storage).await?;

    let views = threads
        .into_iter()
        .map(|thread| ThreadView {
            author: directory.lookup(thread.author),
            id: thread.id,
            title: thread.title,
            content: thread.content,
            created_at: thread.created_at,
        })
        .collect();
    Ok(Json(views))
}

/// `POST /api/forums`
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Payload(req): Payload<NewThread>,
) -> Result<(StatusCode, Json<ThreadView>), AppError> {
    let thread = ForumThread::new(req.title, req.content, user.id);
    state.storage.insert(&thread).await?;
    info!(thread_id = %thread.id, "forum thread created");

    Ok((
        StatusCode::CREATED,
        Json(ThreadView {
            id: thread.id,
            title: thread.title,
            content: thread.content,
            author: Some(user_ref(&user)),
            created_at: thread.created_at,
        }),
    ))
}
