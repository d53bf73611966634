//! Study groups.
use std::sync::Arc;
use axum::{extract::State, http::StatusCode, Json};
use campus_common::{NewStudyGroup, StudyGroupView};
use tracing::{info, instrument};
use crate::error::AppError;
use crate::extract::{CurrentUser, Payload};
use crate::models::StudyGroup;
use crate::storage::Storage;
use crate::AppState;
use super::{user_ref, UserDirectory};

/// `GET /api/studygroups`; members that no longer resolve are left out
pub async fn list<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<StudyGroupView>>, AppError> {
    let groups: Vec<StudyGroup> = state.storage.list().await?;
    let directory = UserDirectory::load(&state.storage).await?;

    let views = groups
        .into_iter()
        .map(|group| StudyGroupView {
            members: group.members.iter().filter_map(|id| directory.lookup(*id)).collect(),
            id: group.id,
            name: group.name,
            is_private: group.is_private,
        })
        .collect();
    Ok(Json(views))
}

/// `POST /api/studygroups`; the creator becomes the first member
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Payload(req): Payload<NewStudyGroup>,
) -> Result<(StatusCode, Json<StudyGroupView>), AppError> {
    let group = StudyGroup::new(req.name, req.is_private.unwrap_or(false), user.id);
    state.storage.insert(&group).await?;
    info!(group_id = %group.id, "study group created");

    Ok((
        StatusCode::CREATED,
        Json(StudyGroupView {
            id: group.id,
            name: group.name,
            is_private: group.is_private,
            members: vec![user_ref(&user)],
        }),
    ))
}
