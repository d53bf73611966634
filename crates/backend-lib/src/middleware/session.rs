//! The session gate in front of every protected route.
use std::sync::Arc;
use axum::{
    extract::{Request, State},
    http::{header::ACCEPT, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use crate::auth::cookie::read_session_token;
use crate::error::AppError;
use crate::extract::CurrentUser;
use crate::models::User;
use crate::storage::Storage;
use crate::AppState;

/// Let the request through only if its cookie names a live session whose
/// user still exists. Browsers are redirected to the login page; API
/// clients get a 401.
pub async fn require_session<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_user(&state, request.headers()).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        },
        Ok(None) => {
            tracing::debug!(path = %request.uri().path(), "rejected request without a valid session");
            if wants_html(request.headers()) {
                Redirect::to(&state.settings.login_path).into_response()
            } else {
                AppError::Unauthenticated.into_response()
            }
        },
        Err(err) => err.into_response(),
    }
}

async fn resolve_user<S: Storage>(
    state: &AppState<S>,
    headers: &HeaderMap,
) -> Result<Option<User>, AppError> {
    let Some(token) = read_session_token(headers, &state.settings.cookie_name) else {
        return Ok(None);
    };
    let Some(session) = state.sessions.get(&token).await else {
        return Ok(None);
    };
    state.storage.find_user_by_id(session.user_id).await
}

/// Browser navigations advertise `text/html`; fetch/XHR clients usually don't
fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|accept| accept.contains("text/html"))
}
