//! Registration, login and logout.
use std::sync::Arc;
use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use campus_common::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use metrics::counter;
use tracing::{info, instrument, warn};
use crate::auth::{
    authenticate,
    cookie::{expired_cookie, read_session_token, session_cookie},
    hash_password_secure, AuthOutcome,
};
use crate::error::AppError;
use crate::extract::Payload;
use crate::metrics::{LOGIN_FAILED, LOGIN_SUCCEEDED, USER_REGISTERED};
use crate::models::User;
use crate::storage::Storage;
use crate::AppState;

/// `POST /api/auth/register`
#[instrument(skip_all, fields(username = %req.username))]
pub async fn register<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Payload(req): Payload<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let RegisterRequest { username, mut password, name, academic_interests } = req;
    if username.trim().is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput("username and password are required".to_string()));
    }

    let cost = state.settings.password_cost;
    let password_hash =
        tokio::task::spawn_blocking(move || hash_password_secure(&mut password, cost)).await??;

    let user = User::new(username, password_hash, name, academic_interests);
    state.storage.create_user(&user).await?;

    counter!(USER_REGISTERED).increment(1);
    info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully")),
    ))
}

/// `POST /api/auth/login`
#[instrument(skip_all, fields(username = %req.username))]
pub async fn login<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Payload(req): Payload<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let LoginRequest { username, password } = req;
    let user = state.storage.find_user_by_username(&username).await?;

    let decoy_hash = state.decoy_hash.clone();
    let outcome =
        tokio::task::spawn_blocking(move || authenticate(user, &password, &decoy_hash)).await?;
    let user = match outcome {
        AuthOutcome::Authenticated(user) => user,
        AuthOutcome::UnknownUser => {
            counter!(LOGIN_FAILED).increment(1);
            warn!("login rejected: unknown username");
            return Err(AppError::InvalidCredentials);
        },
        AuthOutcome::WrongPassword => {
            counter!(LOGIN_FAILED).increment(1);
            warn!("login rejected: wrong password");
            return Err(AppError::InvalidCredentials);
        },
    };

    let session = state.sessions.create(user.id).await;
    let cookie = session_cookie(&state.settings, &session.token);

    counter!(LOGIN_SUCCEEDED).increment(1);
    info!(user_id = %user.id, "login successful");

    Ok((
        [(SET_COOKIE, cookie.to_string())],
        Json(LoginResponse {
            message: "Login successful".to_string(),
            user: user.to_public(),
        }),
    ))
}

/// `GET /api/auth/logout`; succeeds whether or not a session existed
#[instrument(skip_all)]
pub async fn logout<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = read_session_token(&headers, &state.settings.cookie_name) {
        if state.sessions.destroy(&token).await {
            info!("session ended");
        }
    }

    (
        [(SET_COOKIE, expired_cookie(&state.settings).to_string())],
        Json(MessageResponse::new("Logged out successfully")),
    )
}
