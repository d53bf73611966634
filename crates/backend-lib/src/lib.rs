// ============================
// campus-backend-lib/src/lib.rs
// ============================
//! Core of the campus community backend: accounts, forums, study groups,
//! the exam quiz and the marketplace, all behind cookie sessions.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod quiz;
pub mod report;
pub mod storage;
pub mod ws_router;

use std::sync::Arc;
use axum::{
    http::Uri,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use crate::auth::{hash_password, PersistentSessionStore, SessionStore, DECOY_PASSWORD};
use crate::error::AppError;
use crate::config::Settings;
use crate::handlers::{auth as auth_handlers, exams, forums, marketplace, reports, students, study_groups};
use crate::middleware::require_session;
use crate::storage::Storage;
use crate::ws_router::ConnectionRegistry;

/// Application state shared across all handlers
pub struct AppState<S> {
    /// Session store
    pub sessions: Arc<dyn SessionStore>,
    /// Settings
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: S,
    /// Open real-time connections
    pub connections: Arc<ConnectionRegistry>,
    /// Hash checked when a login names an unknown user
    pub decoy_hash: Arc<str>,
}

impl<S> AppState<S> {
    /// Create a new application state with sessions persisted under
    /// `data_dir`
    pub fn new(storage: S, config: &Settings) -> anyhow::Result<Self> {
        let sessions = Arc::new(PersistentSessionStore::open(&config.data_dir, config.session_ttl())?);
        Self::with_sessions(storage, config, sessions)
    }

    /// Create a new application state around an existing session store
    pub fn with_sessions(
        storage: S,
        config: &Settings,
        sessions: Arc<dyn SessionStore>,
    ) -> anyhow::Result<Self> {
        let decoy_hash = hash_password(DECOY_PASSWORD, config.password_cost)?;
        Ok(Self {
            sessions,
            settings: Arc::new(config.clone()),
            storage,
            connections: Arc::new(ConnectionRegistry::new()),
            decoy_hash: decoy_hash.into(),
        })
    }
}

/// Build the full HTTP surface
pub fn create_router<S: Storage + 'static>(state: Arc<AppState<S>>) -> Router {
    let protected = Router::new()
        .route("/api/students", get(students::list::<S>))
        .route("/api/forums", get(forums::list::<S>).post(forums::create::<S>))
        .route(
            "/api/studygroups",
            get(study_groups::list::<S>).post(study_groups::create::<S>),
        )
        .route("/api/exams/questions", get(exams::questions))
        .route("/api/exams/submit", post(exams::submit::<S>))
        .route(
            "/api/marketplace",
            get(marketplace::list::<S>).post(marketplace::create::<S>),
        )
        .route("/api/pdfs", get(reports::download))
        .route_layer(from_fn_with_state(state.clone(), require_session::<S>));

    Router::new()
        .route("/api/auth/register", post(auth_handlers::register::<S>))
        .route("/api/auth/login", post(auth_handlers::login::<S>))
        .route("/api/auth/logout", get(auth_handlers::logout::<S>))
        .route("/ws", get(ws_router::ws_handler::<S>))
        .merge(protected)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
