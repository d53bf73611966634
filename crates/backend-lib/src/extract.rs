//! Request extractors shared by the handlers.
use axum::{
    extract::{FromRequest, FromRequestParts, Request},
    http::{header::CONTENT_TYPE, request::Parts},
    Json,
};
use axum_extra::extract::Form;
use serde::de::DeserializeOwned;
use crate::error::AppError;
use crate::models::User;

/// The user resolved by the session gate. Only available on routes
/// behind `require_session`.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| {
                tracing::warn!("CurrentUser not found in request extensions");
                AppError::Unauthenticated
            })
    }
}

/// A request body given either as JSON or as a urlencoded form. Form keys
/// may repeat to fill a list field. Rejections come back in the API's own
/// error format.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::InvalidInput(rejection.to_string()))?;
            Ok(Payload(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))?;
            Ok(Payload(value))
        }
    }
}
