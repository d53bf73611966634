//! Marketplace listings.
use std::sync::Arc;
use axum::{extract::State, http::StatusCode, Json};
use campus_common::{ListingView, NewListing};
use tracing::{info, instrument};
use crate::error::AppError;
use crate::extract::{CurrentUser, Payload};
use crate::models::MarketplaceItem;
use crate::storage::Storage;
use crate::AppState;
use super::{user_ref, UserDirectory};

/// `GET /api/marketplace`
pub async fn list<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ListingView>>, AppError> {
    let items: Vec<MarketplaceItem> = state.storage.list().await?;
    let directory = UserDirectory::load(&state.storage).await?;

    let views = items
        .into_iter()
        .map(|item| ListingView {
            seller: directory.lookup(item.seller),
            id: item.id,
            title: item.title,
            description: item.description,
            price: item.price,
            created_at: item.created_at,
        })
        .collect();
    Ok(Json(views))
}

/// `POST /api/marketplace`
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create<S: Storage + 'static>(
    State(state): State<Arc<AppState<S>>>,
    CurrentUser(user): CurrentUser,
    Payload(req): Payload<NewListing>,
) -> Result<(StatusCode, Json<ListingView>), AppError> {
    let item = MarketplaceItem::new(req.title, req.description, req.price, user.id);
    state.storage.insert(&item).await?;
    info!(item_id = %item.id, "marketplace item listed");

    Ok((
        StatusCode::CREATED,
        Json(ListingView {
            id: item.id,
            title: item.title,
            description: item.description,
            price: item.price,
            seller: Some(user_ref(&user)),
            created_at: item.created_at,
        }),
    ))
}
