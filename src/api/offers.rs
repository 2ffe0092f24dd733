use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath};
use crate::auth::Claims;
use crate::db::{Bid, CreateBidRequest};
use crate::marketplace;
use crate::AppState;

/// Make an offer on a product request
///
/// POST /api/products/:id/offers
pub async fn create_offer(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    ApiPath(product_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CreateBidRequest>,
) -> Result<(StatusCode, Json<Bid>), ApiError> {
    let bid = marketplace::create_bid(&state.db, &claims, product_id, &req).await?;
    Ok((StatusCode::CREATED, Json(bid)))
}

/// GET /api/products/:id/offers
pub async fn list_offers(
    State(state): State<Arc<AppState>>,
    ApiPath(product_id): ApiPath<i64>,
) -> Result<Json<Vec<Bid>>, ApiError> {
    let bids = marketplace::list_bids(&state.db, product_id).await?;
    Ok(Json(bids))
}

/// POST /api/offers/:id/discard
pub async fn discard_offer(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    marketplace::set_bid_discarded(&state.db, &claims, id, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/offers/:id/approve
pub async fn approve_offer(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    marketplace::set_bid_discarded(&state.db, &claims, id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /offers/:id/accept
pub async fn accept_offer(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    marketplace::set_bid_accepted(&state.db, &claims, id, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /offers/:id/reject
pub async fn reject_offer(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    marketplace::set_bid_accepted(&state.db, &claims, id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}
