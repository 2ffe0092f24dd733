use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::error::ApiError;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::validation::validate_create_product;
use crate::auth::Claims;
use crate::db::{CreateProductRequest, Product, ProductQuery};
use crate::marketplace::{self, ProductFilter};
use crate::AppState;

/// Create a product request owned by the caller
///
/// POST /api/products
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    ApiJson(req): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    validate_create_product(&req)?;

    let product = marketplace::create_product(&state.db, &claims, &req).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// List product requests, optionally sorted and filtered
///
/// GET /api/products?sort=title desc&filter=chair&user_id=1
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let filter = ProductFilter::try_from(query)?;
    let products = marketplace::list_products(&state.db, &filter).await?;
    Ok(Json(products))
}

/// POST /api/products/:id/discard
pub async fn discard_product(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    marketplace::set_product_discarded(&state.db, &claims, id, true).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Clear the discard flag. Product status is not changed.
///
/// POST /api/products/:id/approve
pub async fn approve_product(
    State(state): State<Arc<AppState>>,
    claims: Claims,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    marketplace::set_product_discarded(&state.db, &claims, id, false).await?;
    Ok(StatusCode::NO_CONTENT)
}
