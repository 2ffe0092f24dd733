pub mod auth;
pub mod error;
pub mod extract;
mod offers;
mod products;
mod validation;

pub use error::{ApiError, ErrorCode, ErrorResponse};

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // Account routes (public). `/admin` requires no token.
    let account_routes = Router::new()
        .route("/admin", post(auth::create_admin))
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    let public_api_routes = Router::new().route("/api/products", get(products::list_products));

    // Protected routes
    let protected_routes = Router::new()
        .route("/profile", get(auth::profile))
        // Product requests
        .route("/api/products", post(products::create_product))
        .route("/api/products/:id/discard", post(products::discard_product))
        .route("/api/products/:id/approve", post(products::approve_product))
        // Offers
        .route(
            "/api/products/:id/offers",
            post(offers::create_offer).get(offers::list_offers),
        )
        .route("/api/offers/:id/discard", post(offers::discard_offer))
        .route("/api/offers/:id/approve", post(offers::approve_offer))
        .route("/offers/:id/accept", put(offers::accept_offer))
        .route("/offers/:id/reject", put(offers::reject_offer))
        // Only matched routes require a token; unknown paths still 404
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .merge(account_routes)
        .merge(public_api_routes)
        .merge(protected_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
