//! Bid (offer) models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A seller's offer against a product request.
///
/// `is_accepted` and `is_discarded` are independent flags; both may be set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bid {
    pub id: i64,
    pub product_id: i64,
    pub seller_id: i64,
    pub price: f64,
    pub description: String,
    pub is_accepted: bool,
    pub is_discarded: bool,
    pub created_at: String,
}

/// Body of `POST /api/products/:id/offers`.
///
/// Ownership and moderation fields are not accepted from the caller.
#[derive(Debug, Deserialize)]
pub struct CreateBidRequest {
    pub price: f64,
    #[serde(default)]
    pub description: String,
}
