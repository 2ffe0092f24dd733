//! Product request models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Primary state of a product request.
///
/// Nothing transitions a product to `Accepted` yet; accepting a bid only
/// flags the bid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "lowercase")]
pub enum ProductStatus {
    Active,
    Accepted,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Accepted => write!(f, "accepted"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub status: ProductStatus,
    pub is_discarded: bool,
    pub user_id: i64,
    pub created_at: String,
}

/// Body of `POST /api/products`. Status and owner come from the server.
#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Query string of `GET /api/products`.
///
/// Values stay raw strings; an empty value means the criterion is absent.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub sort: Option<String>,
    pub filter: Option<String>,
    pub user_id: Option<String>,
}
