use sqlx::{QueryBuilder, Sqlite};
use std::str::FromStr;
use tracing::info;

use super::MarketError;
use crate::auth::Claims;
use crate::db::{CreateProductRequest, Product, ProductQuery, ProductStatus};
use crate::DbPool;

/// Product columns a listing may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    Description,
    Status,
    IsDiscarded,
    UserId,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Description => "description",
            Self::Status => "status",
            Self::IsDiscarded => "is_discarded",
            Self::UserId => "user_id",
        }
    }
}

/// A validated `sort` parameter: `field`, `field asc` or `field desc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSort {
    pub field: SortField,
    pub descending: bool,
}

impl FromStr for ProductSort {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || MarketError::InvalidSort(s.to_string());
        let mut parts = s.split_whitespace();

        let field = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("id") => SortField::Id,
            Some("title") => SortField::Title,
            Some("description") => SortField::Description,
            Some("status") => SortField::Status,
            Some("is_discarded") => SortField::IsDiscarded,
            Some("user_id") => SortField::UserId,
            _ => return Err(invalid()),
        };

        let descending = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("asc") => false,
            Some("desc") => true,
            Some(_) => return Err(invalid()),
        };

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { field, descending })
    }
}

/// Listing criteria; every present criterion must hold.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub sort: Option<ProductSort>,
    /// Literal substring of the title. Matched with SQL `LIKE` after escaping
    /// `%` and `_`, so it is ASCII case-insensitive but never a pattern.
    pub title_contains: Option<String>,
    pub user_id: Option<i64>,
}

impl TryFrom<ProductQuery> for ProductFilter {
    type Error = MarketError;

    fn try_from(query: ProductQuery) -> Result<Self, Self::Error> {
        let sort = match query.sort.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(s.parse()?),
            _ => None,
        };

        let user_id = match query.user_id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Some(
                id.parse()
                    .map_err(|_| MarketError::InvalidUserId(id.to_string()))?,
            ),
            _ => None,
        };

        Ok(Self {
            sort,
            title_contains: query.filter.filter(|f| !f.is_empty()),
            user_id,
        })
    }
}

/// Create a product request owned by the caller, always starting `Active`.
pub async fn create_product(
    pool: &DbPool,
    claims: &Claims,
    req: &CreateProductRequest,
) -> Result<Product, MarketError> {
    let result = sqlx::query(
        "INSERT INTO products (title, description, status, is_discarded, user_id) VALUES (?, ?, ?, 0, ?)",
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(ProductStatus::Active)
    .bind(claims.user_id)
    .execute(pool)
    .await?;

    let product = get_product(pool, result.last_insert_rowid()).await?;
    info!(
        product_id = product.id,
        user_id = claims.user_id,
        "Created product request: {}",
        product.title
    );
    Ok(product)
}

pub async fn list_products(pool: &DbPool, filter: &ProductFilter) -> Result<Vec<Product>, MarketError> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM products WHERE 1 = 1");

    if let Some(title) = &filter.title_contains {
        query
            .push(" AND title LIKE ")
            .push_bind(format!("%{}%", escape_like(title)))
            .push(" ESCAPE '\\'");
    }

    if let Some(user_id) = filter.user_id {
        query.push(" AND user_id = ").push_bind(user_id);
    }

    // Column names come from the SortField whitelist, never from the request
    match filter.sort {
        Some(sort) => {
            query
                .push(" ORDER BY ")
                .push(sort.field.column())
                .push(if sort.descending { " DESC" } else { " ASC" })
                .push(", id ASC");
        }
        None => {
            query.push(" ORDER BY id ASC");
        }
    }

    let products = query.build_query_as::<Product>().fetch_all(pool).await?;
    Ok(products)
}

/// Escape `LIKE` wildcards so the input only matches itself.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub async fn get_product(pool: &DbPool, id: i64) -> Result<Product, MarketError> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(MarketError::ProductNotFound)
}

/// Admin-only toggle of the discard flag. Status is left untouched.
pub async fn set_product_discarded(
    pool: &DbPool,
    claims: &Claims,
    id: i64,
    discarded: bool,
) -> Result<(), MarketError> {
    if !claims.is_admin {
        return Err(MarketError::Forbidden);
    }

    let product = get_product(pool, id).await?;

    sqlx::query("UPDATE products SET is_discarded = ? WHERE id = ?")
        .bind(discarded)
        .bind(product.id)
        .execute(pool)
        .await?;

    info!(
        product_id = product.id,
        admin_id = claims.user_id,
        discarded,
        "Updated product discard flag"
    );
    Ok(())
}
