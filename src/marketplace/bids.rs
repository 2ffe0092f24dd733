use tracing::info;

use super::products::get_product;
use super::MarketError;
use crate::auth::Claims;
use crate::db::{Bid, CreateBidRequest, ProductStatus};
use crate::DbPool;

/// Place a bid from the caller on an active product.
pub async fn create_bid(
    pool: &DbPool,
    claims: &Claims,
    product_id: i64,
    req: &CreateBidRequest,
) -> Result<Bid, MarketError> {
    let product = get_product(pool, product_id).await?;

    if product.status != ProductStatus::Active {
        return Err(MarketError::ProductNotActive);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO bids (product_id, seller_id, price, description, is_accepted, is_discarded)
        VALUES (?, ?, ?, ?, 0, 0)
        "#,
    )
    .bind(product.id)
    .bind(claims.user_id)
    .bind(req.price)
    .bind(&req.description)
    .execute(pool)
    .await?;

    let bid = get_bid(pool, result.last_insert_rowid()).await?;
    info!(
        bid_id = bid.id,
        product_id = product.id,
        seller_id = claims.user_id,
        price = bid.price,
        "Placed bid"
    );
    Ok(bid)
}

/// All bids on a product, including accepted and discarded ones.
pub async fn list_bids(pool: &DbPool, product_id: i64) -> Result<Vec<Bid>, MarketError> {
    let product = get_product(pool, product_id).await?;

    let bids = sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE product_id = ? ORDER BY id ASC")
        .bind(product.id)
        .fetch_all(pool)
        .await?;
    Ok(bids)
}

pub async fn get_bid(pool: &DbPool, id: i64) -> Result<Bid, MarketError> {
    sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(MarketError::BidNotFound)
}

/// Accept or reject a bid. Only the owner of the bid's product may do this.
///
/// Several bids on one product can be accepted at the same time.
pub async fn set_bid_accepted(
    pool: &DbPool,
    claims: &Claims,
    bid_id: i64,
    accepted: bool,
) -> Result<(), MarketError> {
    let bid = get_bid(pool, bid_id).await?;
    let product = get_product(pool, bid.product_id).await?;

    if product.user_id != claims.user_id {
        return Err(MarketError::Forbidden);
    }

    sqlx::query("UPDATE bids SET is_accepted = ? WHERE id = ?")
        .bind(accepted)
        .bind(bid.id)
        .execute(pool)
        .await?;

    info!(
        bid_id = bid.id,
        product_id = product.id,
        accepted,
        "Updated bid acceptance"
    );
    Ok(())
}

/// Admin-only toggle of a bid's discard flag.
pub async fn set_bid_discarded(
    pool: &DbPool,
    claims: &Claims,
    bid_id: i64,
    discarded: bool,
) -> Result<(), MarketError> {
    if !claims.is_admin {
        return Err(MarketError::Forbidden);
    }

    let bid = get_bid(pool, bid_id).await?;

    sqlx::query("UPDATE bids SET is_discarded = ? WHERE id = ?")
        .bind(discarded)
        .bind(bid.id)
        .execute(pool)
        .await?;

    info!(
        bid_id = bid.id,
        admin_id = claims.user_id,
        discarded,
        "Updated bid discard flag"
    );
    Ok(())
}
