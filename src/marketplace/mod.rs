//! Product request and bid lifecycles.
//!
//! Each operation checks its preconditions in order and performs at most one
//! write. Check-then-write sequences are not wrapped in a transaction, so a
//! product can change between the status check and the bid insert.

pub mod bids;
pub mod products;

use thiserror::Error;

pub use bids::{create_bid, get_bid, list_bids, set_bid_accepted, set_bid_discarded};
pub use products::{
    create_product, get_product, list_products, set_product_discarded, ProductFilter, ProductSort,
    SortField,
};

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Bid not found")]
    BidNotFound,

    #[error("Permission denied")]
    Forbidden,

    #[error("Product is not open for offers")]
    ProductNotActive,

    #[error("Invalid sort expression: {0}")]
    InvalidSort(String),

    #[error("Invalid user_id: {0}")]
    InvalidUserId(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
