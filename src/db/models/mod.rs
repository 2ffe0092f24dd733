//! Database models split into domain-specific modules.

pub mod bid;
pub mod product;
pub mod user;

pub use bid::*;
pub use product::*;
pub use user::*;
