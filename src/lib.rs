pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod marketplace;

pub use db::DbPool;

use auth::TokenService;
use config::Config;

/// Shared state handed to every request handler.
pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        let tokens = TokenService::from_config(&config.auth);
        Self { config, db, tokens }
    }
}
