use std::sync::Arc;

use crate::cache::TagCache;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything inside is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: keepsake_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Tag-invalidated cache for read endpoints.
    pub cache: Arc<TagCache>,
}

impl AppState {
    /// Build state around a pool, sizing the cache from `config`.
    pub fn new(pool: keepsake_db::DbPool, config: ServerConfig) -> Self {
        let cache = TagCache::new(std::time::Duration::from_secs(config.cache_ttl_secs));
        Self {
            pool,
            config: Arc::new(config),
            cache: Arc::new(cache),
        }
    }
}
