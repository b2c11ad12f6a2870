//! Redis-backed reaction catalog cache
//!
//! The kind list is stored as one JSON value under [`CATALOG_KEY`] and
//! dropped whenever an admin operation touches a kind.

use async_trait::async_trait;
use tracing::{debug, instrument};

use reactions_core::entities::ReactionKind;
use reactions_core::traits::{CatalogCache, RepoResult};

use crate::pool::RedisPool;

/// Key of the cached kind list
pub const CATALOG_KEY: &str = "reactions:catalog";

/// Catalog cache stored in Redis
#[derive(Clone, Debug)]
pub struct RedisCatalogCache {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisCatalogCache {
    pub fn new(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    /// Build from the application redis settings
    pub fn from_config(pool: RedisPool, config: &reactions_common::RedisConfig) -> Self {
        Self::new(pool, config.catalog_ttl_secs)
    }

    /// A zero TTL keeps the entry until invalidated
    fn ttl(&self) -> Option<u64> {
        (self.ttl_seconds > 0).then_some(self.ttl_seconds)
    }
}

#[async_trait]
impl CatalogCache for RedisCatalogCache {
    #[instrument(skip(self))]
    async fn get(&self) -> RepoResult<Option<Vec<ReactionKind>>> {
        let kinds = self.pool.get_value::<Vec<ReactionKind>>(CATALOG_KEY).await?;
        debug!(hit = kinds.is_some(), "Catalog cache lookup");
        Ok(kinds)
    }

    #[instrument(skip(self, kinds), fields(count = kinds.len()))]
    async fn put(&self, kinds: &[ReactionKind]) -> RepoResult<()> {
        self.pool.set(CATALOG_KEY, kinds, self.ttl()).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn invalidate(&self) -> RepoResult<()> {
        self.pool.delete(CATALOG_KEY).await?;
        Ok(())
    }
}
