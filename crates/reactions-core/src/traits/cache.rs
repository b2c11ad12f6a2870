//! Catalog cache port

use async_trait::async_trait;

use super::RepoResult;
use crate::entities::ReactionKind;

/// Cross-request store of the reaction kind list
#[async_trait]
pub trait CatalogCache: Send + Sync {
    /// Cached kinds, or `None` on a miss
    async fn get(&self) -> RepoResult<Option<Vec<ReactionKind>>>;

    /// Store the kind list
    async fn put(&self, kinds: &[ReactionKind]) -> RepoResult<()>;

    /// Drop the cached list
    async fn invalidate(&self) -> RepoResult<()>;
}
