//! Outbound event ports

use async_trait::async_trait;

use super::RepoResult;
use crate::events::DomainEvent;

/// Publishes domain events to other processes
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &DomainEvent) -> RepoResult<()>;
}

/// In-process observer of reaction changes
pub trait ReactionObserver: Send + Sync {
    fn on_event(&self, event: &DomainEvent);
}
