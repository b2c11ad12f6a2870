//! Pub/Sub channel definitions.
//!
//! Defines the channel naming conventions for Redis Pub/Sub.

use reactions_core::{DomainEvent, Id};

/// Channel prefix for per-post reaction events
pub const POST_CHANNEL_PREFIX: &str = "reactions:post:";
/// Channel for catalog changes (all instances)
pub const CATALOG_CHANNEL: &str = "reactions:catalog";

/// Pub/Sub channel types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PubSubChannel {
    /// Reaction changes on one post
    Post(Id),
    /// Reaction kinds were created, edited, removed or reordered
    Catalog,
    /// Custom channel name
    Custom(String),
}

impl PubSubChannel {
    /// Create a post channel
    #[must_use]
    pub fn post(post_id: Id) -> Self {
        Self::Post(post_id)
    }

    /// Create a custom channel
    #[must_use]
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Channels an event is delivered on
    #[must_use]
    pub fn for_event(event: &DomainEvent) -> Vec<Self> {
        match event {
            DomainEvent::ReactionAdded(e) => vec![Self::Post(e.post_id)],
            DomainEvent::ReactionChanged(e) => vec![Self::Post(e.post_id)],
            DomainEvent::ReactionRemoved(e) => vec![Self::Post(e.post_id)],
            DomainEvent::ReactionsPurged(e) => e.post_ids.iter().copied().map(Self::Post).collect(),
            DomainEvent::CatalogChanged(_) => vec![Self::Catalog],
        }
    }

    /// Get the Redis channel name
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Post(id) => format!("{POST_CHANNEL_PREFIX}{id}"),
            Self::Catalog => CATALOG_CHANNEL.to_string(),
            Self::Custom(name) => name.clone(),
        }
    }

    /// Parse a channel name back to a `PubSubChannel`
    #[must_use]
    pub fn parse(name: &str) -> Self {
        if name == CATALOG_CHANNEL {
            return Self::Catalog;
        }

        if let Some(id_str) = name.strip_prefix(POST_CHANNEL_PREFIX) {
            if let Ok(id) = Id::parse(id_str) {
                return Self::Post(id);
            }
        }

        Self::Custom(name.to_string())
    }
}

impl std::fmt::Display for PubSubChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
