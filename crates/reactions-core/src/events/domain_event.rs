//! Domain events - events emitted when reaction state changes
//!
//! These events are used for:
//! - Notifying observers registered on the reaction after-hook
//! - Publishing live score updates per post
//! - Triggering catalog cache invalidation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Id;

/// All possible domain events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    // =========================================================================
    // Reaction Events
    // =========================================================================
    ReactionAdded(ReactionAddedEvent),
    ReactionChanged(ReactionChangedEvent),
    ReactionRemoved(ReactionRemovedEvent),
    ReactionsPurged(ReactionsPurgedEvent),

    // =========================================================================
    // Catalog Events
    // =========================================================================
    CatalogChanged(CatalogChangedEvent),
}

impl DomainEvent {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ReactionAdded(_) => "REACTION_ADDED",
            Self::ReactionChanged(_) => "REACTION_CHANGED",
            Self::ReactionRemoved(_) => "REACTION_REMOVED",
            Self::ReactionsPurged(_) => "REACTIONS_PURGED",
            Self::CatalogChanged(_) => "CATALOG_CHANGED",
        }
    }

    /// Get the timestamp of the event
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::ReactionAdded(e) => e.timestamp,
            Self::ReactionChanged(e) => e.timestamp,
            Self::ReactionRemoved(e) => e.timestamp,
            Self::ReactionsPurged(e) => e.timestamp,
            Self::CatalogChanged(e) => e.timestamp,
        }
    }

    /// The post the event is about, for single-post events
    pub fn post_id(&self) -> Option<Id> {
        match self {
            Self::ReactionAdded(e) => Some(e.post_id),
            Self::ReactionChanged(e) => Some(e.post_id),
            Self::ReactionRemoved(e) => Some(e.post_id),
            Self::ReactionsPurged(_) | Self::CatalogChanged(_) => None,
        }
    }

    /// Score change carried by the event
    pub fn delta(&self) -> i64 {
        match self {
            Self::ReactionAdded(e) => e.delta,
            Self::ReactionChanged(e) => e.delta,
            Self::ReactionRemoved(e) => e.delta,
            Self::ReactionsPurged(_) | Self::CatalogChanged(_) => 0,
        }
    }
}

// ============================================================================
// Event Structs
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionAddedEvent {
    pub post_id: Id,
    pub topic_id: Id,
    pub poster_id: Id,
    pub user_id: Id,
    pub kind_id: Id,
    pub delta: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionChangedEvent {
    pub post_id: Id,
    pub topic_id: Id,
    pub poster_id: Id,
    pub user_id: Id,
    pub old_kind_id: Id,
    pub kind_id: Id,
    pub delta: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionRemovedEvent {
    pub post_id: Id,
    pub topic_id: Id,
    pub poster_id: Id,
    pub user_id: Id,
    pub old_kind_id: Id,
    pub delta: i64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionsPurgedEvent {
    /// Posts whose reactions were all dropped
    pub post_ids: Vec<Id>,
    /// Users whose reactions were dropped
    pub user_ids: Vec<Id>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogChangedEvent {
    pub kind_id: Option<Id>, // None = reorder
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Event Creation Helpers
// ============================================================================

impl CatalogChangedEvent {
    pub fn new(kind_id: Option<Id>, timestamp: DateTime<Utc>) -> Self {
        Self { kind_id, timestamp }
    }
}

impl ReactionsPurgedEvent {
    pub fn new(post_ids: Vec<Id>, user_ids: Vec<Id>, timestamp: DateTime<Utc>) -> Self {
        Self {
            post_ids,
            user_ids,
            timestamp,
        }
    }
}
