//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::entities::{
    NewNotification, NotificationKey, NotificationRecord, PostContext, PostPurge, PostScore,
    PurgedRows, ReactionEvent, ReactionKind, ReactionWrite, ScoreDelta, UserPurge,
};
use crate::error::DomainError;
use crate::value_objects::Id;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Reaction Kind Repository
// ============================================================================

/// Values of a reaction kind before the database assigns its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindDraft {
    pub title: String,
    pub color: String,
    pub image: String,
    pub score: i32,
    pub enabled: bool,
}

#[async_trait]
pub trait ReactionKindRepository: Send + Sync {
    /// List all kinds (ordered by order, then id)
    async fn find_all(&self) -> RepoResult<Vec<ReactionKind>>;

    /// Find kind by ID
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<ReactionKind>>;

    /// Create a new kind placed after the existing ones
    async fn create(&self, draft: &KindDraft) -> RepoResult<ReactionKind>;

    /// Update an existing kind and store the post scores it leads to
    /// (as `LedgerRepository::store_post_scores`), in one transaction
    async fn update(&self, kind: &ReactionKind, rescored: &[PostScore]) -> RepoResult<()>;

    /// Delete a kind with its reactions and store the post scores left
    /// behind, in one transaction. Returns `false` if the kind did not exist.
    async fn delete(&self, id: Id, rescored: &[PostScore]) -> RepoResult<bool>;

    /// Update kind positions in bulk
    async fn update_positions(&self, positions: &[(Id, i32)]) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Find the reaction of a user on a post
    async fn find(&self, post_id: Id, user_id: Id) -> RepoResult<Option<ReactionEvent>>;

    /// List reactions on posts, oldest first, skipping the given kinds
    async fn find_by_posts(
        &self,
        post_ids: &[Id],
        excluded_kinds: &[Id],
    ) -> RepoResult<Vec<ReactionEvent>>;

    /// Distinct posts the given users reacted to
    async fn find_post_ids_by_users(&self, user_ids: &[Id]) -> RepoResult<Vec<Id>>;

    /// Distinct posts holding a reaction of the given kind
    async fn find_post_ids_by_kind(&self, kind_id: Id) -> RepoResult<Vec<Id>>;

    /// Number of reactions a user has given
    async fn count_by_user(&self, user_id: Id) -> RepoResult<i64>;

    /// Rewrite the stored username of reactors named `old_name`
    async fn rename_user(&self, old_name: &str, new_name: &str) -> RepoResult<u64>;
}

// ============================================================================
// Ledger Repository
// ============================================================================

#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Load what the reaction flow needs to know about a post
    async fn post_context(&self, post_id: Id) -> RepoResult<Option<PostContext>>;

    /// Write a reaction event and its score delta in one transaction.
    /// The poster's score only moves when it is materialized. Fails with
    /// `ReactionConflict` when the stored reaction no longer holds the
    /// write's old kind.
    async fn commit(&self, write: &ReactionWrite, delta: &ScoreDelta) -> RepoResult<()>;

    /// Overwrite post scores, mirroring first posts onto their topics.
    /// The posters' scores are marked as needing recompute.
    async fn store_post_scores(&self, scores: &[PostScore]) -> RepoResult<()>;

    /// Drop users' reactions, store recomputed post scores (as
    /// `store_post_scores`) and optionally drop the notifications
    /// addressed to them, all in one transaction
    async fn purge_users(&self, purge: &UserPurge) -> RepoResult<u64>;

    /// Drop the reactions on posts being deleted, optionally the
    /// notifications about them, and mark their posters' scores for
    /// recompute, all in one transaction
    async fn purge_posts(&self, purge: &PostPurge) -> RepoResult<PurgedRows>;
}

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Usernames of the given users; unknown ids are left out
    async fn usernames(&self, user_ids: &[Id]) -> RepoResult<HashMap<Id, String>>;

    /// Stored user scores; `None` means "needs recompute"
    async fn stored_scores(&self, user_ids: &[Id]) -> RepoResult<HashMap<Id, Option<i64>>>;

    /// Sum of post scores over each user's posts
    async fn sum_post_scores(&self, user_ids: &[Id]) -> RepoResult<HashMap<Id, i64>>;

    /// Persist materialized user scores
    async fn set_scores(&self, scores: &[(Id, i64)]) -> RepoResult<()>;
}

// ============================================================================
// Notification Repository
// ============================================================================

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Most recent record of the key created at or after `since`
    async fn find_open_since(
        &self,
        key: &NotificationKey,
        since: DateTime<Utc>,
    ) -> RepoResult<Option<NotificationRecord>>;

    /// Most recent record of the key, any day
    async fn find_latest(&self, key: &NotificationKey) -> RepoResult<Option<NotificationRecord>>;

    /// Insert a record
    async fn create(&self, notification: &NewNotification) -> RepoResult<NotificationRecord>;

    /// Persist contributors, resume, timestamp and read flag
    async fn update(&self, record: &NotificationRecord) -> RepoResult<()>;

    /// Delete a record
    async fn delete(&self, id: Id) -> RepoResult<()>;

    /// Delete records of a type about the given items
    async fn delete_by_items(&self, notification_type: &str, item_ids: &[Id]) -> RepoResult<u64>;

    /// Delete records of a type addressed to the given users
    async fn delete_by_recipients(
        &self,
        notification_type: &str,
        user_ids: &[Id],
    ) -> RepoResult<u64>;
}
