//! Score ledger types - running totals on posts, topics and users

use serde::{Deserialize, Serialize};

use super::ReactionEvent;
use crate::value_objects::Id;

/// Moderation state of a post as seen by the reaction flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostVisibility {
    #[default]
    Approved,
    Unapproved,
    Reapprove,
    Deleted,
}

impl PostVisibility {
    /// Only approved posts accept reactions
    #[inline]
    pub fn accepts_reactions(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Facts about a post needed to apply a reaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContext {
    pub post_id: Id,
    pub topic_id: Id,
    pub forum_id: Id,
    pub poster_id: Id,
    pub topic_first_post_id: Option<Id>,
    /// Poster's cumulative score; `None` means "needs recompute"
    pub poster_score: Option<i64>,
    pub post_score: i64,
    pub visibility: PostVisibility,
    pub reported: bool,
    /// Plain text of the post, used for notification resumes
    pub text: String,
}

impl PostContext {
    /// Whether this post opens its topic
    #[inline]
    pub fn is_first_post(&self) -> bool {
        self.topic_first_post_id == Some(self.post_id)
    }
}

/// Ledger change caused by a single reaction write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreDelta {
    pub post_id: Id,
    /// Set when the post is its topic's first post
    pub topic_id: Option<Id>,
    pub poster_id: Id,
    pub delta: i64,
}

impl ScoreDelta {
    /// Build the delta for a post; the topic mirror is only set for first posts
    pub fn for_post(post: &PostContext, delta: i64) -> Self {
        Self {
            post_id: post.post_id,
            topic_id: post.is_first_post().then_some(post.topic_id),
            poster_id: post.poster_id,
            delta,
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.delta == 0
    }
}

/// Absolute score of a post after a resync
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostScore {
    pub post_id: Id,
    pub score: i64,
}

/// Event-table change that accompanies a score delta.
///
/// Changes and withdrawals name the kind they expect to find; the write
/// fails with [`DomainError::ReactionConflict`](crate::DomainError) when
/// the stored reaction no longer holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionWrite {
    /// First reaction of the user on the post
    Insert(ReactionEvent),
    /// The user changed their reaction away from kind `from`
    Replace { event: ReactionEvent, from: Id },
    /// The user withdrew their reaction of kind `from`
    Delete { post_id: Id, user_id: Id, from: Id },
}

impl ReactionWrite {
    pub fn post_id(&self) -> Id {
        match self {
            Self::Insert(event) | Self::Replace { event, .. } => event.post_id,
            Self::Delete { post_id, .. } => *post_id,
        }
    }

    pub fn user_id(&self) -> Id {
        match self {
            Self::Insert(event) | Self::Replace { event, .. } => event.user_id,
            Self::Delete { user_id, .. } => *user_id,
        }
    }

    /// Kind the stored reaction must hold before the write
    pub fn old_kind(&self) -> Option<Id> {
        match self {
            Self::Insert(_) => None,
            Self::Replace { from, .. } | Self::Delete { from, .. } => Some(*from),
        }
    }

    /// Kind the reaction holds after the write
    pub fn new_kind(&self) -> Option<Id> {
        match self {
            Self::Insert(event) | Self::Replace { event, .. } => Some(event.kind_id),
            Self::Delete { .. } => None,
        }
    }
}

/// User ids and the recomputed post scores of a bulk user removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPurge {
    pub user_ids: Vec<Id>,
    pub rescored: Vec<PostScore>,
    /// Notification type whose records addressed to these users are dropped
    pub drop_notifications: Option<String>,
}

/// Posts being deleted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPurge {
    pub post_ids: Vec<Id>,
    /// Notification type whose records about these posts are dropped
    pub drop_notifications: Option<String>,
}

/// Rows removed by a post purge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PurgedRows {
    pub reactions: u64,
    pub notifications: u64,
}
