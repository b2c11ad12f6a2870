//! Request DTOs for service entry points
//!
//! Admin inputs implement `Validate`; hook inputs mirror what the host
//! hands over at each extension point.

use serde::Deserialize;
use validator::Validate;

use reactions_core::entities::PostVisibility;
use reactions_core::traits::KindDraft;
use reactions_core::Id;

// ============================================================================
// Catalog Requests
// ============================================================================

/// Values of a reaction kind as submitted by an admin
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct KindInput {
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    #[validate(length(max = 10, message = "Color must be at most 10 characters"))]
    #[serde(default)]
    pub color: String,

    #[validate(length(max = 255, message = "Image must be at most 255 characters"))]
    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub score: i32,

    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl KindInput {
    pub fn new(title: impl Into<String>, score: i32) -> Self {
        Self {
            title: title.into(),
            color: String::new(),
            image: String::new(),
            score,
            enabled: true,
        }
    }

    pub(crate) fn to_draft(&self) -> KindDraft {
        KindDraft {
            title: self.title.trim().to_string(),
            color: self.color.trim().to_string(),
            image: self.image.trim().to_string(),
            score: self.score,
            enabled: self.enabled,
        }
    }
}

/// New display order of the kinds, first to last
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReorderKindsRequest {
    #[validate(length(min = 1, message = "At least one kind is required"))]
    pub ids: Vec<Id>,
}

// ============================================================================
// Hook Requests
// ============================================================================

/// A post as rendered on a topic page
#[derive(Debug, Clone, Deserialize)]
pub struct TopicPost {
    pub post_id: Id,
    pub poster_id: Id,
    #[serde(default)]
    pub visibility: PostVisibility,
    #[serde(default)]
    pub reported: bool,
    /// The post has attachments listed below its text
    #[serde(default)]
    pub has_attachments: bool,
    /// The post text embeds attachments inline
    #[serde(default)]
    pub has_inline_attachments: bool,
}

/// One page of a topic about to be rendered
#[derive(Debug, Clone, Deserialize)]
pub struct TopicViewRequest {
    pub forum_id: Id,
    pub topic_first_post_id: Id,
    pub posts: Vec<TopicPost>,
}

/// Posting mode the host is about to authorize
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingMode {
    Post,
    Reply,
    Quote,
    Edit,
}

/// Posting authorization check
#[derive(Debug, Clone, Deserialize)]
pub struct PostingAuthRequest {
    pub mode: PostingMode,
    pub forum_id: Id,
    pub topic_poster_id: Id,
    pub topic_first_post_id: Id,
}

/// What happens to the content of deleted users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserDeleteMode {
    /// Posts stay under a guest name
    #[default]
    Retain,
    /// Posts are removed as well
    Remove,
}

/// Users about to be deleted
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteUsersRequest {
    pub user_ids: Vec<Id>,
    #[serde(default)]
    pub mode: UserDeleteMode,
}

/// Username change
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UsernameChangeRequest {
    #[validate(length(min = 1, message = "Old name is required"))]
    pub old_name: String,
    #[validate(length(min = 1, message = "New name is required"))]
    pub new_name: String,
}
