//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Id;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(Id),

    #[error("Reaction kind not found: {0}")]
    KindNotFound(Id),

    #[error("No reaction of user {user_id} on post {post_id}")]
    ReactionNotFound { post_id: Id, user_id: Id },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid id: {0}")]
    InvalidId(i64),

    #[error("Unknown reaction kind: {0}")]
    UnknownKind(Id),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not allowed to act on reactions of user {0}")]
    NotAuthorized(Id),

    #[error("Reaction to the first post required before replying")]
    FirstPostReactionRequired,

    // =========================================================================
    // Policy Violations
    // =========================================================================
    #[error("Changing a reaction is not allowed")]
    ChangeNotAllowed,

    #[error("Reacting to your own post is not allowed")]
    SelfReactionNotAllowed,

    #[error("Post does not accept reactions")]
    PostLocked,

    #[error("Reaction already exists with this kind")]
    DuplicateReaction,

    // =========================================================================
    // Concurrency
    // =========================================================================
    #[error("Reaction of user {user_id} on post {post_id} changed concurrently")]
    ReactionConflict { post_id: Id, user_id: Id },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::KindNotFound(_) => "UNKNOWN_REACTION_KIND",
            Self::ReactionNotFound { .. } => "UNKNOWN_REACTION",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidId(_) => "INVALID_ID",
            Self::UnknownKind(_) => "UNKNOWN_KIND",

            // Authorization
            Self::NotAuthorized(_) => "MISSING_PERMISSIONS",
            Self::FirstPostReactionRequired => "FIRST_POST_REACTION_REQUIRED",

            // Policy
            Self::ChangeNotAllowed => "CHANGE_NOT_ALLOWED",
            Self::SelfReactionNotAllowed => "SELF_REACTION_NOT_ALLOWED",
            Self::PostLocked => "POST_LOCKED",
            Self::DuplicateReaction => "DUPLICATE_REACTION",

            // Concurrency
            Self::ReactionConflict { .. } => "REACTION_CONFLICT",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Language key shown to the user
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::PostNotFound(_) | Self::InvalidId(_) | Self::ValidationError(_) => {
                "FORM_INVALID"
            }
            Self::KindNotFound(_) | Self::UnknownKind(_) => "REACTIONS_UNKNOWN_KIND",
            Self::ReactionNotFound { .. } => "REACTIONS_NOT_FOUND",
            Self::NotAuthorized(_) | Self::PostLocked => "NO_AUTH_OPERATION",
            Self::FirstPostReactionRequired => "NO_POST_REACTION",
            Self::ChangeNotAllowed => "REACTIONS_CHANGE_NOT_ALLOWED",
            Self::SelfReactionNotAllowed => "REACTIONS_SELF_NOT_ALLOWED",
            Self::DuplicateReaction => "REACTIONS_DUPLICATE",
            Self::ReactionConflict { .. } => "REACTIONS_CONFLICT",
            Self::DatabaseError(_) | Self::CacheError(_) | Self::InternalError(_) => {
                "GENERAL_ERROR"
            }
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PostNotFound(_) | Self::KindNotFound(_) | Self::ReactionNotFound { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_) | Self::InvalidId(_) | Self::UnknownKind(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::NotAuthorized(_) | Self::FirstPostReactionRequired)
    }

    /// Check if this is a policy rejection
    pub fn is_policy(&self) -> bool {
        matches!(
            self,
            Self::ChangeNotAllowed
                | Self::SelfReactionNotAllowed
                | Self::PostLocked
                | Self::DuplicateReaction
        )
    }

    /// Check if the operation may succeed when retried
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ReactionConflict { .. })
    }
}
