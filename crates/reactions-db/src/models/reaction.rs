//! Reaction database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub post_id: i64,
    pub topic_id: Option<i64>,
    pub poster_id: i64,
    pub user_id: i64,
    pub username: String,
    pub kind_id: i64,
    pub created_at: DateTime<Utc>,
}
