//! Post, topic and user columns read by the reaction flow

use sqlx::FromRow;

/// Post joined with its topic and poster (from query)
#[derive(Debug, Clone, FromRow)]
pub struct PostContextModel {
    pub post_id: i64,
    pub topic_id: i64,
    pub forum_id: i64,
    pub poster_id: i64,
    pub topic_first_post_id: Option<i64>,
    pub user_reaction_score: Option<i64>,
    pub post_reaction_score: i64,
    pub post_visibility: i16,
    pub post_reported: bool,
    pub post_text: String,
}

/// Stored user score (from query)
#[derive(Debug, Clone, FromRow)]
pub struct UserScoreModel {
    pub user_id: i64,
    pub score: Option<i64>,
}

/// Username row (from query)
#[derive(Debug, Clone, FromRow)]
pub struct UsernameModel {
    pub user_id: i64,
    pub username: String,
}
