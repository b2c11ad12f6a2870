//! Reaction kind database model

use sqlx::FromRow;

/// Database model for reaction_kinds table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionKindModel {
    pub id: i64,
    pub title: String,
    pub color: String,
    pub image: String,
    pub score: i32,
    pub enabled: bool,
    pub position: i32,
}
