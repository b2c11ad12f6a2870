//! Reaction entity <-> model mapper

use reactions_core::entities::ReactionEvent;
use reactions_core::value_objects::Id;

use crate::models::ReactionModel;

/// Convert ReactionModel to ReactionEvent entity
impl From<ReactionModel> for ReactionEvent {
    fn from(model: ReactionModel) -> Self {
        ReactionEvent {
            post_id: Id::new(model.post_id),
            topic_id: model.topic_id.map(Id::new),
            poster_id: Id::new(model.poster_id),
            user_id: Id::new(model.user_id),
            username: model.username,
            kind_id: Id::new(model.kind_id),
            created_at: model.created_at,
        }
    }
}

/// Convert ReactionEvent entity reference to values for database insertion
pub struct ReactionInsert<'a> {
    pub post_id: i64,
    pub topic_id: Option<i64>,
    pub poster_id: i64,
    pub user_id: i64,
    pub username: &'a str,
    pub kind_id: i64,
}

impl<'a> ReactionInsert<'a> {
    pub fn new(event: &'a ReactionEvent) -> Self {
        Self {
            post_id: event.post_id.into_inner(),
            topic_id: event.topic_id.map(Id::into_inner),
            poster_id: event.poster_id.into_inner(),
            user_id: event.user_id.into_inner(),
            username: &event.username,
            kind_id: event.kind_id.into_inner(),
        }
    }
}
