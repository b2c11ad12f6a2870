//! Post context <-> model mapper

use reactions_core::entities::{PostContext, PostVisibility};
use reactions_core::value_objects::Id;

use crate::models::PostContextModel;

/// Stored `post_visibility` codes
const ITEM_UNAPPROVED: i16 = 0;
const ITEM_APPROVED: i16 = 1;
const ITEM_DELETED: i16 = 2;
const ITEM_REAPPROVE: i16 = 3;

/// Decode a stored visibility; unknown codes are treated as unapproved
pub fn visibility_from_code(code: i16) -> PostVisibility {
    match code {
        ITEM_APPROVED => PostVisibility::Approved,
        ITEM_DELETED => PostVisibility::Deleted,
        ITEM_REAPPROVE => PostVisibility::Reapprove,
        _ => PostVisibility::Unapproved,
    }
}

/// Encode a visibility for storage
pub fn visibility_to_code(visibility: PostVisibility) -> i16 {
    match visibility {
        PostVisibility::Approved => ITEM_APPROVED,
        PostVisibility::Unapproved => ITEM_UNAPPROVED,
        PostVisibility::Deleted => ITEM_DELETED,
        PostVisibility::Reapprove => ITEM_REAPPROVE,
    }
}

/// Convert PostContextModel to PostContext
impl From<PostContextModel> for PostContext {
    fn from(model: PostContextModel) -> Self {
        PostContext {
            post_id: Id::new(model.post_id),
            topic_id: Id::new(model.topic_id),
            forum_id: Id::new(model.forum_id),
            poster_id: Id::new(model.poster_id),
            topic_first_post_id: model.topic_first_post_id.map(Id::new),
            poster_score: model.user_reaction_score,
            post_score: model.post_reaction_score,
            visibility: visibility_from_code(model.post_visibility),
            reported: model.post_reported,
            text: model.post_text,
        }
    }
}
