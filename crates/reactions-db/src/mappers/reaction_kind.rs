//! Reaction kind entity <-> model mapper

use reactions_core::entities::ReactionKind;
use reactions_core::traits::KindDraft;
use reactions_core::value_objects::Id;

use crate::models::ReactionKindModel;

/// Convert ReactionKindModel to ReactionKind entity
impl From<ReactionKindModel> for ReactionKind {
    fn from(model: ReactionKindModel) -> Self {
        ReactionKind {
            id: Id::new(model.id),
            title: model.title,
            color: model.color,
            image: model.image,
            score: model.score,
            enabled: model.enabled,
            order: model.position,
        }
    }
}

/// Convert a kind draft to values for database insertion
pub struct KindInsert<'a> {
    pub title: &'a str,
    pub color: &'a str,
    pub image: &'a str,
    pub score: i32,
    pub enabled: bool,
}

impl<'a> KindInsert<'a> {
    pub fn new(draft: &'a KindDraft) -> Self {
        Self {
            title: &draft.title,
            color: &draft.color,
            image: &draft.image,
            score: draft.score,
            enabled: draft.enabled,
        }
    }
}

/// Convert ReactionKind entity reference to values for database update
pub struct KindUpdate<'a> {
    pub id: i64,
    pub title: &'a str,
    pub color: &'a str,
    pub image: &'a str,
    pub score: i32,
    pub enabled: bool,
    pub position: i32,
}

impl<'a> KindUpdate<'a> {
    pub fn new(kind: &'a ReactionKind) -> Self {
        Self {
            id: kind.id.into_inner(),
            title: &kind.title,
            color: &kind.color,
            image: &kind.image,
            score: kind.score,
            enabled: kind.enabled,
            position: kind.order,
        }
    }
}
