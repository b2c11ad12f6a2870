//! Database models - SQLx-compatible structs for PostgreSQL tables

mod notification;
mod post;
mod reaction;
mod reaction_kind;

pub use notification::NotificationModel;
pub use post::{PostContextModel, UserScoreModel, UsernameModel};
pub use reaction::ReactionModel;
pub use reaction_kind::ReactionKindModel;
