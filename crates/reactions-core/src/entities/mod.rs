//! Domain entities - core business objects

mod catalog;
mod ledger;
mod notification;
mod reaction;
mod reaction_kind;
mod view;

pub use catalog::Catalog;
pub use ledger::{
    PostContext, PostPurge, PostScore, PostVisibility, PurgedRows, ReactionWrite, ScoreDelta,
    UserPurge,
};
pub use notification::{
    join_list, make_resume, NewNotification, NotificationKey, NotificationKind, NotificationRecord,
    NotificationTitle, OthersTier, RESUME_LENGTH,
};
pub use reaction::{
    clean_username, KindReactors, ListOrder, PostReactions, ReactionCount, ReactionEvent, Reactor,
};
pub use reaction_kind::ReactionKind;
pub use view::{ListingRow, ListingTab, ReactionListing, ScoreSummary, SummaryLabel, ViewerRef};
