//! # reactions-core
//!
//! Domain layer containing entities, value objects, repository traits, and domain events.
//! This crate has zero dependencies on infrastructure (database, cache, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Catalog, KindReactors, ListOrder, NotificationKey, NotificationKind, NotificationRecord,
    NotificationTitle, PostContext, PostPurge, PostReactions, PostScore, PurgedRows,
    ReactionCount, ReactionEvent, ReactionKind, ReactionListing, ReactionWrite, Reactor,
    ScoreDelta, ScoreSummary, SummaryLabel, UserPurge,
};
pub use error::DomainError;
pub use events::DomainEvent;
pub use traits::{
    CatalogCache, Clock, EventPublisher, KindDraft, LedgerRepository, NotificationRepository,
    ReactionKindRepository, ReactionObserver, ReactionRepository, RepoResult, SystemClock,
    TestClock, UserRepository,
};
pub use value_objects::{DayBucket, Id, IdParseError, PermissionOption, Permissions};
