//! Ports implemented by the infrastructure crates

mod cache;
mod clock;
mod publisher;
mod repositories;

pub use cache::CatalogCache;
pub use clock::{Clock, SystemClock, TestClock};
pub use publisher::{EventPublisher, ReactionObserver};
pub use repositories::{
    KindDraft, LedgerRepository, NotificationRepository, ReactionKindRepository,
    ReactionRepository, RepoResult, UserRepository,
};
