//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in reactions-core.
//! Each repository handles database operations for one part of the reaction store.

mod error;
mod ledger;
mod notification;
mod reaction;
mod reaction_kind;
mod user;

pub use ledger::PgLedgerRepository;
pub use notification::PgNotificationRepository;
pub use reaction::PgReactionRepository;
pub use reaction_kind::PgReactionKindRepository;
pub use user::PgUserRepository;
