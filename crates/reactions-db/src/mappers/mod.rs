//! Entity to model mappers
//!
//! This module provides conversions between domain entities (reactions-core) and database models.
//! - `From<Model> for Entity`: Convert database rows to domain objects
//! - `*Insert`/`*Update` structs: Prepare entity data for database operations

mod notification;
mod post;
mod reaction;
mod reaction_kind;

pub use notification::{id_array, NotificationInsert};
pub use post::{visibility_from_code, visibility_to_code};
pub use reaction::ReactionInsert;
pub use reaction_kind::{KindInsert, KindUpdate};
