//! Value objects - immutable types that represent domain concepts

mod day_bucket;
mod id;
mod permissions;

pub use day_bucket::DayBucket;
pub use id::{Id, IdParseError};
pub use permissions::{PermissionOption, Permissions};
