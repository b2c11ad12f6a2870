//! Business logic services
//!
//! This module contains the service layer: the request context, the
//! catalog, score, index and notification services, the reaction flow
//! that combines them, and the host hooks.

pub mod catalog;
pub mod context;
pub mod error;
pub mod hooks;
pub mod index;
pub mod notification;
pub mod reaction;
pub mod score;

// Re-export all services for convenience
pub use catalog::{CatalogAdmin, CatalogService};
pub use context::{RequestContext, ServiceContext, ServiceContextBuilder, Viewer};
pub use error::{ServiceError, ServiceResult};
pub use hooks::{HooksService, SCORE_SORT_KEY};
pub use index::IndexService;
pub use notification::{NotificationService, DELETED_USER_NAME};
pub use reaction::ReactionService;
pub use score::ScoreService;
