//! # reactions-service
//!
//! Application layer containing the reaction services and DTOs.
//!
//! A [`ServiceContext`] is built once per process. Each request wraps it in
//! a [`RequestContext`] together with the acting [`Viewer`]; services borrow
//! the request context and share the catalog it loads.
//!
//! ```ignore
//! let services = ServiceContextBuilder::new()
//!     .postgres(pool)
//!     .redis(redis_pool, &config.redis)
//!     .config(config.reactions)
//!     .build()?;
//!
//! let req = RequestContext::new(&services, Viewer::new(user_id, "alice", Permissions::DEFAULT));
//! let outcome = ReactionService::new(&req).add(post_id, user_id, kind_id).await?;
//! ```

pub mod dto;
pub mod services;

pub use services::{
    CatalogAdmin, CatalogService, HooksService, IndexService, NotificationService,
    ReactionService, RequestContext, ScoreService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, Viewer,
};
