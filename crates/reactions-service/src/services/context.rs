//! Service context - dependency container for services
//!
//! [`ServiceContext`] holds the repositories, cache, publisher and settings
//! shared by every request. [`RequestContext`] pairs it with the acting
//! [`Viewer`] and the catalog loaded for that request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::warn;

use reactions_cache::{PubSubChannel, Publisher, RedisCatalogCache, RedisPool, Subscriber};
use reactions_common::{ReactionsConfig, RedisConfig};
use reactions_core::traits::{
    CatalogCache, Clock, EventPublisher, LedgerRepository, NotificationRepository,
    ReactionKindRepository, ReactionObserver, ReactionRepository, SystemClock, UserRepository,
};
use reactions_core::{Catalog, DomainEvent, Id, Permissions};
use reactions_db::{
    PgLedgerRepository, PgNotificationRepository, PgPool, PgReactionKindRepository,
    PgReactionRepository, PgUserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It provides access to:
/// - Repositories for kinds, reactions, the score ledger, users and notifications
/// - The optional catalog cache and event publisher
/// - In-process observers of reaction changes
/// - The clock and the board's reaction settings
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    kind_repo: Arc<dyn ReactionKindRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    ledger_repo: Arc<dyn LedgerRepository>,
    user_repo: Arc<dyn UserRepository>,
    notification_repo: Arc<dyn NotificationRepository>,

    // Cache and pub/sub
    catalog_cache: Option<Arc<dyn CatalogCache>>,
    publisher: Option<Arc<dyn EventPublisher>>,

    observers: Vec<Arc<dyn ReactionObserver>>,

    clock: Arc<dyn Clock>,
    config: ReactionsConfig,
}

impl ServiceContext {
    // === Repositories ===

    /// Get the reaction kind repository
    pub fn kind_repo(&self) -> &dyn ReactionKindRepository {
        self.kind_repo.as_ref()
    }

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    /// Get the score ledger repository
    pub fn ledger_repo(&self) -> &dyn LedgerRepository {
        self.ledger_repo.as_ref()
    }

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the notification repository
    pub fn notification_repo(&self) -> &dyn NotificationRepository {
        self.notification_repo.as_ref()
    }

    // === Cache ===

    /// Get the catalog cache, if one is configured
    pub fn catalog_cache(&self) -> Option<&dyn CatalogCache> {
        self.catalog_cache.as_deref()
    }

    // === Settings ===

    /// Board-wide reaction settings
    pub fn config(&self) -> &ReactionsConfig {
        &self.config
    }

    /// Current time from the configured clock
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.utc_now()
    }

    // === Events ===

    /// Deliver an event to the registered observers, then publish it.
    /// A failed publish is logged and otherwise ignored.
    pub async fn emit(&self, event: &DomainEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }

        if let Some(publisher) = &self.publisher {
            if let Err(e) = publisher.publish(event).await {
                warn!(
                    event_type = event.event_type(),
                    error = %e,
                    "Failed to publish reaction event"
                );
            }
        }
    }

    /// Hand events published by other instances to the local observers.
    ///
    /// Follows the catalog channel plus the given posts' channels; one
    /// forwarding task per observer.
    pub async fn follow_remote(
        &self,
        subscriber: &Subscriber,
        post_ids: &[Id],
    ) -> ServiceResult<Vec<JoinHandle<()>>> {
        let mut channels = vec![PubSubChannel::Catalog];
        channels.extend(post_ids.iter().copied().map(PubSubChannel::post));

        subscriber
            .subscribe(&channels)
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(self
            .observers
            .iter()
            .map(|observer| subscriber.forward_to(observer.clone()))
            .collect())
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("catalog_cache", &self.catalog_cache.is_some())
            .field("publisher", &self.publisher.is_some())
            .field("observers", &self.observers.len())
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    kind_repo: Option<Arc<dyn ReactionKindRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    ledger_repo: Option<Arc<dyn LedgerRepository>>,
    user_repo: Option<Arc<dyn UserRepository>>,
    notification_repo: Option<Arc<dyn NotificationRepository>>,
    catalog_cache: Option<Arc<dyn CatalogCache>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    observers: Vec<Arc<dyn ReactionObserver>>,
    clock: Option<Arc<dyn Clock>>,
    config: ReactionsConfig,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            kind_repo: None,
            reaction_repo: None,
            ledger_repo: None,
            user_repo: None,
            notification_repo: None,
            catalog_cache: None,
            publisher: None,
            observers: Vec::new(),
            clock: None,
            config: ReactionsConfig::default(),
        }
    }

    /// Use the PostgreSQL repositories for every port
    pub fn postgres(self, pool: PgPool) -> Self {
        self.kind_repo(Arc::new(PgReactionKindRepository::new(pool.clone())))
            .reaction_repo(Arc::new(PgReactionRepository::new(pool.clone())))
            .ledger_repo(Arc::new(PgLedgerRepository::new(pool.clone())))
            .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
            .notification_repo(Arc::new(PgNotificationRepository::new(pool)))
    }

    /// Cache the catalog in Redis and publish reaction events there
    pub fn redis(self, pool: RedisPool, config: &RedisConfig) -> Self {
        self.catalog_cache(Arc::new(RedisCatalogCache::from_config(pool.clone(), config)))
            .publisher(Arc::new(Publisher::new(pool)))
    }

    pub fn kind_repo(mut self, repo: Arc<dyn ReactionKindRepository>) -> Self {
        self.kind_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn ledger_repo(mut self, repo: Arc<dyn LedgerRepository>) -> Self {
        self.ledger_repo = Some(repo);
        self
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn notification_repo(mut self, repo: Arc<dyn NotificationRepository>) -> Self {
        self.notification_repo = Some(repo);
        self
    }

    pub fn catalog_cache(mut self, cache: Arc<dyn CatalogCache>) -> Self {
        self.catalog_cache = Some(cache);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Register an observer of reaction changes
    pub fn observer(mut self, observer: Arc<dyn ReactionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(mut self, config: ReactionsConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            kind_repo: self
                .kind_repo
                .ok_or_else(|| ServiceError::validation("kind_repo is required"))?,
            reaction_repo: self
                .reaction_repo
                .ok_or_else(|| ServiceError::validation("reaction_repo is required"))?,
            ledger_repo: self
                .ledger_repo
                .ok_or_else(|| ServiceError::validation("ledger_repo is required"))?,
            user_repo: self
                .user_repo
                .ok_or_else(|| ServiceError::validation("user_repo is required"))?,
            notification_repo: self
                .notification_repo
                .ok_or_else(|| ServiceError::validation("notification_repo is required"))?,
            catalog_cache: self.catalog_cache,
            publisher: self.publisher,
            observers: self.observers,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            config: self.config.normalized(),
        })
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The user a request acts for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub user_id: Id,
    pub username: String,
    pub permissions: Permissions,
}

impl Viewer {
    pub fn new(user_id: Id, username: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            user_id,
            username: username.into(),
            permissions,
        }
    }

    /// Acting identity of maintenance work triggered by the host or an admin
    pub fn system() -> Self {
        Self::new(Id::NONE, "", Permissions::MODERATE)
    }

    /// Whether the viewer may see who reacted, given the anonymous setting
    pub fn can_view_names(&self, config: &ReactionsConfig) -> bool {
        !config.anonymous || self.permissions.is_moderator()
    }

    /// Whether the viewer may act on `user_id`'s reaction
    pub fn can_act_for(&self, user_id: Id) -> bool {
        (user_id == self.user_id && self.permissions.can_use()) || self.permissions.is_moderator()
    }
}

/// Per-request state: shared services, the acting viewer and the
/// catalog, loaded at most once per request
pub struct RequestContext<'a> {
    services: &'a ServiceContext,
    viewer: Viewer,
    catalog: OnceCell<Catalog>,
}

impl<'a> RequestContext<'a> {
    pub fn new(services: &'a ServiceContext, viewer: Viewer) -> Self {
        Self {
            services,
            viewer,
            catalog: OnceCell::new(),
        }
    }

    pub fn services(&self) -> &'a ServiceContext {
        self.services
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn config(&self) -> &'a ReactionsConfig {
        self.services.config()
    }

    pub(crate) fn catalog_cell(&self) -> &OnceCell<Catalog> {
        &self.catalog
    }
}

impl std::fmt::Debug for RequestContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("viewer", &self.viewer)
            .field("catalog_loaded", &self.catalog.initialized())
            .finish()
    }
}
