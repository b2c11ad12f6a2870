//! Catalog services
//!
//! [`CatalogService`] reads the reaction kinds for one request, loading them
//! at most once. [`CatalogAdmin`] edits the kind list and drops the cached copy.

use tracing::{debug, info, instrument, warn};
use validator::Validate;

use reactions_core::events::CatalogChangedEvent;
use reactions_core::{Catalog, DomainError, DomainEvent, Id, PostScore, ReactionKind};

use crate::dto::{KindInput, ReorderKindsRequest};

use super::context::{RequestContext, ServiceContext};
use super::error::ServiceResult;
use super::score::sum_post_scores;

/// Request-scoped catalog reader
pub struct CatalogService<'a> {
    req: &'a RequestContext<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new CatalogService
    pub fn new(req: &'a RequestContext<'a>) -> Self {
        Self { req }
    }

    /// All kinds in display order, loaded once per request
    pub async fn load(&self) -> ServiceResult<&'a Catalog> {
        let req = self.req;
        req.catalog_cell()
            .get_or_try_init(|| fetch_catalog(req.services()))
            .await
    }

    /// Kind by id; unknown ids yield the empty sentinel
    pub async fn get(&self, id: Id) -> ServiceResult<&'a ReactionKind> {
        Ok(self.load().await?.get(id))
    }

    /// Enabled kinds in display order
    pub async fn enabled(&self) -> ServiceResult<Vec<&'a ReactionKind>> {
        Ok(self.load().await?.enabled().collect())
    }

    /// The configured default kind, when it exists and is enabled
    pub async fn default_kind(&self) -> ServiceResult<Option<&'a ReactionKind>> {
        let Some(id) = self.req.config().default_kind else {
            return Ok(None);
        };
        let kind = self.get(id).await?;
        Ok(kind.is_enabled().then_some(kind))
    }
}

/// Read the kinds through the shared cache. Cache failures fall back to
/// the repository.
#[instrument(skip(ctx))]
async fn fetch_catalog(ctx: &ServiceContext) -> ServiceResult<Catalog> {
    if let Some(cache) = ctx.catalog_cache() {
        match cache.get().await {
            Ok(Some(kinds)) => {
                debug!(count = kinds.len(), "Catalog loaded from cache");
                return Ok(Catalog::new(kinds));
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Catalog cache read failed"),
        }
    }

    let kinds = ctx.kind_repo().find_all().await?;
    debug!(count = kinds.len(), "Catalog loaded from database");

    if let Some(cache) = ctx.catalog_cache() {
        if let Err(e) = cache.put(&kinds).await {
            warn!(error = %e, "Catalog cache write failed");
        }
    }

    Ok(Catalog::new(kinds))
}

/// Catalog administration
pub struct CatalogAdmin<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CatalogAdmin<'a> {
    /// Create a new CatalogAdmin
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Current kinds straight from storage
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<ReactionKind>> {
        Ok(self.ctx.kind_repo().find_all().await?)
    }

    /// Add a kind after the existing ones
    #[instrument(skip(self))]
    pub async fn create_kind(&self, input: KindInput) -> ServiceResult<ReactionKind> {
        input.validate()?;

        let kind = self.ctx.kind_repo().create(&input.to_draft()).await?;

        info!(kind_id = %kind.id, title = %kind.title, "Reaction kind created");

        self.changed(Some(kind.id)).await;
        Ok(kind)
    }

    /// Edit a kind; a new score is applied to the posts already carrying it
    /// in the same transaction
    #[instrument(skip(self))]
    pub async fn update_kind(&self, id: Id, input: KindInput) -> ServiceResult<ReactionKind> {
        input.validate()?;

        let current = self
            .ctx
            .kind_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::KindNotFound(id))?;

        let draft = input.to_draft();
        let kind = ReactionKind {
            id,
            title: draft.title,
            color: draft.color,
            image: draft.image,
            score: draft.score,
            enabled: draft.enabled,
            order: current.order,
        };

        let rescored = if kind.score != current.score {
            self.rescore(id, Some(&kind)).await?
        } else {
            Vec::new()
        };

        self.ctx.kind_repo().update(&kind, &rescored).await?;

        info!(kind_id = %id, posts = rescored.len(), "Reaction kind updated");

        self.changed(Some(id)).await;
        Ok(kind)
    }

    /// Remove a kind and the reactions made with it; the posts that lose
    /// a reaction are rescored in the same transaction
    #[instrument(skip(self))]
    pub async fn delete_kind(&self, id: Id) -> ServiceResult<()> {
        if self.ctx.kind_repo().find_by_id(id).await?.is_none() {
            return Err(DomainError::KindNotFound(id).into());
        }

        let rescored = self.rescore(id, None).await?;
        if !self.ctx.kind_repo().delete(id, &rescored).await? {
            return Err(DomainError::KindNotFound(id).into());
        }

        info!(kind_id = %id, posts = rescored.len(), "Reaction kind deleted");

        self.changed(Some(id)).await;
        Ok(())
    }

    /// Set the display order; positions follow the given ids starting at 1
    #[instrument(skip(self))]
    pub async fn reorder(&self, request: ReorderKindsRequest) -> ServiceResult<()> {
        request.validate()?;

        let known = self.ctx.kind_repo().find_all().await?;
        let positions = request
            .ids
            .iter()
            .enumerate()
            .map(|(index, &id)| {
                if known.iter().any(|k| k.id == id) {
                    Ok((id, index as i32 + 1))
                } else {
                    Err(DomainError::KindNotFound(id))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.ctx.kind_repo().update_positions(&positions).await?;

        info!(count = positions.len(), "Reaction kinds reordered");

        self.changed(None).await;
        Ok(())
    }

    /// Drop the cached catalog and announce the change
    async fn changed(&self, kind_id: Option<Id>) {
        if let Some(cache) = self.ctx.catalog_cache() {
            if let Err(e) = cache.invalidate().await {
                warn!(error = %e, "Catalog cache invalidation failed");
            }
        }

        let event = DomainEvent::CatalogChanged(CatalogChangedEvent::new(kind_id, self.ctx.now()));
        self.ctx.emit(&event).await;
    }

    /// Scores of the posts carrying kind `id` once it is replaced by
    /// `edited`, or dropped together with its reactions when `None`
    async fn rescore(&self, id: Id, edited: Option<&ReactionKind>) -> ServiceResult<Vec<PostScore>> {
        let reactions = self.ctx.reaction_repo();
        let post_ids = reactions.find_post_ids_by_kind(id).await?;
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let kinds = self
            .ctx
            .kind_repo()
            .find_all()
            .await?
            .into_iter()
            .filter(|k| k.id != id)
            .chain(edited.cloned())
            .collect();
        let catalog = Catalog::new(kinds);

        // A dropped kind is gone from the catalog and scores zero
        let events = reactions.find_by_posts(&post_ids, &[]).await?;
        Ok(sum_post_scores(&catalog, &post_ids, &events))
    }
}
