//! Index service
//!
//! Answers "who reacted how" for posts: per-kind reactor lists, score
//! summaries and the reactor listing of a single post.

use std::collections::HashMap;

use tracing::instrument;

use reactions_core::entities::ViewerRef;
use reactions_core::{
    Catalog, DomainError, Id, KindReactors, ListOrder, PostReactions, ReactionEvent,
    ReactionListing, ScoreSummary,
};

use super::catalog::CatalogService;
use super::context::RequestContext;
use super::error::ServiceResult;

/// Index service
pub struct IndexService<'a> {
    req: &'a RequestContext<'a>,
}

impl<'a> IndexService<'a> {
    /// Create a new IndexService
    pub fn new(req: &'a RequestContext<'a>) -> Self {
        Self { req }
    }

    /// Reactions of each post, in input order. Kinds that are disabled or
    /// gone from the catalog are left out of lists and totals.
    #[instrument(skip(self))]
    pub async fn get(&self, post_ids: &[Id]) -> ServiceResult<Vec<PostReactions>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let catalog = CatalogService::new(self.req).load().await?;
        let events = self
            .req
            .services()
            .reaction_repo()
            .find_by_posts(post_ids, &catalog.disabled_ids())
            .await?;

        Ok(build_index(
            catalog,
            post_ids,
            events,
            self.req.viewer().user_id,
            self.req.config().list_order,
        ))
    }

    /// Reactions of a single post
    pub async fn get_one(&self, post_id: Id) -> ServiceResult<PostReactions> {
        Ok(self
            .get(&[post_id])
            .await?
            .pop()
            .unwrap_or_else(|| PostReactions::empty(post_id)))
    }

    /// Score list of a post as the viewer sees it
    pub async fn summary(&self, reactions: &PostReactions) -> ServiceResult<ScoreSummary> {
        let catalog = CatalogService::new(self.req).load().await?;
        let viewer = self.req.viewer();

        Ok(ScoreSummary::build(
            catalog,
            reactions,
            ViewerRef {
                user_id: viewer.user_id,
                username: &viewer.username,
                can_view_names: viewer.can_view_names(self.req.config()),
            },
        ))
    }

    /// Everyone who reacted to a post, grouped in tabs. `active` selects
    /// the tab of a kind; `None` selects "All".
    #[instrument(skip(self))]
    pub async fn listing(&self, post_id: Id, active: Option<Id>) -> ServiceResult<ReactionListing> {
        let viewer = self.req.viewer();
        let config = self.req.config();

        if !viewer.permissions.can_view() && !viewer.permissions.is_moderator() {
            return Err(DomainError::NotAuthorized(viewer.user_id).into());
        }

        if !post_id.is_valid() {
            return Err(DomainError::InvalidId(post_id.into_inner()).into());
        }

        self.req
            .services()
            .ledger_repo()
            .post_context(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?;

        let catalog = CatalogService::new(self.req).load().await?;
        let reactions = self.get_one(post_id).await?;

        let own_rows = config.allow_change && viewer.permissions.can_use();
        let moderator = viewer.permissions.is_moderator();

        Ok(ReactionListing::build(
            catalog,
            &reactions,
            config.list_order,
            active,
            viewer.can_view_names(config),
            |reactor| (own_rows && reactor.user_id == viewer.user_id) || moderator,
        ))
    }

    /// Number of reactions a user has given
    #[instrument(skip(self))]
    pub async fn reaction_count_by_user(&self, user_id: Id) -> ServiceResult<i64> {
        Ok(self.req.services().reaction_repo().count_by_user(user_id).await?)
    }
}

/// Partition events by post, then by kind in catalog order
pub(crate) fn build_index(
    catalog: &Catalog,
    post_ids: &[Id],
    events: Vec<ReactionEvent>,
    viewer_id: Id,
    order: ListOrder,
) -> Vec<PostReactions> {
    let mut by_post: HashMap<Id, Vec<ReactionEvent>> = HashMap::new();
    for event in events {
        if catalog.get(event.kind_id).is_enabled() {
            by_post.entry(event.post_id).or_default().push(event);
        }
    }

    post_ids
        .iter()
        .map(|&post_id| {
            let Some(events) = by_post.get(&post_id) else {
                return PostReactions::empty(post_id);
            };

            let by_kind: Vec<KindReactors> = catalog
                .enabled()
                .filter_map(|kind| {
                    let mut reactors: Vec<_> = events
                        .iter()
                        .filter(|e| e.is_kind(kind.id))
                        .map(ReactionEvent::reactor)
                        .collect();
                    if reactors.is_empty() {
                        return None;
                    }
                    order.sort(&mut reactors);
                    Some(KindReactors {
                        kind_id: kind.id,
                        reactors,
                    })
                })
                .collect();

            PostReactions {
                post_id,
                mine: events
                    .iter()
                    .find(|e| e.user_id == viewer_id)
                    .map(|e| e.kind_id),
                total: by_kind.iter().map(KindReactors::count).sum(),
                by_kind,
            }
        })
        .collect()
}
