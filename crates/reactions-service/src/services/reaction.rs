//! Reaction service
//!
//! Handles adding, changing and withdrawing reactions on posts.

use tracing::{info, instrument};

use reactions_core::events::{ReactionAddedEvent, ReactionChangedEvent, ReactionRemovedEvent};
use reactions_core::{
    DomainError, DomainEvent, Id, NotificationKind, PostContext, ReactionEvent, ReactionWrite,
};

use crate::dto::ReactionOutcome;

use super::catalog::CatalogService;
use super::context::RequestContext;
use super::error::{ServiceError, ServiceResult};
use super::index::IndexService;
use super::notification::NotificationService;
use super::score::ScoreService;

/// Reaction service
pub struct ReactionService<'a> {
    req: &'a RequestContext<'a>,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(req: &'a RequestContext<'a>) -> Self {
        Self { req }
    }

    /// React to a post as `user_id`, or switch to another kind
    #[instrument(skip(self))]
    pub async fn add(&self, post_id: Id, user_id: Id, kind_id: Id) -> ServiceResult<ReactionOutcome> {
        let ctx = self.req.services();
        let config = self.req.config();
        let viewer = self.req.viewer();

        self.authorize(user_id)?;
        require_valid(&[post_id, user_id, kind_id])?;

        let post = self.post(post_id).await?;
        let existing = ctx.reaction_repo().find(post_id, user_id).await?;

        if existing.is_some() && !config.allow_change && !viewer.permissions.is_moderator() {
            return Err(DomainError::ChangeNotAllowed.into());
        }

        if post.poster_id == user_id && !config.allow_myself {
            return Err(DomainError::SelfReactionNotAllowed.into());
        }

        if !self.accepts_reactions(&post) {
            return Err(DomainError::PostLocked.into());
        }

        let kind = CatalogService::new(self.req).get(kind_id).await?;
        if !kind.is_enabled() {
            return Err(DomainError::UnknownKind(kind_id).into());
        }

        let old_kind = existing.as_ref().map(|e| e.kind_id);
        if old_kind == Some(kind_id) {
            return Err(DomainError::DuplicateReaction.into());
        }

        let username = self.username_of(user_id).await?;
        let now = ctx.now();
        let event = ReactionEvent::new(post_id, post.poster_id, user_id, username, kind_id, now)
            .in_topic(post.topic_id);

        let write = match old_kind {
            Some(from) => ReactionWrite::Replace { event, from },
            None => ReactionWrite::Insert(event),
        };

        let delta = ScoreService::new(self.req).apply(&write, &post).await?;

        if old_kind.is_none() && post.poster_id != viewer.user_id {
            NotificationService::new(ctx)
                .add(
                    &NotificationKind::REACTION_POST,
                    post_id,
                    post.topic_id,
                    user_id,
                    post.poster_id,
                    &NotificationService::resume(&post.text),
                )
                .await?;
        }

        let domain_event = match old_kind {
            Some(old_kind_id) => DomainEvent::ReactionChanged(ReactionChangedEvent {
                post_id,
                topic_id: post.topic_id,
                poster_id: post.poster_id,
                user_id,
                old_kind_id,
                kind_id,
                delta,
                timestamp: now,
            }),
            None => DomainEvent::ReactionAdded(ReactionAddedEvent {
                post_id,
                topic_id: post.topic_id,
                poster_id: post.poster_id,
                user_id,
                kind_id,
                delta,
                timestamp: now,
            }),
        };
        ctx.emit(&domain_event).await;

        info!(
            post_id = %post_id,
            user_id = %user_id,
            kind_id = %kind_id,
            changed = old_kind.is_some(),
            delta,
            "Reaction stored"
        );

        self.outcome(post_id, Some(kind_id), delta).await
    }

    /// Withdraw `user_id`'s reaction from a post
    #[instrument(skip(self))]
    pub async fn remove(&self, post_id: Id, user_id: Id) -> ServiceResult<ReactionOutcome> {
        let ctx = self.req.services();
        let config = self.req.config();
        let viewer = self.req.viewer();

        self.authorize(user_id)?;
        require_valid(&[post_id, user_id])?;

        let post = self.post(post_id).await?;
        let existing = ctx.reaction_repo().find(post_id, user_id).await?;

        if existing.is_some() && !config.allow_change && !viewer.permissions.is_moderator() {
            return Err(DomainError::ChangeNotAllowed.into());
        }

        let Some(existing) = existing else {
            return Err(DomainError::ReactionNotFound { post_id, user_id }.into());
        };

        let write = ReactionWrite::Delete {
            post_id,
            user_id,
            from: existing.kind_id,
        };
        let delta = ScoreService::new(self.req).apply(&write, &post).await?;

        NotificationService::new(ctx)
            .remove(&NotificationKind::REACTION_POST, post_id, post.topic_id, user_id)
            .await?;

        let domain_event = DomainEvent::ReactionRemoved(ReactionRemovedEvent {
            post_id,
            topic_id: post.topic_id,
            poster_id: post.poster_id,
            user_id,
            old_kind_id: existing.kind_id,
            delta,
            timestamp: ctx.now(),
        });
        ctx.emit(&domain_event).await;

        info!(post_id = %post_id, user_id = %user_id, delta, "Reaction removed");

        self.outcome(post_id, None, delta).await
    }

    /// The viewer acts for themself with USE, or for anyone with MODERATE
    fn authorize(&self, user_id: Id) -> ServiceResult<()> {
        if self.req.viewer().can_act_for(user_id) {
            Ok(())
        } else {
            Err(DomainError::NotAuthorized(user_id).into())
        }
    }

    async fn post(&self, post_id: Id) -> ServiceResult<PostContext> {
        self.req
            .services()
            .ledger_repo()
            .post_context(post_id)
            .await?
            .ok_or_else(|| DomainError::PostNotFound(post_id).into())
    }

    /// Forum, zone and moderation state all allow new reactions
    fn accepts_reactions(&self, post: &PostContext) -> bool {
        let config = self.req.config();
        config.forum_enabled(post.forum_id)
            && config.zones.accepts(post.is_first_post())
            && post.visibility.accepts_reactions()
            && !post.reported
    }

    async fn username_of(&self, user_id: Id) -> ServiceResult<String> {
        let viewer = self.req.viewer();
        if user_id == viewer.user_id {
            return Ok(viewer.username.clone());
        }

        self.req
            .services()
            .user_repo()
            .usernames(&[user_id])
            .await?
            .remove(&user_id)
            .ok_or_else(|| DomainError::ValidationError(format!("unknown user {user_id}")).into())
    }

    /// Refreshed score list, only for viewers allowed to see it
    async fn outcome(&self, post_id: Id, mine: Option<Id>, delta: i64) -> ServiceResult<ReactionOutcome> {
        let summary = if self.req.viewer().permissions.can_view() {
            let index = IndexService::new(self.req);
            let reactions = index.get_one(post_id).await?;
            Some(index.summary(&reactions).await?)
        } else {
            None
        };

        Ok(ReactionOutcome {
            post_id,
            mine,
            delta,
            summary,
        })
    }
}

fn require_valid(ids: &[Id]) -> Result<(), ServiceError> {
    match ids.iter().find(|id| !id.is_valid()) {
        Some(id) => Err(DomainError::InvalidId(id.into_inner()).into()),
        None => Ok(()),
    }
}
