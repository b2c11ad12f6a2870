//! Host extension points
//!
//! Each hook takes what the host hands over and returns the value the host
//! continues with.

use std::collections::BTreeSet;

use tracing::{debug, info, instrument};
use validator::Validate;

use reactions_core::events::ReactionsPurgedEvent;
use reactions_core::{
    DomainError, DomainEvent, Id, NotificationKind, PermissionOption, Permissions, PostPurge,
    UserPurge,
};

use crate::dto::{
    DeleteUsersRequest, PostingAuthRequest, PostingMode, PostsPurged, ProfileReactions,
    SortOption, TopicRow, TopicView, TopicViewRequest, UserDeleteMode, UsernameChangeRequest,
    UsersPurged, WidgetOptions,
};

use super::catalog::CatalogService;
use super::context::RequestContext;
use super::error::ServiceResult;
use super::index::IndexService;
use super::score::ScoreService;

/// Sort key of the reaction score in topic and post listings
pub const SCORE_SORT_KEY: &str = "rs";

/// Hooks service
pub struct HooksService<'a> {
    req: &'a RequestContext<'a>,
}

impl<'a> HooksService<'a> {
    /// Create a new HooksService
    pub fn new(req: &'a RequestContext<'a>) -> Self {
        Self { req }
    }

    /// Add the reaction permissions to the host's permission set
    pub fn add_permissions(mut options: Vec<PermissionOption>) -> Vec<PermissionOption> {
        for option in Permissions::OPTIONS {
            if !options.iter().any(|o| o.name == option.name) {
                options.push(option);
            }
        }
        options
    }

    /// Forum listing: order topics by the score of their first post
    pub fn forum_sort_options(options: Vec<SortOption>) -> Vec<SortOption> {
        with_score_option(options, &["t.topic_reaction_score", "t.topic_last_post_id"])
    }

    /// Topic view: order posts by score
    pub fn topic_sort_options(options: Vec<SortOption>) -> Vec<SortOption> {
        with_score_option(options, &["p.post_reaction_score", "p.post_id"])
    }

    /// Posts are being deleted: their reactions and notifications go too,
    /// and the posters' scores are marked for recompute, in one transaction
    #[instrument(skip(self))]
    pub async fn delete_posts(&self, post_ids: &[Id]) -> ServiceResult<PostsPurged> {
        let purged = self
            .req
            .services()
            .ledger_repo()
            .purge_posts(&PostPurge {
                post_ids: post_ids.to_vec(),
                drop_notifications: Some(NotificationKind::REACTION_POST.name.to_string()),
            })
            .await?;

        info!(
            posts = post_ids.len(),
            reactions_removed = purged.reactions,
            notifications_removed = purged.notifications,
            "Reactions of deleted posts removed"
        );

        Ok(PostsPurged {
            reactions_removed: purged.reactions,
            notifications_removed: purged.notifications,
        })
    }

    /// Users are being deleted: drop their reactions, rescore the posts
    /// they reacted to and, when their posts stay, the notifications
    /// addressed to them
    #[instrument(skip(self))]
    pub async fn delete_users(&self, request: DeleteUsersRequest) -> ServiceResult<UsersPurged> {
        let ctx = self.req.services();
        let user_ids = request.user_ids;

        if user_ids.is_empty() {
            return Ok(UsersPurged {
                reactions_removed: 0,
                posts_rescored: 0,
            });
        }

        let post_ids = ctx.reaction_repo().find_post_ids_by_users(&user_ids).await?;
        let rescored = ScoreService::new(self.req).rescore(&post_ids, &user_ids).await?;
        let posts_rescored = rescored.len();

        let purge = UserPurge {
            user_ids: user_ids.clone(),
            rescored,
            drop_notifications: (request.mode == UserDeleteMode::Retain)
                .then(|| NotificationKind::REACTION_POST.name.to_string()),
        };
        let reactions_removed = ctx.ledger_repo().purge_users(&purge).await?;

        info!(
            users = user_ids.len(),
            reactions_removed,
            posts_rescored,
            "Reactions of deleted users purged"
        );

        let event = DomainEvent::ReactionsPurged(ReactionsPurgedEvent::new(post_ids, user_ids, ctx.now()));
        ctx.emit(&event).await;

        Ok(UsersPurged {
            reactions_removed,
            posts_rescored,
        })
    }

    /// Reaction state of each post on a topic page
    #[instrument(skip(self, request), fields(forum_id = %request.forum_id, posts = request.posts.len()))]
    pub async fn topic_view(&self, request: TopicViewRequest) -> ServiceResult<TopicView> {
        let config = self.req.config();
        let viewer = self.req.viewer();

        if request.posts.is_empty() || !config.forum_enabled(request.forum_id) {
            return Ok(TopicView::disabled());
        }

        let catalogs = CatalogService::new(self.req);
        let catalog = catalogs.load().await?;
        let index = IndexService::new(self.req);

        let post_ids: Vec<Id> = request.posts.iter().map(|p| p.post_id).collect();
        let reactions = index.get(&post_ids).await?;

        let poster_scores = if config.score_on_profile {
            let posters: BTreeSet<Id> = request.posts.iter().map(|p| p.poster_id).collect();
            let posters: Vec<Id> = posters.into_iter().collect();
            ScoreService::new(self.req).materialize_user_scores(&posters).await?
        } else {
            Default::default()
        };

        let mut rows = Vec::with_capacity(request.posts.len());
        for (post, reactions) in request.posts.iter().zip(&reactions) {
            let own_post = post.poster_id == viewer.user_id;
            let has_mine = catalog.get_opt(reactions.mine).is_enabled();

            let can_use = viewer.permissions.can_use()
                && !(own_post && !config.allow_myself)
                && config.zones.accepts(post.post_id == request.topic_first_post_id)
                && post.visibility.accepts_reactions()
                && !post.reported;

            let hide_attachments = !own_post
                && config.force_attach
                && (post.has_attachments || post.has_inline_attachments)
                && !has_mine
                && can_use;

            let summary = if !reactions.is_empty() && viewer.permissions.can_view() {
                Some(index.summary(reactions).await?)
            } else {
                None
            };

            rows.push(TopicRow {
                post_id: post.post_id,
                can_use,
                mine: reactions.mine.filter(|_| has_mine),
                has_mine,
                hide_attachments,
                poster_score: config
                    .score_on_profile
                    .then(|| poster_scores.get(&post.poster_id).copied().unwrap_or(0)),
                summary,
            });
        }

        debug!(rows = rows.len(), "Topic view prepared");

        Ok(TopicView {
            kinds: catalog.enabled().cloned().collect(),
            options: WidgetOptions {
                allow_change: config.allow_change,
                default_kind: catalogs.default_kind().await?.map(|k| k.id),
                simple_list: !viewer.can_view_names(config),
            },
            rows,
        })
    }

    /// With force-reply on, replying needs a reaction on the first post
    /// unless the viewer started the topic
    #[instrument(skip(self))]
    pub async fn posting_auth(&self, request: PostingAuthRequest) -> ServiceResult<()> {
        let config = self.req.config();
        let viewer = self.req.viewer();

        if request.mode != PostingMode::Reply
            || !config.force_reply
            || request.topic_poster_id == viewer.user_id
            || !config.forum_enabled(request.forum_id)
        {
            return Ok(());
        }

        let reaction = self
            .req
            .services()
            .reaction_repo()
            .find(request.topic_first_post_id, viewer.user_id)
            .await?;

        if reaction.is_none() {
            return Err(DomainError::FirstPostReactionRequired.into());
        }

        Ok(())
    }

    /// Reaction statistics of a member profile
    #[instrument(skip(self))]
    pub async fn profile_view(&self, user_id: Id) -> ServiceResult<ProfileReactions> {
        let total_reactions = IndexService::new(self.req)
            .reaction_count_by_user(user_id)
            .await?;

        let score = if self.req.config().score_on_profile {
            ScoreService::new(self.req)
                .materialize_user_scores(&[user_id])
                .await?
                .get(&user_id)
                .copied()
        } else {
            None
        };

        Ok(ProfileReactions {
            user_id,
            total_reactions,
            score,
        })
    }

    /// Keep the stored reactor names in step with a rename
    #[instrument(skip(self))]
    pub async fn username_change(&self, request: UsernameChangeRequest) -> ServiceResult<u64> {
        request.validate()?;

        let renamed = self
            .req
            .services()
            .reaction_repo()
            .rename_user(&request.old_name, &request.new_name)
            .await?;

        debug!(renamed, "Reactor names updated");
        Ok(renamed)
    }
}

fn with_score_option(mut options: Vec<SortOption>, columns: &[&str]) -> Vec<SortOption> {
    options.retain(|o| o.key != SCORE_SORT_KEY);
    options.push(SortOption {
        key: SCORE_SORT_KEY.to_string(),
        label: "REACTIONS_SCORE".to_string(),
        columns: columns.iter().map(|c| (*c).to_string()).collect(),
        join_users: false,
    });
    options
}
