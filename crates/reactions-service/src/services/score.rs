//! Score service
//!
//! Keeps post, topic and user reaction scores in line with the stored
//! reactions.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument};

use reactions_core::{Catalog, Id, PostContext, PostScore, ReactionEvent, ReactionWrite, ScoreDelta};

use super::catalog::CatalogService;
use super::context::RequestContext;
use super::error::ServiceResult;

/// Score service
pub struct ScoreService<'a> {
    req: &'a RequestContext<'a>,
}

impl<'a> ScoreService<'a> {
    /// Create a new ScoreService
    pub fn new(req: &'a RequestContext<'a>) -> Self {
        Self { req }
    }

    /// Store a reaction write and move the scores by `score(new) - score(old)`,
    /// both kinds taken from the write.
    ///
    /// The event write and every ledger update happen in one transaction,
    /// which fails with `ReactionConflict` if the stored reaction moved
    /// away from the old kind meanwhile. A poster whose score needs
    /// recompute gets it rebuilt afterwards.
    #[instrument(skip(self, write, post), fields(post_id = %post.post_id))]
    pub async fn apply(&self, write: &ReactionWrite, post: &PostContext) -> ServiceResult<i64> {
        let catalog = CatalogService::new(self.req).load().await?;
        let delta = ScoreDelta::for_post(post, catalog.delta(write.old_kind(), write.new_kind()));

        self.req.services().ledger_repo().commit(write, &delta).await?;

        if post.poster_score.is_none() {
            self.materialize_user_scores(&[post.poster_id]).await?;
        }

        debug!(delta = delta.delta, first_post = post.is_first_post(), "Scores applied");
        Ok(delta.delta)
    }

    /// Recompute post scores (and the topic mirror of first posts) from the
    /// reactions still stored
    #[instrument(skip(self))]
    pub async fn resync(&self, post_ids: &[Id]) -> ServiceResult<()> {
        if post_ids.is_empty() {
            return Ok(());
        }

        let scores = self.rescore(post_ids, &[]).await?;
        self.req.services().ledger_repo().store_post_scores(&scores).await?;

        info!(posts = scores.len(), "Post scores resynced");
        Ok(())
    }

    /// Post scores as they would be without the reactions of `without_users`
    pub(crate) async fn rescore(
        &self,
        post_ids: &[Id],
        without_users: &[Id],
    ) -> ServiceResult<Vec<PostScore>> {
        let catalog = CatalogService::new(self.req).load().await?;

        // Disabled kinds keep counting towards the score
        let events = self
            .req
            .services()
            .reaction_repo()
            .find_by_posts(post_ids, &[])
            .await?;

        let kept = events
            .iter()
            .filter(|event| !without_users.contains(&event.user_id));

        Ok(sum_post_scores(catalog, post_ids, kept))
    }

    /// Sum of post scores per user; users without posts score zero
    #[instrument(skip(self))]
    pub async fn user_scores(&self, user_ids: &[Id]) -> ServiceResult<HashMap<Id, i64>> {
        let mut sums = self.req.services().user_repo().sum_post_scores(user_ids).await?;
        for user_id in user_ids {
            sums.entry(*user_id).or_insert(0);
        }
        Ok(sums)
    }

    /// Scores of the given users, computing and storing those that need it.
    /// Unknown users are left out.
    #[instrument(skip(self))]
    pub async fn materialize_user_scores(&self, user_ids: &[Id]) -> ServiceResult<HashMap<Id, i64>> {
        let users = self.req.services().user_repo();
        let stored = users.stored_scores(user_ids).await?;

        let mut scores = HashMap::with_capacity(stored.len());
        let mut missing = Vec::new();
        for (user_id, score) in stored {
            match score {
                Some(score) => {
                    scores.insert(user_id, score);
                }
                None => missing.push(user_id),
            }
        }

        if missing.is_empty() {
            return Ok(scores);
        }

        let computed = self.user_scores(&missing).await?;
        let rows: Vec<(Id, i64)> = missing
            .iter()
            .map(|id| (*id, computed.get(id).copied().unwrap_or(0)))
            .collect();
        users.set_scores(&rows).await?;

        debug!(users = rows.len(), "User scores materialized");

        scores.extend(rows);
        Ok(scores)
    }
}

/// Score of each post from its reactions, in input order without repeats;
/// posts without reactions score zero
pub(crate) fn sum_post_scores<'e>(
    catalog: &Catalog,
    post_ids: &[Id],
    events: impl IntoIterator<Item = &'e ReactionEvent>,
) -> Vec<PostScore> {
    let mut sums: HashMap<Id, i64> = HashMap::with_capacity(post_ids.len());
    for event in events {
        *sums.entry(event.post_id).or_insert(0) += catalog.get(event.kind_id).score_value();
    }

    let mut seen = HashSet::with_capacity(post_ids.len());
    post_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .map(|&post_id| PostScore {
            post_id,
            score: sums.get(&post_id).copied().unwrap_or(0),
        })
        .collect()
}
