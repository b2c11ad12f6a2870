//! PostgreSQL implementation of LedgerRepository
//!
//! Reaction rows and the score columns on posts, topics and users are
//! always written in the same transaction.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};

use reactions_core::entities::{
    PostContext, PostPurge, PostScore, PurgedRows, ReactionWrite, ScoreDelta, UserPurge,
};
use reactions_core::error::DomainError;
use reactions_core::traits::{LedgerRepository, RepoResult};
use reactions_core::value_objects::Id;

use crate::mappers::{id_array, ReactionInsert};
use crate::models::PostContextModel;

use super::error::{map_db_error, map_unique_violation, reaction_conflict};

/// PostgreSQL implementation of LedgerRepository
#[derive(Clone)]
pub struct PgLedgerRepository {
    pool: PgPool,
}

impl PgLedgerRepository {
    /// Create a new PgLedgerRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Write the reaction row of a commit; the old kind is checked in the
/// same statement
async fn write_event(conn: &mut PgConnection, write: &ReactionWrite) -> RepoResult<()> {
    match write {
        ReactionWrite::Insert(event) => {
            let insert = ReactionInsert::new(event);

            sqlx::query(
                r#"
                INSERT INTO reactions (post_id, topic_id, poster_id, user_id, username, kind_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(insert.post_id)
            .bind(insert.topic_id)
            .bind(insert.poster_id)
            .bind(insert.user_id)
            .bind(insert.username)
            .bind(insert.kind_id)
            .bind(event.created_at)
            .execute(conn)
            .await
            .map_err(|e| map_unique_violation(e, || DomainError::DuplicateReaction))?;
        }
        ReactionWrite::Replace { event, from } => {
            let result = sqlx::query(
                r#"
                UPDATE reactions
                SET kind_id = $3, username = $4, created_at = $5
                WHERE post_id = $1 AND user_id = $2 AND kind_id = $6
                "#,
            )
            .bind(event.post_id.into_inner())
            .bind(event.user_id.into_inner())
            .bind(event.kind_id.into_inner())
            .bind(&event.username)
            .bind(event.created_at)
            .bind(from.into_inner())
            .execute(conn)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(reaction_conflict(event.post_id, event.user_id));
            }
        }
        ReactionWrite::Delete { post_id, user_id, from } => {
            let result = sqlx::query(
                r#"
                DELETE FROM reactions WHERE post_id = $1 AND user_id = $2 AND kind_id = $3
                "#,
            )
            .bind(post_id.into_inner())
            .bind(user_id.into_inner())
            .bind(from.into_inner())
            .execute(conn)
            .await
            .map_err(map_db_error)?;

            if result.rows_affected() == 0 {
                return Err(reaction_conflict(*post_id, *user_id));
            }
        }
    }

    Ok(())
}

/// Move the running totals by a delta
async fn apply_delta(conn: &mut PgConnection, delta: &ScoreDelta) -> RepoResult<()> {
    sqlx::query(
        r#"
        UPDATE posts SET post_reaction_score = post_reaction_score + $2 WHERE post_id = $1
        "#,
    )
    .bind(delta.post_id.into_inner())
    .bind(delta.delta)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    if let Some(topic_id) = delta.topic_id {
        sqlx::query(
            r#"
            UPDATE topics SET topic_reaction_score = topic_reaction_score + $2 WHERE topic_id = $1
            "#,
        )
        .bind(topic_id.into_inner())
        .bind(delta.delta)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;
    }

    // Unmaterialized scores are recomputed on read
    sqlx::query(
        r#"
        UPDATE users
        SET user_reaction_score = user_reaction_score + $2
        WHERE user_id = $1 AND user_reaction_score IS NOT NULL
        "#,
    )
    .bind(delta.poster_id.into_inner())
    .bind(delta.delta)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

/// Overwrite post scores and mirror first posts onto their topics
pub(super) async fn store_scores(conn: &mut PgConnection, scores: &[PostScore]) -> RepoResult<()> {
    for score in scores {
        sqlx::query(
            r#"
            UPDATE posts SET post_reaction_score = $2 WHERE post_id = $1
            "#,
        )
        .bind(score.post_id.into_inner())
        .bind(score.score)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"
            UPDATE topics SET topic_reaction_score = $2 WHERE topic_first_post_id = $1
            "#,
        )
        .bind(score.post_id.into_inner())
        .bind(score.score)
        .execute(&mut *conn)
        .await
        .map_err(map_db_error)?;
    }

    let post_ids: Vec<Id> = scores.iter().map(|s| s.post_id).collect();

    sqlx::query(
        r#"
        UPDATE users
        SET user_reaction_score = NULL
        WHERE user_id IN (SELECT poster_id FROM posts WHERE post_id = ANY($1))
        "#,
    )
    .bind(id_array(&post_ids))
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

#[async_trait]
impl LedgerRepository for PgLedgerRepository {
    #[instrument(skip(self))]
    async fn post_context(&self, post_id: Id) -> RepoResult<Option<PostContext>> {
        let result = sqlx::query_as::<_, PostContextModel>(
            r#"
            SELECT p.post_id, p.topic_id, p.forum_id, p.poster_id,
                   t.topic_first_post_id, u.user_reaction_score,
                   p.post_reaction_score, p.post_visibility, p.post_reported, p.post_text
            FROM posts p
            LEFT JOIN topics t ON t.topic_id = p.topic_id
            LEFT JOIN users u ON u.user_id = p.poster_id
            WHERE p.post_id = $1
            "#,
        )
        .bind(post_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(PostContext::from))
    }

    #[instrument(skip(self))]
    async fn commit(&self, write: &ReactionWrite, delta: &ScoreDelta) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        write_event(&mut tx, write).await?;

        if !delta.is_zero() {
            apply_delta(&mut tx, delta).await?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, scores), fields(count = scores.len()))]
    async fn store_post_scores(&self, scores: &[PostScore]) -> RepoResult<()> {
        if scores.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        store_scores(&mut tx, scores).await?;
        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, purge), fields(users = purge.user_ids.len()))]
    async fn purge_users(&self, purge: &UserPurge) -> RepoResult<u64> {
        if purge.user_ids.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let deleted = sqlx::query(
            r#"
            DELETE FROM reactions WHERE user_id = ANY($1)
            "#,
        )
        .bind(id_array(&purge.user_ids))
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        if !purge.rescored.is_empty() {
            store_scores(&mut tx, &purge.rescored).await?;
        }

        if let Some(notification_type) = &purge.drop_notifications {
            sqlx::query(
                r#"
                DELETE FROM reaction_notifications
                WHERE notification_type = $1 AND recipient_id = ANY($2)
                "#,
            )
            .bind(notification_type)
            .bind(id_array(&purge.user_ids))
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        debug!(deleted, "Purged user reactions");
        Ok(deleted)
    }

    #[instrument(skip(self, purge), fields(posts = purge.post_ids.len()))]
    async fn purge_posts(&self, purge: &PostPurge) -> RepoResult<PurgedRows> {
        if purge.post_ids.is_empty() {
            return Ok(PurgedRows::default());
        }

        let post_ids = id_array(&purge.post_ids);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            UPDATE users
            SET user_reaction_score = NULL
            WHERE user_id IN (SELECT poster_id FROM posts WHERE post_id = ANY($1))
            "#,
        )
        .bind(post_ids.as_slice())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        let reactions = sqlx::query(
            r#"
            DELETE FROM reactions WHERE post_id = ANY($1)
            "#,
        )
        .bind(post_ids.as_slice())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        let mut notifications = 0;
        if let Some(notification_type) = &purge.drop_notifications {
            notifications = sqlx::query(
                r#"
                DELETE FROM reaction_notifications
                WHERE notification_type = $1 AND item_id = ANY($2)
                "#,
            )
            .bind(notification_type)
            .bind(post_ids.as_slice())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?
            .rows_affected();
        }

        tx.commit().await.map_err(map_db_error)?;

        debug!(reactions, notifications, "Purged post reactions");
        Ok(PurgedRows {
            reactions,
            notifications,
        })
    }
}
