//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::instrument;

use reactions_core::traits::{RepoResult, UserRepository};
use reactions_core::value_objects::Id;

use crate::mappers::id_array;
use crate::models::{UserScoreModel, UsernameModel};

use super::error::map_db_error;

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn usernames(&self, user_ids: &[Id]) -> RepoResult<HashMap<Id, String>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, UsernameModel>(
            r#"
            SELECT user_id, username FROM users WHERE user_id = ANY($1)
            "#,
        )
        .bind(id_array(user_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (Id::new(row.user_id), row.username))
            .collect())
    }

    #[instrument(skip(self))]
    async fn stored_scores(&self, user_ids: &[Id]) -> RepoResult<HashMap<Id, Option<i64>>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, UserScoreModel>(
            r#"
            SELECT user_id, user_reaction_score AS score FROM users WHERE user_id = ANY($1)
            "#,
        )
        .bind(id_array(user_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (Id::new(row.user_id), row.score))
            .collect())
    }

    #[instrument(skip(self))]
    async fn sum_post_scores(&self, user_ids: &[Id]) -> RepoResult<HashMap<Id, i64>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        // Users without posts sum to zero
        let rows = sqlx::query_as::<_, UserScoreModel>(
            r#"
            SELECT u.user_id, COALESCE(SUM(p.post_reaction_score), 0)::BIGINT AS score
            FROM users u
            LEFT JOIN posts p ON p.poster_id = u.user_id
            WHERE u.user_id = ANY($1)
            GROUP BY u.user_id
            "#,
        )
        .bind(id_array(user_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| (Id::new(row.user_id), row.score.unwrap_or(0)))
            .collect())
    }

    #[instrument(skip(self))]
    async fn set_scores(&self, scores: &[(Id, i64)]) -> RepoResult<()> {
        if scores.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for (user_id, score) in scores {
            sqlx::query(
                r#"
                UPDATE users SET user_reaction_score = $2 WHERE user_id = $1
                "#,
            )
            .bind(user_id.into_inner())
            .bind(score)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
