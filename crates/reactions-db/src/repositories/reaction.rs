//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use reactions_core::entities::ReactionEvent;
use reactions_core::traits::{ReactionRepository, RepoResult};
use reactions_core::value_objects::Id;

use crate::mappers::id_array;
use crate::models::ReactionModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn find(&self, post_id: Id, user_id: Id) -> RepoResult<Option<ReactionEvent>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT post_id, topic_id, poster_id, user_id, username, kind_id, created_at
            FROM reactions
            WHERE post_id = $1 AND user_id = $2
            "#,
        )
        .bind(post_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ReactionEvent::from))
    }

    #[instrument(skip(self))]
    async fn find_by_posts(
        &self,
        post_ids: &[Id],
        excluded_kinds: &[Id],
    ) -> RepoResult<Vec<ReactionEvent>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT post_id, topic_id, poster_id, user_id, username, kind_id, created_at
            FROM reactions
            WHERE post_id = ANY($1) AND NOT (kind_id = ANY($2))
            ORDER BY created_at, user_id
            "#,
        )
        .bind(id_array(post_ids))
        .bind(id_array(excluded_kinds))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ReactionEvent::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_post_ids_by_users(&self, user_ids: &[Id]) -> RepoResult<Vec<Id>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT post_id
            FROM reactions
            WHERE user_id = ANY($1)
            ORDER BY post_id
            "#,
        )
        .bind(id_array(user_ids))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Id::new).collect())
    }

    #[instrument(skip(self))]
    async fn find_post_ids_by_kind(&self, kind_id: Id) -> RepoResult<Vec<Id>> {
        let results = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT DISTINCT post_id
            FROM reactions
            WHERE kind_id = $1
            ORDER BY post_id
            "#,
        )
        .bind(kind_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Id::new).collect())
    }

    #[instrument(skip(self))]
    async fn count_by_user(&self, user_id: Id) -> RepoResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM reactions WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(count)
    }

    #[instrument(skip(self))]
    async fn rename_user(&self, old_name: &str, new_name: &str) -> RepoResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE reactions SET username = $2 WHERE username = $1
            "#,
        )
        .bind(old_name)
        .bind(new_name)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
