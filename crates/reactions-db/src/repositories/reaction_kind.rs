//! PostgreSQL implementation of ReactionKindRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use reactions_core::entities::{PostScore, ReactionKind};
use reactions_core::traits::{KindDraft, ReactionKindRepository, RepoResult};
use reactions_core::value_objects::Id;

use crate::mappers::{KindInsert, KindUpdate};
use crate::models::ReactionKindModel;

use super::error::{kind_not_found, map_db_error};
use super::ledger::store_scores;

/// PostgreSQL implementation of ReactionKindRepository
#[derive(Clone)]
pub struct PgReactionKindRepository {
    pool: PgPool,
}

impl PgReactionKindRepository {
    /// Create a new PgReactionKindRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionKindRepository for PgReactionKindRepository {
    #[instrument(skip(self))]
    async fn find_all(&self) -> RepoResult<Vec<ReactionKind>> {
        let results = sqlx::query_as::<_, ReactionKindModel>(
            r#"
            SELECT id, title, color, image, score, enabled, position
            FROM reaction_kinds
            ORDER BY position, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(ReactionKind::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Id) -> RepoResult<Option<ReactionKind>> {
        let result = sqlx::query_as::<_, ReactionKindModel>(
            r#"
            SELECT id, title, color, image, score, enabled, position
            FROM reaction_kinds
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(ReactionKind::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, draft: &KindDraft) -> RepoResult<ReactionKind> {
        let insert = KindInsert::new(draft);

        let model = sqlx::query_as::<_, ReactionKindModel>(
            r#"
            INSERT INTO reaction_kinds (title, color, image, score, enabled, position)
            VALUES ($1, $2, $3, $4, $5,
                    (SELECT COALESCE(MAX(position), 0) + 1 FROM reaction_kinds))
            RETURNING id, title, color, image, score, enabled, position
            "#,
        )
        .bind(insert.title)
        .bind(insert.color)
        .bind(insert.image)
        .bind(insert.score)
        .bind(insert.enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.into())
    }

    #[instrument(skip(self, rescored), fields(rescored = rescored.len()))]
    async fn update(&self, kind: &ReactionKind, rescored: &[PostScore]) -> RepoResult<()> {
        let update = KindUpdate::new(kind);
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let result = sqlx::query(
            r#"
            UPDATE reaction_kinds
            SET title = $2, color = $3, image = $4, score = $5, enabled = $6, position = $7
            WHERE id = $1
            "#,
        )
        .bind(update.id)
        .bind(update.title)
        .bind(update.color)
        .bind(update.image)
        .bind(update.score)
        .bind(update.enabled)
        .bind(update.position)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(map_db_error)?;
            return Err(kind_not_found(kind.id));
        }

        if !rescored.is_empty() {
            store_scores(&mut tx, rescored).await?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, rescored), fields(rescored = rescored.len()))]
    async fn delete(&self, id: Id, rescored: &[PostScore]) -> RepoResult<bool> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let removed = sqlx::query(
            r#"
            DELETE FROM reactions WHERE kind_id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected();

        let result = sqlx::query(
            r#"
            DELETE FROM reaction_kinds WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(false);
        }

        if !rescored.is_empty() {
            store_scores(&mut tx, rescored).await?;
        }

        tx.commit().await.map_err(map_db_error)?;

        debug!(kind_id = %id, removed, "Reaction kind deleted");
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn update_positions(&self, positions: &[(Id, i32)]) -> RepoResult<()> {
        // Use a transaction for bulk position update
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for (kind_id, position) in positions {
            sqlx::query(
                r#"
                UPDATE reaction_kinds
                SET position = $2
                WHERE id = $1
                "#,
            )
            .bind(kind_id.into_inner())
            .bind(position)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
