//! PostgreSQL implementation of NotificationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use reactions_core::entities::{NewNotification, NotificationKey, NotificationRecord};
use reactions_core::error::DomainError;
use reactions_core::traits::{NotificationRepository, RepoResult};
use reactions_core::value_objects::Id;

use crate::mappers::{id_array, NotificationInsert};
use crate::models::NotificationModel;

use super::error::map_db_error;

/// PostgreSQL implementation of NotificationRepository
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new PgNotificationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    #[instrument(skip(self))]
    async fn find_open_since(
        &self,
        key: &NotificationKey,
        since: DateTime<Utc>,
    ) -> RepoResult<Option<NotificationRecord>> {
        let result = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, notification_type, item_id, item_parent_id, recipient_id,
                   user_ids, resume, is_read, created_at
            FROM reaction_notifications
            WHERE notification_type = $1 AND item_id = $2 AND item_parent_id = $3
              AND created_at >= $4
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(&key.notification_type)
        .bind(key.item_id.into_inner())
        .bind(key.item_parent_id.into_inner())
        .bind(since)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(NotificationRecord::from))
    }

    #[instrument(skip(self))]
    async fn find_latest(&self, key: &NotificationKey) -> RepoResult<Option<NotificationRecord>> {
        let result = sqlx::query_as::<_, NotificationModel>(
            r#"
            SELECT id, notification_type, item_id, item_parent_id, recipient_id,
                   user_ids, resume, is_read, created_at
            FROM reaction_notifications
            WHERE notification_type = $1 AND item_id = $2 AND item_parent_id = $3
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(&key.notification_type)
        .bind(key.item_id.into_inner())
        .bind(key.item_parent_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(NotificationRecord::from))
    }

    #[instrument(skip(self))]
    async fn create(&self, notification: &NewNotification) -> RepoResult<NotificationRecord> {
        let insert = NotificationInsert::new(notification);

        let model = sqlx::query_as::<_, NotificationModel>(
            r#"
            INSERT INTO reaction_notifications
                (notification_type, item_id, item_parent_id, recipient_id, user_ids, resume, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, notification_type, item_id, item_parent_id, recipient_id,
                      user_ids, resume, is_read, created_at
            "#,
        )
        .bind(insert.notification_type)
        .bind(insert.item_id)
        .bind(insert.item_parent_id)
        .bind(insert.recipient_id)
        .bind(insert.user_ids)
        .bind(insert.resume)
        .bind(notification.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(model.into())
    }

    #[instrument(skip(self))]
    async fn update(&self, record: &NotificationRecord) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE reaction_notifications
            SET user_ids = $2, resume = $3, created_at = $4, is_read = $5
            WHERE id = $1
            "#,
        )
        .bind(record.id.into_inner())
        .bind(id_array(&record.user_ids))
        .bind(&record.resume)
        .bind(record.created_at)
        .bind(record.read)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InternalError(format!(
                "notification {} vanished during update",
                record.id
            )));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Id) -> RepoResult<()> {
        sqlx::query(
            r#"
            DELETE FROM reaction_notifications WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_items(&self, notification_type: &str, item_ids: &[Id]) -> RepoResult<u64> {
        if item_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            DELETE FROM reaction_notifications
            WHERE notification_type = $1 AND item_id = ANY($2)
            "#,
        )
        .bind(notification_type)
        .bind(id_array(item_ids))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_by_recipients(
        &self,
        notification_type: &str,
        user_ids: &[Id],
    ) -> RepoResult<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r#"
            DELETE FROM reaction_notifications
            WHERE notification_type = $1 AND recipient_id = ANY($2)
            "#,
        )
        .bind(notification_type)
        .bind(id_array(user_ids))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
