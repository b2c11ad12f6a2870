//! Notification database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for reaction_notifications table
#[derive(Debug, Clone, FromRow)]
pub struct NotificationModel {
    pub id: i64,
    pub notification_type: String,
    pub item_id: i64,
    pub item_parent_id: i64,
    pub recipient_id: i64,
    pub user_ids: Vec<i64>,
    pub resume: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
