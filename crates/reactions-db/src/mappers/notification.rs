//! Notification entity <-> model mapper

use reactions_core::entities::{NewNotification, NotificationKey, NotificationRecord};
use reactions_core::value_objects::Id;

use crate::models::NotificationModel;

/// Convert NotificationModel to NotificationRecord entity
impl From<NotificationModel> for NotificationRecord {
    fn from(model: NotificationModel) -> Self {
        NotificationRecord {
            id: Id::new(model.id),
            key: NotificationKey::new(
                model.notification_type,
                Id::new(model.item_id),
                Id::new(model.item_parent_id),
            ),
            recipient_id: Id::new(model.recipient_id),
            created_at: model.created_at,
            user_ids: model.user_ids.into_iter().map(Id::new).collect(),
            resume: model.resume,
            read: model.is_read,
        }
    }
}

/// Raw ids for binding to a `BIGINT[]` column
pub fn id_array(ids: &[Id]) -> Vec<i64> {
    ids.iter().map(|id| id.into_inner()).collect()
}

/// Convert NewNotification to values for database insertion
pub struct NotificationInsert<'a> {
    pub notification_type: &'a str,
    pub item_id: i64,
    pub item_parent_id: i64,
    pub recipient_id: i64,
    pub user_ids: Vec<i64>,
    pub resume: &'a str,
}

impl<'a> NotificationInsert<'a> {
    pub fn new(notification: &'a NewNotification) -> Self {
        Self {
            notification_type: &notification.key.notification_type,
            item_id: notification.key.item_id.into_inner(),
            item_parent_id: notification.key.item_parent_id.into_inner(),
            recipient_id: notification.recipient_id.into_inner(),
            user_ids: id_array(&notification.user_ids),
            resume: &notification.resume,
        }
    }
}
