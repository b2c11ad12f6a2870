//! Notification service
//!
//! Folds every reactor of a post into one notification per calendar day.
//! A record stays open until the day bucket rolls over; later reactions
//! start a new record.

use tracing::{debug, info, instrument};

use reactions_core::entities::{make_resume, NewNotification};
use reactions_core::{Id, NotificationKey, NotificationKind, NotificationRecord, NotificationTitle};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Name shown for contributors whose account is gone
pub const DELETED_USER_NAME: &str = "Anonymous";

/// Notification service
pub struct NotificationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> NotificationService<'a> {
    /// Create a new NotificationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record `contributor` on today's notification about an item, opening
    /// a new one when there is none yet
    #[instrument(skip(self, kind, resume), fields(kind = kind.name))]
    pub async fn add(
        &self,
        kind: &NotificationKind,
        item_id: Id,
        item_parent_id: Id,
        contributor: Id,
        recipient: Id,
        resume: &str,
    ) -> ServiceResult<NotificationRecord> {
        let repo = self.ctx.notification_repo();
        let now = self.ctx.now();
        let key = NotificationKey::new(kind.name, item_id, item_parent_id);

        if kind.allow_multiple_users {
            let since = self.ctx.config().day_bucket().start_of_day(now);

            if let Some(mut record) = repo.find_open_since(&key, since).await? {
                if record.add_contributor(contributor) {
                    record.read = false;
                    debug!(
                        notification_id = %record.id,
                        contributors = record.user_ids.len(),
                        "Contributor added to notification"
                    );
                }
                record.created_at = now;
                record.resume = resume.to_string();
                repo.update(&record).await?;

                return Ok(record);
            }
        }

        let record = repo
            .create(&NewNotification {
                key,
                recipient_id: recipient,
                created_at: now,
                user_ids: vec![contributor],
                resume: resume.to_string(),
            })
            .await?;

        info!(notification_id = %record.id, recipient_id = %recipient, "Notification created");
        Ok(record)
    }

    /// Take `contributor` off the latest notification about an item; the
    /// record goes away with its last contributor
    #[instrument(skip(self, kind), fields(kind = kind.name))]
    pub async fn remove(
        &self,
        kind: &NotificationKind,
        item_id: Id,
        item_parent_id: Id,
        contributor: Id,
    ) -> ServiceResult<()> {
        let repo = self.ctx.notification_repo();
        let key = NotificationKey::new(kind.name, item_id, item_parent_id);

        let Some(mut record) = repo.find_latest(&key).await? else {
            return Ok(());
        };

        if !record.remove_contributor(contributor) {
            return Ok(());
        }

        if record.has_contributors() {
            repo.update(&record).await?;
            debug!(notification_id = %record.id, "Contributor removed from notification");
        } else {
            repo.delete(record.id).await?;
            debug!(notification_id = %record.id, "Notification deleted");
        }

        Ok(())
    }

    /// Drop notifications about the given items
    #[instrument(skip(self, kind), fields(kind = kind.name))]
    pub async fn delete_for_items(&self, kind: &NotificationKind, item_ids: &[Id]) -> ServiceResult<u64> {
        Ok(self
            .ctx
            .notification_repo()
            .delete_by_items(kind.name, item_ids)
            .await?)
    }

    /// Drop notifications addressed to the given users
    #[instrument(skip(self, kind), fields(kind = kind.name))]
    pub async fn delete_for_recipients(
        &self,
        kind: &NotificationKind,
        user_ids: &[Id],
    ) -> ServiceResult<u64> {
        Ok(self
            .ctx
            .notification_repo()
            .delete_by_recipients(kind.name, user_ids)
            .await?)
    }

    /// Short plain-text excerpt of a post
    pub fn resume(text: &str) -> String {
        make_resume(text)
    }

    /// Title of a notification with its contributors' current names
    #[instrument(skip(self, kind, record), fields(notification_id = %record.id))]
    pub async fn title(
        &self,
        kind: &NotificationKind,
        record: &NotificationRecord,
    ) -> ServiceResult<NotificationTitle> {
        let names = self.ctx.user_repo().usernames(&record.user_ids).await?;

        Ok(NotificationTitle::build(kind, &record.user_ids, |id| {
            names
                .get(&id)
                .cloned()
                .unwrap_or_else(|| DELETED_USER_NAME.to_string())
        }))
    }
}
