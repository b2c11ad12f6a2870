//! Notification record entity - one coalesced notification to a post author

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Id;

/// Contributors named explicitly in a title once the list is trimmed
const NAMED_CONTRIBUTORS: usize = 3;
/// Lists up to this size are shown in full
const FULL_LIST_MAX: usize = 4;
/// Above this many hidden contributors the title says "many others"
const MANY_OTHERS_THRESHOLD: usize = 20;
/// Characters kept in a notification resume
pub const RESUME_LENGTH: usize = 150;

/// A notification type and its coalescing capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationKind {
    pub name: &'static str,
    pub language_key: &'static str,
    pub allow_multiple_users: bool,
}

impl NotificationKind {
    /// Someone reacted to a post you wrote
    pub const REACTION_POST: NotificationKind = NotificationKind {
        name: "reactions.notification.post",
        language_key: "REACTIONS_NOTIFICATION_POST",
        allow_multiple_users: true,
    };
}

/// Identity of a coalescing slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationKey {
    pub notification_type: String,
    pub item_id: Id,
    /// Parent topic, or `Id::NONE`
    pub item_parent_id: Id,
}

impl NotificationKey {
    pub fn new(notification_type: impl Into<String>, item_id: Id, item_parent_id: Id) -> Self {
        Self {
            notification_type: notification_type.into(),
            item_id,
            item_parent_id,
        }
    }
}

/// Stored notification record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Id,
    pub key: NotificationKey,
    pub recipient_id: Id,
    pub created_at: DateTime<Utc>,
    /// Contributors in arrival order, deduplicated
    pub user_ids: Vec<Id>,
    pub resume: String,
    pub read: bool,
}

impl NotificationRecord {
    /// Append a contributor; returns false if already present
    pub fn add_contributor(&mut self, user_id: Id) -> bool {
        if self.user_ids.contains(&user_id) {
            return false;
        }
        self.user_ids.push(user_id);
        true
    }

    /// Remove a contributor; returns false if absent
    pub fn remove_contributor(&mut self, user_id: Id) -> bool {
        let before = self.user_ids.len();
        self.user_ids.retain(|id| *id != user_id);
        self.user_ids.len() != before
    }

    #[inline]
    pub fn has_contributors(&self) -> bool {
        !self.user_ids.is_empty()
    }

    /// Contributors most-recent-first
    pub fn recent_contributors(&self) -> impl Iterator<Item = Id> + '_ {
        self.user_ids.iter().rev().copied()
    }
}

/// Values for inserting a notification record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub key: NotificationKey,
    pub recipient_id: Id,
    pub created_at: DateTime<Utc>,
    pub user_ids: Vec<Id>,
    pub resume: String,
}

/// How the contributors beyond the named ones are summarized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OthersTier {
    /// "N others"
    Count(usize),
    /// "many others"
    Many,
}

/// Collapsed notification title: "A, B and N others have reacted ..."
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationTitle {
    pub language_key: &'static str,
    /// Named contributors, most recent first
    pub names: Vec<String>,
    pub others: Option<OthersTier>,
    /// Total contributors; drives the plural form
    pub total: usize,
}

impl NotificationTitle {
    /// Collapse a contributor list (arrival order) into a title
    pub fn build<F>(kind: &NotificationKind, user_ids: &[Id], mut username: F) -> Self
    where
        F: FnMut(Id) -> String,
    {
        let total = user_ids.len();
        let mut recent: Vec<Id> = user_ids.iter().rev().copied().collect();

        if recent.len() > FULL_LIST_MAX {
            recent.truncate(NAMED_CONTRIBUTORS);
        }

        let hidden = total - recent.len();
        let others = match hidden {
            0 => None,
            n if n > MANY_OTHERS_THRESHOLD => Some(OthersTier::Many),
            n => Some(OthersTier::Count(n)),
        };

        Self {
            language_key: kind.language_key,
            names: recent.into_iter().map(&mut username).collect(),
            others,
            total,
        }
    }

    /// The joined list of names and the others tier: "A, B and 3 others"
    pub fn subject(&self) -> String {
        let mut parts = self.names.clone();
        match self.others {
            Some(OthersTier::Count(1)) => parts.push("1 other".to_string()),
            Some(OthersTier::Count(n)) => parts.push(format!("{n} others")),
            Some(OthersTier::Many) => parts.push("many others".to_string()),
            None => {}
        }
        join_list(&parts)
    }
}

impl fmt::Display for NotificationTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.total == 1 { "has" } else { "have" };
        write!(f, "{} {verb} reacted to a message you posted", self.subject())
    }
}

/// Join items as "A", "A and B", "A, B and C"
pub fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// Plain-text resume of a post, cut on a character boundary
pub fn make_resume(text: &str) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= RESUME_LENGTH {
        return text;
    }
    let cut: String = text.chars().take(RESUME_LENGTH).collect();
    format!("{}...", cut.trim_end())
}
