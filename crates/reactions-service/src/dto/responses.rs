//! Response DTOs returned by the services
//!
//! All response DTOs implement `Serialize` so the host can hand them to its
//! templates or encode them as JSON.

use serde::Serialize;

use reactions_core::{Id, ReactionKind, ScoreSummary};

// ============================================================================
// Reaction Responses
// ============================================================================

/// Result of adding, changing or removing a reaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionOutcome {
    pub post_id: Id,
    /// The acting user's kind on the post afterwards
    pub mine: Option<Id>,
    /// Score change applied to the post
    pub delta: i64,
    /// Refreshed score list, when the viewer may see it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScoreSummary>,
}

// ============================================================================
// Hook Responses
// ============================================================================

/// Client options of the reaction widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetOptions {
    pub allow_change: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_kind: Option<Id>,
    /// Counts only, no names
    pub simple_list: bool,
}

/// Reaction state of one rendered post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRow {
    pub post_id: Id,
    /// The viewer may react to this post
    pub can_use: bool,
    /// The viewer's kind on this post, when it is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mine: Option<Id>,
    pub has_mine: bool,
    /// Attachments stay hidden until the viewer reacts
    pub hide_attachments: bool,
    /// Poster's cumulative score, when scores show on profiles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ScoreSummary>,
}

/// Reaction data of a topic page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicView {
    /// Enabled kinds offered by the widget, in display order
    pub kinds: Vec<ReactionKind>,
    pub options: WidgetOptions,
    pub rows: Vec<TopicRow>,
}

impl TopicView {
    /// View of a page where reactions are off
    pub fn disabled() -> Self {
        Self {
            kinds: Vec::new(),
            options: WidgetOptions {
                allow_change: false,
                default_kind: None,
                simple_list: true,
            },
            rows: Vec::new(),
        }
    }

    pub fn row(&self, post_id: Id) -> Option<&TopicRow> {
        self.rows.iter().find(|row| row.post_id == post_id)
    }
}

/// Reaction statistics of a profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileReactions {
    pub user_id: Id,
    /// Reactions the user has given
    pub total_reactions: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

/// A sort option of a forum or topic listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortOption {
    pub key: String,
    pub label: String,
    /// Columns to order by, most significant first
    pub columns: Vec<String>,
    /// Whether the listing query must join the users table
    pub join_users: bool,
}

/// Result of the user deletion hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsersPurged {
    pub reactions_removed: u64,
    pub posts_rescored: usize,
}

/// Result of the post deletion hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostsPurged {
    pub reactions_removed: u64,
    pub notifications_removed: u64,
}
