//! Reaction event entity - one user's reaction of one kind to one post

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Id;

/// Reaction event entity; unique per (post_id, user_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionEvent {
    pub post_id: Id,
    pub topic_id: Option<Id>,
    pub poster_id: Id,
    pub user_id: Id,
    /// Reactor's username at reaction time, kept in sync on rename
    pub username: String,
    pub kind_id: Id,
    pub created_at: DateTime<Utc>,
}

impl ReactionEvent {
    /// Create a new ReactionEvent
    pub fn new(
        post_id: Id,
        poster_id: Id,
        user_id: Id,
        username: impl Into<String>,
        kind_id: Id,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            post_id,
            topic_id: None,
            poster_id,
            user_id,
            username: username.into(),
            kind_id,
            created_at,
        }
    }

    /// Attach the topic the post belongs to
    pub fn in_topic(mut self, topic_id: Id) -> Self {
        self.topic_id = Some(topic_id);
        self
    }

    /// Check if reaction uses a specific kind
    #[inline]
    pub fn is_kind(&self, kind_id: Id) -> bool {
        self.kind_id == kind_id
    }

    /// The reactor entry shown in lists
    pub fn reactor(&self) -> Reactor {
        Reactor {
            user_id: self.user_id,
            username: self.username.clone(),
            created_at: self.created_at,
        }
    }
}

/// A user listed under a reaction kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactor {
    pub user_id: Id,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// Display order of reactor lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListOrder {
    /// Reaction time, oldest first
    #[default]
    Time,
    /// Case-normalized username, ascending
    Username,
}

impl ListOrder {
    /// Sort reactors in place; ties keep their existing order
    pub fn sort(&self, reactors: &mut [Reactor]) {
        self.sort_by(reactors, |r| r);
    }

    /// Sort items carrying a reactor, by that reactor
    pub fn sort_by<T, F>(&self, items: &mut [T], reactor: F)
    where
        F: Fn(&T) -> &Reactor,
    {
        match self {
            Self::Time => items.sort_by_key(|item| reactor(item).created_at),
            Self::Username => {
                items.sort_by_cached_key(|item| clean_username(&reactor(item).username))
            }
        }
    }
}

impl std::str::FromStr for ListOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "time" | "1" => Ok(Self::Time),
            "username" | "2" => Ok(Self::Username),
            _ => Err(format!("Invalid list order: {s}")),
        }
    }
}

/// Case-normalized username used for ordering
pub fn clean_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Reactors of a single kind on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindReactors {
    pub kind_id: Id,
    pub reactors: Vec<Reactor>,
}

impl KindReactors {
    pub fn count(&self) -> usize {
        self.reactors.len()
    }
}

/// Active reactions of one post, partitioned by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostReactions {
    pub post_id: Id,
    /// Partitions in catalog display order
    pub by_kind: Vec<KindReactors>,
    /// The viewer's reaction kind, if any
    pub mine: Option<Id>,
    /// Number of reactions across all listed kinds
    pub total: usize,
}

impl PostReactions {
    /// A post without reactions
    pub fn empty(post_id: Id) -> Self {
        Self {
            post_id,
            by_kind: Vec::new(),
            mine: None,
            total: 0,
        }
    }

    /// Reactors of a kind, if the kind has any on this post
    pub fn reactors_of(&self, kind_id: Id) -> Option<&[Reactor]> {
        self.by_kind
            .iter()
            .find(|k| k.kind_id == kind_id)
            .map(|k| k.reactors.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Aggregated reaction count for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionCount {
    pub kind_id: Id,
    pub title: String,
    pub count: usize,
    pub me: bool,
}
