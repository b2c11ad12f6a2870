//! Read models built from a post's reactions: the score summary and the reactor listing

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::{Catalog, ListOrder, PostReactions, ReactionCount, Reactor};
use crate::value_objects::Id;

/// Most names shown in a score summary
const SUMMARY_NAMES: usize = 2;

/// The viewer a read model is built for
#[derive(Debug, Clone, Copy)]
pub struct ViewerRef<'a> {
    pub user_id: Id,
    pub username: &'a str,
    /// False in anonymous mode for non-moderators
    pub can_view_names: bool,
}

/// Label of a score summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryLabel {
    /// "N users have reacted"
    Anonymous { count: usize },
    /// "A, B"
    Simple { names: Vec<String> },
    /// "A, B and another N users"
    Count { names: Vec<String>, others: usize },
}

impl fmt::Display for SummaryLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous { count: 1 } => write!(f, "1 user has reacted"),
            Self::Anonymous { count } => write!(f, "{count} users have reacted"),
            Self::Simple { names } => write!(f, "{}", names.join(", ")),
            Self::Count { names, others: 1 } => {
                write!(f, "{} and another user", names.join(", "))
            }
            Self::Count { names, others } => {
                write!(f, "{} and another {others} users", names.join(", "))
            }
        }
    }
}

/// Per-post score list: counts per enabled kind plus the most relevant reactors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub post_id: Id,
    pub kinds: Vec<ReactionCount>,
    pub label: SummaryLabel,
    pub total: usize,
}

impl ScoreSummary {
    /// Summarize a post's reactions; the viewer's own name always comes first
    pub fn build(catalog: &Catalog, reactions: &PostReactions, viewer: ViewerRef<'_>) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(SUMMARY_NAMES);

        if catalog.get_opt(reactions.mine).is_enabled() {
            names.push(viewer.username.to_string());
        }

        let mut kinds = Vec::new();
        for kind in catalog.enabled() {
            let Some(reactors) = reactions.reactors_of(kind.id) else {
                continue;
            };

            kinds.push(ReactionCount {
                kind_id: kind.id,
                title: kind.title.clone(),
                count: reactors.len(),
                me: reactions.mine == Some(kind.id),
            });

            names.extend(
                reactors
                    .iter()
                    .filter(|r| r.user_id != viewer.user_id)
                    .take(SUMMARY_NAMES.saturating_sub(names.len()))
                    .map(|r| r.username.clone())
                    .collect::<Vec<_>>(),
            );
        }

        let total = reactions.total;
        let label = if !viewer.can_view_names {
            SummaryLabel::Anonymous { count: total }
        } else if total < 3 {
            SummaryLabel::Simple { names }
        } else if total == 3 {
            SummaryLabel::Count { names, others: 1 }
        } else {
            let others = total.saturating_sub(names.len());
            SummaryLabel::Count { names, others }
        };

        Self {
            post_id: reactions.post_id,
            kinds,
            label,
            total,
        }
    }
}

/// A row of the reactor listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub post_id: Id,
    pub user_id: Id,
    pub username: String,
    pub kind_id: Id,
    pub created_at: DateTime<Utc>,
    pub can_delete: bool,
}

/// A tab of the reactor listing; `kind_id == None` is the "All" tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingTab {
    pub kind_id: Option<Id>,
    pub title: String,
    pub color: String,
    pub image: String,
    pub active: bool,
    pub rows: Vec<ListingRow>,
}

impl ListingTab {
    pub fn count(&self) -> usize {
        self.rows.len()
    }
}

/// Everyone who reacted to a post, grouped in tabs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReactionListing {
    pub post_id: Id,
    /// False when names are hidden from the viewer
    pub show_names: bool,
    pub tabs: Vec<ListingTab>,
}

impl ReactionListing {
    /// Build the listing; only tabs with rows are kept
    pub fn build<F>(
        catalog: &Catalog,
        reactions: &PostReactions,
        order: ListOrder,
        active: Option<Id>,
        show_names: bool,
        mut can_delete: F,
    ) -> Self
    where
        F: FnMut(&Reactor) -> bool,
    {
        let active = active.filter(Id::is_valid);

        let mut all: Vec<(Id, Reactor)> = reactions
            .by_kind
            .iter()
            .filter(|k| catalog.get(k.kind_id).is_enabled())
            .flat_map(|k| k.reactors.iter().map(move |r| (k.kind_id, r.clone())))
            .collect();

        order.sort_by(&mut all, |(_, r)| r);

        let rows: Vec<ListingRow> = all
            .into_iter()
            .map(|(kind_id, r)| ListingRow {
                post_id: reactions.post_id,
                can_delete: can_delete(&r),
                user_id: r.user_id,
                username: r.username,
                kind_id,
                created_at: r.created_at,
            })
            .collect();

        let mut tabs = vec![ListingTab {
            kind_id: None,
            title: "REACTIONS_ALL".to_string(),
            color: String::new(),
            image: String::new(),
            active: active.is_none(),
            rows: rows.clone(),
        }];

        tabs.extend(catalog.enabled().map(|kind| ListingTab {
            kind_id: Some(kind.id),
            title: kind.title.clone(),
            color: kind.color.clone(),
            image: kind.image.clone(),
            active: active == Some(kind.id),
            rows: rows.iter().filter(|r| r.kind_id == kind.id).cloned().collect(),
        }));

        tabs.retain(|tab| tab.count() > 0);

        Self {
            post_id: reactions.post_id,
            show_names,
            tabs,
        }
    }
}
