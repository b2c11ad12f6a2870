//! Reaction kind entity - a configured category of reaction ("Like", "Angry", ...)

use serde::{Deserialize, Serialize};

use crate::value_objects::Id;

/// Reaction kind entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionKind {
    pub id: Id,
    /// Localizable title key
    pub title: String,
    /// CSS color, empty when unset
    pub color: String,
    /// Asset path of the image, empty when unset
    pub image: String,
    pub score: i32,
    pub enabled: bool,
    /// Display position, ascending
    pub order: i32,
}

impl ReactionKind {
    /// Sentinel returned for unknown kinds: no data, disabled, zero score
    pub const EMPTY: ReactionKind = ReactionKind {
        id: Id::NONE,
        title: String::new(),
        color: String::new(),
        image: String::new(),
        score: 0,
        enabled: false,
        order: 0,
    };

    /// Create a new enabled ReactionKind
    pub fn new(id: Id, title: impl Into<String>, score: i32, order: i32) -> Self {
        Self {
            id,
            title: title.into(),
            color: String::new(),
            image: String::new(),
            score,
            enabled: true,
            order,
        }
    }

    /// Whether this is a real kind rather than the sentinel
    #[inline]
    pub fn has_data(&self) -> bool {
        self.id.is_valid()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.has_data() && self.enabled
    }

    /// Score contribution as a ledger delta
    #[inline]
    pub fn score_value(&self) -> i64 {
        i64::from(self.score)
    }
}
