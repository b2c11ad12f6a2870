//! In-memory catalog of reaction kinds

use std::collections::HashMap;

use super::ReactionKind;
use crate::value_objects::Id;

static EMPTY_KIND: ReactionKind = ReactionKind::EMPTY;

/// Reaction kinds of the board, in display order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    kinds: Vec<ReactionKind>,
    positions: HashMap<Id, usize>,
}

impl Catalog {
    /// Build a catalog; kinds are ordered by `order`, then id
    pub fn new(mut kinds: Vec<ReactionKind>) -> Self {
        kinds.sort_by_key(|k| (k.order, k.id));
        let positions = kinds
            .iter()
            .enumerate()
            .map(|(pos, kind)| (kind.id, pos))
            .collect();
        Self { kinds, positions }
    }

    /// Look up a kind; unknown ids yield the disabled sentinel
    pub fn get(&self, id: Id) -> &ReactionKind {
        self.positions
            .get(&id)
            .map_or(&EMPTY_KIND, |&pos| &self.kinds[pos])
    }

    /// Look up an optional kind (`None` yields the sentinel)
    pub fn get_opt(&self, id: Option<Id>) -> &ReactionKind {
        id.map_or(&EMPTY_KIND, |id| self.get(id))
    }

    /// Score of an optional kind; missing kinds score zero
    pub fn score_of(&self, id: Option<Id>) -> i64 {
        self.get_opt(id).score_value()
    }

    /// Score change when a reaction moves from `old` to `new`
    pub fn delta(&self, old: Option<Id>, new: Option<Id>) -> i64 {
        self.score_of(new) - self.score_of(old)
    }

    pub fn contains(&self, id: Id) -> bool {
        self.positions.contains_key(&id)
    }

    /// All kinds in display order
    pub fn all(&self) -> &[ReactionKind] {
        &self.kinds
    }

    /// Enabled kinds in display order
    pub fn enabled(&self) -> impl Iterator<Item = &ReactionKind> {
        self.kinds.iter().filter(|k| k.enabled)
    }

    /// Ids of kinds currently disabled
    pub fn disabled_ids(&self) -> Vec<Id> {
        self.kinds
            .iter()
            .filter(|k| !k.enabled)
            .map(|k| k.id)
            .collect()
    }

    /// Display position of a kind
    pub fn position(&self, id: Id) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
