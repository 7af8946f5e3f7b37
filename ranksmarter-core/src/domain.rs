//! Domain types: scored items, ranked lists, rank ranges.

use serde::{Deserialize, Serialize};

/// A single cleaned (item, score) pair.
///
/// `item` is non-empty and trimmed; `score` is finite. Construct through the
/// normalizer rather than by hand when the input is untrusted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub item: String,
    pub score: f64,
}

impl ScoredItem {
    pub fn new(item: impl Into<String>, score: f64) -> Self {
        Self {
            item: item.into(),
            score,
        }
    }
}

/// Items sorted by score descending. Equal scores keep their input order.
///
/// Ranks are 1-indexed throughout the public API: rank `r` lives at
/// position `r - 1` of the underlying vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankedList(Vec<ScoredItem>);

impl RankedList {
    /// Wrap a vector that is already sorted descending.
    ///
    /// Only the ranker and deserialization should need this; callers with
    /// unsorted data go through [`crate::rank::rank`].
    pub(crate) fn from_sorted(items: Vec<ScoredItem>) -> Self {
        debug_assert!(items.windows(2).all(|w| w[0].score >= w[1].score));
        Self(items)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn items(&self) -> &[ScoredItem] {
        &self.0
    }

    /// Item at a 1-indexed rank.
    pub fn at_rank(&self, rank: usize) -> Option<&ScoredItem> {
        rank.checked_sub(1).and_then(|i| self.0.get(i))
    }

    /// Score difference between positions `i` and `i + 1` (0-indexed).
    ///
    /// Never negative on a correctly sorted list.
    pub fn gap_after(&self, i: usize) -> f64 {
        self.0[i].score - self.0[i + 1].score
    }

    /// Iterate with 1-indexed ranks.
    pub fn ranked(&self) -> impl Iterator<Item = (usize, &ScoredItem)> {
        self.0.iter().enumerate().map(|(i, s)| (i + 1, s))
    }
}

/// Inclusive 1-indexed rank interval. Empty when `to_rank < from_rank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankRange {
    pub from_rank: usize,
    pub to_rank: usize,
}

impl RankRange {
    pub fn new(from_rank: usize, to_rank: usize) -> Self {
        Self { from_rank, to_rank }
    }

    pub fn is_empty(&self) -> bool {
        self.to_rank < self.from_rank
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.to_rank - self.from_rank + 1
        }
    }

    pub fn contains(&self, rank: usize) -> bool {
        !self.is_empty() && rank >= self.from_rank && rank <= self.to_rank
    }
}
