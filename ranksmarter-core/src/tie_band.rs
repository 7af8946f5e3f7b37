//! Tie-band expander.
//!
//! Two adjacent ranks are indistinguishable at error bound `epsilon` when
//! their gap is at most `2 * epsilon`. Starting from the boundary pair, the
//! band grows greedily in both directions while that holds. Only *adjacent*
//! gaps are tested: the first and last members of a band can be much further
//! apart than `2 * epsilon`.

use serde::{Deserialize, Serialize};

use crate::boundary::can_swap;
use crate::domain::{RankRange, RankedList, ScoredItem};

/// A maximal run of indistinguishable ranks around the cutoff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieBand {
    pub lo_rank: usize,
    pub hi_rank: usize,
    pub size: usize,
    pub items: Vec<ScoredItem>,
}

impl TieBand {
    /// Whether both boundary ranks `k` and `k + 1` lie inside the band.
    pub fn spans_boundary(&self, k: usize) -> bool {
        self.lo_rank <= k && self.hi_rank > k
    }

    pub fn ranks(&self) -> RankRange {
        RankRange::new(self.lo_rank, self.hi_rank)
    }
}

/// Expand the tie band around cutoff `k`, or `None` if the boundary gap
/// already exceeds `2 * epsilon`.
///
/// `k` must be clamped to `[1, n - 1]` and `epsilon` to `>= 0` beforehand.
pub fn expand_tie_band(list: &RankedList, epsilon: f64, k: usize) -> Option<TieBand> {
    let n = list.len();
    if k == 0 || k >= n {
        return None;
    }
    let linked = |i: usize| can_swap(list.gap_after(i), epsilon);

    // 0-indexed positions of ranks k and k + 1.
    let mut lo = k - 1;
    let mut hi = k;
    if !linked(lo) {
        return None;
    }

    while lo > 0 && linked(lo - 1) {
        lo -= 1;
    }
    while hi < n - 1 && linked(hi) {
        hi += 1;
    }

    Some(TieBand {
        lo_rank: lo + 1,
        hi_rank: hi + 1,
        size: hi - lo + 1,
        items: list.items()[lo..=hi].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::rank;

    fn scenario() -> RankedList {
        rank(vec![
            ScoredItem::new("A", 10.0),
            ScoredItem::new("B", 9.0),
            ScoredItem::new("C", 9.0),
            ScoredItem::new("D", 5.0),
        ])
    }

    #[test]
    fn expands_upward_through_small_gaps() {
        let band = expand_tie_band(&scenario(), 1.0, 2).unwrap();
        assert_eq!(band.lo_rank, 1);
        assert_eq!(band.hi_rank, 3);
        assert_eq!(band.size, 3);
        let names: Vec<_> = band.items.iter().map(|s| s.item.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert!(band.spans_boundary(2));
    }

    #[test]
    fn no_band_when_boundary_gap_is_wide() {
        assert!(expand_tie_band(&scenario(), 0.1, 3).is_none());
    }

    #[test]
    fn exact_tie_forms_band_at_zero_epsilon() {
        let band = expand_tie_band(&scenario(), 0.0, 2).unwrap();
        assert_eq!((band.lo_rank, band.hi_rank), (2, 3));
    }

    #[test]
    fn gap_equal_to_two_epsilon_is_indistinguishable() {
        let list = rank(vec![ScoredItem::new("x", 2.0), ScoredItem::new("y", 1.0)]);
        assert!(expand_tie_band(&list, 0.5, 1).is_some());
        assert!(expand_tie_band(&list, 0.49, 1).is_none());
    }

    #[test]
    fn chains_through_adjacent_gaps_only() {
        // Every adjacent gap is 1.0, so the band covers all ranks at epsilon 0.5
        // even though first and last differ by 5.0.
        let list = rank((0..6).map(|i| ScoredItem::new(format!("i{i}"), i as f64)).collect());
        let band = expand_tie_band(&list, 0.5, 3).unwrap();
        assert_eq!((band.lo_rank, band.hi_rank), (1, 6));
    }

    #[test]
    fn out_of_range_cut_has_no_band() {
        assert!(expand_tie_band(&scenario(), 100.0, 4).is_none());
        assert!(expand_tie_band(&scenario(), 100.0, 0).is_none());
    }
}
