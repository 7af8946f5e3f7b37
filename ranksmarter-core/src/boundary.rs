//! Boundary analyzer: the rank-k / rank-(k+1) pair.

use serde::{Deserialize, Serialize};

use crate::domain::RankedList;

/// The adjacent pair separating the selected set from the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub inside_item: String,
    pub outside_item: String,
    pub inside_score: f64,
    pub outside_score: f64,
    /// `inside_score - outside_score`, never negative.
    pub gap: f64,
    /// Half the gap: the largest error bound the boundary tolerates (exclusive).
    pub required_eps: f64,
}

impl Boundary {
    /// Locate the boundary for an already clamped `k` (`1 <= k <= n - 1`).
    pub fn locate(list: &RankedList, k: usize) -> Self {
        let (Some(inside), Some(outside)) = (list.at_rank(k), list.at_rank(k + 1)) else {
            panic!(
                "boundary k={k} outside [1, {}]",
                list.len().saturating_sub(1)
            );
        };
        let gap = inside.score - outside.score;
        Self {
            inside_item: inside.item.clone(),
            outside_item: outside.item.clone(),
            inside_score: inside.score,
            outside_score: outside.score,
            gap,
            required_eps: gap / 2.0,
        }
    }

    /// True when no perturbation bounded by `epsilon` can swap the pair.
    ///
    /// Worst case moves the inside score down and the outside score up by
    /// `epsilon` each, closing the gap by `2 * epsilon`; the order survives
    /// iff `gap > 2 * epsilon`.
    pub fn is_stable(&self, epsilon: f64) -> bool {
        !can_swap(self.gap, epsilon)
    }
}

/// Whether two adjacent scores `gap` apart can trade places under error
/// bound `epsilon`.
///
/// Shared by the stability verdict and the tie-band adjacency rule. Do not
/// restate it as `epsilon < gap / 2`: the two round apart for subnormal and
/// overflowing gaps.
pub(crate) fn can_swap(gap: f64, epsilon: f64) -> bool {
    gap <= 2.0 * epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScoredItem;
    use crate::rank::rank;

    fn list() -> RankedList {
        rank(vec![
            ScoredItem::new("A", 10.0),
            ScoredItem::new("B", 9.0),
            ScoredItem::new("C", 9.0),
            ScoredItem::new("D", 5.0),
        ])
    }

    #[test]
    fn tied_boundary_has_zero_gap() {
        let b = Boundary::locate(&list(), 2);
        assert_eq!(b.inside_item, "B");
        assert_eq!(b.outside_item, "C");
        assert_eq!(b.gap, 0.0);
        assert_eq!(b.required_eps, 0.0);
        assert!(!b.is_stable(0.0));
    }

    #[test]
    fn wide_boundary_is_stable_below_half_gap() {
        let b = Boundary::locate(&list(), 3);
        assert_eq!(b.gap, 4.0);
        assert_eq!(b.required_eps, 2.0);
        assert!(b.is_stable(0.1));
        assert!(b.is_stable(1.999));
        assert!(!b.is_stable(2.0));
    }

    #[test]
    fn subnormal_gap_is_stable_at_zero_epsilon() {
        let list = rank(vec![ScoredItem::new("a", 5e-324), ScoredItem::new("b", 0.0)]);
        let b = Boundary::locate(&list, 1);
        assert!(b.gap > 0.0);
        assert_eq!(b.required_eps, 0.0);
        assert!(b.is_stable(0.0));
    }

    #[test]
    fn overflowing_gap_follows_doubled_epsilon() {
        let list = rank(vec![ScoredItem::new("a", 1e308), ScoredItem::new("b", -1e308)]);
        let b = Boundary::locate(&list, 1);
        assert_eq!(b.gap, f64::INFINITY);
        assert!(!b.is_stable(1e308));
        assert!(b.is_stable(1.0));
    }

    #[test]
    #[should_panic]
    fn k_equal_to_n_panics() {
        Boundary::locate(&list(), 4);
    }
}
