//! Ranker: stable descending sort.

use std::cmp::Ordering;

use crate::domain::{RankedList, ScoredItem};
use crate::error::AnalysisError;

/// Descending comparator on scores. Scores are finite, so the fallback is
/// never taken on validated input.
pub fn by_score_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Sort items by score descending.
///
/// `sort_by` is stable: items with equal scores keep their input order. This
/// decides which of several tied items sits inside the cutoff, so it must not
/// be swapped for an unstable sort.
pub fn rank(items: Vec<ScoredItem>) -> RankedList {
    let mut items = items;
    items.sort_by(|a, b| by_score_desc(a.score, b.score));
    RankedList::from_sorted(items)
}

/// Validate a (possibly deserialized) ranked list.
pub fn check_ranked(list: &RankedList) -> Result<(), AnalysisError> {
    let items = list.items();
    if let Some(i) = items.iter().position(|s| !s.score.is_finite()) {
        return Err(AnalysisError::NonFiniteScore { rank: i + 1 });
    }
    if let Some(i) = items.windows(2).position(|w| w[0].score < w[1].score) {
        return Err(AnalysisError::Unsorted { rank: i + 2 });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &RankedList) -> Vec<&str> {
        list.items().iter().map(|s| s.item.as_str()).collect()
    }

    #[test]
    fn sorts_descending() {
        let list = rank(vec![
            ScoredItem::new("low", 1.0),
            ScoredItem::new("high", 3.0),
            ScoredItem::new("mid", 2.0),
        ]);
        assert_eq!(names(&list), vec!["high", "mid", "low"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let list = rank(vec![
            ScoredItem::new("C", 9.0),
            ScoredItem::new("A", 10.0),
            ScoredItem::new("B", 9.0),
            ScoredItem::new("D", 9.0),
        ]);
        assert_eq!(names(&list), vec!["A", "C", "B", "D"]);
    }

    #[test]
    fn ranking_is_reproducible() {
        let input = vec![
            ScoredItem::new("x", 1.0),
            ScoredItem::new("y", 1.0),
            ScoredItem::new("z", 2.0),
        ];
        assert_eq!(rank(input.clone()), rank(input));
    }

    #[test]
    fn negative_zero_ties_with_zero() {
        let list = rank(vec![ScoredItem::new("neg", -0.0), ScoredItem::new("pos", 0.0)]);
        assert_eq!(names(&list), vec!["neg", "pos"]);
    }

    #[test]
    fn check_ranked_reports_first_violation() {
        let list: RankedList = serde_json::from_str(
            r#"[{"item":"a","score":3.0},{"item":"b","score":1.0},{"item":"c","score":2.0}]"#,
        )
        .unwrap();
        assert_eq!(check_ranked(&list), Err(AnalysisError::Unsorted { rank: 3 }));
    }
}
