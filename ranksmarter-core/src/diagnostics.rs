//! Diagnostics builder: adjacent gaps and per-pair swap thresholds.
//!
//! Explanatory output only; no other analysis step reads it.

use serde::{Deserialize, Serialize};

use crate::domain::RankedList;

/// The error bound at which an adjacent pair could swap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairThreshold {
    pub upper_rank: usize,
    pub upper_item: String,
    pub lower_item: String,
    pub gap: f64,
    pub required_eps: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// `gaps[i]` is the score gap between ranks `i + 1` and `i + 2`.
    pub gaps: Vec<f64>,
    pub pairwise_thresholds: Vec<PairThreshold>,
}

impl Diagnostics {
    pub fn build(list: &RankedList) -> Self {
        let pairwise_thresholds: Vec<PairThreshold> = list
            .items()
            .windows(2)
            .enumerate()
            .map(|(i, w)| {
                let gap = w[0].score - w[1].score;
                PairThreshold {
                    upper_rank: i + 1,
                    upper_item: w[0].item.clone(),
                    lower_item: w[1].item.clone(),
                    gap,
                    required_eps: gap / 2.0,
                }
            })
            .collect();
        let gaps = pairwise_thresholds.iter().map(|p| p.gap).collect();
        Self {
            gaps,
            pairwise_thresholds,
        }
    }

    /// The most fragile adjacent pair (smallest gap), first one on ties.
    pub fn tightest_pair(&self) -> Option<&PairThreshold> {
        self.pairwise_thresholds
            .iter()
            .reduce(|best, p| if p.gap < best.gap { p } else { best })
    }
}
