//! RankSmarter Core: is a top-k cutoff forced by the data?
//!
//! Given scored items, a selection size `k` and an error bound `epsilon`,
//! this crate decides whether the cut between rank `k` and rank `k + 1` can
//! be moved by any perturbation of at most `epsilon` per score:
//! - Normalizer and stable ranker
//! - Boundary analyzer (gap and required accuracy at the cut)
//! - Tie-band expander (2ε adjacency rule)
//! - Guaranteed-in / guaranteed-out regions and cutoff suggestions
//! - Pairwise gap diagnostics
//! - Deterministic RNG hierarchy used by the Monte Carlo runner

pub mod analysis;
pub mod boundary;
pub mod clamp;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod normalize;
pub mod rank;
pub mod regions;
pub mod rng;
pub mod tie_band;

pub use analysis::{analyze, analyze_ranked, Adjustments, AnalysisResult, Verdict};
pub use boundary::Boundary;
pub use clamp::{clamp_epsilon, clamp_k, Clamped};
pub use diagnostics::{Diagnostics, PairThreshold};
pub use domain::{RankRange, RankedList, ScoredItem};
pub use error::AnalysisError;
pub use normalize::{normalize, Normalized, RawRecord, RawScore};
pub use rank::rank;
pub use regions::{derive_regions, Regions, Suggestions};
pub use rng::{Mulberry32, RngHierarchy};
pub use tie_band::{expand_tie_band, TieBand};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: result types can cross to a worker thread.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<ScoredItem>();
        require_sync::<ScoredItem>();
        require_send::<RankedList>();
        require_sync::<RankedList>();
        require_send::<AnalysisResult>();
        require_sync::<AnalysisResult>();
        require_send::<RngHierarchy>();
        require_sync::<RngHierarchy>();
        require_send::<Mulberry32>();
        require_send::<AnalysisError>();
        require_sync::<AnalysisError>();
    }

    /// Architecture contract: analysis is a pure function of its arguments.
    #[test]
    fn analysis_is_repeatable() {
        let records = vec![
            RawRecord::new("x", 3.0),
            RawRecord::new("y", 2.5),
            RawRecord::new("z", 2.5),
        ];
        let a = analyze(&records, 1.0, 0.3).unwrap();
        let b = analyze(&records, 1.0, 0.3).unwrap();
        assert_eq!(a, b);
    }
}
