//! Errors raised by the analysis engine.

use thiserror::Error;

/// Errors from normalization and analysis.
///
/// Out-of-range `k` and `epsilon` are not errors: they are clamped and the
/// adjustment is reported on the result instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("need at least two valid rows with item and numeric score (got {valid})")]
    InsufficientData { valid: usize },

    #[error("score at rank {rank} is not a finite number")]
    NonFiniteScore { rank: usize },

    #[error("ranked list is not sorted by score descending (first violation at rank {rank})")]
    Unsorted { rank: usize },
}
