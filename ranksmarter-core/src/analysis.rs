//! Stability analysis: the full deterministic pipeline.
//!
//! cleaned list → rank → boundary → tie band → regions/suggestions, plus
//! diagnostics. Every call is a pure function of `(records, k, epsilon)`.

use serde::{Deserialize, Serialize};

use crate::boundary::Boundary;
use crate::clamp::{clamp_epsilon, clamp_k};
use crate::diagnostics::Diagnostics;
use crate::domain::RankedList;
use crate::error::AnalysisError;
use crate::normalize::{normalize, RawRecord};
use crate::rank::{check_ranked, rank};
use crate::regions::{derive_regions, Regions, Suggestions};
use crate::tie_band::expand_tie_band;

/// What the caller asked for, and which inputs had to be clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Adjustments {
    /// Requested selection size; `None` if it was not a finite number.
    pub requested_k: Option<f64>,
    /// Requested error bound; `None` if it was not a finite number.
    pub requested_epsilon: Option<f64>,
    pub k_clamped: bool,
    pub epsilon_clamped: bool,
    /// Raw records dropped by the normalizer.
    pub dropped_records: usize,
}

/// Headline judgement on a cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The top-k set cannot change under any perturbation bounded by epsilon.
    Defensible,
    /// The boundary pair can swap; a strict cutoff claims more precision
    /// than the scores carry.
    FakePrecision,
}

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub n: usize,
    /// Effective (clamped) selection size.
    pub k: usize,
    /// Effective (clamped) error bound.
    pub epsilon: f64,
    pub adjustments: Adjustments,
    pub ranked: RankedList,
    pub boundary: Boundary,
    pub stable_selected_set: bool,
    pub regions: Regions,
    pub suggestions: Suggestions,
    pub diagnostics: Diagnostics,
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        if self.stable_selected_set {
            Verdict::Defensible
        } else {
            Verdict::FakePrecision
        }
    }
}

/// Normalize, rank, and analyze raw records.
pub fn analyze<'a, I>(records: I, k: f64, epsilon: f64) -> Result<AnalysisResult, AnalysisError>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let normalized = normalize(records)?;
    let dropped = normalized.dropped;
    let mut result = analyze_ranked(rank(normalized.items), k, epsilon)?;
    result.adjustments.dropped_records = dropped;
    Ok(result)
}

/// Analyze a list that is already ranked.
pub fn analyze_ranked(
    ranked: RankedList,
    k: f64,
    epsilon: f64,
) -> Result<AnalysisResult, AnalysisError> {
    let n = ranked.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData { valid: n });
    }
    check_ranked(&ranked)?;

    let requested_k = Some(k).filter(|x| x.is_finite());
    let requested_epsilon = Some(epsilon).filter(|x| x.is_finite());
    let k = clamp_k(k, n);
    let epsilon = clamp_epsilon(epsilon);

    let boundary = Boundary::locate(&ranked, k.value);
    let stable_selected_set = boundary.is_stable(epsilon.value);
    let band = expand_tie_band(&ranked, epsilon.value, k.value);
    if let Some(b) = &band {
        assert!(
            b.spans_boundary(k.value),
            "tie band [{}, {}] does not contain boundary k={}",
            b.lo_rank,
            b.hi_rank,
            k.value
        );
    }
    assert_eq!(
        stable_selected_set,
        band.is_none(),
        "stability and tie band disagree at k={}",
        k.value
    );
    let (regions, suggestions) = derive_regions(band, k.value, n);
    assert!(suggestions.conservative_cutoff <= k.value && k.value <= suggestions.inclusive_cutoff);

    let diagnostics = Diagnostics::build(&ranked);

    Ok(AnalysisResult {
        n,
        k: k.value,
        epsilon: epsilon.value,
        adjustments: Adjustments {
            requested_k,
            requested_epsilon,
            k_clamped: k.adjusted,
            epsilon_clamped: epsilon.adjusted,
            dropped_records: 0,
        },
        ranked,
        boundary,
        stable_selected_set,
        regions,
        suggestions,
        diagnostics,
    })
}
