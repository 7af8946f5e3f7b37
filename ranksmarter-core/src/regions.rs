//! Region & suggestion deriver.

use serde::{Deserialize, Serialize};

use crate::domain::RankRange;
use crate::tie_band::TieBand;

/// Guaranteed-in ranks, the tie band (if any), and guaranteed-out ranks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regions {
    pub guaranteed_in: RankRange,
    pub tie_band: Option<TieBand>,
    pub guaranteed_out: RankRange,
}

/// Two defensible single hard cutoffs.
///
/// Without a tie band both equal `k`. With one, `conservative_cutoff` selects
/// only the guaranteed-in ranks (possibly none) and `inclusive_cutoff` selects
/// through the bottom of the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    pub conservative_cutoff: usize,
    pub inclusive_cutoff: usize,
}

/// Turn an optional tie band into regions and cutoff suggestions.
///
/// A band that does not span the boundary is treated as absent.
pub fn derive_regions(band: Option<TieBand>, k: usize, n: usize) -> (Regions, Suggestions) {
    match band.filter(|b| b.spans_boundary(k)) {
        Some(band) => {
            let lo = band.lo_rank;
            let hi = band.hi_rank;
            let regions = Regions {
                guaranteed_in: RankRange::new(1, lo.saturating_sub(1)),
                guaranteed_out: RankRange::new((hi + 1).min(n + 1), n),
                tie_band: Some(band),
            };
            let suggestions = Suggestions {
                conservative_cutoff: lo - 1,
                inclusive_cutoff: hi,
            };
            (regions, suggestions)
        }
        None => (
            Regions {
                guaranteed_in: RankRange::new(1, k),
                tie_band: None,
                guaranteed_out: RankRange::new(k + 1, n),
            },
            Suggestions {
                conservative_cutoff: k,
                inclusive_cutoff: k,
            },
        ),
    }
}
