//! Monte Carlo stress test: empirical selection stability under noise.
//!
//! Each trial adds an independent uniform perturbation in `[-ε, ε]` to every
//! score, re-ranks, and compares the new top-k set with the baseline top-k.
//!
//! Key design choices:
//! - Trial `t` draws from its own Mulberry32 stream seeded by
//!   `RngHierarchy::sub_seed(t)`, so output is bit-identical whether trials
//!   run sequentially or across rayon workers.
//! - Trials are grouped into fixed-size shards; shard tallies are integer
//!   counts merged by addition.
//! - Set membership is tracked by baseline position, so duplicate item names
//!   stay distinct entries.
//! - The perturbed re-sort is stable: at ε = 0 ties keep their baseline order
//!   and every trial reproduces the baseline set.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use ranksmarter_core::rank::{by_score_desc, check_ranked};
use ranksmarter_core::{clamp_epsilon, clamp_k, AnalysisError, RankedList, RngHierarchy};

/// Trials per shard. Fixed so shard boundaries never depend on thread count.
const SHARD_SIZE: usize = 256;

/// Maximum number of items reported in `inclusion_top`.
pub const INCLUSION_TOP_N: usize = 20;

// ─── Configuration ───────────────────────────────────────────────────

/// Configuration for a Monte Carlo run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Number of perturbation trials (default 2000).
    pub samples: usize,
    /// Master seed for reproducibility.
    pub seed: u32,
    /// Run shards on the rayon pool. Output is identical either way.
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            samples: 2000,
            seed: 12345,
            parallel: true,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// Empirical inclusion probability for one baseline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InclusionEntry {
    /// 1-indexed baseline rank.
    pub rank: usize,
    pub item: String,
    pub probability: f64,
}

/// Complete result of a Monte Carlo run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    pub samples: usize,
    pub seed: u32,
    /// Effective (clamped) error bound.
    pub epsilon: f64,
    /// Effective (clamped) selection size.
    pub k: usize,
    /// Fraction of trials whose top-k set equals the baseline set.
    pub same_set_prob: f64,
    /// Mean of `|trial ∩ baseline| / k` over trials.
    pub avg_overlap_frac: f64,
    /// At most 20 entries, by probability descending then baseline rank.
    pub inclusion_top: Vec<InclusionEntry>,
}

/// Errors from Monte Carlo.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("no baseline ranking to perturb: {0}")]
    MissingBaseline(#[from] AnalysisError),
    #[error("sample count must be at least 1")]
    InvalidSampleCount,
    #[error("cancelled after {completed} of {requested} trials")]
    Cancelled { completed: usize, requested: usize },
}

// ─── Tally ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct Tally {
    trials: usize,
    same_set: usize,
    overlap_sum: usize,
    /// Inclusion counts indexed by baseline position.
    inclusion: Vec<usize>,
    cancelled: bool,
}

impl Tally {
    fn new(n: usize) -> Self {
        Self {
            inclusion: vec![0; n],
            ..Self::default()
        }
    }

    fn merge(mut self, other: Tally) -> Tally {
        self.trials += other.trials;
        self.same_set += other.same_set;
        self.overlap_sum += other.overlap_sum;
        self.cancelled |= other.cancelled;
        if self.inclusion.len() < other.inclusion.len() {
            self.inclusion.resize(other.inclusion.len(), 0);
        }
        for (a, b) in self.inclusion.iter_mut().zip(other.inclusion) {
            *a += b;
        }
        self
    }
}

// ─── MC execution ────────────────────────────────────────────────────

/// Run the stress test with default parallelism and no cancellation.
pub fn simulate(
    ranked: &RankedList,
    k: f64,
    epsilon: f64,
    samples: usize,
    seed: u32,
) -> Result<MonteCarloResult, SimulationError> {
    let config = MonteCarloConfig {
        samples,
        seed,
        ..MonteCarloConfig::default()
    };
    simulate_with(ranked, k, epsilon, &config, None)
}

/// Run the stress test.
///
/// `k` and `epsilon` are clamped the same way as in the deterministic
/// analysis. `cancel` is checked between trials; once set, the run stops
/// and returns [`SimulationError::Cancelled`] rather than a partial result.
pub fn simulate_with(
    ranked: &RankedList,
    k: f64,
    epsilon: f64,
    config: &MonteCarloConfig,
    cancel: Option<&AtomicBool>,
) -> Result<MonteCarloResult, SimulationError> {
    let n = ranked.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData { valid: n }.into());
    }
    check_ranked(ranked)?;
    if config.samples == 0 {
        return Err(SimulationError::InvalidSampleCount);
    }

    let k = clamp_k(k, n).value;
    let epsilon = clamp_epsilon(epsilon).value;
    let samples = config.samples;
    let hierarchy = RngHierarchy::new(config.seed);
    let scores: Vec<f64> = ranked.items().iter().map(|s| s.score).collect();

    let start = Instant::now();
    let shards: Vec<(usize, usize)> = (0..samples)
        .step_by(SHARD_SIZE)
        .map(|lo| (lo, (lo + SHARD_SIZE).min(samples)))
        .collect();
    let run = |&(lo, hi): &(usize, usize)| {
        run_shard(&scores, k, epsilon, &hierarchy, lo..hi, cancel)
    };

    let tally = if config.parallel {
        shards
            .par_iter()
            .map(run)
            .reduce(|| Tally::new(n), Tally::merge)
    } else {
        shards.iter().map(run).fold(Tally::new(n), Tally::merge)
    };

    if tally.cancelled {
        info!(
            completed = tally.trials,
            requested = samples,
            "monte carlo cancelled"
        );
        return Err(SimulationError::Cancelled {
            completed: tally.trials,
            requested: samples,
        });
    }

    let inclusion_top = top_inclusion(ranked, &tally.inclusion, samples);
    let result = MonteCarloResult {
        samples,
        seed: config.seed,
        epsilon,
        k,
        same_set_prob: tally.same_set as f64 / samples as f64,
        avg_overlap_frac: (tally.overlap_sum as f64 / samples as f64) / k as f64,
        inclusion_top,
    };

    info!(
        samples,
        k,
        epsilon,
        shards = shards.len(),
        same_set_prob = result.same_set_prob,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "monte carlo complete"
    );
    Ok(result)
}

/// Run trials `range` sequentially into one tally.
fn run_shard(
    scores: &[f64],
    k: usize,
    epsilon: f64,
    hierarchy: &RngHierarchy,
    range: std::ops::Range<usize>,
    cancel: Option<&AtomicBool>,
) -> Tally {
    let n = scores.len();
    let mut tally = Tally::new(n);
    let mut perturbed: Vec<(f64, usize)> = Vec::with_capacity(n);

    for trial in range.clone() {
        if cancel.is_some_and(|f| f.load(Ordering::Relaxed)) {
            tally.cancelled = true;
            break;
        }

        let mut rng = hierarchy.rng_for(trial as u64);
        perturbed.clear();
        perturbed.extend(scores.iter().enumerate().map(|(i, &score)| {
            let delta = (rng.next_unit() * 2.0 - 1.0) * epsilon;
            (score + delta, i)
        }));
        perturbed.sort_by(|a, b| by_score_desc(a.0, b.0));

        let mut overlap = 0;
        for &(_, i) in &perturbed[..k] {
            tally.inclusion[i] += 1;
            if i < k {
                overlap += 1;
            }
        }
        tally.overlap_sum += overlap;
        if overlap == k {
            tally.same_set += 1;
        }
        tally.trials += 1;
    }

    debug!(
        first = range.start,
        trials = tally.trials,
        same_set = tally.same_set,
        "shard done"
    );
    tally
}

/// Convert counts to probabilities and keep the top entries.
///
/// Ordered by count descending (same denominator, so identical to
/// probability order) then by baseline rank.
fn top_inclusion(ranked: &RankedList, counts: &[usize], samples: usize) -> Vec<InclusionEntry> {
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| counts[b].cmp(&counts[a]).then(a.cmp(&b)));
    order
        .into_iter()
        .take(INCLUSION_TOP_N)
        .map(|i| InclusionEntry {
            rank: i + 1,
            item: ranked.items()[i].item.clone(),
            probability: counts[i] as f64 / samples as f64,
        })
        .collect()
}
