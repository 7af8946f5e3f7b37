//! Serializable run configuration (TOML).
//!
//! ```toml
//! [analysis]
//! k = 10
//! epsilon = 0.25
//!
//! [monte_carlo]
//! enabled = true
//! samples = 5000
//! seed = 7
//! parallel = true
//! ```
//!
//! Every field is optional. Command-line flags override file values.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::monte_carlo::MonteCarloConfig;

/// Default selection size when none is requested, before clamping to `n - 1`.
pub const DEFAULT_K: usize = 5;

/// Sample-count range accepted from user input.
pub const SAMPLES_RANGE: (usize, usize) = (200, 20_000);

/// Largest seed accepted from user input.
pub const MAX_SEED: u32 = 999_999_999;

/// Errors from config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Requested selection size; `None` means `min(5, n - 1)`.
    pub k: Option<f64>,
    pub epsilon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloSettings {
    pub enabled: bool,
    pub samples: usize,
    pub seed: u32,
    pub parallel: bool,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        let mc = MonteCarloConfig::default();
        Self {
            enabled: false,
            samples: mc.samples,
            seed: mc.seed,
            parallel: mc.parallel,
        }
    }
}

impl MonteCarloSettings {
    /// Simulator config with user-facing bounds applied.
    pub fn to_config(&self) -> MonteCarloConfig {
        MonteCarloConfig {
            samples: clamp_samples(self.samples),
            seed: clamp_seed(self.seed),
            parallel: self.parallel,
        }
    }
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub analysis: AnalysisSettings,
    pub monte_carlo: MonteCarloSettings,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Selection size to request for a list of `n` items.
    pub fn requested_k(&self, n: usize) -> f64 {
        self.analysis
            .k
            .unwrap_or_else(|| DEFAULT_K.min(n.saturating_sub(1)).max(1) as f64)
    }
}

/// Clamp a user-supplied sample count to [`SAMPLES_RANGE`].
pub fn clamp_samples(samples: usize) -> usize {
    samples.clamp(SAMPLES_RANGE.0, SAMPLES_RANGE.1)
}

/// Clamp a user-supplied seed to `[0, MAX_SEED]`.
pub fn clamp_seed(seed: u32) -> u32 {
    seed.min(MAX_SEED)
}
