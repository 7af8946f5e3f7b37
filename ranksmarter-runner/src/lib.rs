//! RankSmarter Runner: everything around the analysis core.
//!
//! This crate builds on `ranksmarter-core` to provide:
//! - Seeded, shardable Monte Carlo stress test with cooperative cancellation
//! - CSV ingestion with header synonyms
//! - JSON and Markdown export
//! - TOML run configuration

pub mod config;
pub mod export;
pub mod ingest;
pub mod monte_carlo;

pub use config::{ConfigError, RunConfig};
pub use export::{
    export_json, generate_report, import_json, load_json, save_json, save_markdown, ExportEnvelope,
};
pub use ingest::{load_csv, load_csv_str, parse_csv, IngestError};
pub use monte_carlo::{
    simulate, simulate_with, InclusionEntry, MonteCarloConfig, MonteCarloResult, SimulationError,
};
