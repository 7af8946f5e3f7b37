//! RankSmarter CLI: is your top-k cutoff real or fake precision?
//!
//! Commands:
//! - `analyze`: boundary and tie-band analysis of a CSV, optional Monte
//!   Carlo stress test, optional JSON/Markdown export
//! - `simulate`: Monte Carlo stress test only

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use ranksmarter_core::{analyze_ranked, rank, AnalysisResult};
use ranksmarter_runner::config::{RunConfig, MAX_SEED, SAMPLES_RANGE};
use ranksmarter_runner::export::{
    explanation, fmt_num, recommended_action, region_label, save_json, save_markdown,
    verdict_label, verdict_sentence,
};
use ranksmarter_runner::ingest::load_csv;
use ranksmarter_runner::monte_carlo::{simulate_with, MonteCarloConfig, MonteCarloResult};

/// Rows shown in the ranked preview.
const PREVIEW_ROWS: usize = 20;

#[derive(Parser)]
#[command(
    name = "ranksmarter",
    about = "RankSmarter CLI: check whether a top-k cutoff survives scoring error"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the cutoff between rank k and rank k+1.
    Analyze {
        /// CSV with an item (or name) column and a score (or value) column.
        csv: PathBuf,

        /// Selection size. Defaults to min(5, n-1). Clamped to [1, n-1].
        #[arg(long)]
        k: Option<f64>,

        /// Wiggle room: assumed maximum absolute scoring error.
        #[arg(long, alias = "eps")]
        epsilon: Option<f64>,

        /// TOML run configuration; flags override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Also run the Monte Carlo stress test.
        #[arg(long, default_value_t = false)]
        mc: bool,

        /// Monte Carlo trials (clamped to 200..=20000).
        #[arg(long)]
        samples: Option<usize>,

        /// Monte Carlo seed (clamped to 0..=999999999).
        #[arg(long)]
        seed: Option<u32>,

        /// Write the JSON export here.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write the Markdown report here.
        #[arg(long)]
        markdown: Option<PathBuf>,
    },
    /// Run only the Monte Carlo stress test.
    Simulate {
        /// CSV with an item (or name) column and a score (or value) column.
        csv: PathBuf,

        /// Selection size. Defaults to min(5, n-1). Clamped to [1, n-1].
        #[arg(long)]
        k: Option<f64>,

        /// Wiggle room: assumed maximum absolute scoring error.
        #[arg(long, alias = "eps", default_value_t = 0.0)]
        epsilon: f64,

        /// Trials (clamped to 200..=20000).
        #[arg(long, default_value_t = 2000)]
        samples: usize,

        /// Seed (clamped to 0..=999999999).
        #[arg(long, default_value_t = 12345)]
        seed: u32,

        /// Run trials on one thread. Output is identical either way.
        #[arg(long, default_value_t = false)]
        sequential: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            csv,
            k,
            epsilon,
            config,
            mc,
            samples,
            seed,
            json,
            markdown,
        } => {
            let mut run_config = match config {
                Some(path) => RunConfig::from_file(&path)?,
                None => RunConfig::default(),
            };
            if k.is_some() {
                run_config.analysis.k = k;
            }
            if let Some(eps) = epsilon {
                run_config.analysis.epsilon = eps;
            }
            if mc {
                run_config.monte_carlo.enabled = true;
            }
            if let Some(s) = samples {
                run_config.monte_carlo.samples = s;
            }
            if let Some(s) = seed {
                run_config.monte_carlo.seed = s;
            }
            run_analyze(&csv, &run_config, json.as_deref(), markdown.as_deref())
        }
        Commands::Simulate {
            csv,
            k,
            epsilon,
            samples,
            seed,
            sequential,
        } => {
            let mut run_config = RunConfig::default();
            run_config.analysis.k = k;
            run_config.analysis.epsilon = epsilon;
            run_config.monte_carlo.samples = samples;
            run_config.monte_carlo.seed = seed;
            run_config.monte_carlo.parallel = !sequential;
            run_simulate(&csv, &run_config)
        }
    }
}

fn load_and_analyze(csv: &Path, config: &RunConfig) -> Result<AnalysisResult> {
    let data = load_csv(csv).with_context(|| format!("failed to load {}", csv.display()))?;
    let dropped = data.dropped;
    let n = data.items.len();
    info!(rows = n, dropped, "loaded scores");

    let mut result = analyze_ranked(
        rank(data.items),
        config.requested_k(n),
        config.analysis.epsilon,
    )?;
    result.adjustments.dropped_records = dropped;

    if result.adjustments.k_clamped {
        warn!(
            requested = ?result.adjustments.requested_k,
            effective = result.k,
            "selection size clamped to [1, n-1]"
        );
    }
    if result.adjustments.epsilon_clamped {
        warn!(
            requested = ?result.adjustments.requested_epsilon,
            effective = result.epsilon,
            "wiggle room clamped to a finite non-negative value"
        );
    }
    Ok(result)
}

fn run_monte_carlo(result: &AnalysisResult, config: &RunConfig) -> Result<MonteCarloResult> {
    let mc_config: MonteCarloConfig = config.monte_carlo.to_config();
    if mc_config.samples != config.monte_carlo.samples || mc_config.seed != config.monte_carlo.seed
    {
        warn!(
            samples = mc_config.samples,
            seed = mc_config.seed,
            "monte carlo inputs clamped (samples {}..={}, seed <= {})",
            SAMPLES_RANGE.0,
            SAMPLES_RANGE.1,
            MAX_SEED
        );
    }
    // Never set from the CLI; embedding callers flip it from another thread.
    let cancel = AtomicBool::new(false);
    let mc = simulate_with(
        &result.ranked,
        result.k as f64,
        result.epsilon,
        &mc_config,
        Some(&cancel),
    )?;
    Ok(mc)
}

fn run_analyze(
    csv: &Path,
    config: &RunConfig,
    json: Option<&Path>,
    markdown: Option<&Path>,
) -> Result<()> {
    let result = load_and_analyze(csv, config)?;
    print_summary(&result);

    let mc = if config.monte_carlo.enabled {
        let mc = run_monte_carlo(&result, config)?;
        print_monte_carlo(&mc);
        Some(mc)
    } else {
        None
    };

    if let Some(path) = json {
        let written = save_json(&result, mc.as_ref(), path)?;
        println!("JSON saved to: {}", written.display());
    }
    if let Some(path) = markdown {
        let written = save_markdown(&result, mc.as_ref(), path)?;
        println!("Report saved to: {}", written.display());
    }
    Ok(())
}

fn run_simulate(csv: &Path, config: &RunConfig) -> Result<()> {
    let result = load_and_analyze(csv, config)?;
    println!();
    println!(
        "Items: {}   Cutoff: top {}   Wiggle room: ±{}",
        result.n,
        result.k,
        fmt_num(result.epsilon)
    );
    let mc = run_monte_carlo(&result, config)?;
    print_monte_carlo(&mc);
    Ok(())
}

fn print_summary(result: &AnalysisResult) {
    let b = &result.boundary;

    println!();
    println!("=== {} ===", verdict_label(result.verdict()));
    println!("{}", verdict_sentence(result));
    println!("Action: {}", recommended_action(result));
    println!("Why:    {}", explanation(result));
    println!();
    println!("--- Boundary ---");
    println!(
        "Inside (rank {}):   {} = {}",
        result.k, b.inside_item, b.inside_score
    );
    println!(
        "Outside (rank {}):  {} = {}",
        result.k + 1,
        b.outside_item,
        b.outside_score
    );
    println!("Gap:                {}", fmt_num(b.gap));
    println!("Forced accuracy:    ±{}", fmt_num(b.required_eps));
    println!();

    match &result.regions.tie_band {
        Some(band) => {
            println!(
                "At this wiggle room the cutoff sits inside a near-tie. Treat ranks {} to {} \
                 as a tie band, then use a secondary criterion or additional evaluation.",
                band.lo_rank, band.hi_rank
            );
            println!(
                "Conservative cutoff: top {}   Inclusive cutoff: top {}",
                result.suggestions.conservative_cutoff, result.suggestions.inclusive_cutoff
            );
        }
        None => println!(
            "No tie band around the cutoff at this wiggle room. \
             The boundary gap is larger than the error bound."
        ),
    }
    println!();

    if let Some(p) = result.diagnostics.tightest_pair() {
        println!(
            "Tightest pair: ranks {} and {} ({} vs {}), gap {}",
            p.upper_rank,
            p.upper_rank + 1,
            p.upper_item,
            p.lower_item,
            fmt_num(p.gap)
        );
        println!();
    }

    println!("{:>5}  {:<32} {:>12}  {:<8}", "Rank", "Item", "Score", "Region");
    println!("{}", "-".repeat(62));
    for (rank, s) in result.ranked.ranked().take(PREVIEW_ROWS) {
        let marker = if rank == result.k || rank == result.k + 1 {
            "*"
        } else {
            " "
        };
        println!(
            "{marker}{rank:>4}  {:<32} {:>12}  {:<8}",
            s.item,
            s.score,
            region_label(result, rank)
        );
    }
    if result.n > PREVIEW_ROWS {
        println!("  ... {} more", result.n - PREVIEW_ROWS);
    }
    if result.adjustments.dropped_records > 0 {
        println!();
        println!(
            "WARNING: skipped {} row(s) without an item name or numeric score",
            result.adjustments.dropped_records
        );
    }
    println!();
}

fn print_monte_carlo(mc: &MonteCarloResult) {
    println!("--- Stress test (Monte Carlo) ---");
    println!("Samples: {}   Seed: {}", mc.samples, mc.seed);
    println!(
        "Selected set unchanged in {:.1}% of trials. Average overlap is {:.1}%.",
        mc.same_set_prob * 100.0,
        mc.avg_overlap_frac * 100.0
    );
    println!();
    println!("{:<32} {:>18}", "Item", "P(in selected set)");
    println!("{}", "-".repeat(51));
    for e in &mc.inclusion_top {
        println!("{:<32} {:>17.1}%", e.item, e.probability * 100.0);
    }
    println!();
}
