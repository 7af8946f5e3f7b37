//! Reporting and export: JSON and Markdown artifacts.
//!
//! - **JSON**: the full analysis result plus the optional Monte Carlo result,
//!   wrapped in an envelope with `schema_version`. Unknown versions are
//!   rejected on load.
//! - **Markdown**: a human-readable report with verdict, boundary evidence,
//!   recommendation and a top-20 preview.
//!
//! Result types keep plain numbers; all rounding happens here.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use ranksmarter_core::{AnalysisResult, Verdict};

use crate::monte_carlo::MonteCarloResult;

pub const SCHEMA_VERSION: u32 = 1;
pub const TOOL_NAME: &str = "RankSmarter";

/// Rows shown in preview tables.
const PREVIEW_ROWS: usize = 20;

/// Serialized export envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportEnvelope {
    pub schema_version: u32,
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub tool: String,
    pub result: AnalysisResult,
    pub monte_carlo: Option<MonteCarloResult>,
}

// ─── Number formatting ──────────────────────────────────────────────

/// Format a number for human-readable text.
///
/// Non-finite → `n/a`; |x| ≥ 100 → 1 decimal; |x| ≥ 1 → 3 decimals;
/// otherwise 4 decimals.
pub fn fmt_num(x: f64) -> String {
    if !x.is_finite() {
        return "n/a".to_string();
    }
    let ax = x.abs();
    if ax >= 100.0 {
        format!("{x:.1}")
    } else if ax >= 1.0 {
        format!("{x:.3}")
    } else {
        format!("{x:.4}")
    }
}

fn fmt_pct(p: f64) -> String {
    format!("{:.1}%", p * 100.0)
}

// ─── Verdict text ───────────────────────────────────────────────────

pub fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Defensible => "Defensible cutoff",
        Verdict::FakePrecision => "Likely fake precision",
    }
}

/// One-sentence verdict for the selected cutoff.
pub fn verdict_sentence(result: &AnalysisResult) -> String {
    match result.verdict() {
        Verdict::Defensible => format!(
            "Selecting top {} is defensible at the stated wiggle room.",
            result.k
        ),
        Verdict::FakePrecision => format!(
            "A strict cutoff at {} is not defensible at the stated wiggle room.",
            result.k
        ),
    }
}

/// What to do about it.
pub fn recommended_action(result: &AnalysisResult) -> String {
    match (result.verdict(), &result.regions.tie_band) {
        (Verdict::Defensible, _) => format!("Proceed with a strict cutoff at {}.", result.k),
        (Verdict::FakePrecision, Some(band)) => format!(
            "Treat ranks {} to {} as a tie band.",
            band.lo_rank, band.hi_rank
        ),
        (Verdict::FakePrecision, None) => "Treat the boundary as a tie band or improve scoring \
             precision before cutting."
            .to_string(),
    }
}

/// Why: required accuracy versus the stated error bound.
pub fn explanation(result: &AnalysisResult) -> String {
    format!(
        "Forced accuracy required to prevent a flip at the boundary is ±{}. Your wiggle room is ±{}.",
        fmt_num(result.boundary.required_eps),
        fmt_num(result.epsilon)
    )
}

/// Which region a 1-indexed rank falls in.
pub fn region_label(result: &AnalysisResult, rank: usize) -> &'static str {
    let regions = &result.regions;
    if regions.guaranteed_in.contains(rank) {
        "in"
    } else if regions
        .tie_band
        .as_ref()
        .is_some_and(|b| b.ranks().contains(rank))
    {
        "tie band"
    } else if regions.guaranteed_out.contains(rank) {
        "out"
    } else {
        "n/a"
    }
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn envelope(result: &AnalysisResult, mc: Option<&MonteCarloResult>) -> ExportEnvelope {
    ExportEnvelope {
        schema_version: SCHEMA_VERSION,
        generated_at: chrono::Utc::now().to_rfc3339(),
        tool: TOOL_NAME.to_string(),
        result: result.clone(),
        monte_carlo: mc.cloned(),
    }
}

/// Serialize a result (and optional Monte Carlo result) to pretty JSON.
pub fn export_json(result: &AnalysisResult, mc: Option<&MonteCarloResult>) -> Result<String> {
    serde_json::to_string_pretty(&envelope(result, mc))
        .context("failed to serialize analysis result to JSON")
}

/// Deserialize an export, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ExportEnvelope> {
    let env: ExportEnvelope =
        serde_json::from_str(json).context("failed to deserialize export JSON")?;
    if env.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            env.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(env)
}

// ─── Markdown report ────────────────────────────────────────────────

/// Generate a Markdown report.
pub fn generate_report(result: &AnalysisResult, mc: Option<&MonteCarloResult>) -> String {
    let b = &result.boundary;
    let mut md = String::with_capacity(2048);

    md.push_str("# RankSmarter report\n\n");
    md.push_str(&format!(
        "Generated: {}\n\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    md.push_str("## Inputs\n");
    md.push_str(&format!("- Items: {}\n", result.n));
    md.push_str(&format!("- Selection size (cutoff): Top {}\n", result.k));
    md.push_str(&format!("- Wiggle room (ε): ±{}\n", fmt_num(result.epsilon)));
    let adj = &result.adjustments;
    if adj.k_clamped {
        md.push_str(&format!(
            "- Note: requested selection size {} was clamped to {}.\n",
            adj.requested_k.map_or_else(|| "n/a".to_string(), fmt_num),
            result.k
        ));
    }
    if adj.epsilon_clamped {
        md.push_str(&format!(
            "- Note: requested wiggle room {} was clamped to {}.\n",
            adj.requested_epsilon.map_or_else(|| "n/a".to_string(), fmt_num),
            fmt_num(result.epsilon)
        ));
    }
    if result.adjustments.dropped_records > 0 {
        md.push_str(&format!(
            "- Skipped rows: {}\n",
            result.adjustments.dropped_records
        ));
    }
    md.push('\n');

    md.push_str("## Verdict\n");
    md.push_str(&format!(
        "- {}\n\n",
        match result.verdict() {
            Verdict::Defensible => "Defensible cutoff at the stated wiggle room.",
            Verdict::FakePrecision => "Likely fake precision at the stated wiggle room.",
        }
    ));

    md.push_str("## Boundary evidence\n");
    md.push_str(&format!(
        "- Inside (rank {}): {} = {}\n",
        result.k, b.inside_item, b.inside_score
    ));
    md.push_str(&format!(
        "- Outside (rank {}): {} = {}\n",
        result.k + 1,
        b.outside_item,
        b.outside_score
    ));
    md.push_str(&format!("- Gap: {}\n", fmt_num(b.gap)));
    md.push_str(&format!(
        "- Forced accuracy required to prevent a flip: ±{}\n\n",
        fmt_num(b.required_eps)
    ));

    md.push_str("## Recommendation\n");
    match &result.regions.tie_band {
        Some(band) => {
            md.push_str(&format!(
                "Treat ranks {} to {} as a tie band.\n",
                band.lo_rank, band.hi_rank
            ));
            md.push_str(&format!(
                "- Conservative cutoff: Top {}\n- Inclusive cutoff: Top {}\n",
                result.suggestions.conservative_cutoff, result.suggestions.inclusive_cutoff
            ));
        }
        None => md.push_str("No tie band at the cutoff at this wiggle room.\n"),
    }
    md.push('\n');

    if let Some(mc) = mc {
        md.push_str("## Stress test (Monte Carlo)\n");
        md.push_str(&format!("- Samples: {}\n", mc.samples));
        md.push_str(&format!("- Seed: {}\n", mc.seed));
        md.push_str(&format!("- Same selected set: {}\n", fmt_pct(mc.same_set_prob)));
        md.push_str(&format!("- Average overlap: {}\n\n", fmt_pct(mc.avg_overlap_frac)));
        md.push_str("| Item | P(in selected set) |\n");
        md.push_str("|------|--------------------|\n");
        for e in &mc.inclusion_top {
            md.push_str(&format!("| {} | {} |\n", e.item, fmt_pct(e.probability)));
        }
        md.push('\n');
    }

    md.push_str("## Diagnostics\n");
    match result.diagnostics.tightest_pair() {
        Some(p) => md.push_str(&format!(
            "- Tightest adjacent pair: ranks {} and {} ({} vs {}), gap {}, swaps above ±{}\n\n",
            p.upper_rank,
            p.upper_rank + 1,
            p.upper_item,
            p.lower_item,
            fmt_num(p.gap),
            fmt_num(p.required_eps)
        )),
        None => md.push_str("- No adjacent pairs.\n\n"),
    }

    md.push_str("## Top items (preview)\n\n");
    md.push_str("| Rank | Item | Score | Region |\n");
    md.push_str("|------|------|-------|--------|\n");
    for (rank, s) in result.ranked.ranked().take(PREVIEW_ROWS) {
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            rank,
            s.item,
            s.score,
            region_label(result, rank)
        ));
    }
    md.push('\n');

    md.push_str(
        "Note: This checks precision (stability under bounded error), not validity or fairness.\n",
    );
    md
}

// ─── Files ──────────────────────────────────────────────────────────

/// Write the JSON export to `path`, creating parent directories.
pub fn save_json(
    result: &AnalysisResult,
    mc: Option<&MonteCarloResult>,
    path: &Path,
) -> Result<PathBuf> {
    let json = export_json(result, mc)?;
    write_file(path, &json)
}

/// Write the Markdown report to `path`, creating parent directories.
pub fn save_markdown(
    result: &AnalysisResult,
    mc: Option<&MonteCarloResult>,
    path: &Path,
) -> Result<PathBuf> {
    write_file(path, &generate_report(result, mc))
}

/// Load an export written by [`save_json`].
pub fn load_json(path: &Path) -> Result<ExportEnvelope> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

fn write_file(path: &Path, content: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path.to_path_buf())
}
