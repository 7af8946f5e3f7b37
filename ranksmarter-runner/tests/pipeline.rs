//! Integration tests for the ingest → analyze → simulate → export pipeline.
//!
//! Uses the `tests/fixtures/example.csv` applicant list: 13 data rows, two of
//! which are invalid (non-numeric score, blank name).

use std::path::PathBuf;

use ranksmarter_core::{analyze_ranked, rank, RankRange, Verdict};
use ranksmarter_runner::config::RunConfig;
use ranksmarter_runner::{load_json, save_json, save_markdown};
use ranksmarter_runner::ingest::load_csv;
use ranksmarter_runner::monte_carlo::{simulate_with, MonteCarloConfig};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/example.csv")
}

#[test]
fn fixture_loads_and_drops_invalid_rows() {
    let data = load_csv(&fixture()).unwrap();
    assert_eq!(data.items.len(), 11);
    assert_eq!(data.dropped, 2);
    assert_eq!(data.items[0].item, "Applicant 01");
}

#[test]
fn near_ties_form_a_band_at_quarter_point() {
    let data = load_csv(&fixture()).unwrap();
    let r = analyze_ranked(rank(data.items), 5.0, 0.25).unwrap();

    assert_eq!(r.verdict(), Verdict::FakePrecision);
    assert_eq!(r.boundary.inside_item, "Applicant 05");
    assert_eq!(r.boundary.outside_item, "Applicant 06");

    let band = r.regions.tie_band.as_ref().unwrap();
    assert_eq!((band.lo_rank, band.hi_rank), (3, 6));
    assert_eq!(r.regions.guaranteed_in, RankRange::new(1, 2));
    assert_eq!(r.regions.guaranteed_out, RankRange::new(7, 11));
    assert_eq!(r.suggestions.conservative_cutoff, 2);
    assert_eq!(r.suggestions.inclusive_cutoff, 6);
}

#[test]
fn tighter_bound_makes_the_cut_defensible() {
    let data = load_csv(&fixture()).unwrap();
    let r = analyze_ranked(rank(data.items), 5.0, 0.1).unwrap();
    assert_eq!(r.verdict(), Verdict::Defensible);
    assert!(r.regions.tie_band.is_none());
}

#[test]
fn monte_carlo_agrees_with_band() {
    let data = load_csv(&fixture()).unwrap();
    let r = analyze_ranked(rank(data.items), 5.0, 0.25).unwrap();
    let mc = simulate_with(
        &r.ranked,
        r.k as f64,
        r.epsilon,
        &MonteCarloConfig {
            samples: 2000,
            seed: 12345,
            parallel: true,
        },
        None,
    )
    .unwrap();

    assert!(mc.same_set_prob < 1.0);
    assert!(mc.same_set_prob > 0.0);
    // Ranks 1–2 are guaranteed in and ranks 7+ guaranteed out.
    for e in &mc.inclusion_top {
        if e.rank <= 2 {
            assert_eq!(e.probability, 1.0, "{}", e.item);
        }
        if e.rank >= 7 {
            assert_eq!(e.probability, 0.0, "{}", e.item);
        }
    }
}

#[test]
fn exports_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let data = load_csv(&fixture()).unwrap();
    let r = analyze_ranked(rank(data.items), 5.0, 0.25).unwrap();
    let mc = simulate_with(&r.ranked, 5.0, 0.25, &MonteCarloConfig::default(), None).unwrap();

    let json_path = save_json(&r, Some(&mc), &dir.path().join("out/result.json")).unwrap();
    let md_path = save_markdown(&r, Some(&mc), &dir.path().join("out/report.md")).unwrap();

    let env = load_json(&json_path).unwrap();
    assert_eq!(env.result.k, 5);
    assert_eq!(env.result.regions, r.regions);
    assert_eq!(env.monte_carlo.as_ref().unwrap().samples, 2000);

    let md = std::fs::read_to_string(md_path).unwrap();
    assert!(md.contains("Treat ranks 3 to 6 as a tie band."));
    assert!(md.contains("## Stress test (Monte Carlo)"));
    assert!(md.contains("## Diagnostics"));
    assert!(md.contains("| 2 | Applicant 02 | 90.8 | in |"));
}

#[test]
fn config_file_drives_a_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.toml");
    std::fs::write(
        &path,
        "[analysis]\nepsilon = 0.1\n\n[monte_carlo]\nenabled = true\nsamples = 300\nseed = 4\n",
    )
    .unwrap();
    let cfg = RunConfig::from_file(&path).unwrap();

    let data = load_csv(&fixture()).unwrap();
    let n = data.items.len();
    let r = analyze_ranked(rank(data.items), cfg.requested_k(n), cfg.analysis.epsilon).unwrap();
    assert_eq!(r.k, 5);
    assert!(r.stable_selected_set);

    let mc = simulate_with(
        &r.ranked,
        r.k as f64,
        r.epsilon,
        &cfg.monte_carlo.to_config(),
        None,
    )
    .unwrap();
    assert_eq!(mc.samples, 300);
    assert_eq!(mc.seed, 4);
    assert_eq!(mc.same_set_prob, 1.0);
}
