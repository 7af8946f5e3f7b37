//! CSV ingestion: header-driven (item, score) extraction.
//!
//! Accepts lightly quoted comma-separated text: a header row naming an item
//! column (`item` or `name`) and a score column (`score` or `value`),
//! case-insensitively. Quoted fields use doubled quotes for a literal quote.
//! Whitespace-only lines are ignored and ragged rows are tolerated.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use ranksmarter_core::{normalize, AnalysisError, Normalized, RawRecord};

const ITEM_COLUMNS: [&str; 2] = ["item", "name"];
const SCORE_COLUMNS: [&str; 2] = ["score", "value"];

/// Errors from the ingestion layer.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV must include a header row and at least one data row")]
    MissingRows,

    #[error("CSV must have columns named item (or name) and score (or value); found [{found}]")]
    MissingColumns { found: String },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    item: usize,
    score: usize,
}

impl Columns {
    fn resolve(header: &csv::StringRecord) -> Result<Self, IngestError> {
        let names: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |candidates: &[&str]| {
            candidates
                .iter()
                .find_map(|c| names.iter().position(|n| n == c))
        };
        match (find(&ITEM_COLUMNS), find(&SCORE_COLUMNS)) {
            (Some(item), Some(score)) => Ok(Self { item, score }),
            _ => Err(IngestError::MissingColumns {
                found: names.join(", "),
            }),
        }
    }
}

/// Parse CSV text into raw records (not yet cleaned).
pub fn parse_csv(text: &str) -> Result<Vec<RawRecord>, IngestError> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(IngestError::MissingRows);
    }
    let body = lines.join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());
    let mut rows = reader.records();

    let header = match rows.next() {
        Some(h) => h?,
        None => return Err(IngestError::MissingRows),
    };
    let columns = Columns::resolve(&header)?;
    debug!(item = columns.item, score = columns.score, "resolved CSV columns");

    let mut records = Vec::with_capacity(lines.len() - 1);
    for row in rows {
        let row = row?;
        let item = row.get(columns.item).unwrap_or("");
        let score = row.get(columns.score).unwrap_or("");
        records.push(RawRecord::new(item, score));
    }
    Ok(records)
}

/// Parse and clean CSV text.
pub fn load_csv_str(text: &str) -> Result<Normalized, IngestError> {
    let records = parse_csv(text)?;
    let normalized = normalize(&records)?;
    if normalized.dropped > 0 {
        warn!(
            dropped = normalized.dropped,
            kept = normalized.items.len(),
            "skipped rows without an item name or numeric score"
        );
    }
    Ok(normalized)
}

/// Read, parse and clean a CSV file.
pub fn load_csv(path: &Path) -> Result<Normalized, IngestError> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_csv_str(&text)
}
