//! Normalizer: turns loosely typed candidate records into clean `ScoredItem`s.
//!
//! Validation happens once, here. Everything downstream can assume non-empty
//! trimmed item names and finite scores.

use serde::{Deserialize, Serialize};

use crate::domain::ScoredItem;
use crate::error::AnalysisError;

/// A score as it arrived from ingestion: already numeric, or still text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawScore {
    Number(f64),
    Text(String),
}

impl RawScore {
    /// Coerce to a finite number, or `None`.
    ///
    /// Text is trimmed before parsing; empty text is not a number.
    pub fn to_finite(&self) -> Option<f64> {
        let value = match self {
            RawScore::Number(v) => *v,
            RawScore::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawScore {
    fn from(v: f64) -> Self {
        RawScore::Number(v)
    }
}

impl From<&str> for RawScore {
    fn from(s: &str) -> Self {
        RawScore::Text(s.to_string())
    }
}

impl From<String> for RawScore {
    fn from(s: String) -> Self {
        RawScore::Text(s)
    }
}

/// An uncleaned candidate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub item: String,
    pub score: RawScore,
}

impl RawRecord {
    pub fn new(item: impl Into<String>, score: impl Into<RawScore>) -> Self {
        Self {
            item: item.into(),
            score: score.into(),
        }
    }

    fn clean(&self) -> Option<ScoredItem> {
        let item = self.item.trim();
        if item.is_empty() {
            return None;
        }
        let score = self.score.to_finite()?;
        Some(ScoredItem::new(item, score))
    }
}

/// Output of [`normalize`]: the clean list in input order plus a drop count.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub items: Vec<ScoredItem>,
    pub dropped: usize,
}

/// Clean raw records, preserving input order.
///
/// Records with an empty (after trimming) item or a non-finite score are
/// dropped. Duplicated item names are kept as distinct entries. Fewer than
/// two surviving records is fatal.
pub fn normalize<'a, I>(records: I) -> Result<Normalized, AnalysisError>
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut items = Vec::new();
    let mut dropped = 0;
    for record in records {
        match record.clean() {
            Some(item) => items.push(item),
            None => dropped += 1,
        }
    }

    if items.len() < 2 {
        return Err(AnalysisError::InsufficientData { valid: items.len() });
    }

    Ok(Normalized { items, dropped })
}
