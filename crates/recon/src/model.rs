use std::borrow::Cow;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single cell as produced by the file parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Whether the cell carries a usable value. Empty text, zero and NaN do not,
    /// so a column holding one of them falls through to the next candidate.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Text(s) => !s.is_empty(),
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
        }
    }

    /// Text form of the cell. Numbers use shortest round-trip formatting
    /// (`100`, `12.5`), never a trailing `.0`.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

/// One source row: column name → cell, in source column order.
pub type RawRow = IndexMap<String, CellValue>;

/// Which side of the reconciliation a row comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Ledger,
    Platform,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ledger => write!(f, "ledger"),
            Self::Platform => write!(f, "platform"),
        }
    }
}

/// A normalized row. Only built for rows with a non-empty identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub role: Role,
    pub identifier: String,
    pub amount: f64,
    pub raw: RawRow,
}

/// Both datasets plus the label stamped on every result.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub ledger: Vec<RawRow>,
    pub platform: Vec<RawRow>,
    pub source_label: String,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Ok,
    Mismatch,
    ExtraInPlatform,
    MissingInPlatform,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Mismatch => "MISMATCH",
            Self::ExtraInPlatform => "EXTRA_IN_PLATFORM",
            Self::MissingInPlatform => "MISSING_IN_PLATFORM",
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified outcome. `details` is the platform row, or the ledger row
/// for `MISSING_IN_PLATFORM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub identifier: String,
    pub source_label: String,
    pub ledger_amount: f64,
    pub platform_amount: f64,
    pub difference: f64,
    pub status: MatchStatus,
    pub details: RawRow,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub ok: usize,
    pub mismatch: usize,
    pub extra_in_platform: usize,
    pub missing_in_platform: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconSummary {
    pub ledger_total: f64,
    pub platform_total: f64,
    pub difference: f64,
    pub total_results: usize,
    pub counts: StatusCounts,
}

impl ReconSummary {
    /// True when every result is `OK` (an empty run counts as reconciled).
    pub fn is_reconciled(&self) -> bool {
        self.counts.ok == self.total_results
    }

    pub fn discrepancies(&self) -> usize {
        self.total_results - self.counts.ok
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconMeta {
    pub source_label: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub results: Vec<MatchResult>,
}
