use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ReconError;

/// Reserved row field the engine sets to `true` for mismatched rows.
pub const DIFFERENCE_FIELD: &str = "Difference";

/// Aggregate statistics of a run.
///
/// Invariant: `matched_records <= total_records`. The match percentage is
/// always derived from the two counts and cannot be set independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompareStats {
    total_records: u64,
    matched_records: u64,
}

impl CompareStats {
    pub fn new(total_records: u64, matched_records: u64) -> Result<Self, ReconError> {
        if matched_records > total_records {
            return Err(ReconError::Run(format!(
                "Backend reported {matched_records} matched records out of {total_records}"
            )));
        }
        Ok(Self {
            total_records,
            matched_records,
        })
    }

    pub fn total_records(&self) -> u64 {
        self.total_records
    }

    pub fn matched_records(&self) -> u64 {
        self.matched_records
    }

    pub fn unmatched_records(&self) -> u64 {
        self.total_records - self.matched_records
    }

    /// `100 * matched / total`, or 0 when there are no records.
    pub fn match_percentage(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            100.0 * self.matched_records as f64 / self.total_records as f64
        }
    }
}

/// One output row: column name to scalar value, in output column order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRow(IndexMap<String, Value>);

impl ResultRow {
    pub fn new(values: IndexMap<String, Value>) -> Self {
        Self(values)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// The difference marker is exactly `true`.
    pub fn is_difference(&self) -> bool {
        matches!(self.0.get(DIFFERENCE_FIELD), Some(Value::Bool(true)))
    }

    /// The difference marker is exactly `false`.
    pub fn is_match(&self) -> bool {
        matches!(self.0.get(DIFFERENCE_FIELD), Some(Value::Bool(false)))
    }
}

impl FromIterator<(String, Value)> for ResultRow {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Opaque handle to the downloadable artifact of a completed run.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadToken(String);

impl DownloadToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// View-only row filter toggles. Not persisted; reset on every new result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResultFilter {
    pub diffs_only: bool,
    pub matches_only: bool,
}

impl ResultFilter {
    pub const ALL: ResultFilter = ResultFilter {
        diffs_only: false,
        matches_only: false,
    };
    pub const DIFFS_ONLY: ResultFilter = ResultFilter {
        diffs_only: true,
        matches_only: false,
    };
    pub const MATCHES_ONLY: ResultFilter = ResultFilter {
        diffs_only: false,
        matches_only: true,
    };
}

/// Statistics block exactly as the engine sends it.
#[derive(Clone, Debug, Deserialize)]
pub struct WireStats {
    pub total_records: u64,
    pub matched_records: u64,
    /// Sent by the engine but recomputed locally.
    #[serde(default)]
    pub match_percentage: Option<f64>,
}

/// Body of a successful compare response.
#[derive(Clone, Debug, Deserialize)]
pub struct CompareResponse {
    pub stats: WireStats,
    pub columns: Vec<String>,
    pub rows: Vec<ResultRow>,
    pub download_token: DownloadToken,
}

/// Outcome of one successful run. Replaced wholesale by the next run.
#[derive(Clone, Debug, PartialEq)]
pub struct CompareResult {
    stats: CompareStats,
    columns: Vec<String>,
    rows: Vec<ResultRow>,
    download_token: DownloadToken,
}

impl CompareResult {
    pub fn new(
        stats: CompareStats,
        columns: Vec<String>,
        rows: Vec<ResultRow>,
        download_token: DownloadToken,
    ) -> Self {
        Self {
            stats,
            columns,
            rows,
            download_token,
        }
    }

    pub fn stats(&self) -> &CompareStats {
        &self.stats
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn download_token(&self) -> &DownloadToken {
        &self.download_token
    }
}

impl TryFrom<CompareResponse> for CompareResult {
    type Error = ReconError;

    fn try_from(response: CompareResponse) -> Result<Self, Self::Error> {
        let stats = CompareStats::new(response.stats.total_records, response.stats.matched_records)?;
        Ok(Self::new(
            stats,
            response.columns,
            response.rows,
            response.download_token,
        ))
    }
}
