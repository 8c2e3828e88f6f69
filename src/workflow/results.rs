use serde_json::Value;

use crate::models::{CompareResult, ResultFilter, ResultRow};

/// Presentation tier of a match percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchSeverity {
    Good,
    Warning,
    Poor,
}

impl MatchSeverity {
    /// `>= 95` is good, `>= 75` a warning, anything lower poor.
    pub fn classify(match_percentage: f64) -> Self {
        if match_percentage >= 95.0 {
            MatchSeverity::Good
        } else if match_percentage >= 75.0 {
            MatchSeverity::Warning
        } else {
            MatchSeverity::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchSeverity::Good => "good",
            MatchSeverity::Warning => "warning",
            MatchSeverity::Poor => "poor",
        }
    }
}

/// Rows visible under a filter. Never mutates or reorders the input.
///
/// Exactly one toggle on narrows the rows by their difference marker; both
/// off or both on shows everything.
pub fn filter_rows<'a>(rows: &'a [ResultRow], filter: ResultFilter) -> Vec<&'a ResultRow> {
    match (filter.diffs_only, filter.matches_only) {
        (true, false) => rows.iter().filter(|row| row.is_difference()).collect(),
        (false, true) => rows.iter().filter(|row| row.is_match()).collect(),
        _ => rows.iter().collect(),
    }
}

/// Read-only view over a [`CompareResult`] and the current filter.
#[derive(Clone, Copy, Debug)]
pub struct ResultsView<'a> {
    result: &'a CompareResult,
    filter: ResultFilter,
}

impl<'a> ResultsView<'a> {
    pub fn new(result: &'a CompareResult, filter: ResultFilter) -> Self {
        Self { result, filter }
    }

    pub fn filter(&self) -> ResultFilter {
        self.filter
    }

    pub fn columns(&self) -> &'a [String] {
        self.result.columns()
    }

    pub fn rows(&self) -> Vec<&'a ResultRow> {
        filter_rows(self.result.rows(), self.filter)
    }

    pub fn total_records(&self) -> u64 {
        self.result.stats().total_records()
    }

    pub fn matched_records(&self) -> u64 {
        self.result.stats().matched_records()
    }

    pub fn unmatched_records(&self) -> u64 {
        self.result.stats().unmatched_records()
    }

    pub fn match_percentage(&self) -> f64 {
        self.result.stats().match_percentage()
    }

    pub fn severity(&self) -> MatchSeverity {
        MatchSeverity::classify(self.match_percentage())
    }

    /// Heading for the row table, counting rows after filtering.
    pub fn preview_label(&self) -> String {
        format!("Preview Results ({} rows)", self.rows().len())
    }

    /// Display strings of one row, in column order. Missing cells render empty.
    pub fn formatted_row(&self, row: &ResultRow) -> Vec<String> {
        self.columns()
            .iter()
            .map(|column| row.get(column).map(format_cell).unwrap_or_default())
            .collect()
    }
}

/// Render one cell for display.
///
/// Null is empty, booleans are `True`/`False`, numbers use thousands
/// separators with at most four decimals.
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(number) => {
            if let Some(n) = number.as_u64() {
                group_thousands(&n.to_string())
            } else if let Some(n) = number.as_i64() {
                format!("-{}", group_thousands(&n.unsigned_abs().to_string()))
            } else {
                number.as_f64().map(format_float).unwrap_or_default()
            }
        }
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let fixed = format!("{:.4}", value.abs());
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let (integer, fraction) = match trimmed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (trimmed, None),
    };

    let mut out = String::new();
    if value.is_sign_negative() && trimmed != "0" {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
