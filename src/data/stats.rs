//! CSV parsing and top-N ranking by dismissal count.

use csv::{ReaderBuilder, Trim};
use serde::Serialize;
use tracing::debug;

/// Column holding the batter's name.
pub const BATTER_COLUMN: &str = "Batter";
/// Column holding the dismissal count used as the ranking key.
pub const DISMISSALS_COLUMN: &str = "DisDescending";
/// Column holding the batting average against the bowler.
pub const AVERAGE_COLUMN: &str = "Ave";
/// Column holding the career span of the match-up.
pub const SPAN_COLUMN: &str = "Span";

pub const REQUIRED_COLUMNS: [&str; 4] = [BATTER_COLUMN, DISMISSALS_COLUMN, AVERAGE_COLUMN, SPAN_COLUMN];

/// Number of rows kept after ranking.
pub const TOP_N: usize = 5;

/// One batter's record against the bowler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatRow {
    #[serde(rename = "batsman")]
    pub subject: String,
    #[serde(rename = "dismissals")]
    pub dismissal_count: i64,
    pub average: f64,
    pub span: String,
}

/// Rows sorted by descending dismissal count, at most [`TOP_N`] long.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedSet {
    rows: Vec<StatRow>,
}

impl RankedSet {
    /// Stable-sort `rows` by dismissals (descending) and keep the head.
    pub fn from_rows(mut rows: Vec<StatRow>) -> Self {
        rows.sort_by(|a, b| b.dismissal_count.cmp(&a.dismissal_count));
        rows.truncate(TOP_N);
        Self { rows }
    }

    pub fn rows(&self) -> &[StatRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatRow> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a RankedSet {
    type Item = &'a StatRow;
    type IntoIter = std::slice::Iter<'a, StatRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Reasons an uploaded table is rejected.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("CSV file is empty")]
    Empty,
    #[error("CSV must contain: {} (missing: {})", REQUIRED_COLUMNS.join(", "), .0.join(", "))]
    MissingColumns(Vec<&'static str>),
    #[error("CSV could not be parsed: {0}")]
    Malformed(#[from] csv::Error),
    #[error("row {row}: {column} value {value:?} is not a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Parse a delimited table and return its top rows by dismissal count.
///
/// A header-only table yields an empty set. Every data row is parsed before
/// ranking, so a bad number anywhere rejects the whole upload.
pub fn rank(table: &[u8]) -> Result<RankedSet, IngestError> {
    let rows = parse_rows(table)?;
    debug!(rows = rows.len(), "parsed stat rows");
    Ok(RankedSet::from_rows(rows))
}

fn parse_rows(table: &[u8]) -> Result<Vec<StatRow>, IngestError> {
    if table.iter().all(u8::is_ascii_whitespace) {
        return Err(IngestError::Empty);
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Fields)
        .from_reader(table);

    let headers = reader.headers()?.clone();
    let indices = REQUIRED_COLUMNS.map(|name| headers.iter().position(|h| h == name));
    let [Some(batter), Some(dismissals), Some(average), Some(span)] = indices else {
        let missing = REQUIRED_COLUMNS
            .iter()
            .zip(&indices)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| *name)
            .collect();
        return Err(IngestError::MissingColumns(missing));
    };

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        let field = |i: usize| record.get(i).unwrap_or_default();
        rows.push(StatRow {
            subject: field(batter).to_string(),
            dismissal_count: parse_number(field(dismissals), row, DISMISSALS_COLUMN)?,
            average: parse_average(field(average), row)?,
            span: field(span).to_string(),
        });
    }
    Ok(rows)
}

/// Averages must be finite; `NaN` and `inf` parse as `f64` but have no JSON form.
fn parse_average(value: &str, row: usize) -> Result<f64, IngestError> {
    let average: f64 = parse_number(value, row, AVERAGE_COLUMN)?;
    if average.is_finite() {
        Ok(average)
    } else {
        Err(IngestError::InvalidNumber {
            row,
            column: AVERAGE_COLUMN,
            value: value.to_string(),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    value: &str,
    row: usize,
    column: &'static str,
) -> Result<T, IngestError> {
    value.parse().map_err(|_| IngestError::InvalidNumber {
        row,
        column,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(subject: &str, dismissals: i64) -> StatRow {
        StatRow {
            subject: subject.into(),
            dismissal_count: dismissals,
            average: 0.0,
            span: String::new(),
        }
    }

    #[test]
    fn ties_keep_upload_order() {
        let ranked = RankedSet::from_rows(vec![row("A", 3), row("B", 7), row("C", 3), row("D", 7)]);
        let names: Vec<_> = ranked.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(names, ["B", "D", "A", "C"]);
    }

    #[test]
    fn header_order_does_not_matter() {
        let csv = "Span,Ave,Mat,Batter,DisDescending\n2011-2019,31.5,12,Root,9\n";
        let ranked = rank(csv.as_bytes()).unwrap();
        assert_eq!(ranked.rows()[0].subject, "Root");
        assert_eq!(ranked.rows()[0].dismissal_count, 9);
        assert_eq!(ranked.rows()[0].span, "2011-2019");
    }

    #[test]
    fn column_names_are_case_sensitive() {
        let csv = "batter,DisDescending,Ave,Span\nX,1,2.0,2010\n";
        match rank(csv.as_bytes()) {
            Err(IngestError::MissingColumns(missing)) => assert_eq!(missing, vec!["Batter"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn whitespace_only_upload_is_empty() {
        assert!(matches!(rank(b"  \n"), Err(IngestError::Empty)));
    }
}
