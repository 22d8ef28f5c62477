//! Parsing of delimited recording files.
//!
//! A recording file has a header row naming at least the `HR`, `RMSSD` and
//! `Condition` columns. Any other columns (such as a leading row number) are
//! ignored. Rows are taken in file order.
//!
//! Empty or `NaN`-like numeric cells are read as missing (`f64::NAN`) and left
//! out of the summary statistics. The condition cell is always required.

use crate::data::types::{Condition, Recording, Source};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

/// Heart rate column name.
pub const HR_COLUMN: &str = "HR";
/// RMSSD column name.
pub const RMSSD_COLUMN: &str = "RMSSD";
/// Condition column name.
pub const CONDITION_COLUMN: &str = "Condition";

/// Cell spellings read as a missing number.
const MISSING_MARKERS: [&str; 6] = ["", "NA", "N/A", "NaN", "nan", "null"];

/// Errors raised while parsing a recording.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The file is not valid delimited text
    Csv(String),
    /// A required column is absent from the header
    MissingColumn(&'static str),
    /// A numeric cell could not be parsed
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
    /// A required cell is empty
    MissingValue { row: usize, column: &'static str },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Csv(e) => write!(f, "Malformed file: {e}"),
            LoadError::MissingColumn(column) => write!(f, "Missing column '{column}'"),
            LoadError::InvalidNumber { row, column, value } => {
                write!(f, "Invalid {column} value '{value}' in row {row}")
            }
            LoadError::MissingValue { row, column } => {
                write!(f, "Missing {column} value in row {row}")
            }
        }
    }
}

impl std::error::Error for LoadError {}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Csv(e.to_string())
    }
}

/// Positions of the required columns within a row.
struct Columns {
    hr: usize,
    rmssd: usize,
    condition: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, LoadError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(LoadError::MissingColumn(name))
        };

        Ok(Self {
            hr: find(HR_COLUMN)?,
            rmssd: find(RMSSD_COLUMN)?,
            condition: find(CONDITION_COLUMN)?,
        })
    }
}

/// Parse a recording from any reader.
pub fn parse_recording<R: Read>(source: Source, reader: R) -> Result<Recording, LoadError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let columns = Columns::locate(reader.headers()?)?;

    let mut rows = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let hr = parse_number(&record, columns.hr, HR_COLUMN, row)?;
        let rmssd = parse_number(&record, columns.rmssd, RMSSD_COLUMN, row)?;
        let condition = match record.get(columns.condition) {
            Some(code) if !code.is_empty() => Condition::from_code(code),
            _ => {
                return Err(LoadError::MissingValue {
                    row,
                    column: CONDITION_COLUMN,
                })
            }
        };

        rows.push((hr, rmssd, condition));
    }

    let recording = Recording::from_rows(source, rows);
    tracing::debug!(
        source = %recording.source(),
        rows = recording.len(),
        "Parsed recording"
    );
    Ok(recording)
}

/// Parse a recording held in memory.
pub fn parse_recording_str(source: Source, content: &str) -> Result<Recording, LoadError> {
    parse_recording(source, content.as_bytes())
}

fn parse_number(
    record: &StringRecord,
    position: usize,
    column: &'static str,
    row: usize,
) -> Result<f64, LoadError> {
    let cell = record.get(position).unwrap_or_default();
    if MISSING_MARKERS.contains(&cell) {
        return Ok(f64::NAN);
    }

    cell.parse::<f64>().map_err(|_| LoadError::InvalidNumber {
        row,
        column,
        value: cell.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
,HR,RMSSD,Condition
0,72.5,0.041,R
1,71.0,0.043,R
2,80.2,0.030,N
3,95.1,0.021,T
";

    #[test]
    fn test_parse_sample() {
        let recording = parse_recording_str(Source::Inline, SAMPLE).unwrap();
        assert_eq!(recording.len(), 4);

        let records = recording.records();
        assert_eq!(records[0].hr, 72.5);
        assert_eq!(records[2].rmssd, 0.030);
        assert_eq!(records[3].condition, Condition::TimePressure);
        assert_eq!(records[3].index, 3);
    }

    #[test]
    fn test_column_order_is_irrelevant() {
        let content = "Condition,RMSSD,HR\nI,0.02,88\n";
        let recording = parse_recording_str(Source::Inline, content).unwrap();
        assert_eq!(recording.records()[0].hr, 88.0);
        assert_eq!(recording.records()[0].rmssd, 0.02);
        assert_eq!(recording.records()[0].condition, Condition::Interruption);
    }

    #[test]
    fn test_missing_column() {
        let content = "HR,Condition\n70,R\n";
        let err = parse_recording_str(Source::Inline, content).unwrap_err();
        assert_eq!(err, LoadError::MissingColumn(RMSSD_COLUMN));
        assert_eq!(err.to_string(), "Missing column 'RMSSD'");
    }

    #[test]
    fn test_empty_input_is_missing_columns() {
        let err = parse_recording_str(Source::Inline, "").unwrap_err();
        assert_eq!(err, LoadError::MissingColumn(HR_COLUMN));
    }

    #[test]
    fn test_header_only_is_empty_recording() {
        let recording = parse_recording_str(Source::Inline, "HR,RMSSD,Condition\n").unwrap();
        assert!(recording.is_empty());
    }

    #[test]
    fn test_invalid_number() {
        let content = "HR,RMSSD,Condition\n70,0.04,R\nfast,0.04,R\n";
        let err = parse_recording_str(Source::Inline, content).unwrap_err();
        assert_eq!(
            err,
            LoadError::InvalidNumber {
                row: 2,
                column: HR_COLUMN,
                value: "fast".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_condition() {
        let content = "HR,RMSSD,Condition\n70,0.04,\n";
        let err = parse_recording_str(Source::Inline, content).unwrap_err();
        assert_eq!(
            err,
            LoadError::MissingValue {
                row: 1,
                column: CONDITION_COLUMN,
            }
        );
    }

    #[test]
    fn test_missing_numbers_read_as_nan() {
        let content = "HR,RMSSD,Condition\n70,,R\nNaN,0.04,R\nNA,nan,N\n72,0.05,N\n";
        let recording = parse_recording_str(Source::Inline, content).unwrap();
        assert_eq!(recording.len(), 4);

        let records = recording.records();
        assert_eq!(records[0].hr, 70.0);
        assert!(records[0].rmssd.is_nan());
        assert!(records[1].hr.is_nan());
        assert!(records[2].hr.is_nan() && records[2].rmssd.is_nan());
        assert_eq!(records[3].rmssd, 0.05);
    }

    #[test]
    fn test_ragged_rows_are_malformed() {
        let content = "HR,RMSSD,Condition\n70,0.04\n";
        let err = parse_recording_str(Source::Inline, content).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }
}
