//! Record types for a subject's HR / RMSSD recording.

use serde::{Deserialize, Serialize};

/// Experimental phase applied to a contiguous block of the recording.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// `R`
    Relax,
    /// `N`
    Neutral,
    /// `T` - stressor "Time pressure"
    TimePressure,
    /// `I` - stressor "Interruption"
    Interruption,
    /// Any code outside the known alphabet, kept verbatim.
    Other(String),
}

impl Condition {
    /// Parse a condition code as stored in the recording.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "R" => Condition::Relax,
            "N" => Condition::Neutral,
            "T" => Condition::TimePressure,
            "I" => Condition::Interruption,
            other => Condition::Other(other.to_string()),
        }
    }

    /// Short code as stored in the recording and shown on the charts.
    pub fn code(&self) -> &str {
        match self {
            Condition::Relax => "R",
            Condition::Neutral => "N",
            Condition::TimePressure => "T",
            Condition::Interruption => "I",
            Condition::Other(code) => code.as_str(),
        }
    }

    /// Human readable description.
    pub fn description(&self) -> &str {
        match self {
            Condition::Relax => "Relax",
            Condition::Neutral => "Neutral",
            Condition::TimePressure => "Stressor 'Time pressure'",
            Condition::Interruption => "Stressor 'Interruption'",
            Condition::Other(code) => code.as_str(),
        }
    }

    /// The known conditions, in legend order.
    pub fn known() -> [Condition; 4] {
        [
            Condition::Relax,
            Condition::Neutral,
            Condition::TimePressure,
            Condition::Interruption,
        ]
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Condition {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        Ok(Condition::from_code(&code))
    }
}

/// Legend describing the condition codes, one line per code.
pub fn condition_legend() -> Vec<String> {
    Condition::known()
        .iter()
        .map(|c| format!("{} = {}", c.code(), c.description()))
        .collect()
}

/// One observation (one minute) of a recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Zero-based position, used as the time axis (minutes)
    pub index: usize,
    /// Heart rate in beats per minute
    pub hr: f64,
    /// RMSSD in seconds
    pub rmssd: f64,
    /// Condition label
    pub condition: Condition,
}

/// Where a recording was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "snake_case")]
pub enum Source {
    Remote(String),
    File(String),
    Inline,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Remote(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{path}"),
            Source::Inline => write!(f, "<inline>"),
        }
    }
}

/// The ordered records of one subject.
///
/// Records are indexed by position; `records[i].index == i` always holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recording {
    source: Source,
    records: Vec<Record>,
}

impl Recording {
    /// Build a recording from row values, assigning positional indices.
    pub fn from_rows<I>(source: Source, rows: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64, Condition)>,
    {
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(index, (hr, rmssd, condition))| Record {
                index,
                hr,
                rmssd,
                condition,
            })
            .collect();
        Self { source, records }
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// HR column.
    pub fn hr_values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.hr).collect()
    }

    /// RMSSD column, in stored units (seconds).
    pub fn rmssd_values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.rmssd).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_codes() {
        for condition in Condition::known() {
            assert_eq!(Condition::from_code(condition.code()), condition);
        }
        assert_eq!(Condition::from_code(" T "), Condition::TimePressure);
        assert_eq!(
            Condition::from_code("X"),
            Condition::Other("X".to_string())
        );
        assert_eq!(Condition::Other("X".to_string()).code(), "X");
    }

    #[test]
    fn test_condition_legend() {
        let legend = condition_legend();
        assert_eq!(
            legend,
            vec![
                "R = Relax",
                "N = Neutral",
                "T = Stressor 'Time pressure'",
                "I = Stressor 'Interruption'",
            ]
        );
    }

    #[test]
    fn test_recording_assigns_positions() {
        let recording = Recording::from_rows(
            Source::Inline,
            vec![
                (70.0, 0.05, Condition::Relax),
                (72.0, 0.04, Condition::Relax),
                (90.0, 0.02, Condition::TimePressure),
            ],
        );
        assert_eq!(recording.len(), 3);
        for (i, record) in recording.records().iter().enumerate() {
            assert_eq!(record.index, i);
        }
        assert_eq!(recording.hr_values(), vec![70.0, 72.0, 90.0]);
    }

    #[test]
    fn test_condition_serializes_as_code() {
        let json = serde_json::to_string(&Condition::Interruption).unwrap();
        assert_eq!(json, "\"I\"");
        let back: Condition = serde_json::from_str("\"N\"").unwrap();
        assert_eq!(back, Condition::Neutral);
    }
}
