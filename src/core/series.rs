//! Chart series extraction.

use crate::data::Record;

/// Milliseconds per second, for displaying RMSSD.
pub const RMSSD_MS_PER_S: f64 = 1000.0;

/// `(minute, bpm)` points.
pub fn hr_series(records: &[Record]) -> Vec<(f64, f64)> {
    records.iter().map(|r| (r.index as f64, r.hr)).collect()
}

/// `(minute, ms)` points; RMSSD is stored in seconds.
pub fn rmssd_ms_series(records: &[Record]) -> Vec<(f64, f64)> {
    records
        .iter()
        .map(|r| (r.index as f64, r.rmssd * RMSSD_MS_PER_S))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Condition, Recording, Source};

    fn recording() -> Recording {
        Recording::from_rows(
            Source::Inline,
            vec![
                (70.0, 0.0412, Condition::Relax),
                (75.5, 0.0359, Condition::Neutral),
                (88.0, 0.0123, Condition::TimePressure),
            ],
        )
    }

    #[test]
    fn test_rmssd_is_scaled_to_ms() {
        let recording = recording();
        let series = rmssd_ms_series(recording.records());

        for (record, (x, y)) in recording.records().iter().zip(series.iter()) {
            assert_eq!(*x, record.index as f64);
            assert!((y - record.rmssd * 1000.0).abs() < 1e-9);
        }
        assert!((series[0].1 - 41.2).abs() < 1e-9);
    }

    #[test]
    fn test_hr_series_is_unscaled() {
        let recording = recording();
        let series = hr_series(recording.records());
        assert_eq!(series, vec![(0.0, 70.0), (1.0, 75.5), (2.0, 88.0)]);
    }
}
