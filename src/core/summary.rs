//! Descriptive statistics for the HR and RMSSD columns.

use crate::data::Recording;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, Distribution, Max, Min};

/// Descriptive summary of one numeric column.
///
/// Quartiles use linear interpolation between the closest ranks. The standard
/// deviation is the sample (n - 1) estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Rows of the summary table, in display order.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Summarise a column of values. `NaN` entries are missing and not counted.
pub fn describe(values: &[f64]) -> ColumnSummary {
    let values: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if values.is_empty() {
        return ColumnSummary {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let data = Data::new(values.clone());

    let std = if values.len() < 2 {
        f64::NAN
    } else {
        data.std_dev().unwrap_or(f64::NAN)
    };

    let mut sorted = values.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    ColumnSummary {
        count: values.len(),
        mean: data.mean().unwrap_or(f64::NAN),
        std,
        min: data.min(),
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.50),
        q75: quantile_sorted(&sorted, 0.75),
        max: data.max(),
    }
}

/// Quantile of already sorted, non-empty values by linear interpolation.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Summary of both columns of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub hr: ColumnSummary,
    /// RMSSD in stored units (seconds)
    pub rmssd: ColumnSummary,
}

impl Summary {
    pub fn from_recording(recording: &Recording) -> Self {
        Self {
            hr: describe(&recording.hr_values()),
            rmssd: describe(&recording.rmssd_values()),
        }
    }

    /// Fixed-width text table with one row per statistic.
    pub fn to_table(&self) -> String {
        let mut out = format!("{:<8}{:>14}{:>14}\n", "", "HR", "RMSSD");
        for ((name, hr), (_, rmssd)) in self.hr.rows().iter().zip(self.rmssd.rows().iter()) {
            out.push_str(&format!(
                "{:<8}{:>14}{:>14}\n",
                name,
                format_stat(*hr),
                format_stat(*rmssd)
            ));
        }
        out
    }
}

/// Format a statistic with six decimals, `NaN` for undefined values.
pub fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.6}")
    }
}
