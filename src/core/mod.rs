//! Core analysis for the HRV dashboard.
//!
//! This module contains:
//! - Condition segmentation of a recording
//! - Descriptive statistics for the HR and RMSSD columns
//! - Series extraction for the two charts

pub mod segment;
pub mod series;
pub mod summary;

// Re-export commonly used types
pub use segment::{segment, spans, Labelled, Segment, SegmentSpan};
pub use series::{hr_series, rmssd_ms_series, RMSSD_MS_PER_S};
pub use summary::{describe, ColumnSummary, Summary};
