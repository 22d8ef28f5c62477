//! Condition segmentation.
//!
//! A recording is split into maximal contiguous runs of the same condition
//! label. Each run is reported by its start position and label; its end is
//! implicit (one before the next segment's start, or the end of the
//! recording).

use crate::data::{Condition, Record};
use serde::{Deserialize, Serialize};

/// Anything carrying a condition label.
pub trait Labelled {
    fn label(&self) -> &Condition;
}

impl Labelled for Record {
    fn label(&self) -> &Condition {
        &self.condition
    }
}

impl Labelled for Condition {
    fn label(&self) -> &Condition {
        self
    }
}

/// Start of a maximal run of one condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub start_index: usize,
    pub label: Condition,
}

/// A segment with its inclusive end resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSpan {
    pub start: usize,
    pub end: usize,
    pub label: Condition,
}

impl SegmentSpan {
    /// Number of positions covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Partition `items` into maximal runs of equal label.
///
/// Empty input yields no segments. Segments come out in increasing start
/// order and no two consecutive segments share a label.
pub fn segment<T: Labelled>(items: &[T]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();

    for (i, item) in items.iter().enumerate() {
        let label = item.label();
        let opens_new = match segments.last() {
            Some(open) => open.label != *label,
            None => true,
        };

        if opens_new {
            segments.push(Segment {
                start_index: i,
                label: label.clone(),
            });
        }
    }

    segments
}

/// Resolve the implicit end of every segment for a sequence of `len` items.
pub fn spans(segments: &[Segment], len: usize) -> Vec<SegmentSpan> {
    segments
        .iter()
        .enumerate()
        .map(|(k, seg)| {
            let end = segments
                .get(k + 1)
                .map(|next| next.start_index - 1)
                .unwrap_or_else(|| len.saturating_sub(1));
            SegmentSpan {
                start: seg.start_index,
                end,
                label: seg.label.clone(),
            }
        })
        .collect()
}
