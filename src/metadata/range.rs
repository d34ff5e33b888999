// src/metadata/range.rs
use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::types::time_seconds;

/// A closed interval over an index dimension.
///
/// Either bound may be absent (an open end). Index values are carried as
/// f64 regardless of origin: depth values directly, time values as epoch
/// seconds. Direction-aware comparisons take the `increasing` flag of the
/// owning index so that "after" and "before" invert for decreasing logs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Range {
    start: Option<f64>,
    end: Option<f64>,
}

impl Range {
    pub fn new(start: Option<f64>, end: Option<f64>) -> Self {
        Range { start, end }
    }

    /// Parse textual bounds into a range.
    ///
    /// When `is_time_index` is set the bounds are ISO-8601 timestamps,
    /// otherwise plain numbers. Unparsable or empty text yields an unset
    /// bound rather than an error: absence of data at one end is a normal
    /// condition, not a failure.
    pub fn parse(start_text: Option<&str>, end_text: Option<&str>, is_time_index: bool) -> Self {
        Range {
            start: parse_bound(start_text, is_time_index),
            end: parse_bound(end_text, is_time_index),
        }
    }

    pub fn start(&self) -> Option<f64> {
        self.start
    }

    pub fn end(&self) -> Option<f64> {
        self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// True when the range begins after `value` under the given direction,
    /// i.e. a record at `value` lies before the queried window and should
    /// be skipped. Always false for an open start.
    pub fn starts_after(&self, value: f64, increasing: bool) -> bool {
        match self.start {
            Some(start) if increasing => start > value,
            Some(start) => start < value,
            None => false,
        }
    }

    /// True when the range ends before `value` under the given direction,
    /// i.e. the queried window is exhausted and iteration can stop.
    pub fn ends_before(&self, value: f64, increasing: bool) -> bool {
        match self.end {
            Some(end) if increasing => end < value,
            Some(end) => end > value,
            None => false,
        }
    }

    /// True when `value` falls within both bounds under the given direction.
    pub fn contains(&self, value: f64, increasing: bool) -> bool {
        !self.starts_after(value, increasing) && !self.ends_before(value, increasing)
    }
}

fn parse_bound(text: Option<&str>, is_time_index: bool) -> Option<f64> {
    let text = text.map(str::trim).filter(|t| !t.is_empty())?;
    if is_time_index {
        DateTime::parse_from_rfc3339(text).ok().map(|dt| time_seconds(&dt))
    } else {
        text.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}
