// src/metadata/index_info.rs
use serde::{Deserialize, Serialize};

use crate::metadata::Range;

/// Metadata describing one index dimension of a channel set.
///
/// A channel set carries an ordered list of these; list position corresponds
/// to position within the index tuple of every record. `start`/`end` are
/// cached summary statistics over the rows currently held and must be
/// recomputed whenever the row set changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelIndexInfo {
    /// Short name of the index (e.g. "MD", "TIME").
    pub mnemonic: String,

    /// Unit of measure for index values.
    pub unit: String,

    /// Whether index values grow from row to row.
    pub increasing: bool,

    /// Whether this index is a time index (values are ISO-8601 timestamps
    /// on the wire, epoch seconds in memory).
    pub is_time_index: bool,

    /// Cached first index value across the current rows (NaN when unknown).
    pub start: f64,

    /// Cached last index value across the current rows (NaN when unknown).
    pub end: f64,
}

impl ChannelIndexInfo {
    pub fn new(
        mnemonic: impl Into<String>,
        unit: impl Into<String>,
        increasing: bool,
        is_time_index: bool,
    ) -> Self {
        ChannelIndexInfo {
            mnemonic: mnemonic.into(),
            unit: unit.into(),
            increasing,
            is_time_index,
            start: f64::NAN,
            end: f64::NAN,
        }
    }

    /// Convenience constructor for an increasing depth index.
    pub fn depth(mnemonic: impl Into<String>, unit: impl Into<String>) -> Self {
        ChannelIndexInfo::new(mnemonic, unit, true, false)
    }

    /// Convenience constructor for an increasing time index.
    pub fn time(mnemonic: impl Into<String>, unit: impl Into<String>) -> Self {
        ChannelIndexInfo::new(mnemonic, unit, true, true)
    }

    /// Update the cached start/end statistics.
    pub fn set_range(&mut self, start: f64, end: f64) {
        self.start = start;
        self.end = end;
    }

    /// The cached start/end as a `Range` (NaN bounds read as open).
    pub fn range(&self) -> Range {
        Range::new(finite(self.start), finite(self.end))
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
