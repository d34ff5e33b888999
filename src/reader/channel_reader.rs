// src/reader/channel_reader.rs
use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use log::debug;
use serde_json::Value;

use crate::error::Result;
use crate::metadata::{ChannelIndexInfo, Range};
use crate::reader::parse::{self, Record};
use crate::types::CellValue;

/// Column projection applied by `slice`: which source data columns are
/// visible, in what order, and under what names.
#[derive(Debug, Clone)]
struct Projection {
    ordinals: Vec<usize>,
    mnemonics: Vec<String>,
    units: Vec<String>,
    null_tokens: Vec<Option<String>>,
}

/// Randomly-accessible tabular cursor over multi-channel, multi-index
/// well-log data.
///
/// A reader is constructed once from a complete data blob and is a read-only
/// view thereafter; the only mutable state is the forward-only cursor and an
/// optional column projection. Combined ordinals span index columns followed
/// by data columns: ordinal `i < depth()` addresses an index value, ordinals
/// `depth()..depth() + field_count()` address channel values.
///
/// Per-value access is tolerant by contract: coercion failures read as NaN
/// or empty rather than erroring, because real-world log data mixes numeric
/// placeholders, null tokens, and quality-flagged values freely.
#[derive(Debug, Clone)]
pub struct ChannelDataReader {
    records: Vec<Record>,
    mnemonics: Vec<String>,
    units: Vec<String>,
    indices: Vec<ChannelIndexInfo>,
    depth: usize,
    field_count: usize,
    projection: Option<Projection>,
    current: Option<usize>,
    uri: String,
    id: String,
}

impl ChannelDataReader {
    /// Construct a reader from a JSON array-of-rows blob.
    ///
    /// `mnemonics` and `units` are parallel arrays naming the data channels
    /// (index columns are described separately via `with_indices`). An
    /// empty, whitespace, or `null` blob yields an empty reader; malformed
    /// JSON is a construction-time error.
    pub fn new(data: &str, mnemonics: Vec<String>, units: Vec<String>) -> Result<Self> {
        Ok(Self::from_records(
            parse::parse_document(data)?,
            mnemonics,
            units,
        ))
    }

    /// Construct a reader from flat delimited text rows.
    ///
    /// Each row is `index[,secondaryIndex...],value1,value2,...` with the
    /// first `index_count` tokens forming the index tuple. Tokens are
    /// normalized exactly as the JSON form would carry them.
    pub fn from_delimited(
        rows: &[String],
        index_count: usize,
        mnemonics: Vec<String>,
        units: Vec<String>,
    ) -> Self {
        Self::from_records(parse::parse_delimited(rows, index_count), mnemonics, units)
    }

    /// An empty reader: zero rows, zero columns.
    pub fn empty() -> Self {
        Self::from_records(Vec::new(), Vec::new(), Vec::new())
    }

    pub(crate) fn from_records(
        records: Vec<Record>,
        mnemonics: Vec<String>,
        units: Vec<String>,
    ) -> Self {
        // Row 0 is canonical for the dataset shape; shorter rows read as
        // null in the missing cells.
        let depth = records.first().map(|r| r.indices().len()).unwrap_or(0);
        let field_count = records.first().map(|r| r.values().len()).unwrap_or(0);

        let mut mnemonics = mnemonics;
        let mut units = units;
        while mnemonics.len() < field_count {
            mnemonics.push(String::new());
        }
        while units.len() < field_count {
            units.push(String::new());
        }

        ChannelDataReader {
            records,
            mnemonics,
            units,
            indices: Vec::new(),
            depth,
            field_count,
            projection: None,
            current: None,
            uri: String::new(),
            id: String::new(),
        }
    }

    /// Attach index-dimension metadata, recomputing each dimension's cached
    /// start/end from the rows currently held.
    pub fn with_indices(mut self, indices: Vec<ChannelIndexInfo>) -> Self {
        self.indices = indices;
        for dimension in 0..self.indices.len() {
            let range = self.get_index_range(dimension);
            self.indices[dimension].set_range(
                range.start().unwrap_or(f64::NAN),
                range.end().unwrap_or(f64::NAN),
            );
        }
        self
    }

    /// Tag this reader with the URI of the source domain object.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = uri.into();
        self
    }

    /// Tag this reader with the identifier of the source domain object.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    // ---- shape metadata ----

    /// Number of index dimensions (e.g. 1 for depth logs, 2 for a
    /// depth+time dual-index channel set).
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of visible data-channel columns (after slicing, the size of
    /// the projection).
    pub fn field_count(&self) -> usize {
        match &self.projection {
            Some(p) => p.ordinals.len(),
            None => self.field_count,
        }
    }

    /// Total number of rows held by this reader.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Visible data-channel mnemonics, in column order.
    pub fn mnemonics(&self) -> &[String] {
        match &self.projection {
            Some(p) => &p.mnemonics,
            None => &self.mnemonics,
        }
    }

    /// Visible data-channel units, parallel to `mnemonics`.
    pub fn units(&self) -> &[String] {
        match &self.projection {
            Some(p) => &p.units,
            None => &self.units,
        }
    }

    /// Index mnemonics followed by visible data-channel mnemonics.
    pub fn all_mnemonics(&self) -> Vec<String> {
        self.indices
            .iter()
            .map(|i| i.mnemonic.clone())
            .chain(self.mnemonics().iter().cloned())
            .collect()
    }

    /// Index units followed by visible data-channel units.
    pub fn all_units(&self) -> Vec<String> {
        self.indices
            .iter()
            .map(|i| i.unit.clone())
            .chain(self.units().iter().cloned())
            .collect()
    }

    /// Index-dimension metadata attached to this reader.
    pub fn indices(&self) -> &[ChannelIndexInfo] {
        &self.indices
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Combined ordinal for a data-channel mnemonic, usable directly with
    /// the `get_*` accessors. Index mnemonics are not resolvable by name;
    /// index-dimension lookup is by position.
    pub fn get_ordinal(&self, mnemonic: &str) -> Option<usize> {
        self.mnemonics()
            .iter()
            .position(|m| m == mnemonic)
            .map(|position| self.depth + position)
    }

    /// The full row set as a stateless random-access view, independent of
    /// cursor position. Records expose raw cells, quality flags included.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    // ---- cursor ----

    /// Advance the cursor to the next row. Returns false once exhausted.
    pub fn read(&mut self) -> bool {
        let next = match self.current {
            None => 0,
            Some(position) => position + 1,
        };
        if next < self.records.len() {
            self.current = Some(next);
            true
        } else {
            self.current = Some(self.records.len());
            false
        }
    }

    /// Return the cursor to the pre-first position.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Release the row set. Subsequent reads return false.
    pub fn close(&mut self) {
        self.records = Vec::new();
        self.current = None;
    }

    fn current_record(&self) -> Option<&Record> {
        self.current.and_then(|position| self.records.get(position))
    }

    // ---- typed accessors (current row) ----

    /// The value at combined ordinal `i` for the current row.
    ///
    /// Quality-flagged pairs collapse to their numeric component; cells
    /// beyond the row's actual length, unknown ordinals, and an invalid
    /// cursor all read as `Null`.
    pub fn get_value(&self, i: usize) -> CellValue {
        let Some(record) = self.current_record() else {
            return CellValue::Null;
        };
        if i < self.depth {
            return record
                .indices()
                .get(i)
                .cloned()
                .unwrap_or(CellValue::Null);
        }

        let column = i - self.depth;
        let source = match &self.projection {
            Some(p) => match p.ordinals.get(column) {
                Some(&ordinal) => ordinal,
                None => return CellValue::Null,
            },
            None if column < self.field_count => column,
            None => return CellValue::Null,
        };
        record
            .values()
            .get(source)
            .map(CellValue::effective)
            .unwrap_or(CellValue::Null)
    }

    /// Fill `buffer` with the current row's values (index columns followed
    /// by visible data columns) and return the count. Returns 0 when the
    /// cursor is not on a valid row.
    pub fn get_values(&self, buffer: &mut Vec<CellValue>) -> usize {
        buffer.clear();
        if self.current_record().is_none() {
            return 0;
        }
        let total = self.depth + self.field_count();
        for i in 0..total {
            buffer.push(self.get_value(i));
        }
        total
    }

    /// Numeric value at ordinal `i`; NaN when the cell does not parse.
    pub fn get_double(&self, i: usize) -> f64 {
        self.get_value(i).as_f64()
    }

    pub fn get_float(&self, i: usize) -> f32 {
        self.get_value(i).as_f32()
    }

    /// Textual value at ordinal `i`; empty when the cell is null.
    pub fn get_string(&self, i: usize) -> String {
        self.get_value(i).as_string()
    }

    /// True iff the cell text equals "true", case-insensitive.
    pub fn get_boolean(&self, i: usize) -> bool {
        self.get_value(i).as_bool()
    }

    /// ISO-8601 timestamp at ordinal `i`, if the cell parses as one.
    pub fn get_date_time(&self, i: usize) -> Option<DateTime<FixedOffset>> {
        self.get_value(i).as_date_time()
    }

    /// Whole epoch seconds at ordinal `i`, for timestamp or numeric cells.
    pub fn get_unix_time_seconds(&self, i: usize) -> Option<i64> {
        self.get_value(i).as_unix_time_seconds()
    }

    /// True when the cell holds no value. Besides the standard null tokens,
    /// a sliced column's requested null-value token also counts as absent.
    pub fn is_null(&self, i: usize) -> bool {
        let value = self.get_value(i);
        if value.is_null() {
            return true;
        }
        if i >= self.depth {
            if let Some(p) = &self.projection {
                if let Some(Some(token)) = p.null_tokens.get(i - self.depth) {
                    return value.as_string() == *token;
                }
            }
        }
        false
    }

    /// Numeric position of the current row along the given index dimension.
    pub fn get_index_value(&self, dimension: usize) -> f64 {
        self.current_record()
            .map(|record| record.index_value(dimension))
            .unwrap_or(f64::NAN)
    }

    /// The current row serialized as an `[indices, values]` JSON pair with
    /// the visible projection applied, or None when the cursor is not on a
    /// valid row.
    pub fn get_json(&self) -> Option<String> {
        let record = self.current_record()?;
        let indices: Vec<Value> = record.indices().iter().map(CellValue::to_json).collect();
        let values: Vec<Value> = (0..self.field_count())
            .map(|column| self.get_value(self.depth + column).to_json())
            .collect();
        Some(Value::Array(vec![Value::Array(indices), Value::Array(values)]).to_string())
    }

    // ---- range queries ----

    /// The index range of the dataset along one dimension: the dimension
    /// value of the first record through that of the last. O(1) beyond the
    /// initial parse; monotonic ordering is trusted, not re-verified.
    pub fn get_index_range(&self, dimension: usize) -> Range {
        let (Some(first), Some(last)) = (self.records.first(), self.records.last()) else {
            return Range::default();
        };
        Range::new(
            finite(first.index_value(dimension)),
            finite(last.index_value(dimension)),
        )
    }

    /// The occupied primary-index range of one channel.
    ///
    /// Unlike `get_index_range` this scans every row, because a sparse
    /// channel may be null on many of them: the result spans the first
    /// through last rows where the channel actually has a value, which may
    /// be a strict subset of the dataset range. A channel with no populated
    /// rows falls back to the dataset's own index range. Ordinals below
    /// `depth()` delegate to `get_index_range`.
    pub fn get_channel_index_range(&self, i: usize) -> Range {
        if self.records.is_empty() {
            return Range::default();
        }
        if i < self.depth {
            return self.get_index_range(i);
        }

        let column = i - self.depth;
        let source = match &self.projection {
            Some(p) => match p.ordinals.get(column) {
                Some(&ordinal) => ordinal,
                None => return self.get_index_range(0),
            },
            None if column < self.field_count => column,
            None => return self.get_index_range(0),
        };

        let mut start = None;
        let mut end = None;
        for record in &self.records {
            let populated = record
                .values()
                .get(source)
                .map(|cell| !cell.is_null())
                .unwrap_or(false);
            if !populated {
                continue;
            }
            let position = record.index_value(0);
            if start.is_none() {
                start = finite(position);
            }
            end = finite(position);
        }

        if start.is_none() {
            return self.get_index_range(0);
        }
        Range::new(start, end)
    }

    // ---- slicing ----

    /// Narrow and reorder the visible data channels to a caller-specified
    /// projection.
    ///
    /// Each map is keyed by desired output-column position; `mnemonics`
    /// names the source column wanted at that position, with `units`,
    /// `data_types`, and `null_values` carried in parallel. Requested
    /// mnemonics that name an index dimension are kept in the maps but do
    /// not join the data projection (index columns always survive a slice);
    /// requested mnemonics that exist nowhere in the source are silently
    /// removed from all four maps rather than erroring.
    pub fn slice(
        &mut self,
        mnemonics: &mut BTreeMap<usize, String>,
        units: &mut BTreeMap<usize, String>,
        data_types: &mut BTreeMap<usize, String>,
        null_values: &mut BTreeMap<usize, String>,
    ) {
        let mut projection = Projection {
            ordinals: Vec::new(),
            mnemonics: Vec::new(),
            units: Vec::new(),
            null_tokens: Vec::new(),
        };
        let mut dropped = Vec::new();

        for (&position, mnemonic) in mnemonics.iter() {
            if self.indices.iter().any(|info| info.mnemonic == *mnemonic) {
                continue;
            }
            match self.mnemonics.iter().position(|m| m == mnemonic) {
                Some(source) => {
                    projection.ordinals.push(source);
                    projection.mnemonics.push(mnemonic.clone());
                    projection.units.push(
                        units
                            .get(&position)
                            .or_else(|| self.units.get(source))
                            .cloned()
                            .unwrap_or_default(),
                    );
                    projection.null_tokens.push(null_values.get(&position).cloned());
                }
                None => {
                    debug!("slice dropped unknown mnemonic {:?}", mnemonic);
                    dropped.push(position);
                }
            }
        }

        for position in dropped {
            mnemonics.remove(&position);
            units.remove(&position);
            data_types.remove(&position);
            null_values.remove(&position);
        }

        self.projection = Some(projection);
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &str, mnemonics: &[&str]) -> ChannelDataReader {
        ChannelDataReader::new(
            data,
            mnemonics.iter().map(|m| m.to_string()).collect(),
            mnemonics.iter().map(|_| "unitless".to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_reader() {
        let mut r = ChannelDataReader::empty();
        assert_eq!(r.depth(), 0);
        assert_eq!(r.field_count(), 0);
        assert_eq!(r.record_count(), 0);
        assert!(!r.read());
    }

    #[test]
    fn test_shape_derivation() {
        let r = reader(
            r#"[[[100.0],[1.0,2.0,3.0]],[[101.0],[4.0,5.0,6.0]]]"#,
            &["A", "B", "C"],
        );
        assert_eq!(r.depth(), 1);
        assert_eq!(r.field_count(), 3);
        assert_eq!(r.record_count(), 2);
    }

    #[test]
    fn test_cursor_semantics() {
        let mut r = reader(r#"[[[100.0],[1.0]],[[101.0],[2.0]]]"#, &["A"]);

        // off-cursor access degrades to null
        assert!(r.get_value(0).is_null());
        assert!(r.get_json().is_none());

        assert!(r.read());
        assert_eq!(r.get_double(0), 100.0);
        assert!(r.read());
        assert_eq!(r.get_double(0), 101.0);
        assert!(!r.read());
        assert!(!r.read());
        assert!(r.get_json().is_none());

        r.reset();
        assert!(r.read());
        assert_eq!(r.get_double(0), 100.0);
    }

    #[test]
    fn test_combined_ordinals() {
        let mut r = reader(r#"[[[100.0],[1.5,"SHALE"]]]"#, &["ROP", "LITH"]);
        r.read();

        assert_eq!(r.get_double(0), 100.0); // index column
        assert_eq!(r.get_double(1), 1.5);
        assert_eq!(r.get_string(2), "SHALE");
        assert_eq!(r.get_ordinal("LITH"), Some(2));
        assert_eq!(r.get_ordinal("MD"), None);
    }

    #[test]
    fn test_short_row_pads_with_null() {
        let mut r = reader(r#"[[[100.0],[1.0,2.0]],[[101.0],[3.0]]]"#, &["A", "B"]);
        r.read();
        r.read();
        assert_eq!(r.get_double(1), 3.0);
        assert!(r.is_null(2));
        assert!(r.get_double(2).is_nan());
    }

    #[test]
    fn test_get_values_buffer() {
        let mut r = reader(r#"[[[100.0],[1.0,2.0]]]"#, &["A", "B"]);
        let mut buffer = Vec::new();
        assert_eq!(r.get_values(&mut buffer), 0);

        r.read();
        assert_eq!(r.get_values(&mut buffer), 3);
        assert_eq!(buffer[0], CellValue::Number(100.0));
        assert_eq!(buffer[2], CellValue::Number(2.0));
    }

    #[test]
    fn test_get_json_on_cursor() {
        let mut r = reader(r#"[[[100.0],[1.0,null]]]"#, &["A", "B"]);
        r.read();
        let json = r.get_json().unwrap();
        assert_eq!(json, "[[100.0],[1.0,null]]");
    }

    #[test]
    fn test_index_range_is_first_and_last() {
        let r = reader(
            r#"[[[100.0],[1.0]],[[150.0],[2.0]],[[200.0],[3.0]]]"#,
            &["A"],
        );
        let range = r.get_index_range(0);
        assert_eq!(range.start(), Some(100.0));
        assert_eq!(range.end(), Some(200.0));
    }

    #[test]
    fn test_close_releases_rows() {
        let mut r = reader(r#"[[[100.0],[1.0]]]"#, &["A"]);
        assert!(r.read());
        r.close();
        assert!(!r.read());
        assert_eq!(r.record_count(), 0);
    }
}
