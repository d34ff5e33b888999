// src/reader/parse.rs
use log::debug;
use serde_json::Value;
use smallvec::SmallVec;

use crate::error::{ChannelDataError, Result};
use crate::types::CellValue;

/// One logical row: an index tuple plus one value per data channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    indices: SmallVec<[CellValue; 2]>,
    values: Vec<CellValue>,
}

impl Record {
    pub fn new(indices: SmallVec<[CellValue; 2]>, values: Vec<CellValue>) -> Self {
        Record { indices, values }
    }

    pub fn indices(&self) -> &[CellValue] {
        &self.indices
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    /// Numeric position of this row along the given index dimension.
    pub fn index_value(&self, dimension: usize) -> f64 {
        self.indices
            .get(dimension)
            .map(CellValue::as_index)
            .unwrap_or(f64::NAN)
    }
}

/// Parse the JSON wire format: an array of rows, each row a 2-element array
/// `[[idx0, idx1, ...], [val0, val1, ...]]`.
///
/// An empty, whitespace-only, or `null` document yields zero rows. Anything
/// that is not valid JSON, not an array, or contains a row that is not an
/// `[indices, values]` pair is a construction-time error: that indicates
/// corrupt upstream data, unlike per-cell oddities which are tolerated.
pub(crate) fn parse_document(data: &str) -> Result<Vec<Record>> {
    let data = data.trim();
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let document: Value = serde_json::from_str(data)?;
    let rows = match document {
        Value::Null => return Ok(Vec::new()),
        Value::Array(rows) => rows,
        _ => return Err(ChannelDataError::NotAnArray),
    };

    let mut records = Vec::with_capacity(rows.len());
    let mut shape: Option<(usize, usize)> = None;

    for (row, value) in rows.iter().enumerate() {
        let record = parse_row(row, value)?;
        let row_shape = (record.indices().len(), record.values().len());
        match shape {
            None => shape = Some(row_shape),
            Some(expected) if expected != row_shape => {
                debug!(
                    "row {} shape {:?} differs from row 0 shape {:?}; short cells read as null",
                    row, row_shape, expected
                );
            }
            _ => {}
        }
        records.push(record);
    }

    Ok(records)
}

fn parse_row(row: usize, value: &Value) -> Result<Record> {
    let Value::Array(parts) = value else {
        return Err(ChannelDataError::MalformedRow { row });
    };
    let (Some(Value::Array(indices)), Some(Value::Array(values))) = (parts.first(), parts.get(1))
    else {
        return Err(ChannelDataError::MalformedRow { row });
    };

    Ok(Record::new(
        indices.iter().map(CellValue::from_json).collect(),
        values.iter().map(CellValue::from_json).collect(),
    ))
}

/// Recombine flat delimited text lines into records.
///
/// Each line has the form `index[,secondaryIndex...],value1,value2,...`: the
/// first `index_count` comma-delimited tokens are the index tuple, the rest
/// are channel values. Tokens are normalized per `CellValue::from_token`
/// (blank/`null`/`NaN` become null, numeric-looking tokens become numbers).
/// Blank lines are skipped; there is no error path for this input form.
pub(crate) fn parse_delimited(rows: &[String], index_count: usize) -> Vec<Record> {
    let index_count = index_count.max(1);

    rows.iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut indices = SmallVec::new();
            let mut values = Vec::new();
            for (position, token) in line.split(',').enumerate() {
                if position < index_count {
                    indices.push(CellValue::from_token(token));
                } else {
                    values.push(CellValue::from_token(token));
                }
            }
            Record::new(indices, values)
        })
        .collect()
}
