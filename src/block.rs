// src/block.rs
use std::collections::HashMap;

use log::debug;
use smallvec::SmallVec;

use crate::metadata::ChannelIndexInfo;
use crate::reader::{ChannelDataReader, Record};
use crate::types::CellValue;

/// Index-tuple key for row lookup. f64 index values are keyed by their bit
/// pattern: appends for the same position arrive as identical numbers, so
/// exact-bits equality is the intended semantics.
type IndexKey = SmallVec<[u64; 2]>;

#[derive(Debug, Clone)]
struct BlockRow {
    indices: SmallVec<[f64; 2]>,
    values: Vec<CellValue>,
}

/// Incremental builder for the nested-array channel data structure.
///
/// During an ingest operation, values for the same index position arrive as
/// separate `append` calls (one per channel); the block merges them into
/// rows keyed by the full index tuple, then freezes the accumulated data
/// into a [`ChannelDataReader`] snapshot via [`reader`](Self::reader).
///
/// A block is a single-writer accumulator: the row lookup map is not safe
/// for concurrent mutation without external synchronization.
#[derive(Debug, Clone)]
pub struct ChannelDataBlock {
    indices: Vec<ChannelIndexInfo>,
    channel_ids: Vec<i64>,
    mnemonics: Vec<String>,
    units: Vec<String>,
    rows: Vec<BlockRow>,
    row_lookup: HashMap<IndexKey, usize>,
    max_records: usize,
}

impl ChannelDataBlock {
    /// Default row count at which `is_full` reports true and the ingest
    /// layer should materialize and persist the block.
    pub const DEFAULT_MAX_RECORDS: usize = 10_000;

    pub fn new() -> Self {
        Self::with_max_records(Self::DEFAULT_MAX_RECORDS)
    }

    /// Create a block with an explicit materialization threshold.
    pub fn with_max_records(max_records: usize) -> Self {
        ChannelDataBlock {
            indices: Vec::new(),
            channel_ids: Vec::new(),
            mnemonics: Vec::new(),
            units: Vec::new(),
            rows: Vec::new(),
            row_lookup: HashMap::new(),
            max_records,
        }
    }

    /// Register an index dimension. A mnemonic already registered is a
    /// no-op; dimension order is registration order.
    pub fn add_index(
        &mut self,
        mnemonic: impl Into<String>,
        unit: impl Into<String>,
        increasing: bool,
        is_time_index: bool,
    ) {
        let mnemonic = mnemonic.into();
        if self.indices.iter().any(|info| info.mnemonic == mnemonic) {
            return;
        }
        self.indices
            .push(ChannelIndexInfo::new(mnemonic, unit, increasing, is_time_index));
    }

    /// Register a data-channel column. A channel id already registered is a
    /// no-op; column position is registration order and stable thereafter.
    pub fn add_channel(
        &mut self,
        channel_id: i64,
        mnemonic: impl Into<String>,
        unit: impl Into<String>,
    ) {
        if self.channel_ids.contains(&channel_id) {
            return;
        }
        self.channel_ids.push(channel_id);
        self.mnemonics.push(mnemonic.into());
        self.units.push(unit.into());
    }

    /// Place one channel value at the row for the given index tuple,
    /// creating the row if this tuple has not been seen yet.
    ///
    /// Rows created before a late channel registration are extended with
    /// explicit nulls so every row stays well-formed. An append for an
    /// unregistered channel id is dropped.
    pub fn append(&mut self, channel_id: i64, index_values: &[f64], value: CellValue) {
        let Some(position) = self.channel_ids.iter().position(|&id| id == channel_id) else {
            debug!("append for unregistered channel id {}", channel_id);
            return;
        };

        let key: IndexKey = index_values.iter().map(|v| v.to_bits()).collect();
        let row = match self.row_lookup.get(&key) {
            Some(&existing) => &mut self.rows[existing],
            None => {
                self.rows.push(BlockRow {
                    indices: index_values.iter().copied().collect(),
                    values: vec![CellValue::Null; self.mnemonics.len()],
                });
                self.row_lookup.insert(key, self.rows.len() - 1);
                self.rows.last_mut().unwrap()
            }
        };

        if row.values.len() <= position {
            row.values.resize(position + 1, CellValue::Null);
        }
        row.values[position] = value;
    }

    /// Number of rows accumulated so far.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// True once the accumulated row count reaches the materialization
    /// threshold.
    pub fn is_full(&self) -> bool {
        self.rows.len() >= self.max_records
    }

    pub fn channel_ids(&self) -> &[i64] {
        &self.channel_ids
    }

    pub fn mnemonics(&self) -> &[String] {
        &self.mnemonics
    }

    pub fn units(&self) -> &[String] {
        &self.units
    }

    pub fn indices(&self) -> &[ChannelIndexInfo] {
        &self.indices
    }

    /// Snapshot the accumulated rows into a reader, attaching the index
    /// metadata with ranges recomputed over the snapshot.
    pub fn reader(&self) -> ChannelDataReader {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let mut values = row.values.clone();
                values.resize(self.mnemonics.len(), CellValue::Null);
                Record::new(
                    row.indices.iter().map(|&v| CellValue::Number(v)).collect(),
                    values,
                )
            })
            .collect();

        ChannelDataReader::from_records(records, self.mnemonics.clone(), self.units.clone())
            .with_indices(self.indices.clone())
    }

    /// Drop all accumulated rows, keeping index and channel registrations,
    /// so the block can be reused for the next batch.
    pub fn clear(&mut self) {
        self.rows.clear();
        self.row_lookup.clear();
    }
}

impl Default for ChannelDataBlock {
    fn default() -> Self {
        Self::new()
    }
}
