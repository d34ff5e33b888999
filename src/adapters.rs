// src/adapters.rs
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::metadata::ChannelIndexInfo;
use crate::reader::ChannelDataReader;

/// A 1.x-style log header plus its raw delimited data rows.
///
/// In this form the index column leads the mnemonic/unit lists, and the data
/// rows are flat comma-delimited text with the index value first.
#[derive(Debug, Clone)]
pub struct LogData {
    /// Column names, index mnemonic first.
    pub mnemonics: Vec<String>,
    /// Column units, parallel to `mnemonics`.
    pub units: Vec<String>,
    /// Metadata for the single index dimension.
    pub index: ChannelIndexInfo,
    /// Raw delimited data rows.
    pub data: Vec<String>,
}

impl LogData {
    pub fn new(
        mnemonics: Vec<String>,
        units: Vec<String>,
        index: ChannelIndexInfo,
        data: Vec<String>,
    ) -> Self {
        LogData {
            mnemonics,
            units,
            index,
            data,
        }
    }

    /// Build a reader over this log's data. The leading index column is
    /// stripped from the channel mnemonic/unit lists and carried as index
    /// metadata instead.
    pub fn reader(&self) -> ChannelDataReader {
        let channel_mnemonics = self.mnemonics.get(1..).unwrap_or_default().to_vec();
        let channel_units = self.units.get(1..).unwrap_or_default().to_vec();
        ChannelDataReader::from_delimited(&self.data, 1, channel_mnemonics, channel_units)
            .with_indices(vec![self.index.clone()])
    }
}

/// One persisted chunk of channel-set data: header metadata plus the nested
/// JSON blob, as stored by the surrounding data adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataChunk {
    /// URI of the source channel set.
    pub uri: String,
    /// Storage identifier of this chunk.
    pub id: String,
    /// Data-channel mnemonics (index mnemonics live in `indices`).
    pub mnemonics: Vec<String>,
    /// Data-channel units, parallel to `mnemonics`.
    pub units: Vec<String>,
    /// Index-dimension metadata, in index-tuple order.
    pub indices: Vec<ChannelIndexInfo>,
    /// The nested-array JSON blob.
    pub data: String,
}

impl DataChunk {
    /// Build a reader over this chunk's blob, tagged with the chunk's
    /// identity for correlation by the store layer.
    pub fn reader(&self) -> Result<ChannelDataReader> {
        Ok(
            ChannelDataReader::new(&self.data, self.mnemonics.clone(), self.units.clone())?
                .with_indices(self.indices.clone())
                .with_uri(&self.uri)
                .with_id(&self.id),
        )
    }
}
