// src/lib.rs
//! # wellog-rs
//!
//! A Rust library for working with multi-channel, multi-index well-log data
//! in the nested-array wire format used by WITSML-style channel sets.
//!
//! ## Features
//!
//! - 📊 **Tabular cursor**: parse a nested JSON blob once, then read rows
//!   forward-only with typed column access
//! - 🧭 **Multi-index**: depth and/or time index dimensions, increasing or
//!   decreasing, with direction-aware range logic
//! - ✂️ **Slicing**: narrow and reorder the visible channels to exactly the
//!   columns a request cares about, gaps and all
//! - 🧱 **Incremental building**: accumulate streamed channel appends into
//!   rows, then freeze them into a reader snapshot
//! - 🛡️ **Tolerant reading**: null tokens, quality flags, and non-numeric
//!   placeholders degrade gracefully instead of erroring
//!
//! ## Reading channel data
//!
//! ```rust
//! use wellog_rs::*;
//!
//! fn main() -> Result<()> {
//!     let data = r#"[[[100.0],[1.5,80.0]],[[101.0],[1.6,null]]]"#;
//!     let mut reader = ChannelDataReader::new(
//!         data,
//!         vec!["ROP".into(), "GR".into()],
//!         vec!["m/h".into(), "gAPI".into()],
//!     )?;
//!
//!     while reader.read() {
//!         let depth = reader.get_double(0);
//!         let rop = reader.get_double(1);
//!         println!("{depth}: {rop}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Building channel data
//!
//! ```rust
//! use wellog_rs::*;
//!
//! let mut block = ChannelDataBlock::new();
//! block.add_index("MD", "m", true, false);
//! block.add_channel(1, "ROP", "m/h");
//! block.add_channel(2, "GR", "gAPI");
//!
//! block.append(1, &[100.0], CellValue::Number(1.5));
//! block.append(2, &[100.0], CellValue::Number(80.0));
//!
//! let reader = block.reader();
//! assert_eq!(reader.record_count(), 1);
//! ```

// Modules
pub mod adapters;
pub mod block;
pub mod error;
pub mod metadata;
pub mod reader;
pub mod types;

// Re-export commonly used types at the crate root for convenience
pub use error::{ChannelDataError, Result};

pub use types::CellValue;

pub use metadata::{ChannelIndexInfo, Range};

pub use reader::{ChannelDataReader, Record};

pub use block::ChannelDataBlock;

pub use adapters::{DataChunk, LogData};

// Prelude module for glob imports
pub mod prelude {
    //! Convenient imports for common use cases.
    //!
    //! ```rust
    //! use wellog_rs::prelude::*;
    //! ```

    pub use crate::block::ChannelDataBlock;
    pub use crate::error::{ChannelDataError, Result};
    pub use crate::metadata::{ChannelIndexInfo, Range};
    pub use crate::reader::ChannelDataReader;
    pub use crate::types::CellValue;
}

/// The library version
pub const LIBRARY_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!LIBRARY_VERSION.is_empty());
    }

    #[test]
    fn test_reader_round_trip_smoke() {
        let data = r#"[[[100.0],[1.5]],[[101.0],[1.6]]]"#;
        let mut reader =
            ChannelDataReader::new(data, vec!["ROP".into()], vec!["m/h".into()]).unwrap();

        let mut rows = 0;
        while reader.read() {
            rows += 1;
        }
        assert_eq!(rows, reader.record_count());
    }

    #[test]
    fn test_block_to_reader_smoke() {
        let mut block = ChannelDataBlock::new();
        block.add_index("MD", "m", true, false);
        block.add_channel(1, "ROP", "m/h");
        block.append(1, &[100.0], CellValue::Number(1.5));

        let mut reader = block.reader();
        assert!(reader.read());
        assert_eq!(reader.get_double(1), 1.5);
    }
}
