// src/metadata/mod.rs
mod index_info;
mod range;

pub use index_info::ChannelIndexInfo;
pub use range::Range;
