// src/reader/mod.rs
mod channel_reader;
mod parse;

pub use channel_reader::ChannelDataReader;
pub use parse::Record;
