// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChannelDataError {
    #[error("malformed channel data document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("channel data document is not an array of rows")]
    NotAnArray,

    #[error("row {row} is not an [indices, values] pair")]
    MalformedRow { row: usize },
}

pub type Result<T> = std::result::Result<T, ChannelDataError>;
