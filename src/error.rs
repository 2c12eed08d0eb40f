use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No record in the store carries this exact timestamp.
    #[error("no information available for {0}")]
    NoDataForTime(DateTime<Utc>),
    #[error("entry \"{id}\": invalid creation date \"{value}\"")]
    Timestamp { id: String, value: String },
    #[error("store is not ordered by timestamp (record #{0})")]
    UnorderedStore(usize),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
