use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("invalid length range: max {max} is less than min {min}")]
    InvalidRange { min: u32, max: u32 },

    #[error("recorder list is empty")]
    EmptyRecorderSet,

    #[error("label '{label}' not found in table for length {length}")]
    UnknownLabel { label: String, length: u32 },

    #[error("no table for length {0}")]
    TableNotFound(u32),

    #[error("no tables found in data directory")]
    NoDataFound,

    #[error("table for length {length} has a different recorder set than the first table")]
    DivergentRecorders { length: u32 },

    #[error("malformed table file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
