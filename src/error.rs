//! Error types for compressed bitmap operations.

use thiserror::Error;

/// Error variants for bitmap operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A selection query was performed for a rank that does not exist.
    #[error("invalid selection: rank {0} not found")]
    InvalidSelection(u64),

    /// A range upper bound beyond the 32-bit universe was supplied.
    #[error("invalid range: upper bound {0} exceeds the 32-bit universe")]
    InvalidRange(u64),

    /// A serialized buffer failed validation.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// An I/O error occurred during serialization or deserialization.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for bitmap operations.
pub type Result<T> = std::result::Result<T, Error>;
