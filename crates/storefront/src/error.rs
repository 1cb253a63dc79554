//! Error types for the stores and their storage backends.

use thiserror::Error;

use stride_core::PriceError;

/// Errors raised by a [`Storage`](crate::storage::Storage) backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Key contains characters that cannot be used as a file name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// State could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The recently-viewed bound must keep at least one entry.
    #[error("recently-viewed max must be at least 1 (got {0})")]
    InvalidMax(usize),

    /// Line item with a negative price or a currency other than the cart's.
    #[error("price error: {0}")]
    Price(#[from] PriceError),
}
