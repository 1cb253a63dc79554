//! Command implementations.

pub mod cart;
pub mod recent;
pub mod storage;
pub mod wishlist;

use stride_core::ProductSummary;
use stride_storefront::{ConfigError, StorageError, StoreError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Log one product per line.
fn log_products(products: &[ProductSummary]) {
    for (position, product) in products.iter().enumerate() {
        tracing::info!(
            "  {}. [{}] {} - {}{}",
            position + 1,
            product.id,
            product.name,
            product.price,
            product
                .gender
                .as_deref()
                .map(|gender| format!(" ({gender})"))
                .unwrap_or_default()
        );
    }
}
