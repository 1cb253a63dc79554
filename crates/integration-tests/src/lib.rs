//! Integration tests for Stride.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p stride-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `file_storage` - Stores persisted to a real data directory
//! - `store_properties` - Behavioral properties of the three stores
//!
//! This library holds the fixtures shared by the test files.

use std::sync::Arc;

use stride_core::{CartLineItem, Price, ProductId, ProductSummary, Quantity, UserId};
use stride_storefront::{FileStorage, StoreContext, StorefrontConfig};
use tempfile::TempDir;

/// A store context on file storage in a fresh temporary directory.
pub struct TestContext {
    pub dir: TempDir,
    pub config: StorefrontConfig,
    pub ctx: StoreContext,
}

impl TestContext {
    /// Create a context in a new temp directory.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory or context cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config = StorefrontConfig {
            data_dir: dir.path().to_path_buf(),
            ..StorefrontConfig::default()
        };
        let ctx = StoreContext::open(&config).expect("open store context");
        Self { dir, config, ctx }
    }

    /// Open a second context over the same data directory.
    ///
    /// # Panics
    ///
    /// Panics if the context cannot be created.
    #[must_use]
    pub fn reopen(&self) -> StoreContext {
        StoreContext::new(&self.config, Arc::new(FileStorage::new(self.dir.path())))
            .expect("reopen store context")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a user id.
///
/// # Panics
///
/// Panics if `id` is blank.
#[must_use]
pub fn user(id: &str) -> UserId {
    UserId::parse(id).expect("valid user id")
}

/// A shoe priced at `price_cents`.
#[must_use]
pub fn shoe(id: i32, price_cents: i64) -> ProductSummary {
    ProductSummary::new(ProductId::new(id), format!("Shoe {id}"), Price::usd_cents(price_cents))
        .with_image(format!("https://cdn.example.com/shoes/{id}.png"))
        .with_gender("unisex")
}

/// A cart line for `shoe(id, price_cents)`.
///
/// # Panics
///
/// Panics if `quantity` is 0.
#[must_use]
pub fn line(id: i32, price_cents: i64, size: u16, quantity: u32) -> CartLineItem {
    CartLineItem::from_summary(
        shoe(id, price_cents),
        size,
        Quantity::new(quantity).expect("non-zero quantity"),
    )
}

/// Product ids of a list, in order.
#[must_use]
pub fn ids(products: &[ProductSummary]) -> Vec<i32> {
    products.iter().map(|p| p.id.as_i32()).collect()
}
