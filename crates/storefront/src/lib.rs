//! Stride Storefront library.
//!
//! Per-user client state for the shoe shop: the shopping cart, the wishlist
//! and the recently-viewed list. Each store partitions its data by
//! [`UserId`](stride_core::UserId). The wishlist and recently-viewed lists are
//! persisted through a [`Storage`](storage::Storage) backend so they survive
//! a restart; the cart is session-scoped.
//!
//! The application root builds a [`StoreContext`](context::StoreContext) and
//! hands it to whatever needs the stores. There is no global instance.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod pricing;
pub mod storage;
pub mod stores;

pub use catalog::{ProductCatalog, StaticCatalog};
pub use config::{ConfigError, StorefrontConfig};
pub use context::{ReconcileReport, StoreContext};
pub use error::{StorageError, StoreError};
pub use pricing::{CartSummary, PricingConfig};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use stores::{CartStore, Partitions, RecentlyViewedStore, WishlistStore};
