//! The three per-user stores.
//!
//! - [`CartStore`] - line items and derived pricing, session-scoped
//! - [`WishlistStore`] - saved products, deduplicated, persisted
//! - [`RecentlyViewedStore`] - bounded most-recent-first list, persisted

mod cart;
mod partition;
mod recently_viewed;
mod wishlist;

pub use cart::CartStore;
pub use partition::Partitions;
pub use recently_viewed::{
    DEFAULT_MAX as RECENTLY_VIEWED_DEFAULT_MAX, RecentlyViewedState, RecentlyViewedStore,
};
pub use wishlist::{WishlistState, WishlistStore};
