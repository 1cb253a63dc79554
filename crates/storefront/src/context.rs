//! The store context owned by the application root.

use std::sync::Arc;

use tracing::instrument;

use stride_core::{ProductId, UserId};

use crate::catalog::ProductCatalog;
use crate::config::StorefrontConfig;
use crate::error::StoreError;
use crate::storage::{FileStorage, Storage};
use crate::stores::{CartStore, RecentlyViewedStore, WishlistStore};

/// How many entries reconciliation removed from each store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub wishlist_removed: usize,
    pub recently_viewed_removed: usize,
}

impl ReconcileReport {
    /// Total entries removed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.wishlist_removed + self.recently_viewed_removed
    }
}

/// All three stores, created together and passed to whatever needs them.
pub struct StoreContext {
    cart: CartStore,
    wishlist: WishlistStore,
    recently_viewed: RecentlyViewedStore,
    storage: Arc<dyn Storage>,
}

impl StoreContext {
    /// Build the stores on top of `storage`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidMax` if the configured recently-viewed
    /// bound is 0.
    pub fn new(config: &StorefrontConfig, storage: Arc<dyn Storage>) -> Result<Self, StoreError> {
        let wishlist = WishlistStore::open(storage.clone());
        let recently_viewed =
            RecentlyViewedStore::open_with_max(storage.clone(), config.recently_viewed_max)?;

        tracing::info!(
            wishlist_users = wishlist.state().by_user.users().count(),
            recently_viewed_users = recently_viewed.state().by_user.users().count(),
            recently_viewed_max = recently_viewed.max(),
            "Store context ready"
        );

        Ok(Self {
            cart: CartStore::new(config.pricing.clone()),
            wishlist,
            recently_viewed,
            storage,
        })
    }

    /// Build the stores on file storage in the configured data directory.
    ///
    /// # Errors
    ///
    /// Same as [`StoreContext::new`].
    pub fn open(config: &StorefrontConfig) -> Result<Self, StoreError> {
        tracing::debug!(data_dir = %config.data_dir.display(), "Opening file storage");
        Self::new(config, Arc::new(FileStorage::new(config.data_dir.clone())))
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    #[must_use]
    pub const fn recently_viewed(&self) -> &RecentlyViewedStore {
        &self.recently_viewed
    }

    pub const fn recently_viewed_mut(&mut self) -> &mut RecentlyViewedStore {
        &mut self.recently_viewed
    }

    /// The storage backing the persisted stores.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Drop saved and recently-viewed products the catalog no longer lists.
    #[instrument(skip_all, fields(user = %user))]
    pub fn reconcile(&mut self, user: &UserId, catalog: &impl ProductCatalog) -> ReconcileReport {
        let mut inactive: Vec<ProductId> = self
            .wishlist
            .items(user)
            .iter()
            .chain(self.recently_viewed.items(user))
            .map(|p| p.id)
            .filter(|id| !catalog.is_active(*id))
            .collect();
        inactive.sort_unstable();
        inactive.dedup();

        if inactive.is_empty() {
            return ReconcileReport::default();
        }

        let report = ReconcileReport {
            wishlist_removed: self.wishlist.remove_inactive_products(user, &inactive),
            recently_viewed_removed: self
                .recently_viewed
                .remove_inactive_products(user, &inactive),
        };
        tracing::info!(
            wishlist_removed = report.wishlist_removed,
            recently_viewed_removed = report.recently_viewed_removed,
            "Reconciled against catalog"
        );
        report
    }

    /// Re-read persisted stores from storage.
    pub fn reload(&mut self) {
        self.wishlist.reload();
        self.recently_viewed.reload();
    }
}

impl std::fmt::Debug for StoreContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreContext")
            .field("cart", &self.cart)
            .field("wishlist", &self.wishlist)
            .field("recently_viewed", &self.recently_viewed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::storage::MemoryStorage;
    use crate::stores::test_support::{product, user};

    fn context() -> StoreContext {
        StoreContext::new(
            &StorefrontConfig::default(),
            Arc::new(MemoryStorage::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_reconcile_removes_from_both_stores() {
        let mut ctx = context();
        let u = user("u1");
        for id in 1..=3 {
            ctx.wishlist_mut().add_to_wishlist(&u, product(id));
        }
        for id in 2..=4 {
            ctx.recently_viewed_mut().add_to_recently_viewed(&u, product(id));
        }

        let catalog: StaticCatalog = [1, 4].into_iter().map(ProductId::new).collect();
        let report = ctx.reconcile(&u, &catalog);

        assert_eq!(report.wishlist_removed, 2);
        assert_eq!(report.recently_viewed_removed, 2);
        assert_eq!(report.total(), 4);
        assert!(ctx.wishlist().contains(&u, ProductId::new(1)));
        assert_eq!(ctx.recently_viewed().items(&u).len(), 1);
    }

    #[test]
    fn test_reconcile_with_closure_catalog() {
        let mut ctx = context();
        let u = user("u1");
        ctx.wishlist_mut().add_to_wishlist(&u, product(7));

        let report = ctx.reconcile(&u, &|id: ProductId| id.as_i32() != 7);
        assert_eq!(report.wishlist_removed, 1);
        assert!(ctx.wishlist().items(&u).is_empty());
    }

    #[test]
    fn test_reconcile_nothing_inactive() {
        let mut ctx = context();
        let u = user("u1");
        ctx.wishlist_mut().add_to_wishlist(&u, product(1));
        let report = ctx.reconcile(&u, &|_: ProductId| true);
        assert_eq!(report, ReconcileReport::default());
    }

    #[test]
    fn test_zero_max_rejected() {
        let config = StorefrontConfig {
            recently_viewed_max: 0,
            ..StorefrontConfig::default()
        };
        assert!(matches!(
            StoreContext::new(&config, Arc::new(MemoryStorage::new())),
            Err(StoreError::InvalidMax(0))
        ));
    }
}
