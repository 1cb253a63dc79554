//! Wishlist store.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stride_core::{ProductId, ProductSummary, UserId};

use super::Partitions;
use crate::error::StorageError;
use crate::storage::{Slot, Storage};

/// Storage key for the wishlist.
pub const STORAGE_KEY: &str = "wishlist-storage";

/// Current schema version of the persisted wishlist.
pub const SCHEMA_VERSION: u32 = 2;

/// Persisted wishlist state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistState {
    pub by_user: Partitions<ProductSummary>,
}

/// Per-user set of saved products.
///
/// Entries are unique by product id. Order carries no meaning. Every change
/// is written to storage on a best-effort basis: a failed write is logged
/// and kept for [`WishlistStore::take_write_error`], and the in-memory
/// change stands.
pub struct WishlistStore {
    state: WishlistState,
    slot: Slot<WishlistState>,
    write_error: Option<StorageError>,
}

impl WishlistStore {
    /// Open the wishlist, loading any persisted state.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let slot = Slot::new(storage, STORAGE_KEY, SCHEMA_VERSION);
        let state = slot.load();
        Self {
            state,
            slot,
            write_error: None,
        }
    }

    /// The user's saved products.
    #[must_use]
    pub fn items(&self, user: &UserId) -> &[ProductSummary] {
        self.state.by_user.entries(user)
    }

    /// Whether the user has saved the product.
    #[must_use]
    pub fn contains(&self, user: &UserId, id: ProductId) -> bool {
        self.items(user).iter().any(|p| p.id == id)
    }

    /// Save a product. Returns `false` (and changes nothing) if it is already saved.
    pub fn add_to_wishlist(&mut self, user: &UserId, product: ProductSummary) -> bool {
        if self.contains(user, product.id) {
            return false;
        }
        tracing::debug!(%user, product_id = %product.id, "Adding to wishlist");
        self.state.by_user.entries_mut(user).push(product);
        self.persist();
        true
    }

    /// Remove a saved product. Returns whether it was present.
    pub fn remove_from_wishlist(&mut self, user: &UserId, id: ProductId) -> bool {
        let removed = self.state.by_user.remove_where(user, |p| p.id == id) > 0;
        if removed {
            tracing::debug!(%user, product_id = %id, "Removed from wishlist");
            self.persist();
        }
        removed
    }

    /// Empty the user's wishlist.
    pub fn clear_wishlist(&mut self, user: &UserId) {
        if self.state.by_user.reset(user) {
            tracing::debug!(%user, "Cleared wishlist");
            self.persist();
        }
    }

    /// Remove every saved product whose id is in `ids`. Returns how many were removed.
    ///
    /// The catalog decides which products no longer exist; see
    /// [`StoreContext::reconcile`](crate::context::StoreContext::reconcile).
    pub fn remove_inactive_products(&mut self, user: &UserId, ids: &[ProductId]) -> usize {
        let inactive: HashSet<ProductId> = ids.iter().copied().collect();
        self.remove_matching(user, |p| inactive.contains(&p.id))
    }

    /// Keep only saved products whose id is in `active`. Returns how many were removed.
    pub fn retain_active(&mut self, user: &UserId, active: &HashSet<ProductId>) -> usize {
        self.remove_matching(user, |p| !active.contains(&p.id))
    }

    fn remove_matching(
        &mut self,
        user: &UserId,
        predicate: impl FnMut(&ProductSummary) -> bool,
    ) -> usize {
        let removed = self.state.by_user.remove_where(user, predicate);
        if removed > 0 {
            tracing::debug!(%user, removed, "Pruned wishlist");
            self.persist();
        }
        removed
    }

    /// Replace in-memory state with whatever storage currently holds.
    ///
    /// Picks up writes made by another process sharing the same storage.
    pub fn reload(&mut self) {
        self.state = self.slot.load();
        tracing::debug!(key = self.slot.key(), "Reloaded wishlist");
    }

    /// Write the current state, reporting failure.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    pub fn save(&self) -> Result<(), StorageError> {
        self.slot.save(&self.state)
    }

    /// Snapshot of the full persisted state.
    #[must_use]
    pub const fn state(&self) -> &WishlistState {
        &self.state
    }

    /// Take the failure from the most recent write, if it failed.
    ///
    /// Mutations never fail on a storage error. Callers that must know the
    /// change reached storage check this afterwards.
    pub fn take_write_error(&mut self) -> Option<StorageError> {
        self.write_error.take()
    }

    fn persist(&mut self) {
        self.write_error = self.slot.save_or_warn(&self.state).err();
    }
}

impl std::fmt::Debug for WishlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::stores::test_support::{ReadOnlyStorage, product, user};

    fn store() -> (Arc<MemoryStorage>, WishlistStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = WishlistStore::open(storage.clone());
        (storage, store)
    }

    fn ids(items: &[ProductSummary]) -> Vec<i32> {
        items.iter().map(|p| p.id.as_i32()).collect()
    }

    #[test]
    fn test_add_is_idempotent() {
        let (_, mut wishlist) = store();
        let u = user("u1");
        assert!(wishlist.add_to_wishlist(&u, product(1)));
        let before = wishlist.items(&u).to_vec();
        assert!(!wishlist.add_to_wishlist(&u, product(1)));
        assert_eq!(wishlist.items(&u), before.as_slice());
    }

    #[test]
    fn test_add_then_remove_restores_prior_state() {
        let (_, mut wishlist) = store();
        let u = user("u1");
        wishlist.add_to_wishlist(&u, product(2));
        let before = wishlist.items(&u).to_vec();

        wishlist.add_to_wishlist(&u, product(5));
        assert!(wishlist.remove_from_wishlist(&u, ProductId::new(5)));
        assert_eq!(wishlist.items(&u), before.as_slice());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (storage, mut wishlist) = store();
        let u = user("u1");
        assert!(!wishlist.remove_from_wishlist(&u, ProductId::new(9)));
        assert!(wishlist.state().by_user.is_empty());
        assert_eq!(storage.get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_remove_inactive_products() {
        let (_, mut wishlist) = store();
        let u = user("u1");
        for id in 1..=3 {
            wishlist.add_to_wishlist(&u, product(id));
        }
        let removed =
            wishlist.remove_inactive_products(&u, &[ProductId::new(1), ProductId::new(2)]);
        assert_eq!(removed, 2);
        assert_eq!(ids(wishlist.items(&u)), vec![3]);
    }

    #[test]
    fn test_retain_active() {
        let (_, mut wishlist) = store();
        let u = user("u1");
        for id in 1..=3 {
            wishlist.add_to_wishlist(&u, product(id));
        }
        let active: HashSet<ProductId> = [ProductId::new(2)].into_iter().collect();
        assert_eq!(wishlist.retain_active(&u, &active), 2);
        assert_eq!(ids(wishlist.items(&u)), vec![2]);
    }

    #[test]
    fn test_clear_only_affects_user() {
        let (_, mut wishlist) = store();
        let (a, b) = (user("a"), user("b"));
        wishlist.add_to_wishlist(&a, product(1));
        wishlist.add_to_wishlist(&b, product(1));
        wishlist.clear_wishlist(&a);
        assert!(wishlist.items(&a).is_empty());
        assert_eq!(ids(wishlist.items(&b)), vec![1]);
    }

    #[test]
    fn test_persists_across_reopen() {
        let (storage, mut wishlist) = store();
        let u = user("u1");
        wishlist.add_to_wishlist(&u, product(4));

        let reopened = WishlistStore::open(storage);
        assert_eq!(ids(reopened.items(&u)), vec![4]);
    }

    #[test]
    fn test_persisted_layout() {
        let (storage, mut wishlist) = store();
        wishlist.add_to_wishlist(&user("u1"), product(4));

        let raw = storage.get(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["state"]["byUser"]["u1"][0]["id"], 4);
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let storage = Arc::new(MemoryStorage::new());
        let mut first = WishlistStore::open(storage.clone());
        let mut second = WishlistStore::open(storage);
        let u = user("u1");

        second.add_to_wishlist(&u, product(8));
        assert!(first.items(&u).is_empty());
        first.reload();
        assert_eq!(ids(first.items(&u)), vec![8]);
    }

    #[test]
    fn test_failed_write_keeps_change_and_reports_error() {
        let mut wishlist = WishlistStore::open(Arc::new(ReadOnlyStorage));
        let u = user("u1");

        assert!(wishlist.add_to_wishlist(&u, product(1)));
        assert!(wishlist.contains(&u, ProductId::new(1)));
        assert!(matches!(
            wishlist.take_write_error(),
            Some(StorageError::Io { .. })
        ));
        assert!(wishlist.take_write_error().is_none());
    }

    #[test]
    fn test_successful_write_reports_no_error() {
        let (_, mut wishlist) = store();
        wishlist.add_to_wishlist(&user("u1"), product(1));
        assert!(wishlist.take_write_error().is_none());
    }
}
