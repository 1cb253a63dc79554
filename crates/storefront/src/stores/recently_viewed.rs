//! Recently-viewed store.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stride_core::{ProductId, ProductSummary, UserId};

use super::Partitions;
use crate::error::{StorageError, StoreError};
use crate::storage::{Slot, Storage};

/// Storage key for the recently-viewed list.
pub const STORAGE_KEY: &str = "recently-viewed-products";

/// Current schema version of the persisted recently-viewed list.
pub const SCHEMA_VERSION: u32 = 2;

/// Default number of products remembered per user.
pub const DEFAULT_MAX: usize = 10;

/// Persisted recently-viewed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentlyViewedState {
    pub by_user: Partitions<ProductSummary>,
    pub max: usize,
}

impl Default for RecentlyViewedState {
    fn default() -> Self {
        Self {
            by_user: Partitions::new(),
            max: DEFAULT_MAX,
        }
    }
}

/// Per-user most-recent-first list of viewed products, bounded to `max`.
///
/// Viewing a product again moves it to the front instead of duplicating it.
/// When a view pushes the list past `max`, the oldest entries are evicted.
/// Changes are written to storage on a best-effort basis; see
/// [`RecentlyViewedStore::take_write_error`].
pub struct RecentlyViewedStore {
    state: RecentlyViewedState,
    slot: Slot<RecentlyViewedState>,
    write_error: Option<StorageError>,
}

impl RecentlyViewedStore {
    /// Open the store with the default bound.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let slot = Slot::new(storage, STORAGE_KEY, SCHEMA_VERSION);
        let state = load_state(&slot, DEFAULT_MAX);
        Self {
            state,
            slot,
            write_error: None,
        }
    }

    /// Open the store, using `max` as the bound when nothing usable is persisted.
    ///
    /// A persisted bound takes precedence over `max`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidMax` if `max` is 0.
    pub fn open_with_max(storage: Arc<dyn Storage>, max: usize) -> Result<Self, StoreError> {
        if max == 0 {
            return Err(StoreError::InvalidMax(max));
        }
        let slot = Slot::new(storage, STORAGE_KEY, SCHEMA_VERSION);
        let state = load_state(&slot, max);
        Ok(Self {
            state,
            slot,
            write_error: None,
        })
    }

    /// The user's viewed products, most recent first.
    #[must_use]
    pub fn items(&self, user: &UserId) -> &[ProductSummary] {
        self.state.by_user.entries(user)
    }

    /// The per-user bound.
    #[must_use]
    pub const fn max(&self) -> usize {
        self.state.max
    }

    /// Record a view: move (or insert) the product to the front and evict past `max`.
    pub fn add_to_recently_viewed(&mut self, user: &UserId, product: ProductSummary) {
        tracing::debug!(%user, product_id = %product.id, "Recording product view");
        let max = self.state.max;
        let list = self.state.by_user.entries_mut(user);
        list.retain(|p| p.id != product.id);
        list.insert(0, product);
        list.truncate(max);
        self.persist();
    }

    /// Empty the user's list.
    pub fn clear_recently_viewed(&mut self, user: &UserId) {
        if self.state.by_user.reset(user) {
            tracing::debug!(%user, "Cleared recently viewed");
            self.persist();
        }
    }

    /// Remove every entry whose id is in `ids`. Returns how many were removed.
    pub fn remove_inactive_products(&mut self, user: &UserId, ids: &[ProductId]) -> usize {
        let inactive: HashSet<ProductId> = ids.iter().copied().collect();
        self.remove_matching(user, |p| inactive.contains(&p.id))
    }

    /// Keep only entries whose id is in `active`. Returns how many were removed.
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
            tracing::debug!(%user, removed, "Pruned recently viewed");
            self.persist();
        }
        removed
    }

    /// Change the bound. Shrinking truncates every user's list.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidMax` if `max` is 0.
    pub fn set_max(&mut self, max: usize) -> Result<(), StoreError> {
        if max == 0 {
            return Err(StoreError::InvalidMax(max));
        }
        self.state.max = max;
        self.state.by_user.lists_mut().for_each(|list| list.truncate(max));
        tracing::debug!(max, "Changed recently viewed bound");
        self.persist();
        Ok(())
    }

    /// Replace in-memory state with whatever storage currently holds.
    ///
    /// Keeps the current bound if storage holds nothing usable.
    pub fn reload(&mut self) {
        self.state = load_state(&self.slot, self.state.max);
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
    pub const fn state(&self) -> &RecentlyViewedState {
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

/// Load persisted state, enforcing the bound on what was read.
///
/// A persisted bound of 0 is unusable and replaced by `fallback_max`. Lists
/// longer than the bound are truncated.
fn load_state(slot: &Slot<RecentlyViewedState>, fallback_max: usize) -> RecentlyViewedState {
    let Some(mut state) = slot.try_load() else {
        return RecentlyViewedState {
            by_user: Partitions::new(),
            max: fallback_max,
        };
    };
    if state.max == 0 {
        tracing::warn!(key = slot.key(), fallback_max, "Persisted max of 0, using fallback");
        state.max = fallback_max;
    }
    let max = state.max;
    state.by_user.lists_mut().for_each(|list| list.truncate(max));
    state
}

impl std::fmt::Debug for RecentlyViewedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentlyViewedStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
