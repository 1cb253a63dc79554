//! Seam to the external product catalog.
//!
//! The catalog is the source of truth for whether a product still exists.
//! The stores never call it themselves; reconciliation asks it which saved
//! products are gone and feeds those ids to `remove_inactive_products`.

use std::collections::HashSet;

use stride_core::ProductId;

/// Answers whether a product is still listed.
pub trait ProductCatalog {
    /// Whether the product still exists and is active.
    fn is_active(&self, id: ProductId) -> bool;
}

impl<F> ProductCatalog for F
where
    F: Fn(ProductId) -> bool,
{
    fn is_active(&self, id: ProductId) -> bool {
        self(id)
    }
}

/// A catalog snapshot: the set of product ids currently listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCatalog {
    active: HashSet<ProductId>,
}

impl StaticCatalog {
    /// Create a snapshot from the listed ids.
    #[must_use]
    pub const fn new(active: HashSet<ProductId>) -> Self {
        Self { active }
    }

    /// The listed ids.
    #[must_use]
    pub const fn active(&self) -> &HashSet<ProductId> {
        &self.active
    }
}

impl FromIterator<ProductId> for StaticCatalog {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ProductCatalog for StaticCatalog {
    fn is_active(&self, id: ProductId) -> bool {
        self.active.contains(&id)
    }
}
