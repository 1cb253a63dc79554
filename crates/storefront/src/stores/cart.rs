//! Cart store.
//!
//! Holds line items per user and derives the checkout amounts from them.
//! The cart is session-scoped: nothing is written to storage.
//!
//! `add_item` always appends a new line, even when the same product is
//! already in the cart. Callers that want "add one more pair" should check
//! [`CartStore::contains`] and call [`CartStore::update_quantity`] instead.

use stride_core::{CartLineItem, Price, PriceError, ProductId, QuantityAction, UserId};

use super::Partitions;
use crate::error::StoreError;
use crate::pricing::{CartSummary, PricingConfig};

/// Per-user shopping cart with derived pricing.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    by_user: Partitions<CartLineItem>,
    pricing: PricingConfig,
}

impl CartStore {
    /// Create an empty cart store using the given pricing rules.
    #[must_use]
    pub fn new(pricing: PricingConfig) -> Self {
        Self {
            by_user: Partitions::new(),
            pricing,
        }
    }

    /// The pricing rules in effect.
    #[must_use]
    pub const fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// The user's line items, in the order they were added.
    #[must_use]
    pub fn items(&self, user: &UserId) -> &[CartLineItem] {
        self.by_user.entries(user)
    }

    /// Whether any line for the product exists.
    #[must_use]
    pub fn contains(&self, user: &UserId, id: ProductId) -> bool {
        self.items(user).iter().any(|item| item.id == id)
    }

    /// Number of rows in the cart (not pairs of shoes).
    #[must_use]
    pub fn line_count(&self, user: &UserId) -> usize {
        self.items(user).len()
    }

    /// Append a line item.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Price` if the item has a negative price or is
    /// priced in a different currency than the cart.
    pub fn add_item(&mut self, user: &UserId, item: CartLineItem) -> Result<(), StoreError> {
        if item.price.amount_minor < 0 {
            return Err(PriceError::Negative(item.price.amount_minor).into());
        }
        if item.price.currency_code != self.pricing.currency() {
            return Err(PriceError::CurrencyMismatch {
                left: self.pricing.currency(),
                right: item.price.currency_code,
            }
            .into());
        }
        tracing::debug!(
            %user,
            product_id = %item.id,
            size = item.size,
            quantity = %item.quantity,
            "Adding cart item"
        );
        self.by_user.entries_mut(user).push(item);
        Ok(())
    }

    /// Remove every line for the product. Returns how many lines were removed.
    pub fn remove_item(&mut self, user: &UserId, id: ProductId) -> usize {
        let removed = self.by_user.remove_where(user, |item| item.id == id);
        if removed > 0 {
            tracing::debug!(%user, product_id = %id, removed, "Removed cart item");
        }
        removed
    }

    /// Add or remove one pair on every line for the product.
    ///
    /// Decrementing a quantity of 1 leaves it at 1; use
    /// [`CartStore::remove_item`] to drop the line. Returns whether any line
    /// matched.
    pub fn update_quantity(&mut self, user: &UserId, id: ProductId, action: QuantityAction) -> bool {
        let Some(items) = self.by_user.existing_mut(user) else {
            return false;
        };
        let mut matched = false;
        for item in items.iter_mut().filter(|item| item.id == id) {
            item.quantity = item.quantity.apply(action);
            matched = true;
        }
        if matched {
            tracing::debug!(%user, product_id = %id, %action, "Updated cart quantity");
        }
        matched
    }

    /// Empty the user's cart.
    pub fn clear_cart(&mut self, user: &UserId) {
        if self.by_user.reset(user) {
            tracing::debug!(%user, "Cleared cart");
        }
    }

    /// Pairs of shoes in the cart, for the cart badge.
    #[must_use]
    pub fn total_items(&self, user: &UserId) -> u64 {
        self.items(user)
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// `price × quantity` for the product, or zero if it is not in the cart.
    #[must_use]
    pub fn total_of_product(&self, user: &UserId, id: ProductId) -> Price {
        self.sum(self.items(user).iter().filter(|item| item.id == id))
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn subtotal(&self, user: &UserId) -> Price {
        self.sum(self.items(user).iter())
    }

    /// Tax on the subtotal.
    #[must_use]
    pub fn taxes(&self, user: &UserId) -> Price {
        self.pricing.taxes_for(self.subtotal(user))
    }

    /// Shipping fee for the cart.
    #[must_use]
    pub fn shipping(&self, user: &UserId) -> Price {
        self.pricing
            .shipping_for(self.subtotal(user), self.items(user).is_empty())
    }

    /// `subtotal + taxes + shipping`.
    #[must_use]
    pub fn total(&self, user: &UserId) -> Price {
        self.summary(user).total
    }

    /// All derived amounts at once.
    #[must_use]
    pub fn summary(&self, user: &UserId) -> CartSummary {
        let subtotal = self.subtotal(user);
        let taxes = self.pricing.taxes_for(subtotal);
        let shipping = self
            .pricing
            .shipping_for(subtotal, self.items(user).is_empty());
        let total = Price::from_minor(
            subtotal
                .amount_minor
                .saturating_add(taxes.amount_minor)
                .saturating_add(shipping.amount_minor),
            self.pricing.currency(),
        );
        CartSummary {
            total_items: self.total_items(user),
            subtotal,
            taxes,
            shipping,
            total,
        }
    }

    fn sum<'a>(&self, items: impl Iterator<Item = &'a CartLineItem>) -> Price {
        let amount = items
            .map(|item| item.line_total().amount_minor)
            .fold(0_i64, i64::saturating_add);
        Price::from_minor(amount, self.pricing.currency())
    }
}
