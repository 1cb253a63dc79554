//! Cart quote command.
//!
//! The cart is session-scoped, so a quote builds it in memory, reports the
//! totals, and discards it.

use std::str::FromStr;

use stride_core::{CartLineItem, Price, PriceError, ProductId, Quantity, Size, UserId};
use stride_storefront::StoreContext;

use super::CliError;

/// A line item given on the command line as `id:price_cents:size:quantity`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineArg {
    pub id: ProductId,
    pub price_cents: i64,
    pub size: Size,
    pub quantity: Quantity,
}

impl FromStr for LineArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        let [id, price, size, quantity] = parts.as_slice() else {
            return Err(format!(
                "expected id:price_cents:size:quantity, got {s:?}"
            ));
        };

        let quantity: u32 = quantity
            .parse()
            .map_err(|e| format!("invalid quantity {quantity:?}: {e}"))?;

        let price_cents: i64 = price
            .parse()
            .map_err(|e| format!("invalid price {price:?}: {e}"))?;
        if price_cents < 0 {
            return Err(PriceError::Negative(price_cents).to_string());
        }

        Ok(Self {
            id: id.parse().map_err(|e| format!("invalid id {id:?}: {e}"))?,
            price_cents,
            size: size.parse().map_err(|e| format!("invalid size {size:?}: {e}"))?,
            quantity: Quantity::new(quantity).map_err(|e| e.to_string())?,
        })
    }
}

/// Price a cart built from `items`.
///
/// # Errors
///
/// Returns `CliError::Store` if a line cannot be added.
pub fn quote(ctx: &mut StoreContext, user: &UserId, items: Vec<LineArg>) -> Result<(), CliError> {
    let currency = ctx.cart().pricing().currency();
    let cart = ctx.cart_mut();
    for arg in items {
        cart.add_item(
            user,
            CartLineItem {
                id: arg.id,
                name: format!("Product {}", arg.id),
                price: Price::from_minor(arg.price_cents, currency),
                image: None,
                gender: None,
                size: arg.size,
                quantity: arg.quantity,
            },
        )?;
    }

    for item in cart.items(user) {
        tracing::info!(
            "  [{}] size {} x{} @ {} = {}",
            item.id,
            item.size,
            item.quantity,
            item.price,
            item.line_total()
        );
    }

    let summary = cart.summary(user);
    tracing::info!("Items:    {}", summary.total_items);
    tracing::info!("Subtotal: {}", summary.subtotal);
    tracing::info!("Taxes:    {}", summary.taxes);
    tracing::info!("Shipping: {}", summary.shipping);
    tracing::info!("Total:    {}", summary.total);
    tracing::debug!(
        summary = %serde_json::to_string(&summary).unwrap_or_default(),
        "Cart summary"
    );

    cart.clear_cart(user);
    Ok(())
}
