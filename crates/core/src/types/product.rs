//! Product projections held by the stores.

use serde::{Deserialize, Serialize};

use crate::{Price, ProductId, Quantity};

/// Shoe size variant selected for a cart line.
pub type Size = u16;

/// Minimal immutable snapshot of a catalog product.
///
/// Taken when the product is added to a wishlist or recorded as viewed. Later
/// catalog edits are not reflected; deleted products are purged through
/// reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

impl ProductSummary {
    /// Create a summary without image or gender.
    #[must_use]
    pub fn new(id: ProductId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: None,
            gender: None,
        }
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the gender category.
    #[must_use]
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }
}

/// A cart entry: one product, one size, and how many pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    pub size: Size,
    pub quantity: Quantity,
}

impl CartLineItem {
    /// Build a line item from a product summary.
    #[must_use]
    pub fn from_summary(product: ProductSummary, size: Size, quantity: Quantity) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            image: product.image,
            gender: product.gender,
            size,
            quantity,
        }
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }

    /// The product part of this line, without size and quantity.
    #[must_use]
    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            gender: self.gender.clone(),
        }
    }
}
