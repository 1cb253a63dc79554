//! Core types for Stride.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod quantity;
pub mod user;

pub use id::*;
pub use price::{CurrencyCode, Price, PriceError};
pub use product::{CartLineItem, ProductSummary, Size};
pub use quantity::{Quantity, QuantityAction, QuantityError};
pub use user::{UserId, UserIdError};
