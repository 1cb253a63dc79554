//! Stride Core - Shared types library.
//!
//! This crate provides the types used across all Stride components:
//! - `storefront` - Cart, wishlist and recently-viewed stores
//! - `cli` - Command-line tools for inspecting and editing persisted state
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, user keys, prices and products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
