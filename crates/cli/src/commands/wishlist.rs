//! Wishlist commands.
//!
//! Every mutating command fails if the change could not be written.

use stride_core::{ProductId, ProductSummary, UserId};
use stride_storefront::StoreContext;

use super::{CliError, log_products};

/// Save a product to the user's wishlist.
///
/// # Errors
///
/// Returns `CliError::Storage` if the wishlist cannot be saved.
pub fn add(ctx: &mut StoreContext, user: &UserId, product: ProductSummary) -> Result<(), CliError> {
    let id = product.id;
    let added = ctx.wishlist_mut().add_to_wishlist(user, product);
    written(ctx)?;
    if added {
        tracing::info!("Saved product {id} to {user}'s wishlist");
    } else {
        tracing::info!("Product {id} is already in {user}'s wishlist");
    }
    Ok(())
}

/// Remove a product from the user's wishlist.
///
/// # Errors
///
/// Returns `CliError::Storage` if the wishlist cannot be saved.
pub fn remove(ctx: &mut StoreContext, user: &UserId, id: ProductId) -> Result<(), CliError> {
    let removed = ctx.wishlist_mut().remove_from_wishlist(user, id);
    written(ctx)?;
    if removed {
        tracing::info!("Removed product {id} from {user}'s wishlist");
    } else {
        tracing::warn!("Product {id} is not in {user}'s wishlist");
    }
    Ok(())
}

/// Empty the user's wishlist.
///
/// # Errors
///
/// Returns `CliError::Storage` if the wishlist cannot be saved.
pub fn clear(ctx: &mut StoreContext, user: &UserId) -> Result<(), CliError> {
    ctx.wishlist_mut().clear_wishlist(user);
    written(ctx)?;
    tracing::info!("Cleared {user}'s wishlist");
    Ok(())
}

/// Show the user's wishlist.
pub fn list(ctx: &StoreContext, user: &UserId) {
    let items = ctx.wishlist().items(user);
    tracing::info!("{user}'s wishlist ({} products)", items.len());
    log_products(items);
}

/// Drop products the catalog no longer lists.
///
/// # Errors
///
/// Returns `CliError::Storage` if the wishlist cannot be saved.
pub fn prune(ctx: &mut StoreContext, user: &UserId, inactive: &[ProductId]) -> Result<(), CliError> {
    let removed = ctx.wishlist_mut().remove_inactive_products(user, inactive);
    written(ctx)?;
    tracing::info!("Removed {removed} inactive products from {user}'s wishlist");
    Ok(())
}

fn written(ctx: &mut StoreContext) -> Result<(), CliError> {
    ctx.wishlist_mut()
        .take_write_error()
        .map_or(Ok(()), |e| Err(CliError::from(e)))
}
