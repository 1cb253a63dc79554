//! Recently-viewed commands.
//!
//! Every mutating command fails if the change could not be written.

use stride_core::{ProductId, ProductSummary, UserId};
use stride_storefront::StoreContext;

use super::{CliError, log_products};

/// Record a product view.
///
/// # Errors
///
/// Returns `CliError::Storage` if the list cannot be saved.
pub fn view(ctx: &mut StoreContext, user: &UserId, product: ProductSummary) -> Result<(), CliError> {
    let id = product.id;
    ctx.recently_viewed_mut().add_to_recently_viewed(user, product);
    written(ctx)?;
    tracing::info!(
        "Recorded view of product {id} for {user} ({} of {} remembered)",
        ctx.recently_viewed().items(user).len(),
        ctx.recently_viewed().max()
    );
    Ok(())
}

/// Show the user's viewed products, most recent first.
pub fn list(ctx: &StoreContext, user: &UserId) {
    let items = ctx.recently_viewed().items(user);
    tracing::info!(
        "{user} recently viewed {} products (max {})",
        items.len(),
        ctx.recently_viewed().max()
    );
    log_products(items);
}

/// Forget the user's viewed products.
///
/// # Errors
///
/// Returns `CliError::Storage` if the list cannot be saved.
pub fn clear(ctx: &mut StoreContext, user: &UserId) -> Result<(), CliError> {
    ctx.recently_viewed_mut().clear_recently_viewed(user);
    written(ctx)?;
    tracing::info!("Cleared {user}'s recently viewed products");
    Ok(())
}

/// Drop products the catalog no longer lists.
///
/// # Errors
///
/// Returns `CliError::Storage` if the list cannot be saved.
pub fn prune(ctx: &mut StoreContext, user: &UserId, inactive: &[ProductId]) -> Result<(), CliError> {
    let removed = ctx
        .recently_viewed_mut()
        .remove_inactive_products(user, inactive);
    written(ctx)?;
    tracing::info!("Removed {removed} inactive products from {user}'s recently viewed");
    Ok(())
}

/// Change the per-user bound.
///
/// # Errors
///
/// Returns `CliError::Store` if `max` is 0 and `CliError::Storage` if the
/// new bound cannot be saved.
pub fn set_max(ctx: &mut StoreContext, max: usize) -> Result<(), CliError> {
    ctx.recently_viewed_mut().set_max(max)?;
    written(ctx)?;
    tracing::info!("Recently viewed now remembers {max} products per user");
    Ok(())
}

fn written(ctx: &mut StoreContext) -> Result<(), CliError> {
    ctx.recently_viewed_mut()
        .take_write_error()
        .map_or(Ok(()), |e| Err(CliError::from(e)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::test_support::{shoe, unwritable_context, user, writable_context};

    #[test]
    fn test_view_fails_when_data_dir_is_unwritable() {
        let (_dir, mut ctx) = unwritable_context();
        let result = view(&mut ctx, &user(), shoe(1));
        assert!(matches!(result, Err(CliError::Storage(_))));
    }

    #[test]
    fn test_set_max_fails_when_data_dir_is_unwritable() {
        let (_dir, mut ctx) = unwritable_context();
        assert!(matches!(set_max(&mut ctx, 3), Err(CliError::Storage(_))));
    }

    #[test]
    fn test_set_max_rejects_zero() {
        let (_dir, mut ctx) = writable_context();
        assert!(matches!(set_max(&mut ctx, 0), Err(CliError::Store(_))));
    }

    #[test]
    fn test_set_max_persists() {
        let (dir, mut ctx) = writable_context();
        set_max(&mut ctx, 3).unwrap();

        let reopened = crate::commands::test_support::context_in(dir.path());
        assert_eq!(reopened.recently_viewed().max(), 3);
    }
}
