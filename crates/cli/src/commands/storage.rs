//! Storage maintenance commands.

use stride_storefront::StoreContext;
use stride_storefront::storage::purge_legacy_keys;

use super::CliError;

/// List every stored key.
///
/// # Errors
///
/// Returns `CliError::Storage` if the storage cannot be listed.
pub fn keys(ctx: &StoreContext) -> Result<(), CliError> {
    let keys = ctx.storage().keys()?;
    tracing::info!("{} stored keys", keys.len());
    for key in keys {
        tracing::info!("  {key}");
    }
    Ok(())
}

/// Remove keys orphaned by the old key-suffix versioning.
///
/// # Errors
///
/// Returns `CliError::Storage` if a key cannot be removed.
pub fn purge_legacy(ctx: &StoreContext) -> Result<(), CliError> {
    let removed = purge_legacy_keys(ctx.storage())?;
    if removed.is_empty() {
        tracing::info!("No legacy keys found");
    } else {
        tracing::info!("Removed {} legacy keys: {}", removed.len(), removed.join(", "));
    }
    Ok(())
}
