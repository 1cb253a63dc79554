//! Stride CLI - Inspect and edit persisted store state.
//!
//! # Usage
//!
//! ```bash
//! # Save a product to a user's wishlist
//! stride wishlist add --user u1 --id 7 --name "Trail Runner" --price-cents 12999
//!
//! # Show what a user recently viewed
//! stride recent list --user u1
//!
//! # Drop products the catalog no longer lists
//! stride wishlist prune --user u1 --inactive 3,9
//!
//! # Price a cart without persisting it
//! stride cart quote --user u1 --item 7:12999:42:1 --item 8:4500:42:2
//! ```
//!
//! # Commands
//!
//! - `wishlist` - Add, remove, list, clear and prune saved products
//! - `recent` - Record views, list, clear, prune, and change the bound
//! - `cart quote` - Compute cart totals for a set of line items
//! - `storage` - List keys and purge legacy keys
//!
//! Configuration comes from `STRIDE_*` environment variables (see
//! `stride_storefront::config`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use stride_core::{Price, ProductId, ProductSummary, UserId};
use stride_storefront::{StoreContext, StorefrontConfig};

mod commands;

use commands::CliError;
use commands::cart::LineArg;

#[derive(Parser)]
#[command(name = "stride")]
#[command(author, version, about = "Stride store state tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage a user's wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Manage a user's recently-viewed products
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },
    /// Session cart calculations
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Storage maintenance
    Storage {
        #[command(subcommand)]
        action: StorageAction,
    },
}

#[derive(Args)]
struct UserArg {
    /// User the state belongs to
    #[arg(short, long)]
    user: UserId,
}

#[derive(Args)]
struct ProductArgs {
    /// Catalog product id
    #[arg(long)]
    id: ProductId,

    /// Display name
    #[arg(long)]
    name: String,

    /// Price in cents
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    price_cents: i64,

    /// Image URL
    #[arg(long)]
    image: Option<String>,

    /// Gender category
    #[arg(long)]
    gender: Option<String>,
}

impl ProductArgs {
    fn into_summary(self, config: &StorefrontConfig) -> ProductSummary {
        ProductSummary {
            id: self.id,
            name: self.name,
            price: Price::from_minor(self.price_cents, config.pricing.currency()),
            image: self.image,
            gender: self.gender,
        }
    }
}

#[derive(Args)]
struct PruneArgs {
    /// Product ids the catalog no longer lists (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    inactive: Vec<ProductId>,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Save a product
    Add {
        #[command(flatten)]
        user: UserArg,
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Remove a saved product
    Remove {
        #[command(flatten)]
        user: UserArg,
        /// Product id to remove
        #[arg(long)]
        id: ProductId,
    },
    /// Remove every saved product
    Clear {
        #[command(flatten)]
        user: UserArg,
    },
    /// Show saved products
    List {
        #[command(flatten)]
        user: UserArg,
    },
    /// Remove products the catalog no longer lists
    Prune {
        #[command(flatten)]
        user: UserArg,
        #[command(flatten)]
        prune: PruneArgs,
    },
}

#[derive(Subcommand)]
enum RecentAction {
    /// Record a product view
    View {
        #[command(flatten)]
        user: UserArg,
        #[command(flatten)]
        product: ProductArgs,
    },
    /// Show viewed products, most recent first
    List {
        #[command(flatten)]
        user: UserArg,
    },
    /// Forget every viewed product
    Clear {
        #[command(flatten)]
        user: UserArg,
    },
    /// Remove products the catalog no longer lists
    Prune {
        #[command(flatten)]
        user: UserArg,
        #[command(flatten)]
        prune: PruneArgs,
    },
    /// Change how many products are remembered per user
    SetMax {
        /// New bound (at least 1)
        max: usize,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Compute totals for a cart
    Quote {
        #[command(flatten)]
        user: UserArg,
        /// Line item as `id:price_cents:size:quantity` (repeatable)
        #[arg(long = "item", required = true)]
        items: Vec<LineArg>,
    },
}

#[derive(Subcommand)]
enum StorageAction {
    /// List stored keys
    Keys,
    /// Remove keys left over from the old key-suffix versioning
    PurgeLegacy,
}

fn main() {
    // Initialize tracing with EnvFilter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "stride_cli=info,stride_storefront=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;
    let mut ctx = StoreContext::open(&config)?;

    match cli.command {
        Commands::Wishlist { action } => match action {
            WishlistAction::Add { user, product } => {
                commands::wishlist::add(&mut ctx, &user.user, product.into_summary(&config))?;
            }
            WishlistAction::Remove { user, id } => {
                commands::wishlist::remove(&mut ctx, &user.user, id)?;
            }
            WishlistAction::Clear { user } => commands::wishlist::clear(&mut ctx, &user.user)?,
            WishlistAction::List { user } => commands::wishlist::list(&ctx, &user.user),
            WishlistAction::Prune { user, prune } => {
                commands::wishlist::prune(&mut ctx, &user.user, &prune.inactive)?;
            }
        },
        Commands::Recent { action } => match action {
            RecentAction::View { user, product } => {
                commands::recent::view(&mut ctx, &user.user, product.into_summary(&config))?;
            }
            RecentAction::List { user } => commands::recent::list(&ctx, &user.user),
            RecentAction::Clear { user } => commands::recent::clear(&mut ctx, &user.user)?,
            RecentAction::Prune { user, prune } => {
                commands::recent::prune(&mut ctx, &user.user, &prune.inactive)?;
            }
            RecentAction::SetMax { max } => commands::recent::set_max(&mut ctx, max)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Quote { user, items } => {
                commands::cart::quote(&mut ctx, &user.user, items)?;
            }
        },
        Commands::Storage { action } => match action {
            StorageAction::Keys => commands::storage::keys(&ctx)?,
            StorageAction::PurgeLegacy => commands::storage::purge_legacy(&ctx)?,
        },
    }
    Ok(())
}
