use clap::{Args, Subcommand};
use truekicks::{items::ProductId, wishlist::WishlistItem};
use truekicks_app::{config::AppConfig, storefront::Session};

use super::open_store;

#[derive(Debug, Args)]
pub(crate) struct WishlistCommand {
    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WishlistSubcommand {
    /// Print saved products
    Show,

    /// Save a product, or unsave it if already saved
    Toggle(ToggleArgs),
}

#[derive(Debug, Args)]
struct ToggleArgs {
    /// Product id
    #[arg(long)]
    id: ProductId,

    /// Display name
    #[arg(long, default_value = "")]
    name: String,

    /// Price
    #[arg(long, default_value_t = 0)]
    price: u64,
}

pub(crate) fn run(command: WishlistCommand, config: &AppConfig) -> Result<(), String> {
    let mut session = Session::open(open_store(&config.storefront)?);

    match command.command {
        WishlistSubcommand::Show => {
            if session.wishlist().is_empty() {
                println!("wishlist is empty");
            }

            for item in session.wishlist().items() {
                println!("{} {} price={}", item.id, item.name, item.price);
            }

            Ok(())
        }
        WishlistSubcommand::Toggle(args) => {
            let id = args.id;
            let saved = session
                .toggle_wishlist(WishlistItem {
                    id,
                    name: args.name,
                    price: args.price,
                    image: None,
                })
                .map_err(|error| format!("failed to save wishlist: {error}"))?;

            println!("{id}: {}", if saved { "saved" } else { "removed" });

            Ok(())
        }
    }
}
