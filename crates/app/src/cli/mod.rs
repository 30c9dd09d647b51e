use clap::{Parser, Subcommand};
use truekicks::storage::FileStore;
use truekicks_app::{
    config::{AppConfig, StorefrontConfig},
    observability::init_subscriber,
};

mod cart;
mod checkout;
mod coupon;
mod orders;
mod session;
mod wishlist;

#[derive(Debug, Parser)]
#[command(name = "truekicks", about = "TrueKicks storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Cart(cart::CartCommand),
    Wishlist(wishlist::WishlistCommand),
    Session(session::SessionCommand),
    Coupon(coupon::CouponCommand),
    Checkout(checkout::CheckoutArgs),
    Orders(orders::OrdersCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        init_subscriber(&self.config.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        self.dispatch().await
    }

    async fn dispatch(self) -> Result<(), String> {
        match self.command {
            Commands::Cart(command) => cart::run(command, &self.config),
            Commands::Wishlist(command) => wishlist::run(command, &self.config),
            Commands::Session(command) => session::run(command, &self.config),
            Commands::Coupon(command) => coupon::run(command, &self.config).await,
            Commands::Checkout(args) => checkout::run(args, &self.config).await,
            Commands::Orders(command) => orders::run(command, &self.config).await,
        }
    }
}

fn open_store(config: &StorefrontConfig) -> Result<FileStore, String> {
    FileStore::open(&config.state_dir).map_err(|error| {
        format!(
            "failed to open state directory {}: {error}",
            config.state_dir.display()
        )
    })
}
