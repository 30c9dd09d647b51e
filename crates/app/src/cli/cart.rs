use std::num::NonZeroU32;

use clap::{Args, Subcommand};
use truekicks::{
    basket::Basket,
    items::{CartLine, ProductId},
};
use truekicks_app::{config::AppConfig, storefront::Session};

use super::open_store;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Print the cart and its subtotal
    Show,

    /// Add a product, merging with an existing line of the same size
    Add(AddArgs),

    /// Remove a line
    Remove(LineArgs),

    /// Replace a line's quantity; values below one become one
    SetQuantity(SetQuantityArgs),

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Product id
    #[arg(long)]
    id: ProductId,

    /// Size label
    #[arg(long)]
    size: String,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[command(flatten)]
    line: LineArgs,

    /// Quantity to add
    #[arg(long, default_value_t = NonZeroU32::MIN)]
    quantity: NonZeroU32,

    /// Unit price
    #[arg(long)]
    price: u64,

    /// Display name
    #[arg(long, default_value = "")]
    name: String,
}

#[derive(Debug, Args)]
struct SetQuantityArgs {
    #[command(flatten)]
    line: LineArgs,

    /// New quantity
    #[arg(long, allow_negative_numbers = true)]
    quantity: i64,
}

pub(crate) fn run(command: CartCommand, config: &AppConfig) -> Result<(), String> {
    let mut session = Session::open(open_store(&config.storefront)?);

    let result = match command.command {
        CartSubcommand::Show => Ok(()),
        CartSubcommand::Add(args) => session.add_to_cart(
            CartLine::new(args.line.id, args.line.size, args.quantity, args.price)
                .with_name(args.name),
        ),
        CartSubcommand::Remove(args) => session.remove_from_cart(args.id, &args.size),
        CartSubcommand::SetQuantity(args) => {
            match session.update_quantity(args.line.id, &args.line.size, args.quantity) {
                Ok(true) => Ok(()),
                Ok(false) => {
                    return Err(format!(
                        "no cart line for product {} size {}",
                        args.line.id, args.line.size
                    ));
                }
                Err(error) => Err(error),
            }
        }
        CartSubcommand::Clear => session.clear_cart(),
    };

    result.map_err(|error| format!("failed to update cart: {error}"))?;

    show(session.basket())
}

fn show(basket: &Basket) -> Result<(), String> {
    if basket.is_empty() {
        println!("cart is empty");
        return Ok(());
    }

    for line in basket.lines() {
        println!(
            "{} {} size={} qty={} price={}",
            line.product_id(),
            line.name(),
            line.size(),
            line.quantity(),
            line.unit_price()
        );
    }

    let subtotal = basket
        .subtotal()
        .map_err(|error| format!("failed to compute subtotal: {error}"))?;

    println!("items: {}", basket.total_items());
    println!("subtotal: {subtotal}");

    Ok(())
}
