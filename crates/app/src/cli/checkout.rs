use clap::Args;
use truekicks_app::{
    config::AppConfig,
    context::AppContext,
    storefront::{ContactDetails, Storefront},
};

use super::open_store;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Recipient name
    #[arg(long)]
    full_name: String,

    /// Street address
    #[arg(long)]
    address: String,

    /// City
    #[arg(long)]
    city: Option<String>,

    /// Postal code
    #[arg(long)]
    postal_code: Option<String>,

    /// Contact phone
    #[arg(long, default_value = "")]
    phone: String,

    /// Coupon code to apply before placing the order
    #[arg(long)]
    coupon: Option<String>,
}

pub(crate) async fn run(args: CheckoutArgs, config: &AppConfig) -> Result<(), String> {
    let context = AppContext::from_config(config)
        .map_err(|error| format!("failed to initialise services: {error}"))?;

    let mut storefront = Storefront::open(
        open_store(&config.storefront)?,
        context.coupons,
        context.orders,
        config.storefront.shipping_fee,
    );

    if let Some(code) = args.coupon.as_deref() {
        storefront
            .apply_coupon(code)
            .await
            .map_err(|error| format!("coupon rejected: {error}"))?;
    }

    let order = storefront
        .checkout(ContactDetails {
            full_name: args.full_name,
            address: args.address,
            city: args.city,
            postal_code: args.postal_code,
            phone: args.phone,
        })
        .await
        .map_err(|error| format!("checkout failed: {error}"))?;

    println!("order_id: {}", order.id);
    println!("status: {}", order.status);
    println!("items: {}", order.total_items());
    println!("total_price: {}", order.total_price);

    Ok(())
}
