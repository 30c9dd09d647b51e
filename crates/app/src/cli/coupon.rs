use clap::{Args, Subcommand};
use jiff::Timestamp;
use truekicks_app::{config::AppConfig, context};

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Check a coupon code against a subtotal
    Verify(VerifyArgs),
}

#[derive(Debug, Args)]
struct VerifyArgs {
    /// Coupon code; case and surrounding whitespace are ignored
    #[arg(long)]
    code: String,

    /// Cart subtotal
    #[arg(long)]
    subtotal: u64,

    /// Evaluate expiry at this instant (RFC 3339) instead of now
    #[arg(long)]
    at: Option<Timestamp>,
}

pub(crate) async fn run(command: CouponCommand, config: &AppConfig) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Verify(args) => verify(args, config).await,
    }
}

async fn verify(args: VerifyArgs, config: &AppConfig) -> Result<(), String> {
    let service = context::coupons_service(&config.storefront, &config.database)
        .map_err(|error| format!("failed to initialise coupons: {error}"))?;

    let applied = service
        .verify_coupon(&args.code, args.subtotal, args.at.unwrap_or_else(Timestamp::now))
        .await
        .map_err(|error| format!("coupon rejected: {error}"))?;

    println!("code: {}", applied.code);
    println!("discount_type: {}", applied.discount_type.as_str());
    println!("discount_value: {}", applied.discount_value);

    Ok(())
}
