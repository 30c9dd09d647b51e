use std::{fs, path::PathBuf};

use clap::{Args, Subcommand};
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};
use truekicks::checkout::OrderRequest;
use truekicks_app::{config::AppConfig, context, domain::orders::models::Order};

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// List a user's orders, newest first
    History(HistoryArgs),

    /// Place an order from a JSON request body
    Place(PlaceArgs),
}

#[derive(Debug, Args)]
struct HistoryArgs {
    /// User id
    #[arg(long)]
    user_id: String,
}

#[derive(Debug, Args)]
struct PlaceArgs {
    /// Path to the JSON order request
    #[arg(long)]
    request: PathBuf,
}

pub(crate) async fn run(command: OrdersCommand, config: &AppConfig) -> Result<(), String> {
    let service = context::orders_service(&config.database)
        .map_err(|error| format!("failed to initialise orders: {error}"))?;

    match command.command {
        OrdersSubcommand::History(args) => {
            let orders = service
                .order_history(&args.user_id)
                .await
                .map_err(|error| format!("failed to fetch orders: {error}"))?;

            if orders.is_empty() {
                println!("no orders found for user {}", args.user_id);
                return Ok(());
            }

            println!("{}", history_table(&orders));

            Ok(())
        }
        OrdersSubcommand::Place(args) => {
            let body = fs::read_to_string(&args.request)
                .map_err(|error| format!("failed to read {}: {error}", args.request.display()))?;

            let request: OrderRequest = serde_json::from_str(&body)
                .map_err(|error| format!("invalid order request: {error}"))?;

            let submission = request
                .into_submission()
                .map_err(|error| format!("invalid order: {error}"))?;

            let order = service
                .place_order(submission)
                .await
                .map_err(|error| format!("failed to place order: {error}"))?;

            println!("order_id: {}", order.id);
            println!("status: {}", order.status);
            println!("created_at: {}", order.created_at);

            Ok(())
        }
    }
}

fn history_table(orders: &[Order]) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Order", "Placed", "Items", "Total", "Status"]);

    for order in orders {
        builder.push_record([
            order.id.to_string(),
            order.created_at.to_string(),
            order.total_items().to_string(),
            order.total_price.to_string(),
            order.status.clone(),
        ]);
    }

    let mut table = builder.build();

    table
        .with(Style::modern_rounded())
        .modify(Columns::new(2..4), Alignment::right());

    table.to_string()
}
