//! Application configuration

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    pub database_url: Option<String>,
}

/// Storefront session settings.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// Directory holding the persisted cart, wishlist and user
    #[arg(long, env = "TRUEKICKS_STATE_DIR", default_value = ".truekicks", global = true)]
    pub state_dir: PathBuf,

    /// Shipping fee in minor units, added after any coupon discount
    #[arg(long, env = "SHIPPING_FEE", default_value_t = 0, global = true)]
    pub shipping_fee: u64,

    /// YAML coupon catalog to use instead of the database
    #[arg(long, env = "COUPON_FIXTURES", global = true)]
    pub coupon_fixtures: Option<PathBuf>,
}

/// Everything the application needs to start.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Storefront session settings.
    #[command(flatten)]
    pub storefront: StorefrontConfig,
}
