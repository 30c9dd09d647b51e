//! App Context

use std::sync::Arc;

use thiserror::Error;
use truekicks::fixtures::{Fixture, FixtureError};

use crate::{
    config::{AppConfig, DatabaseConfig, StorefrontConfig},
    database::Db,
    domain::{
        coupons::{
            CouponsRepository, CouponsService, DefaultCouponsService, FixtureCouponsRepository,
            PgCouponsRepository,
        },
        orders::{DefaultOrdersService, OrdersService, PgOrdersRepository},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("DATABASE_URL is required")]
    MissingDatabaseUrl,

    #[error("invalid database url")]
    Database(#[source] sqlx::Error),

    #[error("failed to load coupon fixtures")]
    Fixtures(#[source] FixtureError),
}

#[derive(Clone)]
pub struct AppContext {
    pub coupons: Arc<dyn CouponsService>,
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build the full application context.
    ///
    /// # Errors
    ///
    /// Returns an error if the database URL is missing or invalid, or the
    /// coupon fixtures cannot be loaded.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        Ok(Self {
            coupons: coupons_service(&config.storefront, &config.database)?,
            orders: orders_service(&config.database)?,
        })
    }
}

/// Coupon verification backed by the fixture catalog when configured, and the
/// database otherwise.
///
/// # Errors
///
/// Returns an error if neither source is usable.
pub fn coupons_service(
    storefront: &StorefrontConfig,
    database: &DatabaseConfig,
) -> Result<Arc<dyn CouponsService>, AppInitError> {
    let repository: Arc<dyn CouponsRepository> = match &storefront.coupon_fixtures {
        Some(path) => {
            let fixture = Fixture::from_path(path).map_err(AppInitError::Fixtures)?;

            Arc::new(FixtureCouponsRepository::from(&fixture))
        }
        None => Arc::new(PgCouponsRepository::new(db(database)?)),
    };

    Ok(Arc::new(DefaultCouponsService::new(repository)))
}

/// Order persistence backed by the database.
///
/// # Errors
///
/// Returns an error if the database URL is missing or invalid.
pub fn orders_service(database: &DatabaseConfig) -> Result<Arc<dyn OrdersService>, AppInitError> {
    let repository = Arc::new(PgOrdersRepository::new(db(database)?));

    Ok(Arc::new(DefaultOrdersService::new(repository)))
}

fn db(config: &DatabaseConfig) -> Result<Db, AppInitError> {
    let url = config
        .database_url
        .as_deref()
        .ok_or(AppInitError::MissingDatabaseUrl)?;

    Db::connect_lazy(url).map_err(AppInitError::Database)
}
