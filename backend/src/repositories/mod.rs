//! Data access layer
//!
//! One async trait per entity, with PostgreSQL implementations on top of
//! `sqlx`. Services receive the repositories they need through
//! [`Repositories`], so alternative stores can be swapped in.

pub mod admin;
pub mod buyer;
pub mod farmer;
pub mod order;
pub mod product;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::AppError;

pub use admin::{AdminRepository, PgAdminRepository};
pub use buyer::{BuyerRepository, PgBuyerRepository};
pub use farmer::{FarmerRepository, PgFarmerRepository};
pub use order::{OrderRepository, PgOrderRepository, SalesQueryError, SalesRow};
pub use product::{PgProductRepository, ProductRepository};

/// Connectivity check used by the health endpoint
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> bool;
}

#[async_trait]
impl HealthProbe for PgPool {
    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(self).await.is_ok()
    }
}

/// Every repository the services depend on
#[derive(Clone)]
pub struct Repositories {
    pub farmers: Arc<dyn FarmerRepository>,
    pub buyers: Arc<dyn BuyerRepository>,
    pub admins: Arc<dyn AdminRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub health: Arc<dyn HealthProbe>,
}

impl Repositories {
    /// Repositories backed by a PostgreSQL pool
    pub fn postgres(db: PgPool) -> Self {
        Self {
            farmers: Arc::new(PgFarmerRepository::new(db.clone())),
            buyers: Arc::new(PgBuyerRepository::new(db.clone())),
            admins: Arc::new(PgAdminRepository::new(db.clone())),
            products: Arc::new(PgProductRepository::new(db.clone())),
            orders: Arc::new(PgOrderRepository::new(db.clone())),
            health: Arc::new(db),
        }
    }
}

/// Translate constraint violations on insert/update into client errors
pub(crate) fn map_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let field = db_err
                .constraint()
                .map(constraint_field)
                .unwrap_or("value")
                .to_string();
            return AppError::DuplicateEntry(field);
        }
        if db_err.is_foreign_key_violation() {
            return AppError::ValidationError(
                "Operation conflicts with related records".to_string(),
            );
        }
    }
    AppError::DatabaseError(err)
}

/// `farmers_national_id_no_key` -> `national_id_no`
fn constraint_field(constraint: &str) -> &str {
    let without_table = constraint
        .split_once('_')
        .map(|(_, rest)| rest)
        .unwrap_or(constraint);
    without_table.strip_suffix("_key").unwrap_or(without_table)
}
