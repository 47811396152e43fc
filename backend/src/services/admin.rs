//! Platform administration

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{completed_revenue, Admin, Buyer, Farmer, SalesBucket};
use shared::types::{AccountRole, SalesPeriod};

use crate::config::{AdminBootstrapConfig, Config};
use crate::error::{AppError, AppResult};
use crate::external::Mailer;
use crate::repositories::{
    AdminRepository, BuyerRepository, FarmerRepository, OrderRepository, ProductRepository,
    Repositories,
};
use crate::services::auth::{AuthService, AuthToken};
use crate::services::farmer::{FarmerService, RegisterFarmerInput};
use crate::services::sales::SalesService;

/// Admin service
#[derive(Clone)]
pub struct AdminService {
    admins: Arc<dyn AdminRepository>,
    farmer_accounts: Arc<dyn FarmerRepository>,
    buyers: Arc<dyn BuyerRepository>,
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    farmers: FarmerService,
    sales: SalesService,
    auth: AuthService,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminLoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub admin: Admin,
    pub token: AuthToken,
}

/// Platform-wide totals for the admin dashboard
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_farmers: i64,
    pub total_buyers: i64,
    pub total_products: i64,
    pub total_orders: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

impl AdminService {
    pub fn new(repos: &Repositories, mailer: Arc<dyn Mailer>, config: &Config) -> Self {
        Self {
            admins: repos.admins.clone(),
            farmer_accounts: repos.farmers.clone(),
            buyers: repos.buyers.clone(),
            products: repos.products.clone(),
            orders: repos.orders.clone(),
            farmers: FarmerService::new(repos, mailer, config),
            sales: SalesService::new(repos),
            auth: AuthService::new(config),
        }
    }

    pub async fn login(&self, input: AdminLoginInput) -> AppResult<AdminSession> {
        let admin = self
            .admins
            .find_by_username(input.username.trim())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

        if !self.auth.verify_password(&input.password, &admin.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid username or password".to_string(),
            ));
        }

        let token = self.auth.issue_token(admin.id, AccountRole::Admin)?;
        Ok(AdminSession { admin, token })
    }

    /// Create the configured admin account if it does not exist yet.
    /// Returns true when an account was created.
    pub async fn ensure_bootstrap_admin(&self, config: &AdminBootstrapConfig) -> AppResult<bool> {
        let (Some(username), Some(password)) = (&config.username, &config.password) else {
            return Ok(false);
        };

        if self.admins.find_by_username(username).await?.is_some() {
            return Ok(false);
        }

        let password_hash = self.auth.hash_password(password)?;
        let admin = self.admins.create(username, &password_hash).await?;
        tracing::info!(admin_id = admin.id, username = %admin.username, "Bootstrap admin created");
        Ok(true)
    }

    /// Register a farmer on their behalf; the account still starts Pending
    pub async fn add_farmer(&self, input: RegisterFarmerInput) -> AppResult<Farmer> {
        self.farmers.register(input).await
    }

    pub async fn list_farmers(&self) -> AppResult<Vec<Farmer>> {
        self.farmers.list_all().await
    }

    pub async fn pending_farmers(&self) -> AppResult<Vec<Farmer>> {
        self.farmers.list_pending().await
    }

    pub async fn approve_farmer(&self, id: i64) -> AppResult<Farmer> {
        self.farmers.approve(id).await
    }

    pub async fn reject_farmer(&self, id: i64) -> AppResult<Farmer> {
        self.farmers.reject(id).await
    }

    pub async fn delete_farmer(&self, id: i64) -> AppResult<()> {
        self.farmers.delete(id).await
    }

    pub async fn list_buyers(&self) -> AppResult<Vec<Buyer>> {
        self.buyers.find_all().await
    }

    pub async fn delete_buyer(&self, id: i64) -> AppResult<()> {
        if !self.buyers.delete(id).await? {
            return Err(AppError::NotFound("Buyer".to_string()));
        }
        tracing::info!(buyer_id = id, "Buyer deleted by admin");
        Ok(())
    }

    /// Revenue over every completed order on the platform
    pub async fn total_revenue(&self) -> AppResult<Decimal> {
        let orders = self.orders.find_all().await?;
        Ok(completed_revenue(&orders))
    }

    pub async fn dashboard_stats(&self) -> AppResult<DashboardStats> {
        Ok(DashboardStats {
            total_farmers: self.farmer_accounts.count().await?,
            total_buyers: self.buyers.count().await?,
            total_products: self.products.count().await?,
            total_orders: self.orders.count().await?,
            total_revenue: self.total_revenue().await?,
        })
    }

    /// Platform-wide sales report
    pub async fn sales_data(&self, period: SalesPeriod) -> AppResult<Vec<SalesBucket>> {
        self.sales.sales_data(period, None).await
    }
}
