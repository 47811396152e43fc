//! Farmer accounts: registration, approval workflow, profile edits,
//! password reset and per-farmer dashboard counters

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{completed_revenue, Farmer, FarmerStatus, NewFarmer};
use shared::types::AccountRole;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::external::{MailMessage, Mailer};
use crate::repositories::{FarmerRepository, OrderRepository, ProductRepository, Repositories};
use crate::services::auth::{AuthService, AuthToken};

/// Farmer service
#[derive(Clone)]
pub struct FarmerService {
    farmers: Arc<dyn FarmerRepository>,
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    mailer: Arc<dyn Mailer>,
    auth: AuthService,
    reset_link_base: String,
}

/// Registration form
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterFarmerInput {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(rename = "mobileno")]
    #[validate(length(min = 1, max = 20, message = "Mobile number is required"))]
    pub mobile_no: String,
    #[serde(rename = "nationalidno")]
    #[validate(length(min = 1, max = 20, message = "National ID is required"))]
    pub national_id_no: String,
    #[validate(length(min = 1, max = 200, message = "Location is required"))]
    pub location: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FarmerLoginInput {
    pub username: String,
    pub password: String,
}

/// Profile edit. Only these fields are taken from the request; anything
/// else it carries (username included) is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateFarmerInput {
    pub id: i64,
    #[validate(length(min = 1, max = 200, message = "Location is required"))]
    pub location: String,
    #[serde(rename = "mobileno")]
    #[validate(length(min = 1, max = 20, message = "Mobile number is required"))]
    pub mobile_no: String,
    #[serde(rename = "nationalidno")]
    #[validate(length(min = 1, max = 20, message = "National ID is required"))]
    pub national_id_no: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Signed-in farmer
#[derive(Debug, Clone, Serialize)]
pub struct FarmerSession {
    pub farmer: Farmer,
    pub token: AuthToken,
}

impl FarmerService {
    pub fn new(repos: &Repositories, mailer: Arc<dyn Mailer>, config: &Config) -> Self {
        Self {
            farmers: repos.farmers.clone(),
            products: repos.products.clone(),
            orders: repos.orders.clone(),
            mailer,
            auth: AuthService::new(config),
            reset_link_base: config.mail.reset_link_base.clone(),
        }
    }

    /// Register a farmer. New accounts always start out Pending.
    pub async fn register(&self, input: RegisterFarmerInput) -> AppResult<Farmer> {
        input.validate()?;

        let password_hash = self.auth.hash_password(&input.password)?;

        let farmer = self
            .farmers
            .create(NewFarmer {
                name: input.name.trim().to_string(),
                email: input.email.trim().to_lowercase(),
                username: input.username.trim().to_string(),
                password_hash,
                mobile_no: input.mobile_no.trim().to_string(),
                national_id_no: input.national_id_no.trim().to_string(),
                location: input.location.trim().to_string(),
                status: FarmerStatus::Pending,
            })
            .await?;

        tracing::info!(farmer_id = farmer.id, username = %farmer.username, "Farmer registered");
        Ok(farmer)
    }

    /// Sign in. Fails the same way for unknown usernames, wrong passwords
    /// and accounts that are not approved.
    pub async fn login(&self, input: FarmerLoginInput) -> AppResult<FarmerSession> {
        let farmer = self
            .farmers
            .find_by_username(input.username.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !self.auth.verify_password(&input.password, &farmer.password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        if !farmer.is_approved() {
            tracing::debug!(farmer_id = farmer.id, status = %farmer.status, "Login refused");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.auth.issue_token(farmer.id, AccountRole::Farmer)?;
        Ok(FarmerSession { farmer, token })
    }

    pub async fn get(&self, id: i64) -> AppResult<Farmer> {
        self.farmers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Farmer".to_string()))
    }

    pub async fn list_all(&self) -> AppResult<Vec<Farmer>> {
        self.farmers.find_all().await
    }

    pub async fn list_pending(&self) -> AppResult<Vec<Farmer>> {
        self.farmers.find_by_status(FarmerStatus::Pending).await
    }

    pub async fn approve(&self, id: i64) -> AppResult<Farmer> {
        self.set_status(id, FarmerStatus::Approved).await
    }

    pub async fn reject(&self, id: i64) -> AppResult<Farmer> {
        self.set_status(id, FarmerStatus::Rejected).await
    }

    async fn set_status(&self, id: i64, status: FarmerStatus) -> AppResult<Farmer> {
        let mut farmer = self.get(id).await?;
        let previous = farmer.status;
        farmer.status = status;
        self.farmers.update(&farmer).await?;

        tracing::info!(farmer_id = id, from = %previous, to = %status, "Farmer status changed");
        Ok(farmer)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.farmers.delete(id).await? {
            return Err(AppError::NotFound("Farmer".to_string()));
        }
        tracing::info!(farmer_id = id, "Farmer deleted");
        Ok(())
    }

    /// Copy location, mobile number, national id and email onto the stored farmer
    pub async fn update_profile(&self, input: UpdateFarmerInput) -> AppResult<Farmer> {
        input.validate()?;

        let mut farmer = self.get(input.id).await?;
        farmer.location = input.location.trim().to_string();
        farmer.mobile_no = input.mobile_no.trim().to_string();
        farmer.national_id_no = input.national_id_no.trim().to_string();
        farmer.email = input.email.trim().to_lowercase();

        self.farmers.update(&farmer).await?;
        Ok(farmer)
    }

    /// Issue a reset token and mail the reset link to the farmer
    pub async fn generate_reset_token(&self, email: &str) -> AppResult<()> {
        let mut farmer = self
            .farmers
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(|| AppError::NotFound("Farmer".to_string()))?;

        let token = AuthService::generate_reset_token();
        farmer.reset_token = Some(AuthService::reset_token_digest(&token));
        self.farmers.update(&farmer).await?;

        let link = format!("{}?token={}", self.reset_link_base, token);
        self.mailer
            .send_html(MailMessage {
                to: farmer.email.clone(),
                subject: "Password Reset Request".to_string(),
                html: reset_mail_body(&farmer.name, &link),
            })
            .await?;

        tracing::info!(farmer_id = farmer.id, "Password reset link sent");
        Ok(())
    }

    /// Set a new password using a reset token. The token is single use.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> AppResult<()> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::InvalidResetToken);
        }

        let mut farmer = self
            .farmers
            .find_by_reset_token(&AuthService::reset_token_digest(token))
            .await?
            .ok_or(AppError::InvalidResetToken)?;

        if new_password.is_empty() {
            return Err(AppError::Validation {
                field: "newPassword".to_string(),
                message: "Password is required".to_string(),
            });
        }

        farmer.password_hash = self.auth.hash_password(new_password)?;
        farmer.reset_token = None;
        self.farmers.update(&farmer).await?;

        tracing::info!(farmer_id = farmer.id, "Password reset");
        Ok(())
    }

    pub async fn total_products(&self, farmer_id: i64) -> AppResult<i64> {
        self.get(farmer_id).await?;
        self.products.count_by_farmer(farmer_id).await
    }

    pub async fn total_orders(&self, farmer_id: i64) -> AppResult<i64> {
        self.orders.count_by_farmer(farmer_id).await
    }

    /// Revenue over the farmer's completed orders
    pub async fn total_revenue(&self, farmer_id: i64) -> AppResult<Decimal> {
        let orders = self.orders.find_by_farmer(farmer_id).await?;
        Ok(completed_revenue(&orders))
    }
}

fn reset_mail_body(name: &str, link: &str) -> String {
    format!(
        "<p>Hello {},</p>\
         <p>We received a request to reset your password. \
         Click the link below to choose a new one:</p>\
         <p><a href=\"{link}\">{link}</a></p>\
         <p>If you did not ask for this, you can ignore this email.</p>",
        name,
        link = link
    )
}
