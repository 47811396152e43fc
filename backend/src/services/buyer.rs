//! Buyer accounts

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use shared::models::{Buyer, NewBuyer};
use shared::types::AccountRole;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::repositories::{BuyerRepository, Repositories};
use crate::services::auth::{AuthService, AuthToken};

/// Buyer service
#[derive(Clone)]
pub struct BuyerService {
    buyers: Arc<dyn BuyerRepository>,
    auth: AuthService,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterBuyerInput {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[serde(rename = "mobileno")]
    #[validate(length(min = 1, max = 20, message = "Mobile number is required"))]
    pub mobile_no: String,
    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuyerLoginInput {
    pub email: String,
    pub password: String,
}

/// Profile edit; the email address stays as registered
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBuyerInput {
    pub id: i64,
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[serde(rename = "mobileno")]
    #[validate(length(min = 1, max = 20, message = "Mobile number is required"))]
    pub mobile_no: String,
    #[validate(length(min = 1, max = 500, message = "Address is required"))]
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuyerSession {
    pub buyer: Buyer,
    pub token: AuthToken,
}

impl BuyerService {
    pub fn new(repos: &Repositories, config: &Config) -> Self {
        Self {
            buyers: repos.buyers.clone(),
            auth: AuthService::new(config),
        }
    }

    pub async fn register(&self, input: RegisterBuyerInput) -> AppResult<Buyer> {
        input.validate()?;

        let buyer = self
            .buyers
            .create(NewBuyer {
                name: input.name.trim().to_string(),
                email: input.email.trim().to_lowercase(),
                password_hash: self.auth.hash_password(&input.password)?,
                mobile_no: input.mobile_no.trim().to_string(),
                address: input.address.trim().to_string(),
            })
            .await?;

        tracing::info!(buyer_id = buyer.id, "Buyer registered");
        Ok(buyer)
    }

    pub async fn login(&self, input: BuyerLoginInput) -> AppResult<BuyerSession> {
        let buyer = self
            .buyers
            .find_by_email(&input.email.trim().to_lowercase())
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !self.auth.verify_password(&input.password, &buyer.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let token = self.auth.issue_token(buyer.id, AccountRole::Buyer)?;
        Ok(BuyerSession { buyer, token })
    }

    pub async fn get(&self, id: i64) -> AppResult<Buyer> {
        self.buyers
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Buyer".to_string()))
    }

    pub async fn list_all(&self) -> AppResult<Vec<Buyer>> {
        self.buyers.find_all().await
    }

    pub async fn update_profile(&self, input: UpdateBuyerInput) -> AppResult<Buyer> {
        input.validate()?;

        let mut buyer = self.get(input.id).await?;
        buyer.name = input.name.trim().to_string();
        buyer.mobile_no = input.mobile_no.trim().to_string();
        buyer.address = input.address.trim().to_string();

        self.buyers.update(&buyer).await?;
        Ok(buyer)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.buyers.delete(id).await? {
            return Err(AppError::NotFound("Buyer".to_string()));
        }
        tracing::info!(buyer_id = id, "Buyer deleted");
        Ok(())
    }
}
