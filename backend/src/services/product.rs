//! Product catalog

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{NewProduct, Product};
use shared::validation::validate_amount;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::repositories::{FarmerRepository, ProductRepository, Repositories};

/// Product service
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    farmers: Arc<dyn FarmerRepository>,
}

/// Product fields as submitted by a farmer
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(length(min = 1, max = 200, message = "Product name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "Category is required"))]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    pub farmer_id: i64,
}

impl ProductInput {
    fn check(&self) -> AppResult<()> {
        self.validate()?;
        validate_amount(self.cost).map_err(|m| AppError::Validation {
            field: "cost".to_string(),
            message: m.to_string(),
        })
    }
}

impl ProductService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            products: repos.products.clone(),
            farmers: repos.farmers.clone(),
        }
    }

    /// List a new product for an existing farmer
    pub async fn add(&self, input: ProductInput) -> AppResult<Product> {
        input.check()?;
        self.farmers
            .find_by_id(input.farmer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Farmer".to_string()))?;

        let product = self
            .products
            .create(NewProduct {
                name: input.name.trim().to_string(),
                category: input.category.trim().to_string(),
                description: input.description.trim().to_string(),
                cost: input.cost,
                farmer_id: input.farmer_id,
            })
            .await?;

        tracing::info!(product_id = product.id, farmer_id = product.farmer_id, "Product added");
        Ok(product)
    }

    /// Replace a product's fields; the owning farmer does not change
    pub async fn update(&self, id: i64, input: ProductInput) -> AppResult<Product> {
        input.check()?;
        let mut product = self.get(id).await?;
        product.name = input.name.trim().to_string();
        product.category = input.category.trim().to_string();
        product.description = input.description.trim().to_string();
        product.cost = input.cost;

        if !self.products.update(&product).await? {
            return Err(AppError::NotFound("Product".to_string()));
        }
        Ok(product)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.products.delete(id).await? {
            return Err(AppError::NotFound("Product".to_string()));
        }
        tracing::info!(product_id = id, "Product deleted");
        Ok(())
    }

    pub async fn get(&self, id: i64) -> AppResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    pub async fn list_all(&self) -> AppResult<Vec<Product>> {
        self.products.find_all().await
    }

    pub async fn list_by_category(&self, category: &str) -> AppResult<Vec<Product>> {
        self.products.find_by_category(category.trim()).await
    }

    pub async fn list_by_farmer(&self, farmer_id: i64) -> AppResult<Vec<Product>> {
        self.products.find_by_farmer(farmer_id).await
    }
}
