//! Product catalog models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product listed by a farmer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    pub farmer_id: i64,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub description: String,
    pub cost: Decimal,
    pub farmer_id: i64,
}

/// Flattened product shape embedded in order details
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub cost: Decimal,
    /// Farmer that fulfils the order this product was bought in
    pub farmer_id: i64,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            category: product.category.clone(),
            description: product.description.clone(),
            cost: product.cost,
            farmer_id: product.farmer_id,
        }
    }
}
