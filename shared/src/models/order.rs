//! Order models

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductSummary;

/// Status a paid order ends up in
pub const ORDER_STATUS_COMPLETED: &str = "Completed";
/// Status a freshly placed order starts in
pub const ORDER_STATUS_PENDING: &str = "Pending";

/// An order linking a buyer, a farmer and a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Free-form status; payment confirmation sets it to "Completed"
    pub status: String,
    pub order_date: NaiveDateTime,
    pub address: Option<String>,
    pub buyer_id: i64,
    pub farmer_id: i64,
    pub product_id: i64,
    pub payment_id: Option<String>,
}

impl Order {
    /// Only completed orders count toward revenue. Stored statuses vary in case.
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case(ORDER_STATUS_COMPLETED)
    }
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub quantity: i32,
    pub amount: Decimal,
    pub status: String,
    pub order_date: NaiveDateTime,
    pub address: Option<String>,
    pub buyer_id: i64,
    pub farmer_id: i64,
    pub product_id: i64,
    pub payment_id: Option<String>,
}

/// Order projected together with its product, as returned to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: i64,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: String,
    pub order_date: NaiveDateTime,
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_email: Option<String>,
    pub product: ProductSummary,
}

/// Sum of amounts over completed orders
pub fn completed_revenue<'a, I>(orders: I) -> Decimal
where
    I: IntoIterator<Item = &'a Order>,
{
    orders
        .into_iter()
        .filter(|order| order.is_completed())
        .map(|order| order.amount)
        .sum()
}
