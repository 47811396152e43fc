//! Orders: checkout, payment confirmation and order-detail projections

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Local;
use rust_decimal::Decimal;
use serde::Deserialize;
use shared::models::{
    Buyer, NewOrder, Order, OrderDetail, Product, ProductSummary, ORDER_STATUS_COMPLETED,
    ORDER_STATUS_PENDING,
};

use crate::error::{AppError, AppResult};
use crate::repositories::{BuyerRepository, OrderRepository, ProductRepository, Repositories};

/// Order service
#[derive(Clone)]
pub struct OrderService {
    orders: Arc<dyn OrderRepository>,
    products: Arc<dyn ProductRepository>,
    buyers: Arc<dyn BuyerRepository>,
}

/// Checkout request. Stock and payment are not checked here.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: Option<String>,
    pub address: Option<String>,
    pub buyer_id: i64,
    pub farmer_id: i64,
    pub product_id: i64,
    pub payment_id: Option<String>,
}

/// Payment gateway confirmation for an order
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub order_id: i64,
    pub payment_id: String,
}

impl OrderService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            orders: repos.orders.clone(),
            products: repos.products.clone(),
            buyers: repos.buyers.clone(),
        }
    }

    /// Place an order as submitted; it starts out Pending unless a status is given
    pub async fn create_order(&self, input: CreateOrderInput) -> AppResult<Order> {
        let status = input
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| ORDER_STATUS_PENDING.to_string());

        let order = self
            .orders
            .create(NewOrder {
                quantity: input.quantity,
                amount: input.amount,
                status,
                order_date: Local::now().naive_local(),
                address: input.address,
                buyer_id: input.buyer_id,
                farmer_id: input.farmer_id,
                product_id: input.product_id,
                payment_id: input.payment_id,
            })
            .await?;

        tracing::info!(
            order_id = order.id,
            buyer_id = order.buyer_id,
            farmer_id = order.farmer_id,
            "Order placed"
        );
        Ok(order)
    }

    /// Store the gateway payment id and mark the order completed
    pub async fn record_payment(&self, confirmation: PaymentConfirmation) -> AppResult<Order> {
        let payment_id = confirmation.payment_id.trim();
        if payment_id.is_empty() {
            return Err(AppError::Validation {
                field: "paymentId".to_string(),
                message: "Payment id is required".to_string(),
            });
        }

        let mut order = self
            .orders
            .find_by_id(confirmation.order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        order.payment_id = Some(payment_id.to_string());
        order.status = ORDER_STATUS_COMPLETED.to_string();
        self.orders.update(&order).await?;

        tracing::info!(order_id = order.id, payment_id = %payment_id, "Payment recorded");
        Ok(order)
    }

    pub async fn find_by_payment_id(&self, payment_id: &str) -> AppResult<Order> {
        self.orders
            .find_by_payment_id(payment_id.trim())
            .await?
            .ok_or_else(|| AppError::NotFound("Order".to_string()))
    }

    /// A buyer's orders with their products
    pub async fn orders_by_buyer(&self, buyer_id: i64) -> AppResult<Vec<OrderDetail>> {
        self.buyers
            .find_by_id(buyer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Buyer".to_string()))?;

        let orders = self.orders.find_by_buyer(buyer_id).await?;
        let products = self.products_for(&orders).await?;

        Ok(project(&orders, &products, None))
    }

    /// A farmer's orders with their products and who bought them
    pub async fn orders_by_farmer(&self, farmer_id: i64) -> AppResult<Vec<OrderDetail>> {
        let orders = self.orders.find_by_farmer(farmer_id).await?;
        let products = self.products_for(&orders).await?;

        let mut buyer_ids: Vec<i64> = orders.iter().map(|o| o.buyer_id).collect();
        buyer_ids.sort_unstable();
        buyer_ids.dedup();
        let buyers: HashMap<i64, Buyer> = self
            .buyers
            .find_by_ids(&buyer_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        Ok(project(&orders, &products, Some(&buyers)))
    }

    async fn products_for(&self, orders: &[Order]) -> AppResult<HashMap<i64, Product>> {
        let mut ids: Vec<i64> = orders.iter().map(|o| o.product_id).collect();
        ids.sort_unstable();
        ids.dedup();

        Ok(self
            .products
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }
}

/// Pair each order with its product, and with its buyer when buyers are given.
/// Orders whose product no longer exists are left out.
fn project(
    orders: &[Order],
    products: &HashMap<i64, Product>,
    buyers: Option<&HashMap<i64, Buyer>>,
) -> Vec<OrderDetail> {
    orders
        .iter()
        .filter_map(|order| {
            let Some(product) = products.get(&order.product_id) else {
                tracing::warn!(
                    order_id = order.id,
                    product_id = order.product_id,
                    "Order references a missing product"
                );
                return None;
            };
            let buyer = buyers.and_then(|b| b.get(&order.buyer_id));

            Some(OrderDetail {
                id: order.id,
                quantity: order.quantity,
                amount: order.amount,
                status: order.status.clone(),
                order_date: order.order_date,
                address: order.address.clone(),
                buyer_name: buyer.map(|b| b.name.clone()),
                buyer_email: buyer.map(|b| b.email.clone()),
                product: ProductSummary::from(product),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn order(id: i64, product_id: i64) -> Order {
        Order {
            id,
            quantity: 2,
            amount: Decimal::from(240),
            status: "Pending".to_string(),
            order_date: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            address: Some("12 Market Road".to_string()),
            buyer_id: 7,
            farmer_id: 3,
            product_id,
            payment_id: None,
        }
    }

    fn product(id: i64) -> Product {
        Product {
            id,
            name: "Tomatoes".to_string(),
            category: "Vegetables".to_string(),
            description: "Vine ripened".to_string(),
            cost: Decimal::from(120),
            farmer_id: 3,
        }
    }

    #[test]
    fn test_projection_without_buyers() {
        let products = HashMap::from([(5, product(5))]);
        let details = project(&[order(1, 5)], &products, None);

        assert_eq!(details.len(), 1);
        assert_eq!(details[0].product.name, "Tomatoes");
        assert_eq!(details[0].product.farmer_id, 3);
        assert!(details[0].buyer_name.is_none());
    }

    #[test]
    fn test_projection_with_buyers() {
        let products = HashMap::from([(5, product(5))]);
        let buyers = HashMap::from([(
            7,
            Buyer {
                id: 7,
                name: "Ravi".to_string(),
                email: "ravi@example.com".to_string(),
                password_hash: String::new(),
                mobile_no: "9876543210".to_string(),
                address: "Pune".to_string(),
            },
        )]);

        let details = project(&[order(1, 5)], &products, Some(&buyers));
        assert_eq!(details[0].buyer_name.as_deref(), Some("Ravi"));
        assert_eq!(details[0].buyer_email.as_deref(), Some("ravi@example.com"));
    }

    #[test]
    fn test_projection_skips_missing_products() {
        let products = HashMap::from([(5, product(5))]);
        let details = project(&[order(1, 5), order(2, 6)], &products, None);
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].id, 1);
    }
}
