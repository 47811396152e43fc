//! Order repository

use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use shared::models::{NewOrder, Order};
use shared::types::SalesPeriod;
use sqlx::PgPool;
use thiserror::Error;

use super::map_write_error;
use crate::error::AppResult;

/// One grouped row of the sales aggregate: a day (`YYYY-MM-DD`) or month (`YYYY-MM`)
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SalesRow {
    pub label: String,
    pub order_count: i64,
    /// Amount over completed orders only
    pub revenue: Decimal,
}

/// Failure of the grouped sales query. Callers recompute from raw orders instead.
#[derive(Debug, Error)]
pub enum SalesQueryError {
    #[error("Grouped sales query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// Raised by stores that cannot run the grouped aggregate at all,
    /// such as the in-memory store the integration tests use
    #[error("Grouped sales query unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: NewOrder) -> AppResult<Order>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>>;
    async fn find_all(&self) -> AppResult<Vec<Order>>;
    async fn find_by_buyer(&self, buyer_id: i64) -> AppResult<Vec<Order>>;
    async fn find_by_farmer(&self, farmer_id: i64) -> AppResult<Vec<Order>>;
    async fn find_by_payment_id(&self, payment_id: &str) -> AppResult<Option<Order>>;
    async fn update(&self, order: &Order) -> AppResult<()>;
    async fn count(&self) -> AppResult<i64>;
    async fn count_by_farmer(&self, farmer_id: i64) -> AppResult<i64>;

    /// Orders placed at or after `since`, grouped per day or month, optionally for one farmer
    async fn grouped_sales(
        &self,
        period: SalesPeriod,
        since: NaiveDateTime,
        farmer_id: Option<i64>,
    ) -> Result<Vec<SalesRow>, SalesQueryError>;
}

/// PostgreSQL-backed order repository
#[derive(Clone)]
pub struct PgOrderRepository {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    quantity: i32,
    amount: Decimal,
    status: String,
    order_date: NaiveDateTime,
    address: Option<String>,
    buyer_id: i64,
    farmer_id: i64,
    product_id: i64,
    payment_id: Option<String>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Order {
            id: row.id,
            quantity: row.quantity,
            amount: row.amount,
            status: row.status,
            order_date: row.order_date,
            address: row.address,
            buyer_id: row.buyer_id,
            farmer_id: row.farmer_id,
            product_id: row.product_id,
            payment_id: row.payment_id,
        }
    }
}

const ORDER_COLUMNS: &str = "id, quantity, amount, status, order_date, address, \
                             buyer_id, farmer_id, product_id, payment_id";

impl PgOrderRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn fetch_by_column(&self, column: &str, id: i64) -> AppResult<Vec<Order>> {
        let query = format!(
            "SELECT {} FROM orders WHERE {} = $1 ORDER BY order_date DESC, id DESC",
            ORDER_COLUMNS, column
        );
        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .bind(id)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn create(&self, order: NewOrder) -> AppResult<Order> {
        let query = format!(
            r#"
            INSERT INTO orders (quantity, amount, status, order_date, address,
                                buyer_id, farmer_id, product_id, payment_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        );

        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(order.quantity)
            .bind(order.amount)
            .bind(&order.status)
            .bind(order.order_date)
            .bind(&order.address)
            .bind(order.buyer_id)
            .bind(order.farmer_id)
            .bind(order.product_id)
            .bind(&order.payment_id)
            .fetch_one(&self.db)
            .await
            .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Order>> {
        let query = format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS);
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(Order::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Order>> {
        let query = format!("SELECT {} FROM orders ORDER BY order_date DESC, id DESC", ORDER_COLUMNS);
        let rows = sqlx::query_as::<_, OrderRow>(&query)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn find_by_buyer(&self, buyer_id: i64) -> AppResult<Vec<Order>> {
        self.fetch_by_column("buyer_id", buyer_id).await
    }

    async fn find_by_farmer(&self, farmer_id: i64) -> AppResult<Vec<Order>> {
        self.fetch_by_column("farmer_id", farmer_id).await
    }

    async fn find_by_payment_id(&self, payment_id: &str) -> AppResult<Option<Order>> {
        let query = format!("SELECT {} FROM orders WHERE payment_id = $1", ORDER_COLUMNS);
        let row = sqlx::query_as::<_, OrderRow>(&query)
            .bind(payment_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(Order::from))
    }

    async fn update(&self, order: &Order) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE orders
            SET quantity = $2, amount = $3, status = $4, order_date = $5,
                address = $6, payment_id = $7, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(order.id)
        .bind(order.quantity)
        .bind(order.amount)
        .bind(&order.status)
        .bind(order.order_date)
        .bind(&order.address)
        .bind(&order.payment_id)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn count_by_farmer(&self, farmer_id: i64) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE farmer_id = $1")
            .bind(farmer_id)
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }

    async fn grouped_sales(
        &self,
        period: SalesPeriod,
        since: NaiveDateTime,
        farmer_id: Option<i64>,
    ) -> Result<Vec<SalesRow>, SalesQueryError> {
        let label_format = match period {
            SalesPeriod::Daily => "YYYY-MM-DD",
            SalesPeriod::Monthly => "YYYY-MM",
        };

        // MemoryStore::grouped_sales in tests/common mirrors this query; keep them in step
        let rows = sqlx::query_as::<_, SalesRow>(
            r#"
            SELECT
                TO_CHAR(order_date, $1) AS label,
                COUNT(*) AS order_count,
                COALESCE(
                    SUM(CASE WHEN LOWER(status) = 'completed' THEN amount ELSE 0 END),
                    0
                ) AS revenue
            FROM orders
            WHERE order_date >= $2
              AND ($3::BIGINT IS NULL OR farmer_id = $3)
            GROUP BY label
            ORDER BY label ASC
            "#,
        )
        .bind(label_format)
        .bind(since)
        .bind(farmer_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}
