//! Product repository

use async_trait::async_trait;
use rust_decimal::Decimal;
use shared::models::{NewProduct, Product};
use sqlx::PgPool;

use super::map_write_error;
use crate::error::AppResult;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: NewProduct) -> AppResult<Product>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>>;
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Product>>;
    async fn find_all(&self) -> AppResult<Vec<Product>>;
    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Product>>;
    async fn find_by_farmer(&self, farmer_id: i64) -> AppResult<Vec<Product>>;
    async fn count_by_farmer(&self, farmer_id: i64) -> AppResult<i64>;
    async fn update(&self, product: &Product) -> AppResult<bool>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

/// PostgreSQL-backed product repository
#[derive(Clone)]
pub struct PgProductRepository {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    category: String,
    description: String,
    cost: Decimal,
    farmer_id: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            category: row.category,
            description: row.description,
            cost: row.cost,
            farmer_id: row.farmer_id,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, category, description, cost, farmer_id";

impl PgProductRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        let query = format!(
            r#"
            INSERT INTO products (name, category, description, cost, farmer_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        );

        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(&product.name)
            .bind(&product.category)
            .bind(&product.description)
            .bind(product.cost)
            .bind(product.farmer_id)
            .fetch_one(&self.db)
            .await
            .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        let query = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);
        let row = sqlx::query_as::<_, ProductRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row.map(Product::from))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Product>> {
        let query = format!("SELECT {} FROM products WHERE id = ANY($1)", PRODUCT_COLUMNS);
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(ids)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Product>> {
        let query = format!("SELECT {} FROM products ORDER BY id ASC", PRODUCT_COLUMNS);
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_category(&self, category: &str) -> AppResult<Vec<Product>> {
        let query = format!(
            "SELECT {} FROM products WHERE category = $1 ORDER BY id ASC",
            PRODUCT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(category)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_farmer(&self, farmer_id: i64) -> AppResult<Vec<Product>> {
        let query = format!(
            "SELECT {} FROM products WHERE farmer_id = $1 ORDER BY id ASC",
            PRODUCT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ProductRow>(&query)
            .bind(farmer_id)
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn count_by_farmer(&self, farmer_id: i64) -> AppResult<i64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE farmer_id = $1")
                .bind(farmer_id)
                .fetch_one(&self.db)
                .await?;
        Ok(count)
    }

    async fn update(&self, product: &Product) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, category = $3, description = $4, cost = $5,
                farmer_id = $6, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.cost)
        .bind(product.farmer_id)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
