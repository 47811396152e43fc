//! Buyer repository

use async_trait::async_trait;
use shared::models::{Buyer, NewBuyer};
use sqlx::PgPool;

use super::map_write_error;
use crate::error::AppResult;

#[async_trait]
pub trait BuyerRepository: Send + Sync {
    async fn create(&self, buyer: NewBuyer) -> AppResult<Buyer>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Buyer>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Buyer>>;
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Buyer>>;
    async fn find_all(&self) -> AppResult<Vec<Buyer>>;
    async fn update(&self, buyer: &Buyer) -> AppResult<()>;
    async fn delete(&self, id: i64) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

/// PostgreSQL-backed buyer repository
#[derive(Clone)]
pub struct PgBuyerRepository {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct BuyerRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    mobile_no: String,
    address: String,
}

impl From<BuyerRow> for Buyer {
    fn from(row: BuyerRow) -> Self {
        Buyer {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            mobile_no: row.mobile_no,
            address: row.address,
        }
    }
}

impl PgBuyerRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BuyerRepository for PgBuyerRepository {
    async fn create(&self, buyer: NewBuyer) -> AppResult<Buyer> {
        let row = sqlx::query_as::<_, BuyerRow>(
            r#"
            INSERT INTO buyers (name, email, password_hash, mobile_no, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, mobile_no, address
            "#,
        )
        .bind(&buyer.name)
        .bind(&buyer.email)
        .bind(&buyer.password_hash)
        .bind(&buyer.mobile_no)
        .bind(&buyer.address)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Buyer>> {
        let row = sqlx::query_as::<_, BuyerRow>(
            "SELECT id, name, email, password_hash, mobile_no, address FROM buyers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Buyer::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Buyer>> {
        let row = sqlx::query_as::<_, BuyerRow>(
            "SELECT id, name, email, password_hash, mobile_no, address FROM buyers WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Buyer::from))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<Buyer>> {
        let rows = sqlx::query_as::<_, BuyerRow>(
            "SELECT id, name, email, password_hash, mobile_no, address FROM buyers WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Buyer::from).collect())
    }

    async fn find_all(&self) -> AppResult<Vec<Buyer>> {
        let rows = sqlx::query_as::<_, BuyerRow>(
            "SELECT id, name, email, password_hash, mobile_no, address FROM buyers ORDER BY id ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Buyer::from).collect())
    }

    async fn update(&self, buyer: &Buyer) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE buyers
            SET name = $2, email = $3, password_hash = $4, mobile_no = $5,
                address = $6, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(buyer.id)
        .bind(&buyer.name)
        .bind(&buyer.email)
        .bind(&buyer.password_hash)
        .bind(&buyer.mobile_no)
        .bind(&buyer.address)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM buyers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM buyers")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
