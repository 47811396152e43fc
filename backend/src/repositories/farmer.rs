//! Farmer repository

use async_trait::async_trait;
use shared::models::{Farmer, FarmerStatus, NewFarmer};
use sqlx::PgPool;

use super::map_write_error;
use crate::error::{AppError, AppResult};

#[async_trait]
pub trait FarmerRepository: Send + Sync {
    async fn create(&self, farmer: NewFarmer) -> AppResult<Farmer>;
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Farmer>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Farmer>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Farmer>>;
    /// Look up by the stored digest of a reset token
    async fn find_by_reset_token(&self, token_digest: &str) -> AppResult<Option<Farmer>>;
    async fn find_all(&self) -> AppResult<Vec<Farmer>>;
    async fn find_by_status(&self, status: FarmerStatus) -> AppResult<Vec<Farmer>>;
    /// Persist every mutable column of an existing farmer
    async fn update(&self, farmer: &Farmer) -> AppResult<()>;
    /// Returns false when no row had that id
    async fn delete(&self, id: i64) -> AppResult<bool>;
    async fn count(&self) -> AppResult<i64>;
}

/// PostgreSQL-backed farmer repository
#[derive(Clone)]
pub struct PgFarmerRepository {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct FarmerRow {
    id: i64,
    name: String,
    email: String,
    username: String,
    password_hash: String,
    mobile_no: String,
    national_id_no: String,
    location: String,
    status: String,
    reset_token: Option<String>,
}

impl TryFrom<FarmerRow> for Farmer {
    type Error = AppError;

    fn try_from(row: FarmerRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<FarmerStatus>()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Farmer {
            id: row.id,
            name: row.name,
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            mobile_no: row.mobile_no,
            national_id_no: row.national_id_no,
            location: row.location,
            status,
            reset_token: row.reset_token,
        })
    }
}

const FARMER_COLUMNS: &str = "id, name, email, username, password_hash, mobile_no, \
                              national_id_no, location, status, reset_token";

impl PgFarmerRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn fetch_one_where(&self, clause: &str, value: &str) -> AppResult<Option<Farmer>> {
        let query = format!("SELECT {} FROM farmers WHERE {} = $1", FARMER_COLUMNS, clause);
        sqlx::query_as::<_, FarmerRow>(&query)
            .bind(value)
            .fetch_optional(&self.db)
            .await?
            .map(Farmer::try_from)
            .transpose()
    }
}

#[async_trait]
impl FarmerRepository for PgFarmerRepository {
    async fn create(&self, farmer: NewFarmer) -> AppResult<Farmer> {
        let query = format!(
            r#"
            INSERT INTO farmers (name, email, username, password_hash, mobile_no,
                                 national_id_no, location, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            FARMER_COLUMNS
        );

        let row = sqlx::query_as::<_, FarmerRow>(&query)
            .bind(&farmer.name)
            .bind(&farmer.email)
            .bind(&farmer.username)
            .bind(&farmer.password_hash)
            .bind(&farmer.mobile_no)
            .bind(&farmer.national_id_no)
            .bind(&farmer.location)
            .bind(farmer.status.as_str())
            .fetch_one(&self.db)
            .await
            .map_err(map_write_error)?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Farmer>> {
        let query = format!("SELECT {} FROM farmers WHERE id = $1", FARMER_COLUMNS);
        sqlx::query_as::<_, FarmerRow>(&query)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .map(Farmer::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Farmer>> {
        self.fetch_one_where("username", username).await
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Farmer>> {
        self.fetch_one_where("email", email).await
    }

    async fn find_by_reset_token(&self, token_digest: &str) -> AppResult<Option<Farmer>> {
        self.fetch_one_where("reset_token", token_digest).await
    }

    async fn find_all(&self) -> AppResult<Vec<Farmer>> {
        let query = format!("SELECT {} FROM farmers ORDER BY id ASC", FARMER_COLUMNS);
        sqlx::query_as::<_, FarmerRow>(&query)
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(Farmer::try_from)
            .collect()
    }

    async fn find_by_status(&self, status: FarmerStatus) -> AppResult<Vec<Farmer>> {
        let query = format!(
            "SELECT {} FROM farmers WHERE LOWER(status) = LOWER($1) ORDER BY id ASC",
            FARMER_COLUMNS
        );
        sqlx::query_as::<_, FarmerRow>(&query)
            .bind(status.as_str())
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(Farmer::try_from)
            .collect()
    }

    async fn update(&self, farmer: &Farmer) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE farmers
            SET name = $2, email = $3, username = $4, password_hash = $5,
                mobile_no = $6, national_id_no = $7, location = $8,
                status = $9, reset_token = $10, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(farmer.id)
        .bind(&farmer.name)
        .bind(&farmer.email)
        .bind(&farmer.username)
        .bind(&farmer.password_hash)
        .bind(&farmer.mobile_no)
        .bind(&farmer.national_id_no)
        .bind(&farmer.location)
        .bind(farmer.status.as_str())
        .bind(&farmer.reset_token)
        .execute(&self.db)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM farmers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .map_err(map_write_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> AppResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM farmers")
            .fetch_one(&self.db)
            .await?;
        Ok(count)
    }
}
