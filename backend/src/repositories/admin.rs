//! Administrator repository

use async_trait::async_trait;
use shared::models::Admin;
use sqlx::PgPool;

use super::map_write_error;
use crate::error::AppResult;

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, username: &str, password_hash: &str) -> AppResult<Admin>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<Admin>>;
}

/// PostgreSQL-backed admin repository
#[derive(Clone)]
pub struct PgAdminRepository {
    db: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i64,
    username: String,
    password_hash: String,
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Admin {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
        }
    }
}

impl PgAdminRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn create(&self, username: &str, password_hash: &str) -> AppResult<Admin> {
        let row = sqlx::query_as::<_, AdminRow>(
            r#"
            INSERT INTO admins (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;

        Ok(row.into())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Admin>> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, username, password_hash FROM admins WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Admin::from))
    }
}
