//! HTTP handlers for the Farm Market API

pub mod admin;
pub mod buyer;
pub mod farmer;
pub mod health;
pub mod order;
pub mod product;

pub use health::health_check;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use shared::models::SalesBucket;
use shared::types::SalesPeriod;

use crate::error::{AppError, AppResult};
use crate::services::SalesService;

/// Query string of the sales-data endpoints
#[derive(Debug, Deserialize)]
pub struct SalesQuery {
    pub period: Option<String>,
    pub format: Option<String>,
}

impl SalesQuery {
    /// Requested period, daily when absent
    pub fn period(&self) -> AppResult<SalesPeriod> {
        match self.period.as_deref() {
            None => Ok(SalesPeriod::Daily),
            Some(raw) => raw
                .parse::<SalesPeriod>()
                .map_err(|e| AppError::ValidationError(e.to_string())),
        }
    }

    fn wants_csv(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("csv"))
    }
}

/// Buckets as JSON, or as a CSV download when asked for
pub fn sales_response(query: &SalesQuery, buckets: Vec<SalesBucket>) -> Response {
    if !query.wants_csv() {
        return (StatusCode::OK, Json(buckets)).into_response();
    }

    match SalesService::export_to_csv(&buckets) {
        Ok(csv) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"sales.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
