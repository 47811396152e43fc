//! Admin HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;

use super::farmer::IdQuery;
use super::{sales_response, SalesQuery};
use crate::middleware::CurrentUser;
use crate::services::admin::{AdminLoginInput, AdminService};
use crate::services::farmer::RegisterFarmerInput;
use crate::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformRevenue {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

fn service(state: &AppState) -> AdminService {
    AdminService::new(&state.repos, state.mailer.clone(), &state.config)
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<AdminLoginInput>,
) -> impl IntoResponse {
    match service(&state).login(input).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn add_farmer(
    State(state): State<AppState>,
    Json(input): Json<RegisterFarmerInput>,
) -> impl IntoResponse {
    match service(&state).add_farmer(input).await {
        Ok(_) => (StatusCode::OK, "Farmer Added Successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_farmers(State(state): State<AppState>) -> impl IntoResponse {
    match service(&state).list_farmers().await {
        Ok(farmers) => (StatusCode::OK, Json(farmers)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_buyers(State(state): State<AppState>) -> impl IntoResponse {
    match service(&state).list_buyers().await {
        Ok(buyers) => (StatusCode::OK, Json(buyers)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn pending_farmers(State(state): State<AppState>) -> impl IntoResponse {
    match service(&state).pending_farmers().await {
        Ok(farmers) => (StatusCode::OK, Json(farmers)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn approve_farmer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    tracing::debug!(admin_id = current_user.0.account_id, farmer_id = id, "Approving farmer");

    match service(&state).approve_farmer(id).await {
        Ok(_) => (StatusCode::OK, "Farmer Approved Successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn reject_farmer(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    tracing::debug!(admin_id = current_user.0.account_id, farmer_id = id, "Rejecting farmer");

    match service(&state).reject_farmer(id).await {
        Ok(_) => (StatusCode::OK, "Farmer Rejected Successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_farmer(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> impl IntoResponse {
    match service(&state).delete_farmer(query.id).await {
        Ok(()) => (StatusCode::OK, "Farmer Deleted Successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_buyer(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> impl IntoResponse {
    match service(&state).delete_buyer(query.id).await {
        Ok(()) => (StatusCode::OK, "Buyer Deleted Successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn dashboard_stats(State(state): State<AppState>) -> impl IntoResponse {
    match service(&state).dashboard_stats().await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn total_revenue(State(state): State<AppState>) -> impl IntoResponse {
    match service(&state).total_revenue().await {
        Ok(total_revenue) => Json(PlatformRevenue { total_revenue }).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Platform-wide sales report
pub async fn sales_data(
    State(state): State<AppState>,
    Query(query): Query<SalesQuery>,
) -> impl IntoResponse {
    let period = match query.period() {
        Ok(period) => period,
        Err(e) => return e.into_response(),
    };

    match service(&state).sales_data(period).await {
        Ok(buckets) => sales_response(&query, buckets),
        Err(e) => e.into_response(),
    }
}
