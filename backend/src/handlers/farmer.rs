//! Farmer HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{sales_response, SalesQuery};
use crate::services::farmer::{
    FarmerLoginInput, FarmerService, RegisterFarmerInput, UpdateFarmerInput,
};
use crate::services::{OrderService, SalesService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordQuery {
    pub token: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCount {
    pub farmer_id: i64,
    pub total_products: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCount {
    pub farmer_id: i64,
    pub total_orders: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerRevenue {
    pub farmer_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

fn service(state: &AppState) -> FarmerService {
    FarmerService::new(&state.repos, state.mailer.clone(), &state.config)
}

/// Register a new farmer account
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterFarmerInput>,
) -> impl IntoResponse {
    match service(&state).register(input).await {
        Ok(_) => (StatusCode::OK, "Farmer Registered Successfully!").into_response(),
        Err(e) => e.into_response(),
    }
}

/// Farmer sign-in; only approved farmers get through
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<FarmerLoginInput>,
) -> impl IntoResponse {
    match service(&state).login(input).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_pending(State(state): State<AppState>) -> impl IntoResponse {
    match service(&state).list_pending().await {
        Ok(farmers) => (StatusCode::OK, Json(farmers)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_all(State(state): State<AppState>) -> impl IntoResponse {
    match service(&state).list_all().await {
        Ok(farmers) => (StatusCode::OK, Json(farmers)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_farmer(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
) -> impl IntoResponse {
    match service(&state).get(farmer_id).await {
        Ok(farmer) => (StatusCode::OK, Json(farmer)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn reject(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    match service(&state).reject(id).await {
        Ok(_) => (StatusCode::OK, "Farmer rejected successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete(State(state): State<AppState>, Query(query): Query<IdQuery>) -> impl IntoResponse {
    match service(&state).delete(query.id).await {
        Ok(()) => (StatusCode::OK, "Farmer deleted successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(input): Json<UpdateFarmerInput>,
) -> impl IntoResponse {
    match service(&state).update_profile(input).await {
        Ok(_) => (StatusCode::OK, "Farmer Updated Successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn total_products(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
) -> impl IntoResponse {
    match service(&state).total_products(farmer_id).await {
        Ok(total_products) => Json(ProductCount {
            farmer_id,
            total_products,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn total_orders(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
) -> impl IntoResponse {
    match service(&state).total_orders(farmer_id).await {
        Ok(total_orders) => Json(OrderCount {
            farmer_id,
            total_orders,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn total_revenue(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
) -> impl IntoResponse {
    match service(&state).total_revenue(farmer_id).await {
        Ok(total_revenue) => Json(FarmerRevenue {
            farmer_id,
            total_revenue,
        })
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Orders placed with a farmer, with product and buyer details
pub async fn orders(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
) -> impl IntoResponse {
    match OrderService::new(&state.repos).orders_by_farmer(farmer_id).await {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Daily or monthly sales report for one farmer
pub async fn sales_data(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
    Query(query): Query<SalesQuery>,
) -> impl IntoResponse {
    let period = match query.period() {
        Ok(period) => period,
        Err(e) => return e.into_response(),
    };

    match SalesService::new(&state.repos)
        .sales_data(period, Some(farmer_id))
        .await
    {
        Ok(buckets) => sales_response(&query, buckets),
        Err(e) => e.into_response(),
    }
}

/// Send a password reset link
pub async fn forgot_password(
    State(state): State<AppState>,
    Query(query): Query<ForgotPasswordQuery>,
) -> impl IntoResponse {
    match service(&state).generate_reset_token(&query.email).await {
        Ok(()) => (StatusCode::OK, "Reset link sent to your email").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn reset_password(
    State(state): State<AppState>,
    Query(query): Query<ResetPasswordQuery>,
) -> impl IntoResponse {
    match service(&state)
        .reset_password(&query.token, &query.new_password)
        .await
    {
        Ok(()) => (StatusCode::OK, "Password updated successfully!").into_response(),
        Err(e) => e.into_response(),
    }
}
