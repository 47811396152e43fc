//! Order HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::services::order::{CreateOrderInput, OrderService, PaymentConfirmation};
use crate::AppState;

/// Checkout
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> impl IntoResponse {
    match OrderService::new(&state.repos).create_order(input).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Payment gateway callback
pub async fn confirm_payment(
    State(state): State<AppState>,
    Json(confirmation): Json<PaymentConfirmation>,
) -> impl IntoResponse {
    match OrderService::new(&state.repos).record_payment(confirmation).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_by_payment(
    State(state): State<AppState>,
    Path(payment_id): Path<String>,
) -> impl IntoResponse {
    match OrderService::new(&state.repos).find_by_payment_id(&payment_id).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(e) => e.into_response(),
    }
}
