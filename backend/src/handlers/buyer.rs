//! Buyer HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::services::buyer::{BuyerLoginInput, BuyerService, RegisterBuyerInput, UpdateBuyerInput};
use crate::services::OrderService;
use crate::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterBuyerInput>,
) -> impl IntoResponse {
    let service = BuyerService::new(&state.repos, &state.config);

    match service.register(input).await {
        Ok(_) => (StatusCode::OK, "Buyer Registered Successfully!").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<BuyerLoginInput>,
) -> impl IntoResponse {
    let service = BuyerService::new(&state.repos, &state.config);

    match service.login(input).await {
        Ok(session) => (StatusCode::OK, Json(session)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_buyer(
    State(state): State<AppState>,
    Path(buyer_id): Path<i64>,
) -> impl IntoResponse {
    let service = BuyerService::new(&state.repos, &state.config);

    match service.get(buyer_id).await {
        Ok(buyer) => (StatusCode::OK, Json(buyer)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(input): Json<UpdateBuyerInput>,
) -> impl IntoResponse {
    let service = BuyerService::new(&state.repos, &state.config);

    match service.update_profile(input).await {
        Ok(_) => (StatusCode::OK, "Buyer Updated Successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

/// A buyer's orders with product details
pub async fn orders(
    State(state): State<AppState>,
    Path(buyer_id): Path<i64>,
) -> impl IntoResponse {
    match OrderService::new(&state.repos).orders_by_buyer(buyer_id).await {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(e) => e.into_response(),
    }
}
