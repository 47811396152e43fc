//! Product catalog HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::services::product::{ProductInput, ProductService};
use crate::AppState;

pub async fn add_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> impl IntoResponse {
    match ProductService::new(&state.repos).add(input).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(input): Json<ProductInput>,
) -> impl IntoResponse {
    match ProductService::new(&state.repos).update(product_id, input).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> impl IntoResponse {
    match ProductService::new(&state.repos).delete(product_id).await {
        Ok(()) => (StatusCode::OK, "Product deleted successfully").into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> impl IntoResponse {
    match ProductService::new(&state.repos).get(product_id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    match ProductService::new(&state.repos).list_all().await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> impl IntoResponse {
    match ProductService::new(&state.repos).list_by_category(&category).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn list_by_farmer(
    State(state): State<AppState>,
    Path(farmer_id): Path<i64>,
) -> impl IntoResponse {
    match ProductService::new(&state.repos).list_by_farmer(farmer_id).await {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => e.into_response(),
    }
}
