use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::server::AppState;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};

pub async fn list_permit_types(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let permit_types = state
        .store
        .list_permit_types()
        .api_err("Failed to list permit types")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(permit_types)))
}

pub async fn list_profiles(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::success(state.catalog.profiles().to_vec()))
}

pub async fn list_categories(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::success(state.catalog.categories().clone()))
}

pub async fn list_important_links(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::success(state.catalog.links().to_vec()))
}

pub async fn get_metadata(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::success(state.catalog.metadata().clone()))
}
