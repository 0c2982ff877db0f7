use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use crate::server::AppState;
use crate::server::dto::UpdateProfilesRequest;
use crate::server::response::{ApiError, ApiResponse, StoreResultExt};
use crate::server::validation::validate_profiles;

pub async fn get_settings(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let settings = state
        .store
        .get_settings()
        .api_err("Failed to load settings")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(settings)))
}

pub async fn update_profiles(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateProfilesRequest>,
) -> impl IntoResponse {
    let profiles = req.profiles.unwrap_or_default();
    validate_profiles(&state.catalog, &profiles)?;

    let settings = state
        .store
        .set_selected_profiles(&profiles)
        .api_err("Failed to save settings")?;

    tracing::info!("Selected profiles: {}", settings.selected_profiles.join(", "));

    Ok::<_, ApiError>(Json(ApiResponse::success(settings)))
}
