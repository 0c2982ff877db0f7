use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::progress::progress_for;
use crate::server::AppState;
use crate::server::dto::{ProfileFilterParams, ResetResponse};
use crate::server::response::{ApiError, ApiResponse, FoundExt, StoreResultExt};

use super::profile_selection;

pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(permit_type): Path<String>,
    Query(params): Query<ProfileFilterParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let selection = profile_selection(store, &params)?;

    let progress = progress_for(&state.catalog, store, &permit_type, selection.as_deref())
        .api_err("Failed to compute progress")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(progress)))
}

pub async fn reset_progress(
    State(state): State<Arc<AppState>>,
    Path(permit_type): Path<String>,
) -> impl IntoResponse {
    let store = state.store.as_ref();

    store
        .reset_all(&permit_type)
        .api_err("Failed to reset progress")?
        .or_not_found("Permit type not found")?;

    tracing::info!("Progress reset for permit type '{}'", permit_type);

    let progress = progress_for(&state.catalog, store, &permit_type, None)
        .api_err("Failed to compute progress")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(ResetResponse {
        permit_type,
        progress,
    })))
}
