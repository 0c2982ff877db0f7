use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};

use crate::progress::documents_with_status;
use crate::server::AppState;
use crate::server::dto::{ProfileFilterParams, UpdateDueDateRequest, UpdateNotesRequest};
use crate::server::response::{
    ApiError, ApiResponse, FoundExt, StoreOptionExt, StoreResultExt,
};
use crate::store::Store;
use crate::types::DocumentStatus;

use super::profile_selection;

const DOCUMENT_NOT_FOUND: &str = "Document not found";

/// Status rows outlive catalog edits, so a mutation also requires the
/// document to still be in the loaded catalog.
fn ensure_listed(state: &AppState, id: &str) -> Result<(), ApiError> {
    state
        .catalog
        .document(id)
        .map(|_| ())
        .or_not_found(DOCUMENT_NOT_FOUND)
}

fn current_status(store: &dyn Store, id: &str) -> Result<DocumentStatus, ApiError> {
    store
        .get_status(id)
        .api_err("Failed to get document status")?
        .or_not_found(DOCUMENT_NOT_FOUND)
}

pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Path(permit_type): Path<String>,
    Query(params): Query<ProfileFilterParams>,
) -> impl IntoResponse {
    let store = state.store.as_ref();
    let selection = profile_selection(store, &params)?;

    let documents = documents_with_status(&state.catalog, store, &permit_type, selection.as_deref())
        .api_err("Failed to list documents")?;

    Ok::<_, ApiError>(Json(ApiResponse::success(documents)))
}

pub async fn complete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    ensure_listed(&state, &id)?;
    let store = state.store.as_ref();

    store
        .mark_complete(&id)
        .api_err("Failed to update document")?
        .or_not_found(DOCUMENT_NOT_FOUND)?;

    tracing::debug!("Document '{}' marked complete", id);

    Ok::<_, ApiError>(Json(ApiResponse::success(current_status(store, &id)?)))
}

pub async fn incomplete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    ensure_listed(&state, &id)?;
    let store = state.store.as_ref();

    store
        .mark_incomplete(&id)
        .api_err("Failed to update document")?
        .or_not_found(DOCUMENT_NOT_FOUND)?;

    tracing::debug!("Document '{}' marked incomplete", id);

    Ok::<_, ApiError>(Json(ApiResponse::success(current_status(store, &id)?)))
}

pub async fn update_notes(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateNotesRequest>,
) -> impl IntoResponse {
    ensure_listed(&state, &id)?;
    let store = state.store.as_ref();
    let notes = req.notes.unwrap_or_default();

    store
        .set_notes(&id, &notes)
        .api_err("Failed to update notes")?
        .or_not_found(DOCUMENT_NOT_FOUND)?;

    Ok::<_, ApiError>(Json(ApiResponse::success(current_status(store, &id)?)))
}

pub async fn update_due_date(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDueDateRequest>,
) -> impl IntoResponse {
    ensure_listed(&state, &id)?;
    let store = state.store.as_ref();

    // An absent field leaves the due date alone; an explicit null clears it.
    if let Some(due_date) = req.due_date {
        store
            .set_due_date(&id, due_date)
            .api_err("Failed to update due date")?
            .or_not_found(DOCUMENT_NOT_FOUND)?;
    }

    Ok::<_, ApiError>(Json(ApiResponse::success(current_status(store, &id)?)))
}
