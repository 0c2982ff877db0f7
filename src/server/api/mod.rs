mod documents;
mod progress;
mod reference;
mod settings;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::server::AppState;
use crate::server::dto::ProfileFilterParams;
use crate::server::response::{ApiError, StoreResultExt};
use crate::store::Store;
use crate::types::parse_profile_list;

pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Reference data
        .route("/permit-types", get(reference::list_permit_types))
        .route("/profiles", get(reference::list_profiles))
        .route("/categories", get(reference::list_categories))
        .route("/important-links", get(reference::list_important_links))
        .route("/metadata", get(reference::get_metadata))
        // Settings
        .route("/user-settings", get(settings::get_settings))
        .route(
            "/user-settings/profiles",
            post(settings::update_profiles).put(settings::update_profiles),
        )
        // Documents. The list route shares the `{id}` segment with the
        // per-document routes; there it holds the permit type.
        .route("/documents/{id}", get(documents::list_documents))
        .route("/documents/{id}/complete", post(documents::complete_document))
        .route("/documents/{id}/incomplete", post(documents::incomplete_document))
        .route("/documents/{id}/notes", post(documents::update_notes))
        .route("/documents/{id}/due-date", post(documents::update_due_date))
        // Progress
        .route("/progress/{permit_type}", get(progress::get_progress))
        .route("/reset/{permit_type}", post(progress::reset_progress))
}

/// Works out the profile filter for a listing request.
///
/// `None` means no filtering. An explicit `profiles` parameter wins over the
/// saved settings.
fn profile_selection(
    store: &dyn Store,
    params: &ProfileFilterParams,
) -> Result<Option<Vec<String>>, ApiError> {
    if params.all == Some(true) {
        return Ok(None);
    }

    if let Some(raw) = params.profiles.as_deref() {
        return Ok(Some(parse_profile_list(raw)));
    }

    let settings = store.get_settings().api_err("Failed to load settings")?;
    Ok(Some(settings.selected_profiles))
}
