use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Progress;

/// Query parameters shared by the documents and progress endpoints.
///
/// `all=true` disables profile filtering. Otherwise `profiles` (a
/// comma-separated list) is the filter, falling back to the saved settings.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileFilterParams {
    #[serde(default)]
    pub profiles: Option<String>,
    #[serde(default)]
    pub all: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfilesRequest {
    #[serde(default)]
    pub profiles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNotesRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

/// `due_date` absent is `None`; present with `null` is `Some(None)`.
#[derive(Debug, Deserialize)]
pub struct UpdateDueDateRequest {
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<NaiveDate>>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub permit_type: String,
    pub progress: Progress,
}
