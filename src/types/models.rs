use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitType {
    #[serde(default)]
    pub id: String,
    pub name_fr: String,
    pub name_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub official_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub name_en: String,
    pub name_fr: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentDefinition {
    pub id: String,
    pub permit_type: String,
    pub name_fr: String,
    pub name_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub profiles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validity_days: Option<u32>,
    pub sort_order: i64,
}

impl DocumentDefinition {
    #[must_use]
    pub fn has_any_profile<'a, I>(&self, profiles: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        profiles
            .into_iter()
            .any(|p| self.profiles.iter().any(|own| own == p))
    }
}

/// Mutable per-document state. `completed_at` is set iff `is_complete`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStatus {
    pub document_id: String,
    pub is_complete: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl DocumentStatus {
    #[must_use]
    pub fn pending(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            is_complete: false,
            completed_at: None,
            notes: None,
            due_date: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithStatus {
    #[serde(flatten)]
    pub document: DocumentDefinition,
    pub is_complete: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl DocumentWithStatus {
    /// A document without a status row reads as pending.
    #[must_use]
    pub fn new(document: DocumentDefinition, status: Option<DocumentStatus>) -> Self {
        let status = status.unwrap_or_else(|| DocumentStatus::pending(&document.id));
        Self {
            document,
            is_complete: status.is_complete,
            completed_at: status.completed_at,
            notes: status.notes,
            due_date: status.due_date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub selected_profiles: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name_en: String,
    pub name_fr: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportantLink {
    pub name_fr: String,
    pub name_en: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}
