mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use chrono::NaiveDate;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::types::*;

/// Counts reported by [`Store::seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub permit_types: usize,
    pub documents: usize,
    pub statuses_created: usize,
    pub documents_removed: usize,
}

/// Store defines the database interface.
///
/// Mutations keyed by document id return `false` when no status row exists;
/// they never create rows. Rows are only created by [`Store::seed`].
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    /// Upserts the catalog into the cache tables and creates missing status
    /// rows. Existing status rows and settings are left untouched.
    fn seed(&self, catalog: &Catalog) -> Result<SeedReport>;

    // Permit type operations
    fn list_permit_types(&self) -> Result<Vec<PermitType>>;
    fn permit_type_exists(&self, id: &str) -> Result<bool>;
    fn list_documents(&self, permit_type: &str) -> Result<Vec<DocumentDefinition>>;

    // Status operations
    fn get_status(&self, document_id: &str) -> Result<Option<DocumentStatus>>;
    fn list_statuses(&self, permit_type: &str) -> Result<Vec<DocumentStatus>>;
    fn mark_complete(&self, document_id: &str) -> Result<bool>;
    fn mark_incomplete(&self, document_id: &str) -> Result<bool>;
    fn set_notes(&self, document_id: &str, notes: &str) -> Result<bool>;
    fn set_due_date(&self, document_id: &str, due_date: Option<NaiveDate>) -> Result<bool>;
    fn reset_all(&self, permit_type: &str) -> Result<bool>;

    // Settings operations
    fn get_settings(&self) -> Result<UserSettings>;
    fn set_selected_profiles(&self, profiles: &[String]) -> Result<UserSettings>;
}
