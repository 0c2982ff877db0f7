//! The static document catalog.
//!
//! A [`Catalog`] is built once from the YAML configuration directory (see
//! [`load_catalog`]) and shared read-only for the life of the process. The
//! database keeps a cached copy of it for joins, but this in-memory value is
//! the source of truth for resolution.

mod loader;

use std::collections::{BTreeMap, HashMap};

pub use loader::{PROFILES_FILE, load_catalog};

use crate::types::{
    COMMON_PROFILE, CatalogMetadata, Category, DocumentDefinition, ImportantLink, PermitType,
    Profile, effective_profiles,
};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    permit_types: Vec<PermitType>,
    documents: HashMap<String, Vec<DocumentDefinition>>,
    profiles: Vec<Profile>,
    categories: BTreeMap<String, Category>,
    metadata: CatalogMetadata,
    links: Vec<ImportantLink>,
}

impl Catalog {
    /// Adds a permit type and its documents in declaration order.
    #[must_use]
    pub fn with_permit(mut self, permit: PermitType, documents: Vec<DocumentDefinition>) -> Self {
        self.documents.insert(permit.id.clone(), documents);
        self.permit_types.push(permit);
        self
    }

    #[must_use]
    pub fn with_profiles(mut self, profiles: Vec<Profile>) -> Self {
        self.profiles = profiles;
        self.ensure_common_profile();
        self
    }

    #[must_use]
    pub fn with_categories(mut self, categories: BTreeMap<String, Category>) -> Self {
        self.categories = categories;
        self
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: CatalogMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_links(mut self, links: Vec<ImportantLink>) -> Self {
        self.links = links;
        self
    }

    fn ensure_common_profile(&mut self) {
        if !self.has_profile(COMMON_PROFILE) {
            self.profiles.insert(
                0,
                Profile {
                    id: COMMON_PROFILE.to_string(),
                    name_en: "Common".to_string(),
                    name_fr: "Commun".to_string(),
                    description: None,
                },
            );
        }
    }

    pub fn permit_types(&self) -> &[PermitType] {
        &self.permit_types
    }

    pub fn permit_type(&self, id: &str) -> Option<&PermitType> {
        self.permit_types.iter().find(|p| p.id == id)
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn has_profile(&self, id: &str) -> bool {
        self.profiles.iter().any(|p| p.id == id)
    }

    pub fn categories(&self) -> &BTreeMap<String, Category> {
        &self.categories
    }

    pub fn metadata(&self) -> &CatalogMetadata {
        &self.metadata
    }

    pub fn links(&self) -> &[ImportantLink] {
        &self.links
    }

    pub fn document(&self, id: &str) -> Option<&DocumentDefinition> {
        self.all_documents().find(|d| d.id == id)
    }

    /// Every document of every permit type, permit types in catalog order.
    pub fn all_documents(&self) -> impl Iterator<Item = &DocumentDefinition> {
        self.permit_types
            .iter()
            .filter_map(|p| self.documents.get(&p.id))
            .flatten()
    }

    /// Resolves the checklist for a permit type.
    ///
    /// With `selected = None` every document is returned. Otherwise a document
    /// is kept when it carries at least one of the selected profiles or
    /// `common`. The result is ordered by `sort_order`, ties keeping
    /// declaration order. Unknown permit types resolve to an empty list.
    pub fn resolve(&self, permit_type: &str, selected: Option<&[String]>) -> Vec<&DocumentDefinition> {
        let Some(documents) = self.documents.get(permit_type) else {
            return Vec::new();
        };

        let mut resolved: Vec<&DocumentDefinition> = match selected {
            None => documents.iter().collect(),
            Some(selected) => {
                let filter = effective_profiles(selected);
                documents
                    .iter()
                    .filter(|d| d.has_any_profile(filter.iter().copied()))
                    .collect()
            }
        };

        resolved.sort_by_key(|d| d.sort_order);
        resolved
    }
}
