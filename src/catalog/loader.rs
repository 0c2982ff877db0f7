use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::Catalog;
use crate::error::{Error, Result};
use crate::types::{
    COMMON_PROFILE, CatalogMetadata, Category, DocumentDefinition, ImportantLink, PermitType,
    Profile,
};

/// Shared definitions file. Every other `*.yaml` file is a permit type.
pub const PROFILES_FILE: &str = "profiles.yaml";

#[derive(Debug, Default, Deserialize)]
struct ProfilesFile {
    #[serde(default)]
    metadata: CatalogMetadata,
    #[serde(default)]
    profiles: Vec<Profile>,
    #[serde(default)]
    categories: BTreeMap<String, Category>,
    #[serde(default)]
    important_links: Vec<ImportantLink>,
}

#[derive(Debug, Deserialize)]
struct PermitFile {
    permit_type: PermitType,
    #[serde(default)]
    documents: Vec<DocumentEntry>,
}

#[derive(Debug, Deserialize)]
struct DocumentEntry {
    id: String,
    name_fr: String,
    name_en: String,
    #[serde(default)]
    description: Option<String>,
    category: String,
    #[serde(default)]
    profiles: Vec<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    link_text: Option<String>,
    #[serde(default)]
    validity_days: Option<u32>,
    #[serde(default)]
    sort_order: Option<i64>,
}

impl DocumentEntry {
    fn into_definition(self, permit_type: &str, index: usize) -> DocumentDefinition {
        let profiles = if self.profiles.is_empty() {
            vec![COMMON_PROFILE.to_string()]
        } else {
            self.profiles
        };

        DocumentDefinition {
            id: self.id,
            permit_type: permit_type.to_string(),
            name_fr: self.name_fr,
            name_en: self.name_en,
            description: self.description,
            category: self.category,
            profiles,
            link: self.link,
            link_text: self.link_text,
            validity_days: self.validity_days,
            sort_order: self.sort_order.unwrap_or(index as i64),
        }
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|source| Error::Catalog {
        path: path.display().to_string(),
        source,
    })
}

fn permit_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/*.yaml", glob::Pattern::escape(&dir.display().to_string()));
    let mut paths: Vec<PathBuf> = match glob::glob(&pattern) {
        Ok(entries) => entries
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("Skipping unreadable catalog entry: {e}");
                    None
                }
            })
            .filter(|path| path.file_name().is_some_and(|name| name != PROFILES_FILE))
            .collect(),
        Err(e) => {
            tracing::warn!("Invalid catalog directory pattern '{pattern}': {e}");
            Vec::new()
        }
    };
    paths.sort();
    paths
}

fn load_permit(path: &Path) -> Result<(PermitType, Vec<DocumentDefinition>)> {
    let file: PermitFile = read_yaml(path)?;
    let mut permit = file.permit_type;

    if permit.id.is_empty() {
        permit.id = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Config(format!("cannot derive permit id from {}", path.display())))?;
    }

    let documents = file
        .documents
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.into_definition(&permit.id, index))
        .collect();

    Ok((permit, documents))
}

/// Builds the catalog from a configuration directory.
///
/// Never fails: a missing or malformed `profiles.yaml` yields empty shared
/// definitions, and a permit file that cannot be read is skipped with a
/// warning so that permit type resolves to no documents.
pub fn load_catalog<P: AsRef<Path>>(dir: P) -> Catalog {
    let dir = dir.as_ref();

    let shared = match read_yaml::<ProfilesFile>(&dir.join(PROFILES_FILE)) {
        Ok(shared) => shared,
        Err(e) => {
            tracing::warn!("Using empty profile definitions: {e}");
            ProfilesFile::default()
        }
    };

    let mut catalog = Catalog::default()
        .with_profiles(shared.profiles)
        .with_categories(shared.categories)
        .with_metadata(shared.metadata)
        .with_links(shared.important_links);

    let mut seen_documents = HashSet::new();

    for path in permit_files(dir) {
        let (permit, documents) = match load_permit(&path) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("Skipping permit type: {e}");
                continue;
            }
        };

        if catalog.permit_type(&permit.id).is_some() {
            tracing::warn!(
                "Duplicate permit type '{}' in {}, ignoring",
                permit.id,
                path.display()
            );
            continue;
        }

        let documents: Vec<DocumentDefinition> = documents
            .into_iter()
            .filter(|doc| {
                let unique = seen_documents.insert(doc.id.clone());
                if !unique {
                    tracing::warn!(
                        "Duplicate document id '{}' in {}, ignoring",
                        doc.id,
                        path.display()
                    );
                }
                unique
            })
            .collect();

        tracing::debug!(
            "Loaded permit type '{}' with {} documents",
            permit.id,
            documents.len()
        );
        catalog = catalog.with_permit(permit, documents);
    }

    catalog
}
