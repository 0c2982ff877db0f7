//! Progress aggregation and the catalog/status join.
//!
//! Both the HTTP handlers and the CLI go through these functions so that the
//! documents listing and the progress figures always agree on which documents
//! count.

use std::collections::HashMap;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::store::Store;
use crate::types::{DocumentDefinition, DocumentStatus, DocumentWithStatus, Progress};

/// Computes progress over an already resolved document set.
///
/// Documents without a status entry count as incomplete. The percentage is
/// rounded to one decimal, ties to even, and is `0` for an empty set.
pub fn compute(documents: &[&DocumentDefinition], statuses: &HashMap<String, DocumentStatus>) -> Progress {
    let total = documents.len();
    let completed = documents
        .iter()
        .filter(|d| statuses.get(&d.id).is_some_and(|s| s.is_complete))
        .count();

    let percentage = if total > 0 {
        let pct = completed as f64 / total as f64 * 100.0;
        (pct * 10.0).round_ties_even() / 10.0
    } else {
        0.0
    };

    Progress {
        total,
        completed,
        remaining: total - completed,
        percentage,
    }
}

fn status_map(store: &dyn Store, permit_type: &str) -> Result<HashMap<String, DocumentStatus>> {
    Ok(store
        .list_statuses(permit_type)?
        .into_iter()
        .map(|s| (s.document_id.clone(), s))
        .collect())
}

/// Resolves the checklist and joins each document with its status.
pub fn documents_with_status(
    catalog: &Catalog,
    store: &dyn Store,
    permit_type: &str,
    selected: Option<&[String]>,
) -> Result<Vec<DocumentWithStatus>> {
    let documents = catalog.resolve(permit_type, selected);
    if documents.is_empty() {
        return Ok(Vec::new());
    }

    let mut statuses = status_map(store, permit_type)?;
    Ok(documents
        .into_iter()
        .map(|d| DocumentWithStatus::new(d.clone(), statuses.remove(&d.id)))
        .collect())
}

/// Progress for a permit type under a profile selection.
pub fn progress_for(
    catalog: &Catalog,
    store: &dyn Store,
    permit_type: &str,
    selected: Option<&[String]>,
) -> Result<Progress> {
    let documents = catalog.resolve(permit_type, selected);
    if documents.is_empty() {
        return Ok(compute(&documents, &HashMap::new()));
    }

    let statuses = status_map(store, permit_type)?;
    Ok(compute(&documents, &statuses))
}
