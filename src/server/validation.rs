use crate::catalog::Catalog;
use crate::server::response::ApiError;

const MAX_PROFILES: usize = 32;

pub fn validate_profiles(catalog: &Catalog, profiles: &[String]) -> Result<(), ApiError> {
    if profiles.len() > MAX_PROFILES {
        return Err(ApiError::bad_request(format!(
            "Cannot select more than {MAX_PROFILES} profiles"
        )));
    }

    let unknown: Vec<&str> = profiles
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty() && !catalog.has_profile(p))
        .collect();

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Unknown profiles: {}",
            unknown.join(", ")
        )))
    }
}
