use std::collections::HashSet;

/// The baseline profile. Documents tagged with it apply to every applicant.
pub const COMMON_PROFILE: &str = "common";

/// Normalizes a profile selection before it is persisted.
///
/// Blank entries and duplicates are dropped (first occurrence wins) and
/// `common` is appended when missing, so an empty selection becomes
/// `["common"]`.
#[must_use]
pub fn normalize_profiles<I, S>(profiles: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut normalized: Vec<String> = profiles
        .into_iter()
        .map(|p| p.as_ref().trim().to_string())
        .filter(|p| !p.is_empty() && seen.insert(p.clone()))
        .collect();

    if !seen.contains(COMMON_PROFILE) {
        normalized.push(COMMON_PROFILE.to_string());
    }
    normalized
}

/// Splits a comma-separated profile list such as `common,employee`.
#[must_use]
pub fn parse_profile_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// The filter actually applied for a selection: the selection plus `common`.
#[must_use]
pub fn effective_profiles(selected: &[String]) -> HashSet<&str> {
    let mut set: HashSet<&str> = selected.iter().map(String::as_str).collect();
    set.insert(COMMON_PROFILE);
    set
}
