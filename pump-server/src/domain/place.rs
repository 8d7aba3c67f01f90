//! Resolved places and postal area matches.

use std::collections::BTreeSet;

use super::Coordinates;

/// The administrative place a position resolved to.
///
/// Produced either by a reverse lookup on the device position or from a
/// user-selected search candidate. Immutable once produced; a new
/// resolution replaces the whole value, it never patches fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlace {
    /// Display name of the city or town.
    pub name: String,

    /// Postal code of the resolved place.
    pub postal_code: String,

    /// Centre of the resolved place; seeds the area expansion.
    pub coordinates: Coordinates,
}

/// One postal area within the search radius.
///
/// The department is only used as a join key against station records.
/// Place name and postal code are kept exactly as the upstream returned
/// them because the station query needs the literal strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaMatch {
    /// Place name as spelled in the postal-area service.
    pub place_name: String,

    /// Postal code of the area; may be empty for some upstream entries.
    pub postal_code: String,

    /// Two-digit department code, the authoritative "nearby" key.
    pub department: String,
}

/// The distinct department codes covered by a set of area matches.
///
/// Two matches in the same department collapse into one filter entry.
pub fn distinct_departments(areas: &[AreaMatch]) -> BTreeSet<String> {
    areas.iter().map(|a| a.department.clone()).collect()
}
