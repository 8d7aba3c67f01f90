//! Wire types for the Nominatim API.

use serde::Deserialize;

/// Address block attached to Nominatim results.
///
/// Nominatim reports the settlement under different keys depending on
/// its size; `settlement()` picks the most specific one present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub postcode: Option<String>,
}

impl NominatimAddress {
    /// The settlement name, preferring the most specific key.
    pub fn settlement(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
            .or(self.municipality.as_deref())
    }
}

/// Response of `/reverse`.
///
/// Nominatim serialises coordinates as strings.
#[derive(Debug, Deserialize)]
pub struct ReverseResponse {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub address: NominatimAddress,
}

/// One row of a `/search` response.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub lat: String,
    pub lon: String,
    pub name: Option<String>,
    #[serde(default)]
    pub address: NominatimAddress,
}

/// A candidate place offered to the user after a forward search.
///
/// Nominatim returns one row per postal area; rows sharing a name are
/// grouped into one candidate carrying all its postal codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceCandidate {
    /// Place name as the user will see it.
    pub name: String,

    /// Postal codes associated with the place, in response order.
    pub postal_codes: Vec<String>,
}
