//! Nominatim HTTP client.
//!
//! Provides async methods for reverse lookup, forward place search and
//! structured geocoding. Handles status mapping and conversion to
//! domain types.

use crate::domain::{Coordinates, ResolvedPlace};

use super::error::GeocodeError;
use super::types::{PlaceCandidate, ReverseResponse, SearchResult};

/// Default base URL for Nominatim.
const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Nominatim's usage policy requires an identifying user agent.
const DEFAULT_USER_AGENT: &str = concat!("pump-server/", env!("CARGO_PKG_VERSION"));

/// A forward search fragment must carry more than this many alphabetic
/// characters before a query is issued.
const MIN_SEARCH_CHARS: usize = 3;

/// Maximum candidate rows requested from a forward search.
const SEARCH_LIMIT: usize = 30;

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// Base URL for the API (defaults to the public Nominatim instance)
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocodeConfig {
    /// Create a config with the default public endpoint.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Nominatim API client.
///
/// Every call is live; results are never cached.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeocodeClient {
    /// Create a new geocoding client with the given configuration.
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Resolve a device position to an administrative place.
    ///
    /// Returns `NoPlaceFound` when the response carries no usable
    /// settlement name or postal code.
    pub async fn reverse_lookup(&self, coords: Coordinates) -> Result<ResolvedPlace, GeocodeError> {
        let url = format!("{}/reverse", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", coords.latitude().to_string()),
                ("lon", coords.longitude().to_string()),
                // Zoom 10 resolves to city granularity rather than house numbers
                ("zoom", "10".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let reverse: ReverseResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        let name = reverse
            .address
            .settlement()
            .ok_or(GeocodeError::NoPlaceFound)?
            .to_string();

        let postal_code = reverse
            .address
            .postcode
            .clone()
            .ok_or(GeocodeError::NoPlaceFound)?;

        let coordinates =
            parse_coordinates(&reverse.lat, &reverse.lon).ok_or(GeocodeError::NoPlaceFound)?;

        Ok(ResolvedPlace {
            name,
            postal_code,
            coordinates,
        })
    }

    /// Search candidate places by name fragment.
    ///
    /// Fragments with at most three alphabetic characters return an
    /// empty candidate list without issuing a request, so as-you-type
    /// input does not produce noisy queries.
    pub async fn forward_search(
        &self,
        fragment: &str,
    ) -> Result<Vec<PlaceCandidate>, GeocodeError> {
        if !is_searchable(fragment) {
            return Ok(Vec::new());
        }

        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("q", fragment.to_string()),
                ("countrycodes", "fr".to_string()),
                ("addressdetails", "1".to_string()),
                ("limit", SEARCH_LIMIT.to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let results: Vec<SearchResult> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        Ok(group_candidates(results))
    }

    /// Resolve a chosen candidate (name + one of its postal codes) to a
    /// point, to seed the area expansion without a reverse lookup.
    pub async fn geocode_by_name(
        &self,
        name: &str,
        postal_code: &str,
    ) -> Result<Coordinates, GeocodeError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("city", name.to_string()),
                ("postalcode", postal_code.to_string()),
                ("countrycodes", "fr".to_string()),
                ("limit", "1".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let results: Vec<SearchResult> =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        let first = results.first().ok_or(GeocodeError::NoPlaceFound)?;

        parse_coordinates(&first.lat, &first.lon).ok_or(GeocodeError::NoPlaceFound)
    }
}

/// Whether a fragment carries enough alphabetic characters to query.
fn is_searchable(fragment: &str) -> bool {
    fragment.chars().filter(|c| c.is_alphabetic()).count() > MIN_SEARCH_CHARS
}

/// Parse Nominatim's stringly-typed coordinates.
fn parse_coordinates(lat: &str, lon: &str) -> Option<Coordinates> {
    let lat: f64 = lat.parse().ok()?;
    let lon: f64 = lon.parse().ok()?;
    Coordinates::new(lat, lon).ok()
}

/// Group search rows sharing a name into one candidate per place.
///
/// Response order is preserved for both candidates and postal codes.
fn group_candidates(results: Vec<SearchResult>) -> Vec<PlaceCandidate> {
    let mut candidates: Vec<PlaceCandidate> = Vec::new();

    for result in results {
        let name = match result.address.settlement().or(result.name.as_deref()) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        let postal_code = result.address.postcode.clone();

        match candidates.iter_mut().find(|c| c.name == name) {
            Some(existing) => {
                if let Some(cp) = postal_code
                    && !existing.postal_codes.contains(&cp)
                {
                    existing.postal_codes.push(cp);
                }
            }
            None => candidates.push(PlaceCandidate {
                name,
                postal_codes: postal_code.into_iter().collect(),
            }),
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::types::NominatimAddress;

    #[test]
    fn config_builder() {
        let config = GeocodeConfig::new()
            .with_base_url("http://localhost:8080")
            .with_timeout(60);

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = GeocodeConfig::new();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn searchable_counts_only_alphabetic() {
        assert!(!is_searchable(""));
        assert!(!is_searchable("Ly"));
        assert!(!is_searchable("Lyo"));
        assert!(is_searchable("Lyon"));
        // Digits and punctuation do not count towards the minimum
        assert!(!is_searchable("Ly0n!"));
        assert!(!is_searchable("123456789"));
        // Accented letters do count
        assert!(is_searchable("Nîmes"));
    }

    #[test]
    fn group_candidates_merges_postcodes() {
        let results = vec![
            search_result("Lyon", Some("69001")),
            search_result("Lyon", Some("69002")),
            search_result("Villeurbanne", Some("69100")),
        ];

        let candidates = group_candidates(results);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Lyon");
        assert_eq!(candidates[0].postal_codes, vec!["69001", "69002"]);
        assert_eq!(candidates[1].name, "Villeurbanne");
    }

    #[test]
    fn group_candidates_skips_nameless_rows() {
        let mut nameless = search_result("x", None);
        nameless.name = None;
        nameless.address = NominatimAddress::default();

        let candidates = group_candidates(vec![nameless, search_result("Lyon", Some("69001"))]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].name, "Lyon");
    }

    #[test]
    fn group_candidates_deduplicates_postcodes() {
        let results = vec![
            search_result("Lyon", Some("69001")),
            search_result("Lyon", Some("69001")),
        ];

        let candidates = group_candidates(results);
        assert_eq!(candidates[0].postal_codes, vec!["69001"]);
    }

    #[test]
    fn parse_coordinates_rejects_garbage() {
        assert!(parse_coordinates("45.18", "5.72").is_some());
        assert!(parse_coordinates("abc", "5.72").is_none());
        assert!(parse_coordinates("95.0", "5.72").is_none());
    }

    fn search_result(name: &str, postcode: Option<&str>) -> SearchResult {
        SearchResult {
            lat: "45.0".to_string(),
            lon: "5.0".to_string(),
            name: Some(name.to_string()),
            address: NominatimAddress {
                city: Some(name.to_string()),
                postcode: postcode.map(str::to_string),
                ..Default::default()
            },
        }
    }
}
