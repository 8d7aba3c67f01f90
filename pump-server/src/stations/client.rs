//! Opendatasoft HTTP client for the fuel-price dataset.

use std::collections::BTreeSet;

use crate::domain::{AreaMatch, StationRecord, distinct_departments};

use super::convert::convert_records;
use super::error::StationError;
use super::types::RecordsResponse;

/// Default base URL for the Opendatasoft explore API.
const DEFAULT_BASE_URL: &str = "https://data.economie.gouv.fr/api/explore/v2.1";

/// Dataset identifier of the instantaneous fuel-price feed.
const DEFAULT_DATASET: &str = "prix-des-carburants-en-france-flux-instantane-v2";

/// Upper bound on records per query.
const MAX_RECORDS: usize = 100;

/// Configuration for the fuel-price dataset client.
#[derive(Debug, Clone)]
pub struct StationConfig {
    /// Base URL for the API (defaults to data.economie.gouv.fr)
    pub base_url: String,
    /// Dataset identifier
    pub dataset: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl StationConfig {
    /// Create a config for the default public dataset.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            dataset: DEFAULT_DATASET.to_string(),
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

impl Default for StationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the fuel-price dataset.
#[derive(Debug, Clone)]
pub struct StationClient {
    http: reqwest::Client,
    base_url: String,
    dataset: String,
}

impl StationClient {
    /// Create a new dataset client.
    pub fn new(config: StationConfig) -> Result<Self, StationError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            dataset: config.dataset,
        })
    }

    /// Fetch station records for the matched areas.
    ///
    /// An empty area set short-circuits to an empty result without a
    /// request: an empty `where` filter would match the whole dataset.
    ///
    /// After the response, records are filtered to the distinct
    /// departments of `areas` (the text-match query can over-match on
    /// place names) and deduplicated by address and city.
    pub async fn fetch(&self, areas: &[AreaMatch]) -> Result<Vec<StationRecord>, StationError> {
        if areas.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/catalog/datasets/{}/records",
            self.base_url, self.dataset
        );

        let response = self
            .http
            .get(&url)
            .query(&[
                ("where", build_where(areas)),
                ("limit", MAX_RECORDS.to_string()),
                ("offset", "0".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StationError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let records: RecordsResponse =
            serde_json::from_str(&body).map_err(|e| StationError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        let converted = convert_records(records.results);
        let departments = distinct_departments(areas);
        let kept = filter_by_department(converted, &departments);

        Ok(dedupe_by_address(kept))
    }
}

/// Build the disjunctive ODSQL filter over the matched areas.
///
/// Areas with a postal code produce a `(ville AND cp)` conjunct; areas
/// without one fall back to the place name alone.
fn build_where(areas: &[AreaMatch]) -> String {
    let clauses: Vec<String> = areas
        .iter()
        .map(|area| {
            let ville = escape(&area.place_name);
            if area.postal_code.is_empty() {
                format!("ville=\"{ville}\"")
            } else {
                format!("(ville=\"{ville}\" AND cp=\"{}\")", escape(&area.postal_code))
            }
        })
        .collect();

    clauses.join(" OR ")
}

/// Escape a value for an ODSQL double-quoted string literal.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Authoritative nearby filter: keep only records whose department is
/// among the expanded areas' departments.
fn filter_by_department(
    records: Vec<StationRecord>,
    departments: &BTreeSet<String>,
) -> Vec<StationRecord> {
    records
        .into_iter()
        .filter(|r| departments.contains(&r.department))
        .collect()
}

/// Drop duplicate records produced by overlapping OR-clauses, keyed by
/// address and city, keeping the first occurrence.
fn dedupe_by_address(records: Vec<StationRecord>) -> Vec<StationRecord> {
    let mut seen = BTreeSet::new();
    records
        .into_iter()
        .filter(|r| seen.insert((r.address.clone(), r.city.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;

    fn area(place: &str, cp: &str, dept: &str) -> AreaMatch {
        AreaMatch {
            place_name: place.to_string(),
            postal_code: cp.to_string(),
            department: dept.to_string(),
        }
    }

    fn record(address: &str, city: &str, dept: &str) -> StationRecord {
        StationRecord {
            address: address.to_string(),
            city: city.to_string(),
            department: dept.to_string(),
            coordinates: Coordinates::new(45.0, 5.0).unwrap(),
            offers: Default::default(),
        }
    }

    #[test]
    fn where_clause_pairs_ville_and_cp() {
        let areas = vec![area("Lyon", "69001", "69"), area("Villeurbanne", "69100", "69")];
        assert_eq!(
            build_where(&areas),
            r#"(ville="Lyon" AND cp="69001") OR (ville="Villeurbanne" AND cp="69100")"#
        );
    }

    #[test]
    fn where_clause_falls_back_to_ville_only() {
        let areas = vec![area("Lyon", "", "69")];
        assert_eq!(build_where(&areas), r#"ville="Lyon""#);
    }

    #[test]
    fn where_clause_escapes_quotes() {
        let areas = vec![area(r#"L"Abergement"#, "01290", "01")];
        assert_eq!(
            build_where(&areas),
            r#"(ville="L\"Abergement" AND cp="01290")"#
        );
    }

    #[test]
    fn department_filter_drops_over_matches() {
        // Sainte-Colombe exists in several departments; the text query
        // returns both, the department filter keeps the nearby one
        let records = vec![
            record("1 rue A", "Sainte-Colombe", "69"),
            record("2 rue B", "Sainte-Colombe", "33"),
        ];

        let departments: BTreeSet<String> = ["69".to_string()].into();
        let kept = filter_by_department(records, &departments);

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].department, "69");
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let records = vec![
            record("1 rue A", "Lyon", "69"),
            record("1 rue A", "Lyon", "69"),
            record("1 rue A", "Villeurbanne", "69"),
        ];

        let deduped = dedupe_by_address(records);
        assert_eq!(deduped.len(), 2);
    }
}

#[cfg(test)]
mod http_tests {
    use super::*;
    use crate::domain::FuelType;
    use wiremock::matchers::{method, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> StationClient {
        StationClient::new(StationConfig::new().with_base_url(server.uri())).unwrap()
    }

    fn area(place: &str, cp: &str, dept: &str) -> AreaMatch {
        AreaMatch {
            place_name: place.to_string(),
            postal_code: cp.to_string(),
            department: dept.to_string(),
        }
    }

    #[tokio::test]
    async fn empty_areas_issue_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let records = client(&server).fetch(&[]).await.unwrap();
        assert!(records.is_empty());

        server.verify().await;
    }

    #[tokio::test]
    async fn fetch_converts_and_filters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path_regex(r"^/catalog/datasets/.+/records$"))
            .and(query_param("limit", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_count": 3,
                "results": [
                    {
                        "adresse": "1 rue A", "ville": "Lyon", "cp": "69001",
                        "code_departement": "69",
                        "geom": {"lat": 45.76, "lon": 4.83},
                        "gazole_prix": 1.85
                    },
                    {
                        "adresse": "9 rue Z", "ville": "Lyon", "cp": "27460",
                        "code_departement": "27",
                        "geom": {"lat": 49.3, "lon": 1.2},
                        "gazole_prix": 1.65
                    },
                    {
                        "adresse": "1 rue A", "ville": "Lyon", "cp": "69001",
                        "code_departement": "69",
                        "geom": {"lat": 45.76, "lon": 4.83},
                        "gazole_prix": 1.85
                    }
                ]
            })))
            .mount(&server)
            .await;

        let areas = vec![area("Lyon", "69001", "69")];
        let records = client(&server).fetch(&areas).await.unwrap();

        // The department 27 over-match and the duplicate are both gone
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].department, "69");
        assert_eq!(records[0].offer(FuelType::Diesel).unwrap().price, Some(1.85));
    }

    #[tokio::test]
    async fn server_error_is_mapped() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = client(&server).fetch(&[area("Lyon", "69001", "69")]).await;
        assert!(matches!(result, Err(StationError::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_json_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let result = client(&server).fetch(&[area("Lyon", "69001", "69")]).await;
        assert!(matches!(result, Err(StationError::Json { .. })));
    }
}
