//! GeoNames HTTP client for postal-area expansion.

use crate::domain::{AreaMatch, Coordinates, Radius};

use super::error::AreaError;
use super::types::NearbyPostalCodesResponse;

/// Default base URL for the GeoNames API.
const DEFAULT_BASE_URL: &str = "https://api.geonames.org";

/// Upper bound on matched postal areas per expansion.
const MAX_ROWS: usize = 100;

/// Configuration for the area expansion client.
#[derive(Debug, Clone)]
pub struct AreaConfig {
    /// GeoNames account username, sent with every request
    pub username: String,
    /// Base URL for the API (defaults to production GeoNames)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AreaConfig {
    /// Create a new config with the given GeoNames username.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
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

/// Client for the GeoNames nearby-postal-code search.
#[derive(Debug, Clone)]
pub struct AreaClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
}

impl AreaClient {
    /// Create a new area expansion client.
    pub fn new(config: AreaConfig) -> Result<Self, AreaError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            username: config.username,
        })
    }

    /// Expand a centre point and radius into nearby postal areas.
    ///
    /// The radius must be one of the supported values; anything else is
    /// rejected with `InvalidRadius` before any request is issued. An
    /// empty result is valid and means no area is in range.
    ///
    /// Entries without a department code are dropped: the department is
    /// the join key against station records, so such entries could never
    /// match anything downstream.
    pub async fn expand(
        &self,
        center: Coordinates,
        radius_km: u8,
    ) -> Result<Vec<AreaMatch>, AreaError> {
        let radius = Radius::from_km(radius_km)?;

        let url = format!("{}/findNearbyPostalCodesJSON", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", center.latitude().to_string()),
                ("lng", center.longitude().to_string()),
                ("radius", radius.as_km().to_string()),
                ("country", "FR".to_string()),
                ("maxRows", MAX_ROWS.to_string()),
                ("username", self.username.clone()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AreaError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let nearby: NearbyPostalCodesResponse =
            serde_json::from_str(&body).map_err(|e| AreaError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        // GeoNames reports quota and credential problems in-band with a 200
        if let Some(status) = nearby.status {
            return Err(AreaError::Api {
                status: status.value,
                message: status.message,
            });
        }

        let matches: Vec<AreaMatch> = nearby
            .postal_codes
            .into_iter()
            .take(MAX_ROWS)
            .filter_map(|entry| {
                let department = entry.admin_code2?;
                Some(AreaMatch {
                    place_name: entry.place_name.unwrap_or_default(),
                    postal_code: entry.postal_code.unwrap_or_default(),
                    department,
                })
            })
            .collect();

        Ok(matches)
    }
}
