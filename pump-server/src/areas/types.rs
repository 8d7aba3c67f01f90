//! Wire types for the GeoNames postal-code API.

use serde::Deserialize;

/// Response of `findNearbyPostalCodesJSON`.
///
/// GeoNames omits the `postalCodes` key entirely when nothing is in
/// range, and reports errors as a 200 with a `status` block.
#[derive(Debug, Deserialize)]
pub struct NearbyPostalCodesResponse {
    #[serde(rename = "postalCodes", default)]
    pub postal_codes: Vec<PostalCodeEntry>,

    pub status: Option<GeonamesStatus>,
}

/// One postal area near the requested centre.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostalCodeEntry {
    pub place_name: Option<String>,

    pub postal_code: Option<String>,

    /// Department code (second-level administrative subdivision).
    pub admin_code2: Option<String>,
}

/// GeoNames in-band error report.
#[derive(Debug, Deserialize)]
pub struct GeonamesStatus {
    pub message: String,
    pub value: u16,
}
