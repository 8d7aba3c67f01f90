//! Wire types for the fuel-price dataset.

use serde::Deserialize;

use crate::domain::FuelType;

/// Response of the Opendatasoft records endpoint.
#[derive(Debug, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub results: Vec<StationDto>,
}

/// Station position as stored in the dataset.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// One raw station record.
///
/// The dataset exposes one `<prefix>_prix` / `<prefix>_maj` field pair
/// per fuel, plus two semicolon-separated shortage lists. Fields are
/// kept verbatim; conversion to domain types happens in `convert`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StationDto {
    pub adresse: Option<String>,
    pub ville: Option<String>,
    pub cp: Option<String>,
    pub code_departement: Option<String>,
    pub geom: Option<GeoPoint>,

    pub gazole_prix: Option<f64>,
    pub gazole_maj: Option<String>,
    pub sp95_prix: Option<f64>,
    pub sp95_maj: Option<String>,
    pub sp98_prix: Option<f64>,
    pub sp98_maj: Option<String>,
    pub e10_prix: Option<f64>,
    pub e10_maj: Option<String>,
    pub e85_prix: Option<f64>,
    pub e85_maj: Option<String>,
    pub gplc_prix: Option<f64>,
    pub gplc_maj: Option<String>,

    pub carburants_rupture_temporaire: Option<String>,
    pub carburants_rupture_definitive: Option<String>,
}

impl StationDto {
    /// The price and update-timestamp fields for a fuel, selected by its
    /// stable dataset prefix.
    pub fn price_fields(&self, fuel: FuelType) -> (Option<f64>, Option<&str>) {
        match fuel {
            FuelType::Diesel => (self.gazole_prix, self.gazole_maj.as_deref()),
            FuelType::Sp95 => (self.sp95_prix, self.sp95_maj.as_deref()),
            FuelType::Sp98 => (self.sp98_prix, self.sp98_maj.as_deref()),
            FuelType::E10 => (self.e10_prix, self.e10_maj.as_deref()),
            FuelType::E85 => (self.e85_prix, self.e85_maj.as_deref()),
            FuelType::Lpg => (self.gplc_prix, self.gplc_maj.as_deref()),
        }
    }
}
