//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{ResolvedPlace, StationRecord, StockStatus};
use crate::geocode::PlaceCandidate;
use crate::pipeline::{ErrorKind, Phase, Snapshot};

/// A location report from the device.
///
/// Either an obtained position or the reason the device could not
/// provide one (permission denied, unsupported browser, ...).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LocationReport {
    Position { latitude: f64, longitude: f64 },
    Failure { error: String },
}

/// Query for place suggestions.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Name fragment typed so far
    pub q: String,
}

/// Request to resolve a chosen search candidate.
#[derive(Debug, Deserialize)]
pub struct SelectPlaceRequest {
    /// Candidate place name
    pub name: String,

    /// One of the candidate's postal codes
    pub postal_code: String,
}

/// Request to change the search radius.
#[derive(Debug, Deserialize)]
pub struct SetRadiusRequest {
    /// Radius in kilometres; must be one of the supported values
    pub radius_km: u8,
}

/// A candidate place in search suggestions.
#[derive(Debug, Serialize)]
pub struct CandidateResult {
    pub name: String,
    pub postal_codes: Vec<String>,
}

/// Response for place search.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub candidates: Vec<CandidateResult>,
}

/// The resolved place, for display.
#[derive(Debug, Serialize)]
pub struct PlaceResult {
    pub name: String,
    pub postal_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One fuel offer at a station.
#[derive(Debug, Serialize)]
pub struct OfferResult {
    /// Fuel identifier (dataset prefix, e.g. "gazole")
    pub fuel: String,

    /// Price per litre in euros, if known
    pub price: Option<f64>,

    /// "available", "low" or "discontinued"
    pub stock: String,

    /// Last upstream price update, ISO-8601
    pub updated: Option<String>,
}

/// A station in query results.
#[derive(Debug, Serialize)]
pub struct StationResult {
    pub address: String,
    pub city: String,
    pub department: String,
    pub latitude: f64,
    pub longitude: f64,
    pub offers: Vec<OfferResult>,
}

/// The cheapest station for one fuel type.
#[derive(Debug, Serialize)]
pub struct BestPriceResult {
    pub fuel: String,
    pub station: StationResult,
}

/// The pipeline error, for display as a dismissible notice.
#[derive(Debug, Serialize)]
pub struct PipelineErrorResult {
    /// Stable kind identifier
    pub kind: String,

    /// Human-readable message
    pub message: String,
}

/// The pipeline's published view.
#[derive(Debug, Serialize)]
pub struct SnapshotResponse {
    /// Progress of the most recent cycle
    pub phase: String,

    /// Resolved place, absent before the first successful resolution
    pub place: Option<PlaceResult>,

    /// Stations of the last successful fetch
    pub stations: Vec<StationResult>,

    /// Cheapest station per fuel type; a missing fuel is not
    /// distributed in this area
    pub best_prices: Vec<BestPriceResult>,

    /// Current search radius in kilometres
    pub radius_km: u8,

    /// Why the most recent cycle failed, if it did
    pub error: Option<PipelineErrorResult>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl CandidateResult {
    pub fn from_candidate(candidate: PlaceCandidate) -> Self {
        Self {
            name: candidate.name,
            postal_codes: candidate.postal_codes,
        }
    }
}

impl PlaceResult {
    fn from_place(place: &ResolvedPlace) -> Self {
        Self {
            name: place.name.clone(),
            postal_code: place.postal_code.clone(),
            latitude: place.coordinates.latitude(),
            longitude: place.coordinates.longitude(),
        }
    }
}

impl StationResult {
    fn from_record(record: &StationRecord) -> Self {
        let offers = record
            .offers
            .iter()
            .map(|(fuel, offer)| OfferResult {
                fuel: fuel.dataset_prefix().to_string(),
                price: offer.price,
                stock: stock_label(offer.stock).to_string(),
                updated: offer.updated.map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string()),
            })
            .collect();

        Self {
            address: record.address.clone(),
            city: record.city.clone(),
            department: record.department.clone(),
            latitude: record.coordinates.latitude(),
            longitude: record.coordinates.longitude(),
            offers,
        }
    }
}

impl SnapshotResponse {
    /// Build the response from a published snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            phase: phase_label(snapshot.phase).to_string(),
            place: snapshot.place.as_ref().map(PlaceResult::from_place),
            stations: snapshot
                .stations
                .iter()
                .map(StationResult::from_record)
                .collect(),
            best_prices: snapshot
                .best
                .iter()
                .map(|(fuel, record)| BestPriceResult {
                    fuel: fuel.dataset_prefix().to_string(),
                    station: StationResult::from_record(record),
                })
                .collect(),
            radius_km: snapshot.radius.as_km(),
            error: snapshot.error.as_ref().map(|e| PipelineErrorResult {
                kind: error_kind_label(e).to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::Locating => "locating",
        Phase::AreaResolved => "area_resolved",
        Phase::StationsFetched => "stations_fetched",
        Phase::Aggregated => "aggregated",
    }
}

fn stock_label(stock: StockStatus) -> &'static str {
    match stock {
        StockStatus::Available => "available",
        StockStatus::Low => "low",
        StockStatus::Discontinued => "discontinued",
    }
}

fn error_kind_label(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::LocationUnavailable(_) => "location_unavailable",
        ErrorKind::GeocodeUnavailable => "geocode_unavailable",
        ErrorKind::NoPlaceFound => "no_place_found",
        ErrorKind::InvalidRadius(_) => "invalid_radius",
        ErrorKind::DatasetUnavailable => "dataset_unavailable",
    }
}
