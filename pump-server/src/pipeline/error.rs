//! Pipeline error taxonomy.
//!
//! Every external-call failure is caught at its stage boundary and
//! converted to one of these kinds; nothing propagates past the
//! pipeline. There are no automatic retries; a failure ends the cycle
//! and the user starts a fresh one.

use crate::areas::AreaError;
use crate::geocode::GeocodeError;
use crate::stations::StationError;

/// What went wrong in a resolution cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    /// The device refused or does not support geolocation.
    #[error("device location unavailable: {0}")]
    LocationUnavailable(String),

    /// The geocoding or postal-area service failed.
    #[error("geocoding service unavailable")]
    GeocodeUnavailable,

    /// The position resolved to no usable place.
    #[error("no place found for this position")]
    NoPlaceFound,

    /// The requested radius is not one of the supported values.
    #[error("invalid search radius: {0} km")]
    InvalidRadius(u8),

    /// The fuel-price dataset failed or returned garbage.
    #[error("fuel price dataset unavailable")]
    DatasetUnavailable,
}

impl From<GeocodeError> for ErrorKind {
    fn from(e: GeocodeError) -> Self {
        match e {
            GeocodeError::NoPlaceFound => ErrorKind::NoPlaceFound,
            _ => ErrorKind::GeocodeUnavailable,
        }
    }
}

impl From<AreaError> for ErrorKind {
    fn from(e: AreaError) -> Self {
        match e {
            AreaError::InvalidRadius(bad) => ErrorKind::InvalidRadius(bad.0),
            _ => ErrorKind::GeocodeUnavailable,
        }
    }
}

impl From<StationError> for ErrorKind {
    fn from(_: StationError) -> Self {
        ErrorKind::DatasetUnavailable
    }
}
