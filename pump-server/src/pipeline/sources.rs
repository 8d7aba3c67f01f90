//! Stage seams of the resolution pipeline.
//!
//! Each external capability the pipeline depends on is a small trait,
//! implemented by the real HTTP client. Tests implement them with fakes
//! to drive the orchestration without a network.

use std::future::Future;

use crate::areas::{AreaClient, AreaError};
use crate::domain::{AreaMatch, Coordinates, ResolvedPlace, StationRecord};
use crate::geocode::{GeocodeClient, GeocodeError};
use crate::stations::{StationClient, StationError};

/// Position and candidate resolution.
pub trait Geocoder: Send + Sync {
    /// Resolve a device position to an administrative place.
    fn reverse_lookup(
        &self,
        coords: Coordinates,
    ) -> impl Future<Output = Result<ResolvedPlace, GeocodeError>> + Send;

    /// Resolve a chosen candidate place to a point.
    fn geocode_by_name(
        &self,
        name: &str,
        postal_code: &str,
    ) -> impl Future<Output = Result<Coordinates, GeocodeError>> + Send;
}

/// Radius expansion into nearby postal areas.
pub trait AreaSource: Send + Sync {
    fn expand(
        &self,
        center: Coordinates,
        radius_km: u8,
    ) -> impl Future<Output = Result<Vec<AreaMatch>, AreaError>> + Send;
}

/// Fuel-price dataset query.
pub trait StationSource: Send + Sync {
    fn fetch(
        &self,
        areas: &[AreaMatch],
    ) -> impl Future<Output = Result<Vec<StationRecord>, StationError>> + Send;
}

impl Geocoder for GeocodeClient {
    fn reverse_lookup(
        &self,
        coords: Coordinates,
    ) -> impl Future<Output = Result<ResolvedPlace, GeocodeError>> + Send {
        GeocodeClient::reverse_lookup(self, coords)
    }

    fn geocode_by_name(
        &self,
        name: &str,
        postal_code: &str,
    ) -> impl Future<Output = Result<Coordinates, GeocodeError>> + Send {
        GeocodeClient::geocode_by_name(self, name, postal_code)
    }
}

impl AreaSource for AreaClient {
    fn expand(
        &self,
        center: Coordinates,
        radius_km: u8,
    ) -> impl Future<Output = Result<Vec<AreaMatch>, AreaError>> + Send {
        AreaClient::expand(self, center, radius_km)
    }
}

impl StationSource for StationClient {
    fn fetch(
        &self,
        areas: &[AreaMatch],
    ) -> impl Future<Output = Result<Vec<StationRecord>, StationError>> + Send {
        StationClient::fetch(self, areas)
    }
}
