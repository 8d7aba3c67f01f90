//! Geocoding client (Nominatim).
//!
//! Wraps three capabilities of the Nominatim API:
//! - reverse lookup: device position → administrative place + postal code
//! - forward search: free-text fragment → candidate places
//! - structured geocode: chosen place name + postal code → coordinates
//!
//! Pure translation to domain types; no caching, every call is live.

mod client;
mod error;
mod types;

pub use client::{GeocodeClient, GeocodeConfig};
pub use error::GeocodeError;
pub use types::PlaceCandidate;
