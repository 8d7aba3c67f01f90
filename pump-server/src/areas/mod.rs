//! Postal area expansion (GeoNames).
//!
//! Turns a centre point and a search radius into the bounded set of
//! nearby postal areas, each carrying its department code. The
//! department codes are what the station query later filters on.

mod client;
mod error;
mod types;

pub use client::{AreaClient, AreaConfig};
pub use error::AreaError;
