//! Fuel-price dataset query (Opendatasoft records API).
//!
//! Builds a disjunctive filter over the matched postal areas, issues one
//! bounded query against the instantaneous fuel-price dataset, and
//! converts the raw records to domain types.
//!
//! The upstream text-match query can over-match: the same place name can
//! exist in a different department. A second, client-side department
//! filter is applied after the response and is the authoritative
//! boundary for "nearby".

mod client;
mod convert;
mod error;
mod types;

pub use client::{StationClient, StationConfig};
pub use error::StationError;
pub use types::{RecordsResponse, StationDto};
