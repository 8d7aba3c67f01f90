//! Resolution pipeline.
//!
//! Orchestrates one resolution cycle (geocode, area expansion, station
//! query, price aggregation) in strict sequence, and publishes the
//! result as a snapshot for the presentation layer.
//!
//! A newer trigger supersedes any in-flight cycle: each cycle gets a
//! generation token, and every state commit re-checks it, so a slow
//! response from an old cycle is discarded on arrival instead of
//! overwriting newer data.

mod error;
mod runner;
mod snapshot;
mod sources;

pub use error::ErrorKind;
pub use runner::Pipeline;
pub use snapshot::{Phase, Snapshot};
pub use sources::{AreaSource, Geocoder, StationSource};
