//! Published pipeline state.

use crate::domain::{Radius, ResolvedPlace, StationRecord};
use crate::prices::BestPrices;

use super::error::ErrorKind;

/// How far the current resolution cycle has progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No cycle has run yet.
    #[default]
    Idle,

    /// Resolving the position to a place.
    Locating,

    /// Postal areas expanded around the resolved centre.
    AreaResolved,

    /// Station records received.
    StationsFetched,

    /// Best prices computed; terminal for this cycle.
    Aggregated,
}

/// The pipeline's published view.
///
/// The pipeline is the sole writer; readers receive clones. On failure
/// the error kind is recorded and the phase stays where the cycle
/// stopped, but data fields keep their last successfully committed
/// values, so stale-but-valid results stay visible alongside the error.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Progress of the most recent cycle.
    pub phase: Phase,

    /// Place the last successful resolution produced.
    pub place: Option<ResolvedPlace>,

    /// Stations from the last successful fetch.
    pub stations: Vec<StationRecord>,

    /// Cheapest station per fuel type from the last aggregation.
    pub best: BestPrices,

    /// Radius applied to the next (and current) expansion.
    pub radius: Radius,

    /// Why the most recent cycle stopped, if it failed.
    pub error: Option<ErrorKind>,

    /// Generation of the cycle that last committed to this snapshot.
    pub generation: u64,
}
