//! Application state for the web layer.

use std::sync::Arc;

use crate::areas::AreaClient;
use crate::geocode::GeocodeClient;
use crate::pipeline::Pipeline;
use crate::stations::StationClient;

/// The pipeline over the production HTTP clients.
pub type LivePipeline = Pipeline<GeocodeClient, AreaClient, StationClient>;

/// Shared application state.
///
/// The geocoding client is held separately as well: forward-search
/// suggestions are independent of the pipeline and may run concurrently
/// with an in-flight resolution cycle.
#[derive(Clone)]
pub struct AppState {
    /// Resolution pipeline; sole owner of the published snapshot
    pub pipeline: Arc<LivePipeline>,

    /// Geocoding client for search-as-you-type suggestions
    pub geocode: GeocodeClient,
}

impl AppState {
    /// Create a new app state.
    pub fn new(pipeline: Arc<LivePipeline>, geocode: GeocodeClient) -> Self {
        Self { pipeline, geocode }
    }
}
