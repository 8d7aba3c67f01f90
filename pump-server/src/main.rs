use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use pump_server::areas::{AreaClient, AreaConfig};
use pump_server::geocode::{GeocodeClient, GeocodeConfig};
use pump_server::pipeline::Pipeline;
use pump_server::stations::{StationClient, StationConfig};
use pump_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // GeoNames requires a registered username on every request
    let geonames_username = std::env::var("GEONAMES_USERNAME").unwrap_or_else(|_| {
        tracing::warn!("GEONAMES_USERNAME not set. Area expansion calls will fail.");
        String::new()
    });

    let mut geocode_config = GeocodeConfig::new();
    if let Ok(url) = std::env::var("NOMINATIM_BASE_URL") {
        geocode_config = geocode_config.with_base_url(url);
    }
    let geocode_client =
        GeocodeClient::new(geocode_config).expect("Failed to create geocoding client");

    let mut area_config = AreaConfig::new(&geonames_username);
    if let Ok(url) = std::env::var("GEONAMES_BASE_URL") {
        area_config = area_config.with_base_url(url);
    }
    let area_client = AreaClient::new(area_config).expect("Failed to create area client");

    let mut station_config = StationConfig::new();
    if let Ok(url) = std::env::var("FUEL_DATASET_BASE_URL") {
        station_config = station_config.with_base_url(url);
    }
    let station_client =
        StationClient::new(station_config).expect("Failed to create station client");

    let pipeline = Arc::new(Pipeline::new(
        geocode_client.clone(),
        area_client,
        station_client,
    ));

    let state = AppState::new(pipeline, geocode_client);
    let app = create_router(state);

    let addr = std::env::var("BIND_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

    tracing::info!(%addr, "fuel price finder listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app).await.expect("Server error");
}
