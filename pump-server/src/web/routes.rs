//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::domain::Coordinates;
use crate::geocode::GeocodeError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search_places))
        .route("/api/position", post(report_position))
        .route("/api/place", post(select_place))
        .route("/api/radius", post(set_radius))
        .route("/api/snapshot", get(get_snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search candidate places by name fragment.
///
/// Runs against the geocoder directly; an in-flight resolution cycle is
/// not affected.
async fn search_places(
    State(state): State<AppState>,
    Query(req): Query<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let candidates = state.geocode.forward_search(&req.q).await?;

    Ok(Json(SearchResponse {
        candidates: candidates
            .into_iter()
            .map(CandidateResult::from_candidate)
            .collect(),
    }))
}

/// Accept a device location report and run a resolution cycle.
async fn report_position(
    State(state): State<AppState>,
    Json(report): Json<LocationReport>,
) -> Result<Json<SnapshotResponse>, AppError> {
    match report {
        LocationReport::Position {
            latitude,
            longitude,
        } => {
            let coords =
                Coordinates::new(latitude, longitude).map_err(|e| AppError::BadRequest {
                    message: e.to_string(),
                })?;
            state.pipeline.locate(coords).await;
        }
        LocationReport::Failure { error } => {
            state.pipeline.report_location_failure(error).await;
        }
    }

    Ok(Json(SnapshotResponse::from_snapshot(
        &state.pipeline.snapshot().await,
    )))
}

/// Resolve a chosen search candidate and run a resolution cycle.
async fn select_place(
    State(state): State<AppState>,
    Json(req): Json<SelectPlaceRequest>,
) -> Json<SnapshotResponse> {
    state.pipeline.select_place(&req.name, &req.postal_code).await;

    Json(SnapshotResponse::from_snapshot(
        &state.pipeline.snapshot().await,
    ))
}

/// Change the search radius; re-expands around the last resolved centre.
async fn set_radius(
    State(state): State<AppState>,
    Json(req): Json<SetRadiusRequest>,
) -> Result<Json<SnapshotResponse>, AppError> {
    state
        .pipeline
        .set_radius(req.radius_km)
        .await
        .map_err(|e| AppError::BadRequest {
            message: e.to_string(),
        })?;

    Ok(Json(SnapshotResponse::from_snapshot(
        &state.pipeline.snapshot().await,
    )))
}

/// The current published pipeline state.
async fn get_snapshot(State(state): State<AppState>) -> Json<SnapshotResponse> {
    Json(SnapshotResponse::from_snapshot(
        &state.pipeline.snapshot().await,
    ))
}

/// Web-layer errors.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Upstream { message: String },
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        AppError::Upstream {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        tracing::warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
