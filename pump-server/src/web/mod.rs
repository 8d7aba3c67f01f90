//! Web layer for the fuel price finder.
//!
//! Exposes the pipeline's published state and accepts the triggers the
//! presentation layer produces: a device position (or its failure), a
//! place search, a candidate selection and a radius change.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
