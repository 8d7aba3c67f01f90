//! Domain types for the fuel price finder.
//!
//! This module contains the core domain model types that represent
//! validated geographic and fuel data. All types enforce their invariants
//! at construction time, so code that receives these types can trust
//! their validity.

mod coords;
mod fuel;
mod place;
mod radius;
mod station;

pub use coords::{Coordinates, InvalidCoordinates};
pub use fuel::FuelType;
pub use place::{AreaMatch, ResolvedPlace, distinct_departments};
pub use radius::{InvalidRadius, Radius};
pub use station::{FuelOffer, StationRecord, StockStatus};
