//! Fuel price finder server.
//!
//! Resolves a position (device location or chosen place) to a city,
//! expands the search radius into nearby postal areas, queries the
//! French fuel-price dataset and reduces the results to the cheapest
//! station per fuel type.

pub mod areas;
pub mod domain;
pub mod geocode;
pub mod pipeline;
pub mod prices;
pub mod stations;
pub mod web;
