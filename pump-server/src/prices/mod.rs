//! Per-fuel-type cheapest-station reduction.
//!
//! Pure functions over already-fetched station records: no I/O, no
//! failure modes. An absent entry for a fuel type means no in-radius
//! station currently distributes it.

use std::collections::BTreeMap;

use crate::domain::{FuelType, StationRecord, StockStatus};

/// The cheapest station per fuel type for one resolution cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BestPrices {
    best: BTreeMap<FuelType, StationRecord>,
}

impl BestPrices {
    /// The cheapest station selling the given fuel, if any does.
    pub fn get(&self, fuel: FuelType) -> Option<&StationRecord> {
        self.best.get(&fuel)
    }

    /// Iterate over (fuel, cheapest station) pairs in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (FuelType, &StationRecord)> {
        self.best.iter().map(|(fuel, record)| (*fuel, record))
    }

    /// Whether no fuel type has an eligible station.
    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

/// Reduce station records to the cheapest station per fuel type.
///
/// A station is eligible for a type when its offer carries a finite
/// price and is not discontinued. Ties resolve to the first eligible
/// station in input order; upstream order is arbitrary but stable here.
pub fn best_prices(stations: &[StationRecord], types: &[FuelType]) -> BestPrices {
    let mut best = BTreeMap::new();

    for &fuel in types {
        if let Some(winner) = cheapest_for(stations, fuel) {
            best.insert(fuel, winner.clone());
        }
    }

    BestPrices { best }
}

fn cheapest_for(stations: &[StationRecord], fuel: FuelType) -> Option<&StationRecord> {
    let mut winner: Option<(&StationRecord, f64)> = None;

    for station in stations {
        let Some(offer) = station.offer(fuel) else {
            continue;
        };
        if offer.stock == StockStatus::Discontinued {
            continue;
        }
        let Some(price) = offer.price.filter(|p| p.is_finite()) else {
            continue;
        };

        // Strict comparison keeps the first station on a tie
        match winner {
            Some((_, best_price)) if price >= best_price => {}
            _ => winner = Some((station, price)),
        }
    }

    winner.map(|(station, _)| station)
}
