//! Fuel station records.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use super::{Coordinates, FuelType};

/// Stock status of one fuel at one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StockStatus {
    /// The fuel is on sale.
    #[default]
    Available,

    /// Temporary shortage; the station still distributes this fuel.
    Low,

    /// The station has permanently stopped selling this fuel.
    Discontinued,
}

/// Price and stock of one fuel at one station.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelOffer {
    /// Price per litre in euros; absent when the dataset carries none.
    pub price: Option<f64>,

    /// Stock status derived from the dataset's shortage lists.
    pub stock: StockStatus,

    /// When the price was last updated upstream.
    pub updated: Option<NaiveDateTime>,
}

/// One station as returned by the fuel-price dataset.
///
/// Sourced from the upstream record and never mutated afterwards: the
/// pipeline only filters and reduces station lists.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    /// Street address.
    pub address: String,

    /// City the station is in.
    pub city: String,

    /// Two-digit department code; the join key against area matches.
    pub department: String,

    /// Station position.
    pub coordinates: Coordinates,

    /// Per-fuel price and stock.
    pub offers: BTreeMap<FuelType, FuelOffer>,
}

impl StationRecord {
    /// The offer for a given fuel type, if the record carries one.
    pub fn offer(&self, fuel: FuelType) -> Option<&FuelOffer> {
        self.offers.get(&fuel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_lookup() {
        let mut offers = BTreeMap::new();
        offers.insert(
            FuelType::Diesel,
            FuelOffer {
                price: Some(1.79),
                stock: StockStatus::Available,
                updated: None,
            },
        );

        let record = StationRecord {
            address: "1 rue de la République".to_string(),
            city: "Lyon".to_string(),
            department: "69".to_string(),
            coordinates: Coordinates::new(45.76, 4.83).unwrap(),
            offers,
        };

        assert_eq!(record.offer(FuelType::Diesel).unwrap().price, Some(1.79));
        assert!(record.offer(FuelType::E85).is_none());
    }
}
