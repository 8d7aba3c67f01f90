//! Conversion from dataset records to domain station records.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::domain::{Coordinates, FuelOffer, FuelType, StationRecord, StockStatus};

use super::types::StationDto;

/// Convert raw records, skipping any that lack the fields the pipeline
/// needs (address, city, department, position).
pub fn convert_records(dtos: Vec<StationDto>) -> Vec<StationRecord> {
    dtos.into_iter()
        .filter_map(|dto| {
            convert_record(&dto).or_else(|| {
                tracing::debug!(
                    city = dto.ville.as_deref().unwrap_or("?"),
                    "skipping incomplete station record"
                );
                None
            })
        })
        .collect()
}

fn convert_record(dto: &StationDto) -> Option<StationRecord> {
    let address = dto.adresse.clone()?;
    let city = dto.ville.clone()?;
    let department = dto.code_departement.clone()?;
    let geom = dto.geom?;
    let coordinates = Coordinates::new(geom.lat, geom.lon).ok()?;

    let mut offers = BTreeMap::new();
    for fuel in FuelType::ALL {
        let (price, maj) = dto.price_fields(fuel);
        let stock = stock_status(dto, fuel);

        // No price and no shortage report means the record says nothing
        // about this fuel at all
        if price.is_none() && stock == StockStatus::Available {
            continue;
        }

        offers.insert(
            fuel,
            FuelOffer {
                price,
                stock,
                updated: maj.and_then(parse_update_time),
            },
        );
    }

    Some(StationRecord {
        address,
        city,
        department,
        coordinates,
        offers,
    })
}

/// Stock status of one fuel, from the record's shortage lists.
///
/// A fuel in the definitive list is discontinued even if a stale price
/// is still present.
fn stock_status(dto: &StationDto, fuel: FuelType) -> StockStatus {
    let label = fuel.shortage_label();

    if in_shortage_list(dto.carburants_rupture_definitive.as_deref(), label) {
        StockStatus::Discontinued
    } else if in_shortage_list(dto.carburants_rupture_temporaire.as_deref(), label) {
        StockStatus::Low
    } else {
        StockStatus::Available
    }
}

/// Membership test against a semicolon-separated shortage list.
fn in_shortage_list(list: Option<&str>, label: &str) -> bool {
    list.is_some_and(|list| {
        list.split(';')
            .any(|entry| entry.trim().eq_ignore_ascii_case(label))
    })
}

/// The dataset writes timestamps either as `2024-05-21 06:30:12` or in
/// ISO-8601 form.
fn parse_update_time(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
