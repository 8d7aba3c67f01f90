//! Fuel type catalogue.

use std::fmt;

/// A fuel type sold by French stations.
///
/// Each variant maps onto a stable field-name prefix in the upstream
/// price dataset (e.g. `gazole_prix`, `gazole_maj`) and onto the label
/// used in the dataset's shortage lists (e.g. `Gazole`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FuelType {
    Diesel,
    Sp95,
    Sp98,
    E10,
    E85,
    Lpg,
}

impl FuelType {
    /// All fuel types, in catalogue order.
    pub const ALL: [FuelType; 6] = [
        FuelType::Diesel,
        FuelType::Sp95,
        FuelType::Sp98,
        FuelType::E10,
        FuelType::E85,
        FuelType::Lpg,
    ];

    /// The upstream dataset field-name prefix for this fuel.
    pub fn dataset_prefix(&self) -> &'static str {
        match self {
            FuelType::Diesel => "gazole",
            FuelType::Sp95 => "sp95",
            FuelType::Sp98 => "sp98",
            FuelType::E10 => "e10",
            FuelType::E85 => "e85",
            FuelType::Lpg => "gplc",
        }
    }

    /// The label used in the dataset's shortage lists.
    pub fn shortage_label(&self) -> &'static str {
        match self {
            FuelType::Diesel => "Gazole",
            FuelType::Sp95 => "SP95",
            FuelType::Sp98 => "SP98",
            FuelType::E10 => "E10",
            FuelType::E85 => "E85",
            FuelType::Lpg => "GPLc",
        }
    }

    /// Parse a fuel type from its dataset prefix.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        FuelType::ALL
            .into_iter()
            .find(|t| t.dataset_prefix() == prefix)
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dataset_prefix())
    }
}
