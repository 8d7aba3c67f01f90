//! Search radius type.

use std::fmt;

/// Error returned for a radius outside the supported set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid search radius: {0} km (supported: 5, 10, 15)")]
pub struct InvalidRadius(pub u8);

/// A supported search radius.
///
/// The radius is one of a fixed set of values; anything else is rejected
/// at the boundary so the rest of the pipeline never sees an arbitrary
/// distance.
///
/// # Examples
///
/// ```
/// use pump_server::domain::Radius;
///
/// let r = Radius::from_km(10).unwrap();
/// assert_eq!(r.as_km(), 10);
///
/// assert!(Radius::from_km(7).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Radius {
    #[default]
    Km5,
    Km10,
    Km15,
}

impl Radius {
    /// Parse a radius from kilometres.
    pub fn from_km(km: u8) -> Result<Self, InvalidRadius> {
        match km {
            5 => Ok(Radius::Km5),
            10 => Ok(Radius::Km10),
            15 => Ok(Radius::Km15),
            other => Err(InvalidRadius(other)),
        }
    }

    /// The radius in kilometres.
    pub fn as_km(&self) -> u8 {
        match self {
            Radius::Km5 => 5,
            Radius::Km10 => 10,
            Radius::Km15 => 15,
        }
    }
}

impl fmt::Display for Radius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} km", self.as_km())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_supported_values() {
        assert_eq!(Radius::from_km(5), Ok(Radius::Km5));
        assert_eq!(Radius::from_km(10), Ok(Radius::Km10));
        assert_eq!(Radius::from_km(15), Ok(Radius::Km15));
    }

    #[test]
    fn reject_unsupported_values() {
        assert_eq!(Radius::from_km(0), Err(InvalidRadius(0)));
        assert_eq!(Radius::from_km(7), Err(InvalidRadius(7)));
        assert_eq!(Radius::from_km(20), Err(InvalidRadius(20)));
        assert_eq!(Radius::from_km(255), Err(InvalidRadius(255)));
    }

    #[test]
    fn default_is_smallest() {
        assert_eq!(Radius::default(), Radius::Km5);
    }

    #[test]
    fn display() {
        assert_eq!(Radius::Km15.to_string(), "15 km");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Only 5, 10 and 15 parse; everything else fails with the input echoed back
        #[test]
        fn from_km_total(km in 0u8..=255) {
            match Radius::from_km(km) {
                Ok(r) => prop_assert_eq!(r.as_km(), km),
                Err(InvalidRadius(bad)) => {
                    prop_assert_eq!(bad, km);
                    prop_assert!(km != 5 && km != 10 && km != 15);
                }
            }
        }
    }
}
