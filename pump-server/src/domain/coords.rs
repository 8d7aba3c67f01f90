//! Geographic coordinate type.

use std::fmt;

/// Error returned when constructing out-of-range coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinates: {reason}")]
pub struct InvalidCoordinates {
    reason: &'static str,
}

/// A validated WGS84 position in decimal degrees.
///
/// Latitude is within [-90, 90], longitude within [-180, 180], and both
/// are finite. This type guarantees that any `Coordinates` value is valid
/// by construction.
///
/// # Examples
///
/// ```
/// use pump_server::domain::Coordinates;
///
/// let lyon = Coordinates::new(45.7640, 4.8357).unwrap();
/// assert_eq!(lyon.latitude(), 45.7640);
///
/// // Out-of-range latitude is rejected
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Construct coordinates from decimal degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(InvalidCoordinates {
                reason: "latitude and longitude must be finite",
            });
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinates {
                reason: "latitude must be within [-90, 90]",
            });
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates {
                reason: "longitude must be within [-180, 180]",
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinates({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_in_range() {
        assert!(Coordinates::new(45.7640, 4.8357).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(Coordinates::new(90.0001, 0.0).is_err());
        assert!(Coordinates::new(-90.0001, 0.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(Coordinates::new(0.0, 180.0001).is_err());
        assert!(Coordinates::new(0.0, -180.0001).is_err());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert!(Coordinates::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinates::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn accessors() {
        let c = Coordinates::new(48.8647, 2.3490).unwrap();
        assert_eq!(c.latitude(), 48.8647);
        assert_eq!(c.longitude(), 2.3490);
    }

    #[test]
    fn display() {
        let c = Coordinates::new(45.5, -1.25).unwrap();
        assert_eq!(format!("{}", c), "45.5, -1.25");
    }
}
