//! Geographic coordinates.

use std::fmt;

use super::Id;

/// Error returned when building coordinates out of range.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid coordinates: {reason}")]
pub struct InvalidCoordinates {
    reason: &'static str,
}

/// A WGS84 position.
///
/// Latitude must lie in -90..=90 and longitude in -180..=180; NaN is
/// rejected. Any `Coordinates` value is valid by construction.
///
/// # Examples
///
/// ```
/// use navitia_client::domain::Coordinates;
///
/// let gare_de_lyon = Coordinates::new(48.8443, 2.3744).unwrap();
/// assert_eq!(gare_de_lyon.id().as_str(), "2.3744;48.8443");
///
/// assert!(Coordinates::new(91.0, 0.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Create coordinates from a latitude and a longitude, in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(InvalidCoordinates {
                reason: "latitude must be within -90..=90",
            });
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates {
                reason: "longitude must be within -180..=180",
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The identifier Navitia uses for a position: `"lon;lat"`.
    ///
    /// It doubles as a coverage name, so a coordinate query does not need a
    /// region.
    pub fn id(&self) -> Id {
        Id(format!("{};{}", self.longitude, self.latitude))
    }
}

impl fmt::Debug for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinates({}, {})", self.latitude, self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.longitude, self.latitude)
    }
}
