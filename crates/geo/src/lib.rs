//! Geocoded place lookups and distance calculations for Pracehub.
//!
//! This crate provides:
//! - Haversine great-circle distances
//! - The municipality centroid index with name / name+region / key lookups
//! - A lazily-loaded, share-on-first-use index service
//! - Ranking for place autocomplete suggestions
//!
//! # Example
//!
//! ```
//! use pracehub_geo::{haversine_km, Coordinate};
//!
//! let plzen = Coordinate::new(49.7384, 13.3736);
//! let praha = Coordinate::new(50.0755, 14.4378);
//!
//! let distance_km = haversine_km(&plzen, &praha);
//! assert!((distance_km - 84.0).abs() < 5.0);
//! ```

mod error;
mod haversine;
mod index;
mod service;
mod suggest;

pub use error::{GeoError, Result};
pub use haversine::{haversine_km, EARTH_RADIUS_KM};
pub use index::{CentroidIndex, GeoIndex, PlaceRecord, BIAS_POINT};
pub use service::{CentroidSource, FetchFuture, GeoIndexService, LoadState};
pub use suggest::{rank_suggestions, PlaceSuggestion};

use serde::{Deserialize, Serialize};

/// A geographic coordinate with latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Returns true if the coordinate has finite, in-range values.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_creation() {
        let coord = Coordinate::new(49.7384, 13.3736);
        assert_eq!(coord.latitude, 49.7384);
        assert_eq!(coord.longitude, 13.3736);
    }

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_coordinate_from_tuple() {
        let coord: Coordinate = (49.7384, 13.3736).into();
        assert_eq!(coord.latitude, 49.7384);
    }

    #[test]
    fn test_wire_field_names() {
        let coord: Coordinate = serde_json::from_str(r#"{"lat": 49.7, "lon": 12.8}"#).unwrap();
        assert_eq!(coord.latitude, 49.7);
        assert_eq!(coord.longitude, 12.8);
    }
}
