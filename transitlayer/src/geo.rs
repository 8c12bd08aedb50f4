//! Geographic primitives for the vehicle overlay.
//!
//! Vehicle positions arrive from the feed as WGS84 latitude/longitude pairs.
//! This module provides the validated coordinate type shared across the crate
//! and the bounding box used to frame a whole snapshot.

use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;
/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;
/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;
/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors from coordinate validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("invalid latitude: {0}")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("invalid longitude: {0}")]
    InvalidLongitude(f64),
}

/// A WGS84 coordinate pair.
///
/// Constructed via [`LatLon::new`], which validates the ranges. NaN and
/// infinite values are rejected by the same range checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl LatLon {
    /// Create a validated coordinate pair.
    ///
    /// # Arguments
    ///
    /// * `lat` - Latitude in degrees (-90.0 to 90.0)
    /// * `lon` - Longitude in degrees (-180.0 to 180.0)
    ///
    /// # Returns
    ///
    /// A `Result` containing the coordinate or an error if either value is
    /// out of range.
    pub fn new(lat: f64, lon: f64) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(CoordError::InvalidLatitude(lat));
        }
        if !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(CoordError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }
}

impl std::fmt::Display for LatLon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Geographic bounding box over a set of positions.
///
/// Represents the minimum bounding rectangle containing every vehicle in a
/// snapshot. Hosts use it to frame the map around the whole fleet.
#[derive(Debug, Clone, Copy)]
pub struct GeoBounds {
    /// Minimum (southernmost) latitude
    pub min_lat: f64,
    /// Maximum (northernmost) latitude
    pub max_lat: f64,
    /// Minimum (westernmost) longitude
    pub min_lon: f64,
    /// Maximum (easternmost) longitude
    pub max_lon: f64,
}

impl GeoBounds {
    /// Create a bounding box from a single point.
    pub fn from_point(point: LatLon) -> Self {
        Self {
            min_lat: point.lat,
            max_lat: point.lat,
            min_lon: point.lon,
            max_lon: point.lon,
        }
    }

    /// Expand this bounding box to include a point.
    pub fn expand(&mut self, point: LatLon) {
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lat = self.max_lat.max(point.lat);
        self.min_lon = self.min_lon.min(point.lon);
        self.max_lon = self.max_lon.max(point.lon);
    }

    /// Get the center point of the bounds.
    pub fn center(&self) -> LatLon {
        LatLon {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lon: (self.min_lon + self.max_lon) / 2.0,
        }
    }

    /// Get the width of the bounds in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Get the height of the bounds in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod lat_lon {
        use super::*;

        #[test]
        fn test_valid_coordinate() {
            let point = LatLon::new(45.523, -122.676).unwrap();
            assert!((point.lat - 45.523).abs() < f64::EPSILON);
            assert!((point.lon + 122.676).abs() < f64::EPSILON);
        }

        #[test]
        fn test_boundary_values_accepted() {
            assert!(LatLon::new(90.0, 180.0).is_ok());
            assert!(LatLon::new(-90.0, -180.0).is_ok());
            assert!(LatLon::new(0.0, 0.0).is_ok());
        }

        #[test]
        fn test_latitude_out_of_range() {
            let result = LatLon::new(90.1, 0.0);
            assert_eq!(result, Err(CoordError::InvalidLatitude(90.1)));
        }

        #[test]
        fn test_longitude_out_of_range() {
            let result = LatLon::new(0.0, -180.5);
            assert_eq!(result, Err(CoordError::InvalidLongitude(-180.5)));
        }

        #[test]
        fn test_nan_rejected() {
            assert!(LatLon::new(f64::NAN, 0.0).is_err());
            assert!(LatLon::new(0.0, f64::NAN).is_err());
        }

        #[test]
        fn test_display() {
            let point = LatLon::new(45.5, -122.25).unwrap();
            assert_eq!(format!("{}", point), "(45.50000, -122.25000)");
        }
    }

    mod geo_bounds {
        use super::*;

        fn point(lat: f64, lon: f64) -> LatLon {
            LatLon::new(lat, lon).unwrap()
        }

        #[test]
        fn test_from_point() {
            let bounds = GeoBounds::from_point(point(45.5, -122.6));
            let center = bounds.center();
            assert!((center.lat - 45.5).abs() < 0.0001);
            assert!((center.lon + 122.6).abs() < 0.0001);
        }

        #[test]
        fn test_expand() {
            let mut bounds = GeoBounds::from_point(point(45.5, -122.6));
            bounds.expand(point(45.6, -122.4));

            assert!((bounds.min_lat - 45.5).abs() < 0.0001);
            assert!((bounds.max_lat - 45.6).abs() < 0.0001);
            assert!((bounds.min_lon + 122.6).abs() < 0.0001);
            assert!((bounds.max_lon + 122.4).abs() < 0.0001);
        }

        #[test]
        fn test_width_and_height() {
            let mut bounds = GeoBounds::from_point(point(45.0, -123.0));
            bounds.expand(point(46.0, -121.0));
            assert!((bounds.width() - 2.0).abs() < 0.0001);
            assert!((bounds.height() - 1.0).abs() < 0.0001);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_valid_range_always_accepted(
                lat in -90.0..=90.0_f64,
                lon in -180.0..=180.0_f64
            ) {
                let point = LatLon::new(lat, lon)?;
                prop_assert!((point.lat - lat).abs() < f64::EPSILON);
                prop_assert!((point.lon - lon).abs() < f64::EPSILON);
            }

            #[test]
            fn test_expand_always_contains_point(
                lat1 in -90.0..=90.0_f64,
                lon1 in -180.0..=180.0_f64,
                lat2 in -90.0..=90.0_f64,
                lon2 in -180.0..=180.0_f64
            ) {
                let mut bounds = GeoBounds::from_point(LatLon::new(lat1, lon1)?);
                bounds.expand(LatLon::new(lat2, lon2)?);

                prop_assert!(bounds.min_lat <= lat2 && lat2 <= bounds.max_lat);
                prop_assert!(bounds.min_lon <= lon2 && lon2 <= bounds.max_lon);
                prop_assert!(bounds.min_lat <= lat1 && lat1 <= bounds.max_lat);
                prop_assert!(bounds.width() >= 0.0 && bounds.height() >= 0.0);
            }
        }
    }
}
