//! Geographic type definitions

use std::fmt;

use thiserror::Error;

/// Valid latitude range in decimal degrees
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in decimal degrees
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A point on the Earth's surface in decimal degrees.
///
/// Construction validates the ranges, so a `GeoPoint` held anywhere in the
/// crate is known to carry finite, in-range coordinates. NaN never passes
/// validation because NaN comparisons are false.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point from latitude/longitude in decimal degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if latitude is outside [-90, 90], longitude is
    /// outside [-180, 180], or either value is non-finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Creates a point from values already known to be in range.
    ///
    /// Used by the geodesy functions, whose outputs are clamped and
    /// normalized back into valid ranges before construction.
    #[inline]
    pub(crate) fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        debug_assert!((MIN_LAT..=MAX_LAT).contains(&latitude));
        debug_assert!((MIN_LON..=MAX_LON).contains(&longitude));
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in decimal degrees.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// Errors that can occur constructing or transforming geographic values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or non-finite.
    #[error("Invalid latitude {0} (must be finite and within [-90, 90])")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or non-finite.
    #[error("Invalid longitude {0} (must be finite and within [-180, 180])")]
    InvalidLongitude(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geo_point_accepts_valid_coordinates() {
        let point = GeoPoint::new(37.7749, -122.4194).unwrap();
        assert_eq!(point.latitude(), 37.7749);
        assert_eq!(point.longitude(), -122.4194);
    }

    #[test]
    fn test_geo_point_accepts_boundary_values() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
        assert!(GeoPoint::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_geo_point_rejects_out_of_range_latitude() {
        let result = GeoPoint::new(90.001, 0.0);
        assert!(matches!(result, Err(GeoError::InvalidLatitude(_))));
    }

    #[test]
    fn test_geo_point_rejects_out_of_range_longitude() {
        let result = GeoPoint::new(0.0, -180.5);
        assert!(matches!(result, Err(GeoError::InvalidLongitude(_))));
    }

    #[test]
    fn test_geo_point_rejects_non_finite() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
        assert!(GeoPoint::new(f64::NEG_INFINITY, 0.0).is_err());
    }

    #[test]
    fn test_geo_point_display() {
        let point = GeoPoint::new(37.7749, -122.4194).unwrap();
        assert_eq!(point.to_string(), "(37.77490, -122.41940)");
    }
}
