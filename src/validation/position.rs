//! Geodetic input validation
//!
//! Every public entry point that accepts a latitude/longitude pair runs it
//! through these checks before any arithmetic, so conversions never operate
//! on NaN, infinity, or coordinates outside the geodetic domain.

use crate::core::types::GeodeticPosition;
use crate::validation::error::{GeoError, GeoResult};

/// Validate a raw latitude/longitude pair in degrees.
pub fn validate_lat_lon(latitude_deg: f64, longitude_deg: f64) -> GeoResult<()> {
    if !latitude_deg.is_finite() || !longitude_deg.is_finite() {
        return Err(GeoError::InvalidPosition {
            latitude_deg,
            longitude_deg,
            reason: "latitude/longitude must be finite".to_string(),
        });
    }
    if !(-90.0..=90.0).contains(&latitude_deg) {
        return Err(GeoError::InvalidPosition {
            latitude_deg,
            longitude_deg,
            reason: "latitude out of range [-90, 90]".to_string(),
        });
    }
    if !(-180.0..=180.0).contains(&longitude_deg) {
        return Err(GeoError::InvalidPosition {
            latitude_deg,
            longitude_deg,
            reason: "longitude out of range [-180, 180]".to_string(),
        });
    }
    Ok(())
}

/// Validate a full geodetic position, including its height.
pub fn validate_position(position: &GeodeticPosition) -> GeoResult<()> {
    validate_lat_lon(position.latitude_deg, position.longitude_deg)?;
    if !position.height_m.is_finite() {
        return Err(GeoError::InvalidPosition {
            latitude_deg: position.latitude_deg,
            longitude_deg: position.longitude_deg,
            reason: "height must be finite".to_string(),
        });
    }
    Ok(())
}
