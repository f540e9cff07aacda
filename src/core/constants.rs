//! Ellipsoid constants and system parameters

/// WGS84 semi-major axis (meters)
pub const WGS84_SEMI_MAJOR_AXIS_M: f64 = 6_378_137.0;

/// WGS84 flattening factor
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

/// WGS84 first eccentricity squared, e2 = f(2 - f)
pub const WGS84_ECCENTRICITY_SQUARED: f64 = WGS84_FLATTENING * (2.0 - WGS84_FLATTENING);

/// Mean Earth radius used for great-circle distance (meters)
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_000.0;
