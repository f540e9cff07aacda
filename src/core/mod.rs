//! Core data types and constants

pub mod constants;
pub mod types;

pub use constants::{
    MEAN_EARTH_RADIUS_M, WGS84_ECCENTRICITY_SQUARED, WGS84_FLATTENING, WGS84_SEMI_MAJOR_AXIS_M,
};
pub use types::{Anchor, EcefDelta, EcefPosition, EnuVector, FramedVector, GeodeticPosition};
