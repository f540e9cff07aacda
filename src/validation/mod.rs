//! Input validation and error classification

pub mod error;
pub mod position;

pub use error::{GeoError, GeoResult};
pub use position::{validate_lat_lon, validate_position};
