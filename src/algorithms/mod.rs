//! Coordinate math: frame conversions, great-circle distance, vector
//! relocation

pub mod frame_converter;
pub mod great_circle;
pub mod relative_vector;

pub use frame_converter::FrameConverter;
pub use great_circle::{haversine_distance_m, haversine_wide};
pub use relative_vector::VectorResolver;
