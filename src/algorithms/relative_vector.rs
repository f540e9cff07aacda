//! Observer-relative vector resolution
//!
//! An anchored object is recorded as the vector from its creator, in the
//! creator's local ENU frame. For any other observer the object must render
//! at the offset that puts it in the same absolute place. The resolution
//! goes through ECEF: place the object absolutely from the creator's frame,
//! subtract the observer's absolute position, and rotate the remaining delta
//! into the observer's frame.

use crate::algorithms::frame_converter::FrameConverter;
use crate::core::types::{FramedVector, GeodeticPosition};
use crate::validation::error::GeoResult;
use crate::validation::position::validate_position;

/// Resolver from creator-framed vectors to observer-framed vectors.
///
/// Pure and reentrant: no shared state, safe to call concurrently across
/// independent anchors and sessions.
pub struct VectorResolver {
    converter: FrameConverter,
}

impl Default for VectorResolver {
    fn default() -> Self {
        Self {
            converter: FrameConverter::default(),
        }
    }
}

impl VectorResolver {
    pub fn new(converter: FrameConverter) -> Self {
        Self { converter }
    }

    /// Resolve the observer-to-object vector in the observer's ENU frame.
    ///
    /// When the observer stands exactly where the creator stood, the result
    /// equals the input vector to within numeric tolerance.
    pub fn resolve(
        &self,
        creator_frame: &FramedVector,
        observer: &GeodeticPosition,
    ) -> GeoResult<FramedVector> {
        validate_position(&creator_frame.reference)?;
        validate_position(observer)?;

        let creator = &creator_frame.reference;
        let creator_ecef = self.converter.geodetic_to_ecef(creator)?;
        let creator_to_object = self.converter.enu_delta_to_ecef_delta(
            &creator_frame.vector,
            creator.latitude_deg,
            creator.longitude_deg,
        );
        let object_ecef = creator_ecef + creator_to_object;

        let observer_ecef = self.converter.geodetic_to_ecef(observer)?;
        let observer_to_object = object_ecef - observer_ecef;

        let enu = self.converter.ecef_delta_to_enu(
            &observer_to_object,
            observer.latitude_deg,
            observer.longitude_deg,
        );
        Ok(FramedVector::new(observer.clone(), enu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EnuVector;
    use proptest::prelude::*;

    fn geodetic(lat: f64, lon: f64, h: f64) -> GeodeticPosition {
        GeodeticPosition::new(lat, lon, h).unwrap()
    }

    #[test]
    fn self_observation_returns_the_input_vector() {
        let resolver = VectorResolver::default();
        let creator = geodetic(49.2781, -122.9199, 370.0);
        let frame = FramedVector::new(creator.clone(), EnuVector::new(5.0, 10.0, 0.0));

        let resolved = resolver.resolve(&frame, &creator).unwrap();

        assert!((resolved.vector.east_m - 5.0).abs() < 1.0e-6);
        assert!((resolved.vector.north_m - 10.0).abs() < 1.0e-6);
        assert!(resolved.vector.up_m.abs() < 1.0e-6);
        assert_eq!(resolved.reference, creator);
    }

    #[test]
    fn eastward_observer_sees_the_east_component_shrink() {
        let resolver = VectorResolver::default();
        let creator = geodetic(49.2781, -122.9199, 370.0);
        let frame = FramedVector::new(creator.clone(), EnuVector::new(5.0, 10.0, 0.0));

        // Observer roughly 100 m east of the creator, same latitude.
        let converter = FrameConverter::default();
        let observer = converter
            .small_offset_approx(&creator, &EnuVector::new(100.0, 0.0, 0.0))
            .unwrap();

        let resolved = resolver.resolve(&frame, &observer).unwrap();

        assert!((resolved.vector.east_m - (5.0 - 100.0)).abs() < 0.1);
        assert!((resolved.vector.north_m - 10.0).abs() < 0.1);
        assert!(resolved.vector.up_m.abs() < 0.1);
    }

    #[test]
    fn resolution_is_idempotent() {
        let resolver = VectorResolver::default();
        let creator = geodetic(49.2781, -122.9199, 370.0);
        let frame = FramedVector::new(creator, EnuVector::new(-3.25, 7.5, 1.125));
        let observer = geodetic(49.2790, -122.9180, 370.0);

        let first = resolver.resolve(&frame, &observer).unwrap();
        let second = resolver.resolve(&frame, &observer).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_non_finite_observer() {
        let resolver = VectorResolver::default();
        let creator = geodetic(49.2781, -122.9199, 370.0);
        let frame = FramedVector::new(creator, EnuVector::new(1.0, 0.0, 0.0));

        let observer = GeodeticPosition {
            latitude_deg: f64::INFINITY,
            longitude_deg: 0.0,
            height_m: 0.0,
        };
        assert!(resolver.resolve(&frame, &observer).is_err());
    }

    proptest! {
        #[test]
        fn self_observation_invariance(
            lat in -89.0f64..89.0,
            lon in -179.99f64..179.99,
            h in -100.0f64..5_000.0,
            e in -50.0f64..50.0,
            n in -50.0f64..50.0,
            u in -20.0f64..20.0,
        ) {
            let resolver = VectorResolver::default();
            let position = geodetic(lat, lon, h);
            let frame = FramedVector::new(position.clone(), EnuVector::new(e, n, u));

            let resolved = resolver.resolve(&frame, &position).unwrap();

            prop_assert!((resolved.vector.east_m - e).abs() < 1.0e-9);
            prop_assert!((resolved.vector.north_m - n).abs() < 1.0e-9);
            prop_assert!((resolved.vector.up_m - u).abs() < 1.0e-9);
        }
    }
}
