//! Core data types for the relocation engine

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

use crate::algorithms::frame_converter::FrameConverter;
use crate::precision::WideFloat;
use crate::validation::error::GeoResult;
use crate::validation::position::validate_position;

/// Position in geodetic coordinates on the WGS84 ellipsoid.
///
/// Immutable value type. Height is ellipsoidal; samples that arrive without
/// one get the configured default applied at the session boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeodeticPosition {
    /// Latitude in decimal degrees, -90..90
    pub latitude_deg: f64,
    /// Longitude in decimal degrees, -180..180
    pub longitude_deg: f64,
    /// Ellipsoidal height in meters
    pub height_m: f64,
}

impl GeodeticPosition {
    /// Construct a validated position.
    pub fn new(latitude_deg: f64, longitude_deg: f64, height_m: f64) -> GeoResult<Self> {
        let position = Self {
            latitude_deg,
            longitude_deg,
            height_m,
        };
        validate_position(&position)?;
        Ok(position)
    }
}

/// Earth-Centered-Earth-Fixed Cartesian position (meters).
///
/// Components are carried at double-double width so that meter-scale deltas
/// survive subtraction of near-equal Earth-radius magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcefPosition {
    pub x: WideFloat,
    pub y: WideFloat,
    pub z: WideFloat,
}

impl EcefPosition {
    pub fn from_meters(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: WideFloat::from(x),
            y: WideFloat::from(y),
            z: WideFloat::from(z),
        }
    }

    /// Collapse to plain f64 meters.
    pub fn to_meters(self) -> (f64, f64, f64) {
        (self.x.value(), self.y.value(), self.z.value())
    }
}

/// Offset between two ECEF positions (meters). A vector, not a position:
/// adding it to a position translates, rotating it never does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EcefDelta {
    pub dx: WideFloat,
    pub dy: WideFloat,
    pub dz: WideFloat,
}

impl Sub for EcefPosition {
    type Output = EcefDelta;

    fn sub(self, rhs: EcefPosition) -> EcefDelta {
        EcefDelta {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
            dz: self.z - rhs.z,
        }
    }
}

impl Add<EcefDelta> for EcefPosition {
    type Output = EcefPosition;

    fn add(self, rhs: EcefDelta) -> EcefPosition {
        EcefPosition {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
            z: self.z + rhs.dz,
        }
    }
}

/// Offset in a local East-North-Up tangent frame (meters).
///
/// Meaningless without the reference position its frame is tangent at;
/// public APIs therefore exchange [`FramedVector`], never a bare `EnuVector`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnuVector {
    pub east_m: f64,
    pub north_m: f64,
    pub up_m: f64,
}

impl EnuVector {
    pub fn new(east_m: f64, north_m: f64, up_m: f64) -> Self {
        Self {
            east_m,
            north_m,
            up_m,
        }
    }

    pub fn magnitude_m(&self) -> f64 {
        (self.east_m * self.east_m + self.north_m * self.north_m + self.up_m * self.up_m).sqrt()
    }
}

/// An ENU offset paired with the geodetic position its frame is tangent at.
///
/// Mixing an offset with a foreign reference frame is a programmer error;
/// this pairing makes it structurally hard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramedVector {
    pub reference: GeodeticPosition,
    pub vector: EnuVector,
}

impl FramedVector {
    pub fn new(reference: GeodeticPosition, vector: EnuVector) -> Self {
        Self { reference, vector }
    }
}

/// A digital object anchored at the real-world position it was created.
///
/// Created once when the object is placed and immutable thereafter; deletion
/// and recreation are an external concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub id: String,
    /// Where the creator stood when placing the object
    pub creator_position: GeodeticPosition,
    /// Creator-to-object offset in the creator's local ENU frame
    pub creator_to_object: EnuVector,
    /// Absolute object position, derived at placement
    pub object_position: GeodeticPosition,
}

impl Anchor {
    /// Place an object relative to its creator, deriving the absolute
    /// object position through ECEF.
    pub fn place(
        id: impl Into<String>,
        creator_position: GeodeticPosition,
        creator_to_object: EnuVector,
        converter: &FrameConverter,
    ) -> GeoResult<Self> {
        let creator_ecef = converter.geodetic_to_ecef(&creator_position)?;
        let delta = converter.enu_delta_to_ecef_delta(
            &creator_to_object,
            creator_position.latitude_deg,
            creator_position.longitude_deg,
        );
        let object_position = converter.ecef_to_geodetic(&(creator_ecef + delta))?;
        Ok(Self {
            id: id.into(),
            creator_position,
            creator_to_object,
            object_position,
        })
    }

    /// The creator-to-object offset paired with its reference frame.
    pub fn creator_frame(&self) -> FramedVector {
        FramedVector::new(self.creator_position.clone(), self.creator_to_object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geodetic_constructor_validates() {
        assert!(GeodeticPosition::new(49.2781, -122.9199, 370.0).is_ok());
        assert!(GeodeticPosition::new(95.0, 0.0, 0.0).is_err());
        assert!(GeodeticPosition::new(0.0, 0.0, f64::NAN).is_err());
    }

    #[test]
    fn ecef_position_delta_arithmetic() {
        let a = EcefPosition::from_meters(6_378_137.0, 0.0, 0.0);
        let b = EcefPosition::from_meters(6_378_137.0, 5.0, -2.5);
        let delta = b - a;
        assert!((delta.dx.value()).abs() < 1.0e-12);
        assert!((delta.dy.value() - 5.0).abs() < 1.0e-12);
        assert!((delta.dz.value() + 2.5).abs() < 1.0e-12);

        let back = a + delta;
        assert_eq!(back.to_meters(), b.to_meters());
    }

    #[test]
    fn enu_magnitude() {
        let v = EnuVector::new(3.0, 4.0, 0.0);
        assert!((v.magnitude_m() - 5.0).abs() < 1.0e-12);
    }

    #[test]
    fn anchor_place_derives_object_position() {
        let converter = FrameConverter::default();
        let creator = GeodeticPosition::new(49.2781, -122.9199, 370.0).unwrap();
        let anchor = Anchor::place(
            "bench-plaque",
            creator.clone(),
            EnuVector::new(5.0, 10.0, 0.0),
            &converter,
        )
        .unwrap();

        assert_eq!(anchor.creator_position, creator);
        // Object sits north-east of the creator at essentially the same height.
        assert!(anchor.object_position.latitude_deg > creator.latitude_deg);
        assert!(anchor.object_position.longitude_deg > creator.longitude_deg);
        assert!((anchor.object_position.height_m - creator.height_m).abs() < 0.01);
    }
}
