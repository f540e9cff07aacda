//! Geodetic, ECEF, and local tangent-plane frame conversions
//!
//! All operations are pure functions over the WGS84 ellipsoid. Trigonometry
//! runs in plain f64; scaling and accumulation into position-scale values
//! runs through [`WideFloat`] so that a one-meter offset is never rounded
//! away against a 6,378,137-meter base.

use nalgebra::Matrix3;

use crate::core::constants::{
    WGS84_ECCENTRICITY_SQUARED, WGS84_FLATTENING, WGS84_SEMI_MAJOR_AXIS_M,
};
use crate::core::types::{EcefDelta, EcefPosition, EnuVector, GeodeticPosition};
use crate::precision::WideFloat;
use crate::utils::config::EngineConfig;
use crate::validation::error::{GeoError, GeoResult};
use crate::validation::position::validate_position;

/// Converter between geodetic, ECEF, and ENU frames.
pub struct FrameConverter {
    /// Ellipsoid semi-major axis (meters)
    pub semi_major_axis_m: f64,
    /// Ellipsoid flattening factor
    pub flattening: f64,
    /// First eccentricity squared
    pub eccentricity_squared: f64,
    /// Convergence tolerance for the iterative ECEF inverse (radians)
    inverse_tolerance_rad: f64,
    /// Iteration cap for the ECEF inverse
    inverse_max_iterations: u32,
}

impl Default for FrameConverter {
    fn default() -> Self {
        Self {
            semi_major_axis_m: WGS84_SEMI_MAJOR_AXIS_M,
            flattening: WGS84_FLATTENING,
            eccentricity_squared: WGS84_ECCENTRICITY_SQUARED,
            inverse_tolerance_rad: 1.0e-12,
            inverse_max_iterations: 50,
        }
    }
}

impl FrameConverter {
    /// WGS84 converter with default inverse settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// WGS84 converter with the inverse tolerance and iteration cap taken
    /// from engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            inverse_tolerance_rad: config.ecef_inverse_tolerance,
            inverse_max_iterations: config.ecef_inverse_max_iterations,
            ..Self::default()
        }
    }

    /// Radius of curvature in the prime vertical, N = a / sqrt(1 - e2 sin2 lat).
    fn prime_vertical_radius_m(&self, sin_lat: f64) -> f64 {
        self.semi_major_axis_m / (1.0 - self.eccentricity_squared * sin_lat * sin_lat).sqrt()
    }

    /// Meridional radius of curvature, M = a(1 - e2) / (1 - e2 sin2 lat)^1.5.
    fn meridional_radius_m(&self, sin_lat: f64) -> f64 {
        self.semi_major_axis_m * (1.0 - self.eccentricity_squared)
            / (1.0 - self.eccentricity_squared * sin_lat * sin_lat).powf(1.5)
    }

    /// Rotation matrix from ECEF into the ENU frame tangent at the given
    /// reference latitude/longitude. Orthonormal, so its transpose is the
    /// ENU-to-ECEF rotation.
    fn enu_rotation(ref_lat_rad: f64, ref_lon_rad: f64) -> Matrix3<f64> {
        let (sin_lat, cos_lat) = ref_lat_rad.sin_cos();
        let (sin_lon, cos_lon) = ref_lon_rad.sin_cos();

        Matrix3::new(
            -sin_lon,
            cos_lon,
            0.0,
            -sin_lat * cos_lon,
            -sin_lat * sin_lon,
            cos_lat,
            cos_lat * cos_lon,
            cos_lat * sin_lon,
            sin_lat,
        )
    }

    /// Closed-form geodetic to ECEF conversion.
    pub fn geodetic_to_ecef(&self, position: &GeodeticPosition) -> GeoResult<EcefPosition> {
        validate_position(position)?;

        let lat_rad = position.latitude_deg.to_radians();
        let lon_rad = position.longitude_deg.to_radians();
        let (sin_lat, cos_lat) = lat_rad.sin_cos();
        let (sin_lon, cos_lon) = lon_rad.sin_cos();

        let n = self.prime_vertical_radius_m(sin_lat);
        let radial = WideFloat::from(n) + position.height_m;
        let polar = WideFloat::from(n) * (1.0 - self.eccentricity_squared) + position.height_m;

        Ok(EcefPosition {
            x: radial * cos_lat * cos_lon,
            y: radial * cos_lat * sin_lon,
            z: polar * sin_lat,
        })
    }

    /// Iterative ECEF to geodetic inversion.
    ///
    /// Converges in a handful of iterations everywhere off the poles; inputs
    /// that fail to converge within the configured cap surface
    /// [`GeoError::NumericDivergence`] instead of looping.
    pub fn ecef_to_geodetic(&self, ecef: &EcefPosition) -> GeoResult<GeodeticPosition> {
        self.invert_ecef(ecef).map(|(position, _)| position)
    }

    /// Inversion core, also reporting the iteration count.
    fn invert_ecef(&self, ecef: &EcefPosition) -> GeoResult<(GeodeticPosition, u32)> {
        if !ecef.x.is_finite() || !ecef.y.is_finite() || !ecef.z.is_finite() {
            return Err(GeoError::InvalidPosition {
                latitude_deg: f64::NAN,
                longitude_deg: f64::NAN,
                reason: "non-finite ECEF input".to_string(),
            });
        }

        let (x, y, z) = ecef.to_meters();
        let p = x.hypot(y);
        let lon_rad = y.atan2(x);
        let e2 = self.eccentricity_squared;

        let mut lat_rad = z.atan2(p * (1.0 - e2));
        let mut residual_rad = f64::INFINITY;

        for iteration in 1..=self.inverse_max_iterations {
            let sin_lat = lat_rad.sin();
            let n = self.prime_vertical_radius_m(sin_lat);
            let height_m = self.height_above_ellipsoid(p, z, lat_rad, n);

            let next = z.atan2(p * (1.0 - e2 * n / (n + height_m)));
            residual_rad = (next - lat_rad).abs();
            lat_rad = next;

            if residual_rad < self.inverse_tolerance_rad {
                let sin_lat = lat_rad.sin();
                let n = self.prime_vertical_radius_m(sin_lat);
                let height_m = self.height_above_ellipsoid(p, z, lat_rad, n);
                let position = GeodeticPosition {
                    latitude_deg: lat_rad.to_degrees(),
                    longitude_deg: lon_rad.to_degrees(),
                    height_m,
                };
                return Ok((position, iteration));
            }
        }

        Err(GeoError::NumericDivergence {
            iterations: self.inverse_max_iterations,
            residual_rad,
        })
    }

    /// Height above the ellipsoid for the current latitude estimate. The
    /// cos form degenerates at the poles, where the sin form is exact.
    fn height_above_ellipsoid(&self, p: f64, z: f64, lat_rad: f64, n: f64) -> f64 {
        let cos_lat = lat_rad.cos();
        if cos_lat.abs() > 1.0e-10 {
            p / cos_lat - n
        } else {
            z / lat_rad.sin() - n * (1.0 - self.eccentricity_squared)
        }
    }

    /// Rotate a local ENU offset into an ECEF delta. No translation is
    /// applied: the result is a vector, not a position.
    pub fn enu_delta_to_ecef_delta(
        &self,
        enu: &EnuVector,
        ref_latitude_deg: f64,
        ref_longitude_deg: f64,
    ) -> EcefDelta {
        let rotation = Self::enu_rotation(
            ref_latitude_deg.to_radians(),
            ref_longitude_deg.to_radians(),
        )
        .transpose();
        let v = [enu.east_m, enu.north_m, enu.up_m];

        let row = |i: usize| {
            WideFloat::product(rotation[(i, 0)], v[0])
                + WideFloat::product(rotation[(i, 1)], v[1])
                + WideFloat::product(rotation[(i, 2)], v[2])
        };

        EcefDelta {
            dx: row(0),
            dy: row(1),
            dz: row(2),
        }
    }

    /// Rotate an ECEF delta into the ENU frame tangent at the reference
    /// point. Inverse of [`enu_delta_to_ecef_delta`] since the rotation is
    /// orthonormal.
    ///
    /// [`enu_delta_to_ecef_delta`]: Self::enu_delta_to_ecef_delta
    pub fn ecef_delta_to_enu(
        &self,
        delta: &EcefDelta,
        ref_latitude_deg: f64,
        ref_longitude_deg: f64,
    ) -> EnuVector {
        let rotation = Self::enu_rotation(
            ref_latitude_deg.to_radians(),
            ref_longitude_deg.to_radians(),
        );
        let v = [delta.dx, delta.dy, delta.dz];

        let row = |i: usize| {
            (v[0] * rotation[(i, 0)] + v[1] * rotation[(i, 1)] + v[2] * rotation[(i, 2)]).value()
        };

        EnuVector {
            east_m: row(0),
            north_m: row(1),
            up_m: row(2),
        }
    }

    /// Linearized application of a small ENU offset to a geodetic position,
    /// using the meridional radius for the north/latitude coupling and the
    /// prime-vertical radius for the east/longitude coupling.
    ///
    /// Valid only for offsets small relative to Earth's radius. The exact
    /// path through ECEF should be preferred unless the caller explicitly
    /// trades accuracy for speed.
    pub fn small_offset_approx(
        &self,
        reference: &GeodeticPosition,
        offset: &EnuVector,
    ) -> GeoResult<GeodeticPosition> {
        validate_position(reference)?;

        let lat_rad = reference.latitude_deg.to_radians();
        let sin_lat = lat_rad.sin();
        let m = self.meridional_radius_m(sin_lat);
        let n = self.prime_vertical_radius_m(sin_lat);

        let dlat_rad = offset.north_m / (m + reference.height_m);
        let dlon_rad = offset.east_m / ((n + reference.height_m) * lat_rad.cos());

        let mut longitude_deg = reference.longitude_deg + dlon_rad.to_degrees();
        if longitude_deg > 180.0 {
            longitude_deg -= 360.0;
        } else if longitude_deg < -180.0 {
            longitude_deg += 360.0;
        }

        Ok(GeodeticPosition {
            latitude_deg: reference.latitude_deg + dlat_rad.to_degrees(),
            longitude_deg,
            height_m: reference.height_m + offset.up_m,
        })
    }
}
