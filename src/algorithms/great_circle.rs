//! Great-circle distance on a mean-radius spherical Earth
//!
//! Used for short-range boundary checks where the full ellipsoidal path is
//! unnecessary. The haversine terms are accumulated at double-double width
//! so a distance landing exactly on a decision boundary compares stably.

use crate::core::constants::MEAN_EARTH_RADIUS_M;
use crate::core::types::GeodeticPosition;
use crate::precision::WideFloat;

/// Haversine distance between two positions, carried at full width.
pub fn haversine_wide(a: &GeodeticPosition, b: &GeodeticPosition) -> WideFloat {
    let phi1 = a.latitude_deg.to_radians();
    let phi2 = b.latitude_deg.to_radians();
    let half_dphi = (b.latitude_deg - a.latitude_deg).to_radians() / 2.0;
    let half_dlambda = (b.longitude_deg - a.longitude_deg).to_radians() / 2.0;

    let sin_dphi = half_dphi.sin();
    let sin_dlambda = half_dlambda.sin();

    let h = WideFloat::product(sin_dphi, sin_dphi)
        + WideFloat::product(sin_dlambda, sin_dlambda) * (phi1.cos() * phi2.cos());
    let h = h.value().clamp(0.0, 1.0);

    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    WideFloat::product(MEAN_EARTH_RADIUS_M, central_angle)
}

/// Haversine distance in meters.
pub fn haversine_distance_m(a: &GeodeticPosition, b: &GeodeticPosition) -> f64 {
    haversine_wide(a, b).value()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geodetic(lat: f64, lon: f64) -> GeodeticPosition {
        GeodeticPosition::new(lat, lon, 0.0).unwrap()
    }

    #[test]
    fn zero_distance_for_identical_points() {
        let p = geodetic(49.2781, -122.9199);
        assert_eq!(haversine_distance_m(&p, &p), 0.0);
    }

    #[test]
    fn pure_north_offset_is_radius_times_angle() {
        let reference = geodetic(49.2781, -122.9199);
        let offset_rad = 50.0 / MEAN_EARTH_RADIUS_M;
        let north = geodetic(49.2781 + offset_rad.to_degrees(), -122.9199);
        let d = haversine_distance_m(&reference, &north);
        assert!((d - 50.0).abs() < 1.0e-6);
    }

    #[test]
    fn symmetric_in_its_arguments() {
        let a = geodetic(49.2781, -122.9199);
        let b = geodetic(49.2790, -122.9180);
        let d_ab = haversine_distance_m(&a, &b);
        let d_ba = haversine_distance_m(&b, &a);
        assert!((d_ab - d_ba).abs() < 1.0e-9);
        // Roughly 170 m between these two fixes.
        assert!(d_ab > 150.0 && d_ab < 190.0);
    }

    #[test]
    fn quarter_meridian_scale_check() {
        let equator = geodetic(0.0, 0.0);
        let pole = geodetic(90.0, 0.0);
        let d = haversine_distance_m(&equator, &pole);
        let expected = MEAN_EARTH_RADIUS_M * std::f64::consts::FRAC_PI_2;
        assert!((d - expected).abs() < 1.0e-3);
    }
}
