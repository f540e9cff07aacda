//! Engine configuration
//!
//! All tunable parameters are threaded through this value explicitly; there
//! is no module-level default-height constant or other shared global, so
//! deployments and tests can vary settings independently.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::validation::error::{GeoError, GeoResult};

/// Recognized engine options, with the deployment defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Ellipsoidal height assigned to samples that arrive without one (meters)
    pub default_height_m: f64,
    /// Distance from the reference point at which an observer is handed a
    /// refreshed set of anchors (meters)
    pub boundary_threshold_m: f64,
    /// Radius for nearby-anchor lookup on a boundary crossing (meters)
    pub nearby_radius_m: f64,
    /// Convergence tolerance for the iterative ECEF inverse (radians)
    pub ecef_inverse_tolerance: f64,
    /// Iteration cap for the ECEF inverse
    pub ecef_inverse_max_iterations: u32,
    /// Accept the raw fix when the refinement collaborator fails, instead of
    /// dropping the sample
    pub use_raw_on_refinement_failure: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_height_m: 370.0,
            boundary_threshold_m: 50.0,
            nearby_radius_m: 100.0,
            ecef_inverse_tolerance: 1.0e-12,
            ecef_inverse_max_iterations: 50,
            use_raw_on_refinement_failure: true,
        }
    }
}

impl EngineConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> GeoResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| GeoError::InvalidConfiguration {
            parameter: "config_file".to_string(),
            value: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|err| GeoError::InvalidConfiguration {
                parameter: "config_file".to_string(),
                value: path.display().to_string(),
                reason: err.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to a JSON file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> GeoResult<()> {
        let path = path.as_ref();
        let text =
            serde_json::to_string_pretty(self).map_err(|err| GeoError::InvalidConfiguration {
                parameter: "config_file".to_string(),
                value: path.display().to_string(),
                reason: err.to_string(),
            })?;
        fs::write(path, text).map_err(|err| GeoError::InvalidConfiguration {
            parameter: "config_file".to_string(),
            value: path.display().to_string(),
            reason: err.to_string(),
        })
    }

    /// Check every parameter against its valid range.
    pub fn validate(&self) -> GeoResult<()> {
        if !self.default_height_m.is_finite() {
            return Err(self.invalid(
                "default_height_m",
                self.default_height_m.to_string(),
                "must be finite",
            ));
        }
        if !self.boundary_threshold_m.is_finite() || self.boundary_threshold_m <= 0.0 {
            return Err(self.invalid(
                "boundary_threshold_m",
                self.boundary_threshold_m.to_string(),
                "must be a positive distance",
            ));
        }
        if !self.nearby_radius_m.is_finite() || self.nearby_radius_m <= 0.0 {
            return Err(self.invalid(
                "nearby_radius_m",
                self.nearby_radius_m.to_string(),
                "must be a positive distance",
            ));
        }
        if !self.ecef_inverse_tolerance.is_finite() || self.ecef_inverse_tolerance <= 0.0 {
            return Err(self.invalid(
                "ecef_inverse_tolerance",
                self.ecef_inverse_tolerance.to_string(),
                "must be a positive angle",
            ));
        }
        if self.ecef_inverse_max_iterations == 0 {
            return Err(self.invalid(
                "ecef_inverse_max_iterations",
                "0".to_string(),
                "must allow at least one iteration",
            ));
        }
        Ok(())
    }

    fn invalid(&self, parameter: &str, value: String, reason: &str) -> GeoError {
        GeoError::InvalidConfiguration {
            parameter: parameter.to_string(),
            value,
            reason: reason.to_string(),
        }
    }
}
