//! Error classification for the relocation engine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result type for engine operations
pub type GeoResult<T> = Result<T, GeoError>;

/// Engine error taxonomy
///
/// Every operation in this crate is side-effect-free on error: no session
/// state or output is mutated before validation and convergence checks pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeoError {
    /// Non-finite or out-of-range latitude/longitude reached a conversion.
    /// Fatal to the call; upstream input must be rejected before it gets here.
    InvalidPosition {
        latitude_deg: f64,
        longitude_deg: f64,
        reason: String,
    },
    /// The iterative ECEF inverse failed to converge within its iteration
    /// cap. Signals a bug or extreme input; surfaced, never retried.
    NumericDivergence {
        iterations: u32,
        residual_rad: f64,
    },
    /// The external coordinate-refinement collaborator failed. Handled by
    /// the configured fallback policy, never propagated past the session
    /// layer.
    RefinementUnavailable { reason: String },
    /// A configuration parameter is outside its valid range.
    InvalidConfiguration {
        parameter: String,
        value: String,
        reason: String,
    },
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoError::InvalidPosition {
                latitude_deg,
                longitude_deg,
                reason,
            } => {
                write!(
                    f,
                    "invalid position ({latitude_deg}, {longitude_deg}): {reason}"
                )
            }
            GeoError::NumericDivergence {
                iterations,
                residual_rad,
            } => {
                write!(
                    f,
                    "ECEF inverse did not converge after {iterations} iterations \
                     (residual {residual_rad:.3e} rad)"
                )
            }
            GeoError::RefinementUnavailable { reason } => {
                write!(f, "position refinement unavailable: {reason}")
            }
            GeoError::InvalidConfiguration {
                parameter,
                value,
                reason,
            } => {
                write!(f, "invalid configuration {parameter} = {value}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoError {}
