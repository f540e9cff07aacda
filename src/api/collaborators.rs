//! External collaborator interfaces
//!
//! The engine owns no storage, no network, and no refinement model; it
//! talks to those systems through these traits and nothing else.

use crate::api::types::{RawFix, RefinedFix};
use crate::core::types::Anchor;
use crate::validation::error::GeoResult;

/// Coordinate-refinement collaborator mapping a raw GPS fix to a corrected
/// fix. Failure is expected operational behavior, handled by the session
/// layer's fallback policy.
pub trait RefinementProvider {
    fn refine(&self, fix: &RawFix) -> GeoResult<RefinedFix>;
}

/// Anchor lookup collaborator.
pub trait AnchorStore {
    /// Anchors whose object position lies within `radius_m` of the fix,
    /// ordered by ascending distance.
    fn find_nearby(&self, latitude_deg: f64, longitude_deg: f64, radius_m: f64) -> Vec<Anchor>;
}
