//! In-memory reference collaborators
//!
//! Production deployments wire real storage and a real refinement service
//! behind the collaborator traits; these implementations back tests and the
//! demo binary.

use crate::algorithms::great_circle::haversine_distance_m;
use crate::api::collaborators::{AnchorStore, RefinementProvider};
use crate::api::types::{RawFix, RefinedFix};
use crate::core::types::{Anchor, GeodeticPosition};
use crate::validation::error::{GeoError, GeoResult};

/// Vec-backed anchor store, sorted by haversine distance on lookup.
#[derive(Debug, Default)]
pub struct MemoryAnchorStore {
    anchors: Vec<Anchor>,
}

impl MemoryAnchorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, anchor: Anchor) {
        self.anchors.push(anchor);
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

impl AnchorStore for MemoryAnchorStore {
    fn find_nearby(&self, latitude_deg: f64, longitude_deg: f64, radius_m: f64) -> Vec<Anchor> {
        let origin = GeodeticPosition {
            latitude_deg,
            longitude_deg,
            height_m: 0.0,
        };
        let mut hits: Vec<(f64, Anchor)> = self
            .anchors
            .iter()
            .map(|anchor| {
                (
                    haversine_distance_m(&origin, &anchor.object_position),
                    anchor.clone(),
                )
            })
            .filter(|(distance_m, _)| *distance_m <= radius_m)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        hits.into_iter().map(|(_, anchor)| anchor).collect()
    }
}

/// Refinement stand-in that returns the fix unchanged.
#[derive(Debug, Default)]
pub struct PassthroughRefinement;

impl RefinementProvider for PassthroughRefinement {
    fn refine(&self, fix: &RawFix) -> GeoResult<RefinedFix> {
        Ok(RefinedFix {
            latitude_deg: fix.latitude_deg,
            longitude_deg: fix.longitude_deg,
        })
    }
}

/// Refinement stand-in that always fails, for fallback-policy tests.
#[derive(Debug)]
pub struct FailingRefinement {
    pub reason: String,
}

impl FailingRefinement {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl RefinementProvider for FailingRefinement {
    fn refine(&self, _fix: &RawFix) -> GeoResult<RefinedFix> {
        Err(GeoError::RefinementUnavailable {
            reason: self.reason.clone(),
        })
    }
}
