//! Session API types and data structures

use serde::{Deserialize, Serialize};

use crate::core::types::{FramedVector, GeodeticPosition};
use crate::session::proximity::{PositionEvent, SessionState};

/// A raw position fix as delivered by the transport layer, before
/// refinement and before a height is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawFix {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl RawFix {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }
}

/// A position fix corrected by the external refinement collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RefinedFix {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

/// One anchored object resolved into the observer's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedAnchor {
    pub anchor_id: String,
    /// Observer-to-object offset, framed at the observer's position
    pub observer_to_object: FramedVector,
}

/// The outcome of one position sample, returned for the caller to forward.
/// The engine never sends anything on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUpdate {
    pub event: PositionEvent,
    pub state: SessionState,
    /// The position the sample settled at, default height applied
    pub position: GeodeticPosition,
    /// Present only when the event is a boundary crossing
    pub resolved_assets: Option<Vec<ResolvedAnchor>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EnuVector;

    #[test]
    fn update_serializes_for_the_transport() {
        let position = GeodeticPosition::new(49.2781, -122.9199, 370.0).unwrap();
        let update = SessionUpdate {
            event: PositionEvent::BoundaryCrossed { distance_m: 72.4 },
            state: SessionState::OutOfRange,
            position: position.clone(),
            resolved_assets: Some(vec![ResolvedAnchor {
                anchor_id: "bench-plaque".to_string(),
                observer_to_object: FramedVector::new(position, EnuVector::new(5.0, -62.4, 0.0)),
            }]),
        };

        let json = serde_json::to_string(&update).unwrap();
        let back: SessionUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(update, back);
    }
}
