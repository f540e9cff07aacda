//! Per-observer proximity tracking
//!
//! Each connected observer owns one [`ObserverSession`]. The session records
//! the first refined position as its reference point and afterwards only
//! watches the great-circle distance to that reference: crossing the
//! configured boundary outward is the trigger for handing the observer a
//! refreshed set of nearby anchors. The reference is never moved here; only
//! external logic may reset it.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::algorithms::great_circle::haversine_wide;
use crate::core::types::GeodeticPosition;
use crate::validation::error::GeoResult;
use crate::validation::position::validate_position;

/// Observer session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No reference point recorded yet. Entered once, at session start.
    Initializing,
    /// Within the boundary threshold of the reference point.
    Settled,
    /// Beyond the boundary threshold of the reference point.
    OutOfRange,
}

/// Mutable per-observer state, owned exclusively by its connection.
///
/// Samples for one session must be applied in arrival order; out-of-order
/// application would corrupt the reference/threshold logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverSession {
    pub session_id: String,
    pub reference_position: Option<GeodeticPosition>,
    pub current_position: Option<GeodeticPosition>,
    pub state: SessionState,
}

impl ObserverSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            reference_position: None,
            current_position: None,
            state: SessionState::Initializing,
        }
    }
}

/// Outcome of feeding one position sample into a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PositionEvent {
    /// First sample: reference point recorded, not evaluated against the
    /// threshold.
    PositionRecorded,
    /// No state change; carries the latest distance for caller feedback.
    PositionUpdated { distance_m: f64 },
    /// The observer moved beyond the threshold. Trigger for fetching nearby
    /// anchors and resolving observer-relative vectors.
    BoundaryCrossed { distance_m: f64 },
    /// The observer came back within the threshold.
    ReturnedInRange { distance_m: f64 },
}

/// Distance-threshold state machine over a stream of position samples.
pub struct ProximityMonitor {
    threshold_m: f64,
}

impl ProximityMonitor {
    pub fn new(threshold_m: f64) -> Self {
        Self { threshold_m }
    }

    pub fn threshold_m(&self) -> f64 {
        self.threshold_m
    }

    /// Apply one refined position sample to a session.
    ///
    /// Invalid samples leave the session untouched and surface the error to
    /// the caller. Crossing out requires strictly more than the threshold:
    /// a sample landing exactly on the boundary stays in range.
    pub fn ingest(
        &self,
        session: &mut ObserverSession,
        sample: GeodeticPosition,
    ) -> GeoResult<PositionEvent> {
        validate_position(&sample)?;

        let Some(reference) = session.reference_position.clone() else {
            session.reference_position = Some(sample.clone());
            session.current_position = Some(sample);
            session.state = SessionState::Settled;
            debug!(session = %session.session_id, "reference position recorded");
            return Ok(PositionEvent::PositionRecorded);
        };

        // The distance is accumulated at double-double width and collapsed
        // once, so the comparison against the threshold is exact and
        // reproducible for samples landing on the boundary.
        let distance_m = haversine_wide(&reference, &sample).value();
        let beyond_threshold = distance_m > self.threshold_m;
        session.current_position = Some(sample);

        match (session.state, beyond_threshold) {
            (SessionState::Settled, true) => {
                session.state = SessionState::OutOfRange;
                debug!(
                    session = %session.session_id,
                    distance_m,
                    threshold_m = self.threshold_m,
                    "boundary crossed"
                );
                Ok(PositionEvent::BoundaryCrossed { distance_m })
            }
            (SessionState::OutOfRange, false) => {
                session.state = SessionState::Settled;
                debug!(session = %session.session_id, distance_m, "returned in range");
                Ok(PositionEvent::ReturnedInRange { distance_m })
            }
            _ => Ok(PositionEvent::PositionUpdated { distance_m }),
        }
    }
}
