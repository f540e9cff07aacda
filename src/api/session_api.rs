//! Session-level orchestration
//!
//! Wires the refinement collaborator, the proximity state machine, and the
//! vector resolver into the per-sample pipeline the transport layer drives:
//! refine the fix, feed the session, and on a boundary crossing resolve
//! every nearby anchor into the observer's frame. Samples for one session
//! must arrive in order; the session is owned by its connection and is
//! never shared across sessions.

use tracing::{info, warn};

use crate::algorithms::frame_converter::FrameConverter;
use crate::algorithms::relative_vector::VectorResolver;
use crate::api::collaborators::{AnchorStore, RefinementProvider};
use crate::api::types::{RawFix, RefinedFix, ResolvedAnchor, SessionUpdate};
use crate::core::types::GeodeticPosition;
use crate::session::proximity::{ObserverSession, PositionEvent, ProximityMonitor};
use crate::utils::config::EngineConfig;
use crate::validation::error::GeoResult;
use crate::validation::position::validate_lat_lon;

/// Per-sample pipeline over a configured pair of collaborators.
pub struct SessionApi {
    config: EngineConfig,
    resolver: VectorResolver,
    monitor: ProximityMonitor,
    refinement: Box<dyn RefinementProvider>,
    anchors: Box<dyn AnchorStore>,
}

impl SessionApi {
    /// Build the pipeline, validating the configuration first.
    pub fn new(
        config: EngineConfig,
        refinement: Box<dyn RefinementProvider>,
        anchors: Box<dyn AnchorStore>,
    ) -> GeoResult<Self> {
        config.validate()?;
        let converter = FrameConverter::from_config(&config);
        Ok(Self {
            resolver: VectorResolver::new(converter),
            monitor: ProximityMonitor::new(config.boundary_threshold_m),
            config,
            refinement,
            anchors,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create the state for a newly connected observer.
    pub fn open_session(&self, session_id: impl Into<String>) -> ObserverSession {
        ObserverSession::new(session_id)
    }

    /// Apply one raw position sample to a session and return the update the
    /// caller should forward.
    pub fn handle_sample(
        &self,
        session: &mut ObserverSession,
        fix: RawFix,
    ) -> GeoResult<SessionUpdate> {
        validate_lat_lon(fix.latitude_deg, fix.longitude_deg)?;

        let refined = match self.refinement.refine(&fix) {
            Ok(refined) => refined,
            Err(err) if self.config.use_raw_on_refinement_failure => {
                warn!(
                    session = %session.session_id,
                    error = %err,
                    "refinement failed, falling back to raw fix"
                );
                RefinedFix {
                    latitude_deg: fix.latitude_deg,
                    longitude_deg: fix.longitude_deg,
                }
            }
            Err(err) => {
                warn!(
                    session = %session.session_id,
                    error = %err,
                    "refinement failed, dropping sample"
                );
                return Err(err);
            }
        };

        let sample = GeodeticPosition::new(
            refined.latitude_deg,
            refined.longitude_deg,
            self.config.default_height_m,
        )?;

        let event = self.monitor.ingest(session, sample.clone())?;
        let resolved_assets = match event {
            PositionEvent::BoundaryCrossed { .. } => {
                Some(self.resolve_nearby(session, &sample))
            }
            _ => None,
        };

        Ok(SessionUpdate {
            event,
            state: session.state,
            position: sample,
            resolved_assets,
        })
    }

    /// Resolve every anchor near the observer into the observer's frame.
    /// Resolution of independent anchors is pure and could fan out in
    /// parallel; an anchor that fails to resolve is skipped, not fatal.
    fn resolve_nearby(
        &self,
        session: &ObserverSession,
        observer: &GeodeticPosition,
    ) -> Vec<ResolvedAnchor> {
        let nearby = self.anchors.find_nearby(
            observer.latitude_deg,
            observer.longitude_deg,
            self.config.nearby_radius_m,
        );
        info!(
            session = %session.session_id,
            count = nearby.len(),
            radius_m = self.config.nearby_radius_m,
            "resolving nearby anchors"
        );

        let mut resolved = Vec::with_capacity(nearby.len());
        for anchor in nearby {
            match self.resolver.resolve(&anchor.creator_frame(), observer) {
                Ok(observer_to_object) => resolved.push(ResolvedAnchor {
                    anchor_id: anchor.id,
                    observer_to_object,
                }),
                Err(err) => {
                    warn!(anchor = %anchor.id, error = %err, "skipping unresolvable anchor");
                }
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{FailingRefinement, MemoryAnchorStore, PassthroughRefinement};
    use crate::core::constants::MEAN_EARTH_RADIUS_M;
    use crate::core::types::{Anchor, EnuVector};
    use crate::session::proximity::SessionState;
    use crate::validation::error::GeoError;

    const REF_LAT: f64 = 49.2781;
    const REF_LON: f64 = -122.9199;

    fn creator() -> GeodeticPosition {
        GeodeticPosition::new(REF_LAT, REF_LON, 370.0).unwrap()
    }

    fn north_fix(meters: f64) -> RawFix {
        let offset_deg = (meters / MEAN_EARTH_RADIUS_M).to_degrees();
        RawFix::new(REF_LAT + offset_deg, REF_LON)
    }

    fn api_with_anchors(anchor_offsets: &[(&str, EnuVector)]) -> SessionApi {
        let converter = FrameConverter::default();
        let mut store = MemoryAnchorStore::new();
        for (id, offset) in anchor_offsets {
            store.insert(Anchor::place(*id, creator(), *offset, &converter).unwrap());
        }
        SessionApi::new(
            EngineConfig::default(),
            Box::new(PassthroughRefinement),
            Box::new(store),
        )
        .unwrap()
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = EngineConfig {
            nearby_radius_m: -1.0,
            ..EngineConfig::default()
        };
        let result = SessionApi::new(
            config,
            Box::new(PassthroughRefinement),
            Box::new(MemoryAnchorStore::new()),
        );
        assert!(matches!(
            result,
            Err(GeoError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn first_sample_records_without_resolving() {
        let api = api_with_anchors(&[("one", EnuVector::new(5.0, 10.0, 0.0))]);
        let mut session = api.open_session("s-1");

        let update = api
            .handle_sample(&mut session, RawFix::new(REF_LAT, REF_LON))
            .unwrap();

        assert_eq!(update.event, PositionEvent::PositionRecorded);
        assert_eq!(update.state, SessionState::Settled);
        assert_eq!(update.position.height_m, 370.0);
        assert!(update.resolved_assets.is_none());
    }

    #[test]
    fn boundary_crossing_resolves_nearby_anchors() {
        let api = api_with_anchors(&[
            ("close", EnuVector::new(0.0, 60.0, 0.0)),
            ("at-creator", EnuVector::new(5.0, 10.0, 0.0)),
            ("distant", EnuVector::new(400.0, 0.0, 0.0)),
        ]);
        let mut session = api.open_session("s-1");
        api.handle_sample(&mut session, RawFix::new(REF_LAT, REF_LON))
            .unwrap();

        // Walk 80 m north of the reference: out of range, assets refresh.
        let update = api.handle_sample(&mut session, north_fix(80.0)).unwrap();
        assert!(matches!(update.event, PositionEvent::BoundaryCrossed { .. }));
        assert_eq!(update.state, SessionState::OutOfRange);

        let assets = update.resolved_assets.unwrap();
        // "distant" lies 400 m away, outside the 100 m lookup radius; the
        // rest come back nearest first.
        let ids: Vec<&str> = assets.iter().map(|a| a.anchor_id.as_str()).collect();
        assert_eq!(ids, ["close", "at-creator"]);

        // The anchor placed (5, 10) from the creator sits about 70 m south
        // of an observer standing 80 m north of the creator.
        let at_creator = &assets[1].observer_to_object;
        assert!((at_creator.vector.east_m - 5.0).abs() < 0.1);
        assert!((at_creator.vector.north_m + 70.0).abs() < 0.1);
        assert!(at_creator.vector.up_m.abs() < 0.1);
        assert_eq!(at_creator.reference, update.position);
    }

    #[test]
    fn refinement_failure_falls_back_to_raw_by_default() {
        let mut store = MemoryAnchorStore::new();
        store.insert(
            Anchor::place(
                "one",
                creator(),
                EnuVector::new(5.0, 10.0, 0.0),
                &FrameConverter::default(),
            )
            .unwrap(),
        );
        let api = SessionApi::new(
            EngineConfig::default(),
            Box::new(FailingRefinement::new("upstream timeout")),
            Box::new(store),
        )
        .unwrap();

        let mut session = api.open_session("s-1");
        let update = api
            .handle_sample(&mut session, RawFix::new(REF_LAT, REF_LON))
            .unwrap();
        assert_eq!(update.event, PositionEvent::PositionRecorded);
        assert_eq!(update.position.latitude_deg, REF_LAT);
    }

    #[test]
    fn refinement_failure_drops_the_sample_when_fallback_disabled() {
        let api = SessionApi::new(
            EngineConfig {
                use_raw_on_refinement_failure: false,
                ..EngineConfig::default()
            },
            Box::new(FailingRefinement::new("upstream timeout")),
            Box::new(MemoryAnchorStore::new()),
        )
        .unwrap();

        let mut session = api.open_session("s-1");
        let result = api.handle_sample(&mut session, RawFix::new(REF_LAT, REF_LON));
        assert!(matches!(
            result,
            Err(GeoError::RefinementUnavailable { .. })
        ));
        // The session never saw the sample.
        assert_eq!(session.state, SessionState::Initializing);
        assert!(session.reference_position.is_none());
    }

    #[test]
    fn invalid_fix_is_rejected_before_refinement() {
        let api = api_with_anchors(&[]);
        let mut session = api.open_session("s-1");
        let result = api.handle_sample(&mut session, RawFix::new(f64::NAN, REF_LON));
        assert!(matches!(result, Err(GeoError::InvalidPosition { .. })));
        assert_eq!(session.state, SessionState::Initializing);
    }

    #[test]
    fn returning_in_range_does_not_resolve() {
        let api = api_with_anchors(&[("one", EnuVector::new(5.0, 10.0, 0.0))]);
        let mut session = api.open_session("s-1");
        api.handle_sample(&mut session, RawFix::new(REF_LAT, REF_LON))
            .unwrap();
        api.handle_sample(&mut session, north_fix(80.0)).unwrap();

        let update = api.handle_sample(&mut session, north_fix(5.0)).unwrap();
        assert!(matches!(update.event, PositionEvent::ReturnedInRange { .. }));
        assert!(update.resolved_assets.is_none());
    }
}
